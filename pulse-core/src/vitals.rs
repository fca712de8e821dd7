//! Vitals - aggregate roll-up of a snapshot
//!
//! Vitals are never read from crawl text. They are recomputed from a
//! `(spaces, security)` pair, so the same numbers come out for the full
//! snapshot and for any filtered view of it.

use serde::{Deserialize, Serialize};

use crate::{SecurityAlert, Severity, Space, Status};

/// Alert counts per severity bucket (`info` is not counted)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityCounts {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// Aggregate statistics over spaces and alerts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    pub total_spaces: u64,
    pub active_spaces: u64,
    pub warning_spaces: u64,
    pub down_spaces: u64,
    pub total_agents_claimed: u64,
    pub total_agents_verified: u64,
    pub new_spaces_since_last_crawl: u64,
    pub security_alerts: SecurityCounts,
}

/// Compute vitals for a set of spaces and alerts
pub fn calculate_vitals(spaces: &[Space], security: &[SecurityAlert]) -> Vitals {
    let mut vitals = Vitals {
        total_spaces: spaces.len() as u64,
        ..Vitals::default()
    };

    for space in spaces {
        if space.status.is_active() {
            vitals.active_spaces += 1;
        }
        match space.status {
            Status::Warning => vitals.warning_spaces += 1,
            Status::Down => vitals.down_spaces += 1,
            _ => {}
        }
        // claimed counts are unbounded text input, so totals saturate
        if let Some(agents) = space.agents {
            vitals.total_agents_claimed = vitals.total_agents_claimed.saturating_add(agents);
            if space.trust.is_verified() {
                vitals.total_agents_verified = vitals.total_agents_verified.saturating_add(agents);
            }
        }
        if space.is_new {
            vitals.new_spaces_since_last_crawl += 1;
        }
    }

    let counts = &mut vitals.security_alerts;
    for alert in security {
        match alert.severity {
            Severity::Critical => counts.critical += 1,
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => counts.low += 1,
            Severity::Info => {}
        }
    }

    vitals
}
