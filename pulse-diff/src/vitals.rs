//! Field-by-field vitals comparison

use serde::Serialize;

use pulse_core::{SecurityCounts, Vitals};

use crate::collection::signed;

/// A current value and its change since the previous snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountDelta {
    pub value: u64,
    /// `None` when there is no previous snapshot
    pub delta: Option<i64>,
}

impl CountDelta {
    fn between(value: u64, previous: Option<u64>) -> Self {
        Self {
            value,
            delta: previous.map(|p| signed(value) - signed(p)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityCountsDiff {
    pub critical: CountDelta,
    pub high: CountDelta,
    pub medium: CountDelta,
    pub low: CountDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsDiff {
    pub total_spaces: CountDelta,
    pub active_spaces: CountDelta,
    pub warning_spaces: CountDelta,
    pub down_spaces: CountDelta,
    pub total_agents_claimed: CountDelta,
    pub total_agents_verified: CountDelta,
    pub new_spaces_since_last_crawl: CountDelta,
    pub security_alerts: SecurityCountsDiff,
}

/// Compare vitals; every delta is `None` without a previous value
pub fn diff_vitals(current: &Vitals, previous: Option<&Vitals>) -> VitalsDiff {
    let field = |get: fn(&Vitals) -> u64| CountDelta::between(get(current), previous.map(get));

    VitalsDiff {
        total_spaces: field(|v| v.total_spaces),
        active_spaces: field(|v| v.active_spaces),
        warning_spaces: field(|v| v.warning_spaces),
        down_spaces: field(|v| v.down_spaces),
        total_agents_claimed: field(|v| v.total_agents_claimed),
        total_agents_verified: field(|v| v.total_agents_verified),
        new_spaces_since_last_crawl: field(|v| v.new_spaces_since_last_crawl),
        security_alerts: diff_counts(&current.security_alerts, previous.map(|p| &p.security_alerts)),
    }
}

fn diff_counts(current: &SecurityCounts, previous: Option<&SecurityCounts>) -> SecurityCountsDiff {
    let field =
        |get: fn(&SecurityCounts) -> u64| CountDelta::between(get(current), previous.map(get));

    SecurityCountsDiff {
        critical: field(|c| c.critical),
        high: field(|c| c.high),
        medium: field(|c| c.medium),
        low: field(|c| c.low),
    }
}
