//! Filtering and ordering helpers over snapshot collections
//!
//! All helpers return new vectors and keep the relative order of equal
//! elements, so the results can be fed straight back into
//! [`crate::calculate_vitals`].

use std::cmp::Ordering;

use crate::{SecurityAlert, Space, Status, Trust};

/// Order alerts by severity (critical first), then `affects_us` first
pub fn sort_by_severity(alerts: &[SecurityAlert]) -> Vec<SecurityAlert> {
    let mut sorted = alerts.to_vec();
    sorted.sort_by(|a, b| {
        b.severity
            .rank()
            .cmp(&a.severity.rank())
            .then_with(|| b.affects_us.cmp(&a.affects_us))
    });
    sorted
}

/// Criteria for narrowing down the space list
#[derive(Debug, Clone, Default)]
pub struct SpaceFilter {
    pub status: Option<Status>,
    pub trust: Option<Trust>,
    /// Case-insensitive substring of id, name or description
    pub search: Option<String>,
    pub new_only: bool,
}

impl SpaceFilter {
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_trust(mut self, trust: Trust) -> Self {
        self.trust = Some(trust);
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn new_only(mut self) -> Self {
        self.new_only = true;
        self
    }

    pub fn matches(&self, space: &Space) -> bool {
        if self.status.is_some_and(|s| s != space.status) {
            return false;
        }
        if self.trust.is_some_and(|t| t != space.trust) {
            return false;
        }
        if self.new_only && !space.is_new {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                [&space.id, &space.name, &space.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }

    pub fn apply(&self, spaces: &[Space]) -> Vec<Space> {
        spaces.iter().filter(|s| self.matches(s)).cloned().collect()
    }
}

/// Sort keys for the space list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Agents,
    Name,
    Status,
    Trust,
}

/// Sort spaces by a key; unknown agent counts always sort last
pub fn sort_spaces(spaces: &[Space], key: SortKey, descending: bool) -> Vec<Space> {
    let mut sorted = spaces.to_vec();
    sorted.sort_by(|a, b| {
        let directed = |ord: Ordering| if descending { ord.reverse() } else { ord };
        match key {
            SortKey::Agents => match (a.agents, b.agents) {
                (Some(x), Some(y)) => directed(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Name => directed(a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            SortKey::Status => directed(status_order(a.status).cmp(&status_order(b.status))),
            SortKey::Trust => directed(trust_order(a.trust).cmp(&trust_order(b.trust))),
        }
    });
    sorted
}

fn status_order(status: Status) -> u8 {
    match status {
        Status::Surging => 0,
        Status::Active => 1,
        Status::Steady => 2,
        Status::Quiet => 3,
        Status::Warning => 4,
        Status::Down => 5,
        Status::Critical => 6,
        Status::Avoid => 7,
    }
}

fn trust_order(trust: Trust) -> u8 {
    match trust {
        Trust::High => 0,
        Trust::MediumHigh => 1,
        Trust::Medium => 2,
        Trust::Low => 3,
        Trust::Critical => 4,
        Trust::Avoid => 5,
    }
}
