//! Keyed collection diffs for spaces and protocols
//!
//! Both collections are keyed by `id`. Records follow the iteration order
//! of `current`, with removals appended in the order of `previous`.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use pulse_core::{Protocol, ProtocolStatus, Space, Status, Trust};

/// Items that carry a stable key
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Space {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Protocol {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Generic keyed diff
///
/// `changes` is called for every id present on both sides and pushes zero
/// or more field-level records.
pub(crate) fn diff_keyed<T, R>(
    current: &[T],
    previous: &[T],
    added: impl Fn(&T) -> R,
    removed: impl Fn(&T) -> R,
    changes: impl Fn(&T, &T, &mut Vec<R>),
) -> Vec<R>
where
    T: Keyed,
{
    // last occurrence wins for duplicate ids
    let previous_by_key: HashMap<&str, &T> = previous.iter().map(|p| (p.key(), p)).collect();
    let current_keys: HashSet<&str> = current.iter().map(Keyed::key).collect();

    let mut records = Vec::new();
    for item in current {
        match previous_by_key.get(item.key()) {
            Some(before) => changes(item, before, &mut records),
            None => records.push(added(item)),
        }
    }

    let mut reported: HashSet<&str> = HashSet::new();
    for item in previous.iter().rev() {
        let key = item.key();
        if !current_keys.contains(key) && reported.insert(key) {
            records.push(removed(item));
        }
    }
    // removals were collected back to front so that the last duplicate wins
    let removals_start = records.len() - reported.len();
    records[removals_start..].reverse();

    records
}

/// One change between two space lists
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum SpaceChange {
    Added {
        id: String,
        item: Space,
    },
    Removed {
        id: String,
        item: Space,
    },
    Status {
        id: String,
        from: Status,
        to: Status,
    },
    Trust {
        id: String,
        from: Trust,
        to: Trust,
    },
    Agents {
        id: String,
        from: Option<u64>,
        to: Option<u64>,
        delta: i64,
        /// `None` when the previous count is unknown or zero
        #[serde(rename = "percentChange")]
        percent_change: Option<f64>,
    },
}

impl SpaceChange {
    pub fn id(&self) -> &str {
        match self {
            Self::Added { id, .. }
            | Self::Removed { id, .. }
            | Self::Status { id, .. }
            | Self::Trust { id, .. }
            | Self::Agents { id, .. } => id,
        }
    }
}

/// Diff two space lists
pub fn diff_spaces(current: &[Space], previous: &[Space]) -> Vec<SpaceChange> {
    diff_keyed(
        current,
        previous,
        |s| SpaceChange::Added {
            id: s.id.clone(),
            item: s.clone(),
        },
        |s| SpaceChange::Removed {
            id: s.id.clone(),
            item: s.clone(),
        },
        |now, before, out| {
            if now.status != before.status {
                out.push(SpaceChange::Status {
                    id: now.id.clone(),
                    from: before.status,
                    to: now.status,
                });
            }
            if now.trust != before.trust {
                out.push(SpaceChange::Trust {
                    id: now.id.clone(),
                    from: before.trust,
                    to: now.trust,
                });
            }
            if now.agents != before.agents {
                let delta = signed(now.agents.unwrap_or(0)) - signed(before.agents.unwrap_or(0));
                out.push(SpaceChange::Agents {
                    id: now.id.clone(),
                    from: before.agents,
                    to: now.agents,
                    delta,
                    percent_change: percent_change(delta, before.agents),
                });
            }
        },
    )
}

/// One change between two protocol lists
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum ProtocolChange {
    Added {
        id: String,
        item: Protocol,
    },
    Removed {
        id: String,
        item: Protocol,
    },
    Status {
        id: String,
        from: ProtocolStatus,
        to: ProtocolStatus,
    },
    Stars {
        id: String,
        from: Option<u64>,
        to: Option<u64>,
        /// Only computed when both counts are known
        delta: Option<i64>,
    },
}

impl ProtocolChange {
    pub fn id(&self) -> &str {
        match self {
            Self::Added { id, .. }
            | Self::Removed { id, .. }
            | Self::Status { id, .. }
            | Self::Stars { id, .. } => id,
        }
    }
}

/// Diff two protocol lists
pub fn diff_protocols(current: &[Protocol], previous: &[Protocol]) -> Vec<ProtocolChange> {
    diff_keyed(
        current,
        previous,
        |p| ProtocolChange::Added {
            id: p.id.clone(),
            item: p.clone(),
        },
        |p| ProtocolChange::Removed {
            id: p.id.clone(),
            item: p.clone(),
        },
        |now, before, out| {
            if now.status != before.status {
                out.push(ProtocolChange::Status {
                    id: now.id.clone(),
                    from: before.status,
                    to: now.status,
                });
            }
            if now.stars != before.stars {
                let delta = match (now.stars, before.stars) {
                    (Some(to), Some(from)) => Some(signed(to) - signed(from)),
                    _ => None,
                };
                out.push(ProtocolChange::Stars {
                    id: now.id.clone(),
                    from: before.stars,
                    to: now.stars,
                    delta,
                });
            }
        },
    )
}

pub(crate) fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// `delta / previous` as a percentage with two decimals, half rounded up
fn percent_change(delta: i64, previous: Option<u64>) -> Option<f64> {
    match previous {
        Some(prev) if prev > 0 => {
            let scaled = delta as f64 / prev as f64 * 10_000.0;
            Some((scaled + 0.5).floor() / 100.0)
        }
        _ => None,
    }
}
