//! Pulse Diff - change detection between two snapshots
//!
//! Produces keyed change records for spaces, alerts and protocols plus a
//! field-by-field vitals comparison. Both inputs are read-only; comparing
//! against no previous snapshot is the normal first-crawl case.

pub mod collection;
pub mod security;
pub mod vitals;

pub use collection::{diff_protocols, diff_spaces, Keyed, ProtocolChange, SpaceChange};
pub use security::{diff_security, SecurityChange};
pub use vitals::{diff_vitals, CountDelta, SecurityCountsDiff, VitalsDiff};

use serde::Serialize;
use tracing::debug;

use pulse_core::Snapshot;

/// Everything that changed between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotDiff {
    pub spaces: Vec<SpaceChange>,
    pub security: Vec<SecurityChange>,
    pub protocols: Vec<ProtocolChange>,
    pub vitals: VitalsDiff,
}

impl SnapshotDiff {
    /// True when no collection records were produced
    pub fn is_quiet(&self) -> bool {
        self.spaces.is_empty() && self.security.is_empty() && self.protocols.is_empty()
    }
}

/// Diff `current` against `previous`
///
/// With no previous snapshot every collection diffs against an empty list
/// and every vitals delta is `None`.
pub fn diff_snapshots(current: &Snapshot, previous: Option<&Snapshot>) -> SnapshotDiff {
    let diff = SnapshotDiff {
        spaces: diff_spaces(
            &current.spaces,
            previous.map_or(&[][..], |p| p.spaces.as_slice()),
        ),
        security: diff_security(
            &current.security,
            previous.map_or(&[][..], |p| p.security.as_slice()),
        ),
        protocols: diff_protocols(
            &current.protocols,
            previous.map_or(&[][..], |p| p.protocols.as_slice()),
        ),
        vitals: diff_vitals(&current.vitals, previous.map(|p| &p.vitals)),
    };

    debug!(
        "Diffed crawl {:?} against {:?}: {} space, {} security, {} protocol changes",
        current.crawl,
        previous.and_then(|p| p.crawl),
        diff.spaces.len(),
        diff.security.len(),
        diff.protocols.len()
    );

    diff
}
