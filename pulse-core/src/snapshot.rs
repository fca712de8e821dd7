//! Snapshot - the complete structured result of parsing one crawl

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{calculate_vitals, Protocol, SecurityAlert, Signal, Space, Vitals};

/// Errors from loading a serialized snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Crawl sequence number from the header line
    pub crawl: Option<u32>,
    pub date: Option<NaiveDate>,
    pub spaces: Vec<Space>,
    pub protocols: Vec<Protocol>,
    pub security: Vec<SecurityAlert>,
    pub signals: Vec<Signal>,
    pub vitals: Vitals,
}

impl Snapshot {
    /// Skeleton snapshot: no header, empty collections, zero vitals
    pub fn empty() -> Self {
        Self {
            crawl: None,
            date: None,
            spaces: Vec::new(),
            protocols: Vec::new(),
            security: Vec::new(),
            signals: Vec::new(),
            vitals: Vitals::default(),
        }
    }

    /// Assemble a snapshot, deriving vitals from spaces and alerts
    pub fn assemble(
        crawl: Option<u32>,
        date: Option<NaiveDate>,
        spaces: Vec<Space>,
        protocols: Vec<Protocol>,
        security: Vec<SecurityAlert>,
        signals: Vec<Signal>,
    ) -> Self {
        let vitals = calculate_vitals(&spaces, &security);
        Self {
            crawl,
            date,
            spaces,
            protocols,
            security,
            signals,
            vitals,
        }
    }

    /// Deserialize a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and deserialize a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&text)?;
        debug!(
            "Loaded crawl {:?} from {}: {} spaces, {} alerts",
            snapshot.crawl,
            path.display(),
            snapshot.spaces.len(),
            snapshot.security.len()
        );
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn test_empty_snapshot_has_all_arrays() {
        let json = serde_json::to_value(Snapshot::empty()).unwrap();
        for key in ["spaces", "protocols", "security", "signals"] {
            assert!(json[key].is_array(), "{} should be an array", key);
        }
        assert!(json["crawl"].is_null());
        assert!(json["date"].is_null());
        assert_eq!(json["vitals"]["totalSpaces"], 0);
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = Snapshot::assemble(
            Some(42),
            NaiveDate::from_ymd_opt(2026, 2, 14),
            vec![Space::new("moltbook.com", Status::Active).with_agents(Some(12))],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let json = snapshot.to_json_pretty().unwrap();
        assert!(json.contains("\"2026-02-14\""));
        let restored = Snapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(restored.vitals.total_agents_claimed, 12);
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("pulse-snapshot-{}.json", std::process::id()));
        let snapshot = Snapshot::assemble(
            Some(9),
            None,
            vec![Space::new("a.com", Status::Active)],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        std::fs::write(&path, snapshot.to_json_pretty().unwrap()).unwrap();
        let loaded = Snapshot::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, snapshot);

        assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Io(_))));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Snapshot::from_json("not json"),
            Err(SnapshotError::Json(_))
        ));
    }
}
