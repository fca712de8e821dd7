//! Pulse Core - snapshot domain model for agent ecosystem crawls
//!
//! This crate provides the foundational types shared by the parser, the
//! differ and the layout engine:
//! - Snapshot entities (spaces, protocols, security alerts, signals)
//! - Vitals aggregation over spaces and alerts
//! - Structural validation of snapshots
//! - Filtering, ordering and display lookup helpers

pub mod model;
pub mod snapshot;
pub mod vitals;
pub mod validate;
pub mod query;
pub mod display;

pub use model::*;
pub use snapshot::*;
pub use vitals::*;
pub use validate::*;
pub use query::*;

/// Maximum length of a security alert id slug
pub const MAX_ALERT_ID_LEN: usize = 50;
