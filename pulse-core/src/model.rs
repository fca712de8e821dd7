//! Entities extracted from a crawl report
//!
//! Every enum serializes to the kebab-case label used in crawl JSON
//! (`medium-high`, `not-applicable`, ...). The [`Label`] trait exposes the
//! same labels for validation and display lookups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed set of string labels backing an enum
pub trait Label: Sized + Copy + 'static {
    /// Every variant, in declaration order
    const ALL: &'static [Self];

    /// Wire label of this variant
    fn as_str(&self) -> &'static str;

    /// Look up a variant by its wire label (case-insensitive)
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(label))
    }

    /// All wire labels
    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.as_str()).collect()
    }
}

/// Liveness of a space as reported by the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Surging,
    Active,
    Steady,
    Quiet,
    Warning,
    Down,
    Critical,
    Avoid,
}

impl Label for Status {
    const ALL: &'static [Self] = &[
        Self::Surging,
        Self::Active,
        Self::Steady,
        Self::Quiet,
        Self::Warning,
        Self::Down,
        Self::Critical,
        Self::Avoid,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Surging => "surging",
            Self::Active => "active",
            Self::Steady => "steady",
            Self::Quiet => "quiet",
            Self::Warning => "warning",
            Self::Down => "down",
            Self::Critical => "critical",
            Self::Avoid => "avoid",
        }
    }
}

impl Status {
    /// Icon that prefixes a space line in the crawl text
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Surging => "🚀",
            Self::Active => "🟢",
            Self::Steady => "🔵",
            Self::Quiet => "⚪",
            Self::Warning => "🟡",
            Self::Down => "🔴",
            Self::Critical => "💀",
            Self::Avoid => "⛔",
        }
    }

    /// Reverse of [`Status::icon`]; variation selectors are ignored
    pub fn from_icon(icon: &str) -> Option<Self> {
        let icon = icon.trim().trim_end_matches('\u{FE0F}');
        Self::ALL.iter().copied().find(|s| s.icon() == icon)
    }

    /// Counted as "active" in vitals
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::Surging)
    }
}

/// Coarse risk/quality classification of a space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trust {
    High,
    MediumHigh,
    Medium,
    Low,
    Critical,
    Avoid,
}

impl Label for Trust {
    const ALL: &'static [Self] = &[
        Self::High,
        Self::MediumHigh,
        Self::Medium,
        Self::Low,
        Self::Critical,
        Self::Avoid,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::MediumHigh => "medium-high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Critical => "critical",
            Self::Avoid => "avoid",
        }
    }
}

impl Trust {
    /// Agent counts of these tiers are treated as verified
    pub fn is_verified(self) -> bool {
        matches!(self, Self::High | Self::MediumHigh)
    }
}

/// Severity of a security alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Label for Severity {
    const ALL: &'static [Self] = &[
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Info,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
        }
    }
}

impl Severity {
    /// Numeric rank used for escalation checks and sorting
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Info => 0,
        }
    }
}

/// Severity attached to a signal (alerts plus `warning`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalSeverity {
    Critical,
    High,
    Medium,
    Low,
    Info,
    Warning,
}

impl Label for SignalSeverity {
    const ALL: &'static [Self] = &[
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Info,
        Self::Warning,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// Kind of ecosystem movement a signal reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalType {
    Surge,
    Decline,
    Launch,
    Death,
    Merge,
    Breach,
    Anomaly,
    Correction,
}

impl Label for SignalType {
    const ALL: &'static [Self] = &[
        Self::Surge,
        Self::Decline,
        Self::Launch,
        Self::Death,
        Self::Merge,
        Self::Breach,
        Self::Anomaly,
        Self::Correction,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Surge => "surge",
            Self::Decline => "decline",
            Self::Launch => "launch",
            Self::Death => "death",
            Self::Merge => "merge",
            Self::Breach => "breach",
            Self::Anomaly => "anomaly",
            Self::Correction => "correction",
        }
    }
}

impl SignalType {
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Surge => "📈",
            Self::Decline => "📉",
            Self::Launch => "🆕",
            Self::Death => "💀",
            Self::Merge => "🔀",
            Self::Breach => "🔓",
            Self::Anomaly => "❓",
            Self::Correction => "🔧",
        }
    }

    /// Map a signal marker to its type; unknown markers are anomalies
    pub fn from_icon(icon: &str) -> Self {
        let icon = icon.trim().trim_end_matches('\u{FE0F}');
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.icon() == icon)
            .unwrap_or(Self::Anomaly)
    }
}

/// Adoption stage of a protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolStatus {
    Emerging,
    Growing,
    Established,
    Stalled,
    Deprecated,
}

impl Label for ProtocolStatus {
    const ALL: &'static [Self] = &[
        Self::Emerging,
        Self::Growing,
        Self::Established,
        Self::Stalled,
        Self::Deprecated,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Emerging => "emerging",
            Self::Growing => "growing",
            Self::Established => "established",
            Self::Stalled => "stalled",
            Self::Deprecated => "deprecated",
        }
    }
}

/// Our exposure to a security alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OurStatus {
    Patched,
    Vulnerable,
    NotApplicable,
    Monitoring,
}

impl Label for OurStatus {
    const ALL: &'static [Self] = &[
        Self::Patched,
        Self::Vulnerable,
        Self::NotApplicable,
        Self::Monitoring,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Patched => "patched",
            Self::Vulnerable => "vulnerable",
            Self::NotApplicable => "not-applicable",
            Self::Monitoring => "monitoring",
        }
    }
}

/// One agent-ecosystem platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// Domain-like key, unique within a snapshot after dedup
    pub id: String,
    pub name: String,
    pub url: String,
    pub status: Status,
    pub trust: Trust,
    /// `None` = unknown, `Some(0)` = confirmed zero
    pub agents: Option<u64>,
    pub description: String,
    pub is_new: bool,
    pub security_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Map<String, Value>>,
}

impl Space {
    /// Space with defaults derived from its id
    pub fn new(id: impl Into<String>, status: Status) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            url: format!("https://{}", id),
            id,
            status,
            trust: Trust::Medium,
            agents: None,
            description: String::new(),
            is_new: false,
            security_notes: None,
            metrics: None,
        }
    }

    pub fn with_trust(mut self, trust: Trust) -> Self {
        self.trust = trust;
        self
    }

    pub fn with_agents(mut self, agents: Option<u64>) -> Self {
        self.agents = agents;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_new(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }
}

/// An agent interoperability protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: ProtocolStatus,
    pub stars: Option<u64>,
    pub partners: Option<u64>,
}

/// A security warning from the "be careful" section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    /// Slug of the title, at most [`crate::MAX_ALERT_ID_LEN`] chars
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub summary: String,
    pub detail: String,
    pub affects_us: bool,
    pub our_status: Option<OurStatus>,
    pub first_seen: Option<NaiveDate>,
}

/// One line from the signals section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    /// Space id mentioned in the summary, if any
    pub space: Option<String>,
    pub summary: String,
    pub severity: SignalSeverity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_labels() {
        assert_eq!(serde_json::to_string(&Trust::MediumHigh).unwrap(), "\"medium-high\"");
        assert_eq!(
            serde_json::to_string(&OurStatus::NotApplicable).unwrap(),
            "\"not-applicable\""
        );
        assert_eq!(Trust::from_label("Medium-High"), Some(Trust::MediumHigh));
        assert_eq!(Status::from_label("bogus"), None);
    }

    #[test]
    fn test_icons_round_trip_with_variation_selector() {
        assert_eq!(Status::from_icon("⛔\u{FE0F}"), Some(Status::Avoid));
        assert_eq!(Status::from_icon("🟢"), Some(Status::Active));
        assert_eq!(SignalType::from_icon("📈"), SignalType::Surge);
        assert_eq!(SignalType::from_icon("🦄"), SignalType::Anomaly);
    }

    #[test]
    fn test_space_serializes_null_agents() {
        let space = Space::new("moltbook.com", Status::Active);
        let json = serde_json::to_value(&space).unwrap();
        assert!(json["agents"].is_null());
        assert_eq!(json["isNew"], Value::Bool(false));
        assert_eq!(json["url"], "https://moltbook.com");
        assert!(json.get("metrics").is_none());
    }
}
