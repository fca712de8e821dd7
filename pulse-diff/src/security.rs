//! Security alert diffs
//!
//! Alerts are keyed by their slug id. An alert that keeps its id but
//! changes severity or our remediation status yields one record per field.

use serde::Serialize;

use pulse_core::{OurStatus, SecurityAlert, Severity};

use crate::collection::{diff_keyed, Keyed};

impl Keyed for SecurityAlert {
    fn key(&self) -> &str {
        &self.id
    }
}

/// One change between two alert lists
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum SecurityChange {
    New {
        id: String,
        alert: SecurityAlert,
    },
    Resolved {
        id: String,
        alert: SecurityAlert,
    },
    SeverityChanged {
        id: String,
        from: Severity,
        to: Severity,
        /// The new severity ranks strictly higher
        escalated: bool,
    },
    OurStatusChanged {
        id: String,
        from: Option<OurStatus>,
        to: Option<OurStatus>,
    },
}

impl SecurityChange {
    pub fn id(&self) -> &str {
        match self {
            Self::New { id, .. }
            | Self::Resolved { id, .. }
            | Self::SeverityChanged { id, .. }
            | Self::OurStatusChanged { id, .. } => id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New { .. })
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Diff two alert lists
pub fn diff_security(current: &[SecurityAlert], previous: &[SecurityAlert]) -> Vec<SecurityChange> {
    diff_keyed(
        current,
        previous,
        |a| SecurityChange::New {
            id: a.id.clone(),
            alert: a.clone(),
        },
        |a| SecurityChange::Resolved {
            id: a.id.clone(),
            alert: a.clone(),
        },
        |now, before, out| {
            if now.severity != before.severity {
                out.push(SecurityChange::SeverityChanged {
                    id: now.id.clone(),
                    from: before.severity,
                    to: now.severity,
                    escalated: now.severity.rank() > before.severity.rank(),
                });
            }
            if now.our_status != before.our_status {
                out.push(SecurityChange::OurStatusChanged {
                    id: now.id.clone(),
                    from: before.our_status,
                    to: now.our_status,
                });
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(id: &str, severity: Severity, our_status: Option<OurStatus>) -> SecurityAlert {
        SecurityAlert {
            id: id.to_string(),
            severity,
            title: id.replace('-', " "),
            summary: String::new(),
            detail: String::new(),
            affects_us: false,
            our_status,
            first_seen: None,
        }
    }

    #[test]
    fn test_new_and_resolved() {
        let previous = vec![alert("old-leak", Severity::High, None)];
        let current = vec![alert("fresh-worm", Severity::Critical, None)];
        let records = diff_security(&current, &previous);
        assert_eq!(records.len(), 2);
        assert!(records[0].is_new());
        assert_eq!(records[0].id(), "fresh-worm");
        assert!(records[1].is_resolved());
        assert_eq!(records[1].id(), "old-leak");
    }

    #[test]
    fn test_escalation_flag() {
        let up = diff_security(
            &[alert("x", Severity::Critical, None)],
            &[alert("x", Severity::Medium, None)],
        );
        assert!(matches!(up[0], SecurityChange::SeverityChanged { escalated: true, .. }));

        let down = diff_security(
            &[alert("x", Severity::Low, None)],
            &[alert("x", Severity::High, None)],
        );
        assert!(matches!(
            down[0],
            SecurityChange::SeverityChanged { from: Severity::High, to: Severity::Low, escalated: false, .. }
        ));
    }

    #[test]
    fn test_our_status_change() {
        let records = diff_security(
            &[alert("x", Severity::High, Some(OurStatus::Patched))],
            &[alert("x", Severity::High, Some(OurStatus::Vulnerable))],
        );
        assert_eq!(
            records,
            vec![SecurityChange::OurStatusChanged {
                id: "x".to_string(),
                from: Some(OurStatus::Vulnerable),
                to: Some(OurStatus::Patched),
            }]
        );
    }

    #[test]
    fn test_unchanged_alerts_are_silent() {
        let alerts = vec![alert("x", Severity::High, Some(OurStatus::Monitoring))];
        assert!(diff_security(&alerts, &alerts).is_empty());
    }

    #[test]
    fn test_serialized_tag() {
        let records = diff_security(&[alert("x", Severity::High, None)], &[]);
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["change"], "new");
        assert_eq!(json["alert"]["severity"], "high");
    }
}
