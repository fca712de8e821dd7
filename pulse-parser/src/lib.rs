//! Pulse Parser - tolerant crawl text to snapshot conversion
//!
//! The report is split into sections and each section is handled by an
//! independent extractor:
//! - **Spaces**: inline list, KNOWN SPACES and NEW SPACES
//! - **Trust notes**: authoritative domain -> tier assignments
//! - **Be careful**: security alerts
//! - **Signals** and **Protocols emerging**
//!
//! Extractors never fail. A section that is missing or unreadable yields
//! an empty collection and the rest of the report is still parsed.

pub mod numeric;
pub mod protocols;
pub mod sections;
pub mod security;
pub mod signals;
pub mod spaces;
pub mod text;
pub mod trust;

pub use numeric::{parse_agent_count, parse_scaled};
pub use protocols::{extract_protocols, infer_protocol_status};
pub use sections::{parse_header, CrawlHeader, SectionKind, Sections};
pub use security::{extract_alerts, infer_severity};
pub use signals::{extract_signals, signal_severity};
pub use spaces::{extract_spaces, SpaceOrigin};
pub use trust::{infer_trust, TrustNotes};

use tracing::{debug, info, warn};

use pulse_core::{validate_snapshot, Snapshot};

/// Organisation name whose mention marks an alert as affecting us
pub const DEFAULT_ORG_NAME: &str = "agentsy";

/// Parser configuration
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Names whose mention in an alert sets `affects_us`
    pub org_names: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            org_names: vec![DEFAULT_ORG_NAME.to_string()],
        }
    }
}

impl ParseOptions {
    pub fn with_org_names(mut self, names: &[&str]) -> Self {
        self.org_names = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

/// Parse a crawl report with default options
pub fn parse_crawl(text: &str) -> Snapshot {
    parse_crawl_with(text, &ParseOptions::default())
}

/// Parse a crawl report
///
/// Empty input yields [`Snapshot::empty`]. The result is validated and any
/// violations are logged, but the snapshot is returned regardless.
pub fn parse_crawl_with(text: &str, options: &ParseOptions) -> Snapshot {
    if text.trim().is_empty() {
        debug!("Empty crawl text, returning skeleton snapshot");
        return Snapshot::empty();
    }

    let sections = Sections::split(text);
    let header = sections.header;
    if header.crawl.is_none() {
        debug!("No crawl header found");
    }

    let notes = TrustNotes::parse(sections.body(SectionKind::TrustNotes));

    let mut spaces = extract_spaces(&sections.inline, SpaceOrigin::Inline, &notes);
    spaces.extend(extract_spaces(
        sections.body(SectionKind::KnownSpaces),
        SpaceOrigin::Known,
        &notes,
    ));
    spaces.extend(extract_spaces(
        sections.body(SectionKind::NewSpaces),
        SpaceOrigin::New,
        &notes,
    ));

    let protocols = extract_protocols(sections.body(SectionKind::Protocols));
    let security = extract_alerts(sections.body(SectionKind::BeCareful), header.date, options);
    let signals = extract_signals(sections.body(SectionKind::Signals));

    let snapshot = Snapshot::assemble(
        header.crawl,
        header.date,
        spaces,
        protocols,
        security,
        signals,
    );

    let report = validate_snapshot(&snapshot);
    for error in &report.errors {
        warn!("Parsed snapshot failed validation: {}", error);
    }

    info!(
        "Parsed crawl #{}: {} spaces, {} protocols, {} alerts, {} signals",
        header.crawl.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string()),
        snapshot.spaces.len(),
        snapshot.protocols.len(),
        snapshot.security.len(),
        snapshot.signals.len()
    );

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pulse_core::{
        calculate_vitals, OurStatus, ProtocolStatus, Severity, SignalType, Status, Trust,
    };

    const SAMPLE: &str = include_str!("../fixtures/sample_crawl.txt");

    #[test]
    fn test_empty_input_yields_skeleton() {
        for text in ["", "   \n\t\n"] {
            let snapshot = parse_crawl(text);
            assert_eq!(snapshot, Snapshot::empty());
            assert!(validate_snapshot(&snapshot).valid);
        }
    }

    #[test]
    fn test_garbage_input_is_structurally_valid() {
        let snapshot = parse_crawl("random garbage");
        assert_eq!(snapshot.crawl, None);
        assert_eq!(snapshot.date, None);
        assert!(snapshot.spaces.is_empty());
        assert!(snapshot.signals.is_empty());
        assert_eq!(snapshot.vitals.total_spaces, 0);
        assert!(validate_snapshot(&snapshot).valid);
    }

    #[test]
    fn test_sample_header() {
        let snapshot = parse_crawl(SAMPLE);
        assert_eq!(snapshot.crawl, Some(42));
        assert_eq!(snapshot.date, NaiveDate::from_ymd_opt(2026, 2, 14));
    }

    #[test]
    fn test_sample_spaces() {
        let snapshot = parse_crawl(SAMPLE);
        let ids: Vec<_> = snapshot.spaces.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "moltbook.com",
                "clawtasks.io",
                "moltbook.com",
                "shellmates.ai",
                "agentchan.org",
                "deadclaw.net",
                "clawpump.fun",
                "skillhub.dev",
            ]
        );

        let inline = &snapshot.spaces[0];
        assert_eq!(inline.status, Status::Surging);
        assert!(!inline.is_new);
        // trust notes override the inline "unverified" cue
        assert_eq!(inline.trust, Trust::High);

        let moltbook = &snapshot.spaces[2];
        assert_eq!(moltbook.name, "Moltbook");
        assert_eq!(moltbook.agents, Some(11_396));
        assert!(moltbook.description.contains("front page for agents"));

        let agentchan = snapshot.spaces.iter().find(|s| s.id == "agentchan.org").unwrap();
        assert_eq!(agentchan.status, Status::Warning);
        assert!(agentchan.security_notes.is_some());

        let deadclaw = snapshot.spaces.iter().find(|s| s.id == "deadclaw.net").unwrap();
        assert_eq!(deadclaw.agents, None);

        let new_ids: Vec<_> = snapshot
            .spaces
            .iter()
            .filter(|s| s.is_new)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(new_ids, vec!["clawpump.fun", "skillhub.dev"]);

        let clawpump = &snapshot.spaces[6];
        assert_eq!(clawpump.trust, Trust::Avoid);
        assert_eq!(clawpump.status, Status::Avoid);
    }

    #[test]
    fn test_sample_alerts() {
        let snapshot = parse_crawl(SAMPLE);
        assert_eq!(snapshot.security.len(), 2);

        let leak = &snapshot.security[0];
        assert_eq!(leak.id, "clawhub-api-keys-exposed");
        assert_eq!(leak.severity, Severity::Critical);
        assert!(leak.affects_us);
        assert_eq!(leak.our_status, Some(OurStatus::Patched));
        assert!(leak.detail.starts_with("Rotate every key"));

        let invasion = &snapshot.security[1];
        assert_eq!(invasion.severity, Severity::High);
        assert!(!invasion.affects_us);
        assert_eq!(invasion.first_seen, NaiveDate::from_ymd_opt(2026, 2, 14));
    }

    #[test]
    fn test_sample_signals_and_protocols() {
        let snapshot = parse_crawl(SAMPLE);
        let types: Vec<_> = snapshot.signals.iter().map(|s| s.signal_type).collect();
        assert_eq!(
            types,
            vec![
                SignalType::Surge,
                SignalType::Death,
                SignalType::Launch,
                SignalType::Anomaly,
            ]
        );
        assert_eq!(snapshot.signals[1].space.as_deref(), Some("deadclaw.net"));

        let statuses: Vec<_> = snapshot.protocols.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![
                ProtocolStatus::Growing,
                ProtocolStatus::Established,
                ProtocolStatus::Stalled,
            ]
        );
        assert_eq!(snapshot.protocols[0].stars, Some(45_000));
        assert_eq!(snapshot.protocols[0].partners, Some(200));
    }

    #[test]
    fn test_sample_vitals_are_derived() {
        let snapshot = parse_crawl(SAMPLE);
        assert_eq!(
            snapshot.vitals,
            calculate_vitals(&snapshot.spaces, &snapshot.security)
        );
        assert_eq!(snapshot.vitals.total_spaces, 8);
        assert_eq!(snapshot.vitals.new_spaces_since_last_crawl, 2);
        assert_eq!(snapshot.vitals.security_alerts.critical, 1);
        assert_eq!(snapshot.vitals.security_alerts.high, 1);
        assert!(validate_snapshot(&snapshot).valid);
    }

    #[test]
    fn test_huge_agent_counts_saturate_vitals() {
        let text = "PULSE ◇ 2026-02-14 ◇ crawl #1\n\
                    🟢 a.com — 18446744073709551615 agents\n\
                    🟢 b.com — 5 agents\n";
        let snapshot = parse_crawl(text);
        assert_eq!(snapshot.spaces.len(), 2);
        assert_eq!(snapshot.spaces[0].agents, Some(u64::MAX));
        assert_eq!(snapshot.vitals.total_agents_claimed, u64::MAX);
        assert!(validate_snapshot(&snapshot).valid);
    }

    #[test]
    fn test_missing_section_does_not_affect_others() {
        let text = "PULSE ◇ 2026-03-01 ◇ crawl #7\nSIGNALS\n-------\n📈 moltbook.com up\n";
        let snapshot = parse_crawl(text);
        assert_eq!(snapshot.crawl, Some(7));
        assert!(snapshot.spaces.is_empty());
        assert!(snapshot.protocols.is_empty());
        assert_eq!(snapshot.signals.len(), 1);
    }
}
