//! Signal extraction: one `<icon> <summary>` entry per line

use tracing::debug;

use pulse_core::{Signal, SignalSeverity, SignalType};

use crate::text::{find_domain, split_marker};

/// Extract signals from the signals section
pub fn extract_signals(lines: &[&str]) -> Vec<Signal> {
    let signals: Vec<Signal> = lines.iter().filter_map(|line| parse_signal(line)).collect();
    debug!("Extracted {} signals", signals.len());
    signals
}

fn parse_signal(line: &str) -> Option<Signal> {
    let (marker, rest) = split_marker(line);
    let summary = rest.trim();
    if summary.is_empty() {
        return None;
    }

    let signal_type = if marker.trim().is_empty() {
        SignalType::Anomaly
    } else {
        SignalType::from_icon(marker)
    };

    Some(Signal {
        signal_type,
        space: find_domain(summary),
        severity: signal_severity(signal_type, summary),
        summary: summary.to_string(),
    })
}

/// Severity implied by the signal type, raised to critical on request
pub fn signal_severity(signal_type: SignalType, summary: &str) -> SignalSeverity {
    if summary.to_lowercase().contains("critical") {
        return SignalSeverity::Critical;
    }
    match signal_type {
        SignalType::Breach => SignalSeverity::Critical,
        SignalType::Death => SignalSeverity::High,
        SignalType::Decline => SignalSeverity::Warning,
        SignalType::Anomaly => SignalSeverity::Medium,
        SignalType::Correction => SignalSeverity::Low,
        SignalType::Surge | SignalType::Launch | SignalType::Merge => SignalSeverity::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_signals() {
        let signals = extract_signals(&[
            "📈 moltbook.com agents up 40% week over week",
            "📉 Clawtasks.io bounty volume falling",
            "🔓 critical token dump affecting shellmates.ai",
            "🦄 something odd with no space named",
            "",
            "🆕",
            "plain line without a marker",
        ]);
        assert_eq!(signals.len(), 5);

        assert_eq!(signals[0].signal_type, SignalType::Surge);
        assert_eq!(signals[0].space.as_deref(), Some("moltbook.com"));
        assert_eq!(signals[0].severity, SignalSeverity::Info);

        assert_eq!(signals[1].signal_type, SignalType::Decline);
        assert_eq!(signals[1].space.as_deref(), Some("clawtasks.io"));
        assert_eq!(signals[1].severity, SignalSeverity::Warning);

        assert_eq!(signals[2].signal_type, SignalType::Breach);
        assert_eq!(signals[2].severity, SignalSeverity::Critical);

        assert_eq!(signals[3].signal_type, SignalType::Anomaly);
        assert_eq!(signals[3].space, None);
        assert_eq!(signals[3].summary, "something odd with no space named");

        assert_eq!(signals[4].signal_type, SignalType::Anomaly);
        assert_eq!(signals[4].summary, "plain line without a marker");
    }

    #[test]
    fn test_file_names_are_not_spaces() {
        let signals = extract_signals(&[
            "📈 skill.md spreading via moltbook.com",
            "🦄 node.js agents everywhere",
        ]);
        assert_eq!(signals[0].space.as_deref(), Some("moltbook.com"));
        assert_eq!(signals[1].space, None);
    }

    #[test]
    fn test_critical_keyword_upgrades_severity() {
        assert_eq!(
            signal_severity(SignalType::Surge, "Critical mass reached"),
            SignalSeverity::Critical
        );
        assert_eq!(signal_severity(SignalType::Death, "shut down"), SignalSeverity::High);
    }
}
