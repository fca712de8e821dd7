//! Trust tier resolution
//!
//! Two sources: keywords inside a space description give a first guess,
//! and the TRUST NOTES section gives authoritative `TIER: domain / alias`
//! assignments that always win.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use pulse_core::{Label, Trust};

static NOTE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[-*•]?\s*(MEDIUM-HIGH|MEDIUM\+|MEDIUM|HIGH|LOW|CRITICAL|AVOID)\s*:\s*(.+)$")
        .unwrap()
});

/// Description keywords per tier, checked in this order
static INLINE_CUES: LazyLock<Vec<(Trust, Regex)>> = LazyLock::new(|| {
    [
        (Trust::Avoid, r"(?i)\b(?:scam|malicious|avoid|phishing)\b"),
        (Trust::Critical, r"(?i)\b(?:breach(?:ed)?|exposed|compromised|leak(?:ed)?)\b"),
        (Trust::Low, r"(?i)\b(?:spam(?:my)?|sketchy|unverified|bot\s+farm|bot\s+invasion)\b"),
        (Trust::MediumHigh, r"(?i)\b(?:established|reliable|audited)\b"),
        (Trust::High, r"(?i)\b(?:verified|trusted|official)\b"),
    ]
    .into_iter()
    .map(|(trust, pattern)| (trust, Regex::new(pattern).unwrap()))
    .collect()
});

/// Domain -> tier assignments from the trust notes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustNotes {
    tiers: HashMap<String, Trust>,
}

impl TrustNotes {
    /// Scan trust note lines; unrecognised lines are ignored
    pub fn parse(lines: &[&str]) -> Self {
        let mut tiers = HashMap::new();

        for line in lines {
            let Some(caps) = NOTE_LINE_REGEX.captures(line) else {
                continue;
            };
            let Some(tier) = parse_tier(&caps[1]) else {
                continue;
            };
            for domain in caps[2].split(['/', ',']).filter_map(note_domain) {
                debug!("Trust note: {} -> {}", domain, tier.as_str());
                tiers.insert(domain, tier);
            }
        }

        Self { tiers }
    }

    pub fn get(&self, id: &str) -> Option<Trust> {
        self.tiers.get(&id.to_lowercase()).copied()
    }

    /// Notes entry if present, otherwise the inline guess
    pub fn resolve(&self, id: &str, description: &str) -> Trust {
        self.get(id).unwrap_or_else(|| infer_trust(description))
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Guess a tier from description keywords; `medium` when nothing matches
pub fn infer_trust(description: &str) -> Trust {
    INLINE_CUES
        .iter()
        .find(|(_, cue)| cue.is_match(description))
        .map(|(trust, _)| *trust)
        .unwrap_or(Trust::Medium)
}

fn parse_tier(token: &str) -> Option<Trust> {
    match token.to_uppercase().as_str() {
        "HIGH" => Some(Trust::High),
        "MEDIUM-HIGH" | "MEDIUM+" => Some(Trust::MediumHigh),
        "MEDIUM" => Some(Trust::Medium),
        "LOW" => Some(Trust::Low),
        "CRITICAL" => Some(Trust::Critical),
        "AVOID" => Some(Trust::Avoid),
        _ => None,
    }
}

fn note_domain(piece: &str) -> Option<String> {
    let token = piece.split_whitespace().next()?;
    let token = token.trim_matches(|c: char| !c.is_alphanumeric());
    (!token.is_empty()).then(|| token.to_lowercase())
}
