//! Space extraction
//!
//! An entry starts with a status icon followed by a domain id, optionally
//! a display name in parentheses, then the description:
//!
//! ```text
//! 🟢 moltbook.com (Moltbook) — social network for agents, 11,396 agents
//!    any following non-blank line that does not open a new entry is
//!    folded into the description
//! ```

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use pulse_core::{Space, Status};

use crate::numeric::parse_agent_count;
use crate::text::collapse_whitespace;
use crate::trust::TrustNotes;

static ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(\S+)\s+([a-z0-9][a-z0-9-]*(?:\.[a-z0-9-]+)*\.[a-z]{2,})(?:\s*\(([^)]*)\))?\s*(?:[—–:-]\s*)?(.*)$",
    )
    .unwrap()
});

static SECURITY_NOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)⚠|\bbreach|\bmalicious\b|\bbot\s+invasion\b").unwrap()
});

/// Which part of the report a space list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceOrigin {
    /// Free list between the header and the first section
    Inline,
    Known,
    New,
}

impl SpaceOrigin {
    fn is_new(self) -> bool {
        matches!(self, Self::New)
    }
}

struct PendingEntry {
    status: Status,
    id: String,
    name: Option<String>,
    parts: Vec<String>,
}

/// Extract all spaces from one block of lines
pub fn extract_spaces(lines: &[&str], origin: SpaceOrigin, notes: &TrustNotes) -> Vec<Space> {
    let mut spaces = Vec::new();
    let mut pending: Option<PendingEntry> = None;

    for line in lines {
        if line.trim().is_empty() {
            if let Some(entry) = pending.take() {
                spaces.push(build_space(entry, origin, notes));
            }
            continue;
        }

        if let Some(entry) = parse_entry_start(line) {
            if let Some(previous) = pending.replace(entry) {
                spaces.push(build_space(previous, origin, notes));
            }
            continue;
        }

        match pending.as_mut() {
            Some(entry) => entry.parts.push(line.trim().to_string()),
            None => debug!("Skipping unrecognised space line: {}", line.trim()),
        }
    }

    if let Some(entry) = pending.take() {
        spaces.push(build_space(entry, origin, notes));
    }

    debug!("Extracted {} spaces from {:?} block", spaces.len(), origin);
    spaces
}

fn parse_entry_start(line: &str) -> Option<PendingEntry> {
    let caps = ENTRY_REGEX.captures(line)?;
    let status = Status::from_icon(&caps[1])?;
    let name = caps
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .filter(|n| !n.is_empty());

    Some(PendingEntry {
        status,
        id: caps[2].to_lowercase(),
        name,
        parts: vec![caps[4].trim().to_string()],
    })
}

fn build_space(entry: PendingEntry, origin: SpaceOrigin, notes: &TrustNotes) -> Space {
    let description = collapse_whitespace(&entry.parts.join(" "));
    let trust = notes.resolve(&entry.id, &description);
    let agents = parse_agent_count(&description);
    let security_notes = SECURITY_NOTE_REGEX
        .is_match(&description)
        .then(|| description.clone());

    let mut space = Space::new(entry.id, entry.status)
        .with_trust(trust)
        .with_agents(agents)
        .with_description(&description)
        .with_new(origin.is_new());
    if let Some(name) = entry.name {
        space.name = name;
    }
    space.security_notes = security_notes;
    space
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::Trust;

    fn extract(lines: &[&str], origin: SpaceOrigin) -> Vec<Space> {
        extract_spaces(lines, origin, &TrustNotes::default())
    }

    #[test]
    fn test_single_line_entry() {
        let spaces = extract(
            &["🟢 moltbook.com (Moltbook) — social network for agents, 11,396 agents claimed"],
            SpaceOrigin::Known,
        );
        assert_eq!(spaces.len(), 1);
        let space = &spaces[0];
        assert_eq!(space.id, "moltbook.com");
        assert_eq!(space.name, "Moltbook");
        assert_eq!(space.url, "https://moltbook.com");
        assert_eq!(space.status, Status::Active);
        assert_eq!(space.agents, Some(11_396));
        assert_eq!(space.trust, Trust::Medium);
        assert!(!space.is_new);
        assert_eq!(space.security_notes, None);
    }

    #[test]
    fn test_multi_line_entry_is_collapsed() {
        let spaces = extract(
            &[
                "🚀 clawtasks.io — bounty board",
                "    with   50-70K DAU",
                "   and rising",
                "🔴 deadspace.net - no visible activity",
            ],
            SpaceOrigin::New,
        );
        assert_eq!(spaces.len(), 2);
        assert_eq!(spaces[0].description, "bounty board with 50-70K DAU and rising");
        assert_eq!(spaces[0].agents, Some(70_000));
        assert_eq!(spaces[0].status, Status::Surging);
        assert!(spaces[0].is_new);
        assert_eq!(spaces[1].status, Status::Down);
        assert_eq!(spaces[1].agents, None);
    }

    #[test]
    fn test_marker_led_continuation_is_folded() {
        let spaces = extract(
            &["🟡 agentchan.org — busy board", "⚠️ bot invasion reported"],
            SpaceOrigin::Known,
        );
        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].description, "busy board ⚠️ bot invasion reported");
        assert_eq!(
            spaces[0].security_notes.as_deref(),
            Some("busy board ⚠️ bot invasion reported")
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let spaces = extract(
            &[
                "🟢 no domain here",
                "🦄 unicorn.com — unknown icon",
                "garbage without an entry",
                "🟡 shellmates.ai: sketchy growth",
            ],
            SpaceOrigin::Inline,
        );
        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].id, "shellmates.ai");
        assert_eq!(spaces[0].trust, Trust::Low);
        assert_eq!(spaces[0].name, "shellmates.ai");
    }

    #[test]
    fn test_security_notes() {
        let spaces = extract(
            &[
                "🟡 agentchan.org — ⚠️ bot invasion ongoing",
                "💀 leaky.ai — database breach exposed tokens",
                "🔵 calm.dev — nothing to report",
            ],
            SpaceOrigin::Known,
        );
        assert!(spaces[0].security_notes.is_some());
        assert_eq!(spaces[1].security_notes.as_deref(), Some(spaces[1].description.as_str()));
        assert_eq!(spaces[1].trust, Trust::Critical);
        assert!(spaces[2].security_notes.is_none());
    }

    #[test]
    fn test_trust_notes_take_precedence() {
        let notes = TrustNotes::parse(&["AVOID: moltbook.com"]);
        let spaces = extract_spaces(
            &["🟢 moltbook.com — verified operator"],
            SpaceOrigin::Known,
            &notes,
        );
        assert_eq!(spaces[0].trust, Trust::Avoid);
    }
}
