//! Protocol extraction
//!
//! ```text
//! ◆ MCP (Model Context Protocol) — foundation-backed, in production, 45K stars
//! ```
//!
//! Status is a keyword heuristic evaluated in a fixed order where later
//! checks overwrite earlier ones: emerging, then growing, then
//! established, then stalled.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use pulse_core::{Protocol, ProtocolStatus};

use crate::numeric::parse_scaled;
use crate::text::{collapse_whitespace, slugify};

static ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[◆◇•*-]\s*(.+?)(?:\s*[—–:]\s*|\s+-\s+)(.*)$").unwrap()
});

static BARE_ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[◆◇•*-]\s*(.+)$").unwrap()
});

static GROWING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:production|foundation|backed|adopted|adoption)\b").unwrap()
});

static ESTABLISHED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:compliance|compliant|soc\s?2)\b|\d+(?:\.\d+)?%\s*uptime").unwrap()
});

static STALLED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:collaps(?:e|ed|es|ing)|uncertain(?:ty)?|stalled|abandoned)\b").unwrap()
});

static STARS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(k)?\+?\s*(?:github\s+)?stars?\b").unwrap()
});

static PARTNERS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(k)?\+?\s*(?:launch\s+|enterprise\s+)?partners?\b").unwrap()
});

/// Extract protocols from the protocols section
pub fn extract_protocols(lines: &[&str]) -> Vec<Protocol> {
    let mut entries: Vec<(String, Vec<String>)> = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = ENTRY_REGEX.captures(line) {
            entries.push((caps[1].trim().to_string(), vec![caps[2].trim().to_string()]));
        } else if let Some(caps) = BARE_ENTRY_REGEX.captures(line) {
            entries.push((caps[1].trim().to_string(), Vec::new()));
        } else if let Some((_, parts)) = entries.last_mut() {
            parts.push(line.trim().to_string());
        } else {
            debug!("Skipping protocol line before first entry: {}", line.trim());
        }
    }

    entries
        .into_iter()
        .filter_map(|(name, parts)| build_protocol(name, &parts.join(" ")))
        .collect()
}

fn build_protocol(name: String, description: &str) -> Option<Protocol> {
    let id = slugify(&name);
    if id.is_empty() {
        debug!("Skipping protocol without a usable name: {}", name);
        return None;
    }
    let description = collapse_whitespace(description);

    Some(Protocol {
        id,
        status: infer_protocol_status(&description),
        stars: count_before(&STARS_REGEX, &description),
        partners: count_before(&PARTNERS_REGEX, &description),
        name,
        description,
    })
}

/// Keyword heuristic; later matches override earlier ones
pub fn infer_protocol_status(description: &str) -> ProtocolStatus {
    let mut status = ProtocolStatus::Emerging;
    if GROWING_REGEX.is_match(description) {
        status = ProtocolStatus::Growing;
    }
    if ESTABLISHED_REGEX.is_match(description) {
        status = ProtocolStatus::Established;
    }
    if STALLED_REGEX.is_match(description) {
        status = ProtocolStatus::Stalled;
    }
    status
}

fn count_before(regex: &Regex, text: &str) -> Option<u64> {
    let caps = regex.captures(text)?;
    parse_scaled(&caps[1], caps.get(2).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_protocols() {
        let protocols = extract_protocols(&[
            "◆ MCP (Model Context Protocol) — foundation-backed, 45K GitHub stars,",
            "  200+ partners",
            "",
            "◆ A2A: agent-to-agent messaging, 1,204 stars",
            "◆ ClawPay",
        ]);
        assert_eq!(protocols.len(), 3);

        let mcp = &protocols[0];
        assert_eq!(mcp.id, "mcp-model-context-protocol");
        assert_eq!(mcp.name, "MCP (Model Context Protocol)");
        assert_eq!(mcp.status, ProtocolStatus::Growing);
        assert_eq!(mcp.stars, Some(45_000));
        assert_eq!(mcp.partners, Some(200));
        assert!(mcp.description.ends_with("200+ partners"));

        assert_eq!(protocols[1].id, "a2a");
        assert_eq!(protocols[1].stars, Some(1_204));
        assert_eq!(protocols[1].partners, None);

        assert_eq!(protocols[2].id, "clawpay");
        assert_eq!(protocols[2].description, "");
        assert_eq!(protocols[2].status, ProtocolStatus::Emerging);
    }

    #[test]
    fn test_status_priority() {
        assert_eq!(infer_protocol_status("experimental draft"), ProtocolStatus::Emerging);
        assert_eq!(infer_protocol_status("running in production"), ProtocolStatus::Growing);
        assert_eq!(
            infer_protocol_status("in production with SOC 2 compliance"),
            ProtocolStatus::Established
        );
        assert_eq!(infer_protocol_status("99.9% uptime"), ProtocolStatus::Established);
        // stalled wins over established when both match
        assert_eq!(
            infer_protocol_status("SOC 2 compliant but governance uncertain"),
            ProtocolStatus::Stalled
        );
    }
}
