//! Security alert extraction from the "be careful" section
//!
//! Each line led by a `⚠️` marker opens a block. The marker line is the title, the lines
//! up to a `Defense:` line form the summary, and the defense line onward
//! forms the detail.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use pulse_core::{OurStatus, SecurityAlert, Severity};

use crate::text::{collapse_whitespace, slugify};
use crate::ParseOptions;

const WARNING_MARKER: char = '⚠';

static DEFENSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s*)?defen[cs]e\s*:\s*(.*)$").unwrap()
});

static OUR_STATUS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bour\s+status\s*:\s*(patched|vulnerable|not[\s-]applicable|n/a|monitoring)").unwrap()
});

static FIRST_SEEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfirst\s+seen\s*:?\s*(\d{4}-\d{2}-\d{2})").unwrap()
});

static OUR_ASSETS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d[\d,]*\s+(?:of\s+)?our\b").unwrap()
});

#[derive(Default)]
struct AlertBlock {
    title: String,
    summary: Vec<String>,
    detail: Vec<String>,
    in_defense: bool,
}

/// Extract alerts; `crawl_date` backs `first_seen` when the block has none
pub fn extract_alerts(
    lines: &[&str],
    crawl_date: Option<NaiveDate>,
    options: &ParseOptions,
) -> Vec<SecurityAlert> {
    let mut blocks: Vec<AlertBlock> = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(WARNING_MARKER) {
            let title = rest.trim_start_matches('\u{FE0F}').trim();
            blocks.push(AlertBlock {
                title: title.to_string(),
                ..AlertBlock::default()
            });
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }

        let Some(block) = blocks.last_mut() else {
            debug!("Skipping text before first alert: {}", trimmed);
            continue;
        };

        if block.title.is_empty() {
            block.title = trimmed.to_string();
        } else if let Some(caps) = DEFENSE_REGEX.captures(trimmed) {
            block.in_defense = true;
            block.detail.push(caps[1].trim().to_string());
        } else if block.in_defense {
            block.detail.push(trimmed.to_string());
        } else {
            block.summary.push(trimmed.to_string());
        }
    }

    blocks
        .into_iter()
        .filter_map(|block| build_alert(block, crawl_date, options))
        .collect()
}

fn build_alert(
    block: AlertBlock,
    crawl_date: Option<NaiveDate>,
    options: &ParseOptions,
) -> Option<SecurityAlert> {
    let title = collapse_whitespace(&block.title);
    let id = slugify(&title);
    if id.is_empty() {
        debug!("Skipping alert without a title");
        return None;
    }
    let summary = collapse_whitespace(&block.summary.join(" "));
    let detail = collapse_whitespace(&block.detail.join(" "));
    let combined = format!("{} {} {}", title, summary, detail);

    let first_seen = FIRST_SEEN_REGEX
        .captures(&combined)
        .and_then(|caps| NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok())
        .or(crawl_date);

    Some(SecurityAlert {
        id,
        severity: infer_severity(&title, &summary),
        affects_us: affects_us(&combined, options),
        our_status: parse_our_status(&combined),
        first_seen,
        title,
        summary,
        detail,
    })
}

/// Severity from title and summary keywords; `medium` by default
pub fn infer_severity(title: &str, summary: &str) -> Severity {
    let text = format!("{} {}", title, summary).to_lowercase();
    if ["critical", "exposed", "breach"].iter().any(|k| text.contains(k)) {
        Severity::Critical
    } else if ["warning", "attack", "invasion"].iter().any(|k| text.contains(k)) {
        Severity::High
    } else {
        Severity::Medium
    }
}

fn affects_us(text: &str, options: &ParseOptions) -> bool {
    let lower = text.to_lowercase();
    options
        .org_names
        .iter()
        .map(|name| name.trim().to_lowercase())
        .any(|name| !name.is_empty() && lower.contains(&name))
        || OUR_ASSETS_REGEX.is_match(text)
}

fn parse_our_status(text: &str) -> Option<OurStatus> {
    let caps = OUR_STATUS_REGEX.captures(text)?;
    match caps[1].to_lowercase().as_str() {
        "patched" => Some(OurStatus::Patched),
        "vulnerable" => Some(OurStatus::Vulnerable),
        "monitoring" => Some(OurStatus::Monitoring),
        _ => Some(OurStatus::NotApplicable),
    }
}
