//! Numeric normalization of free-form counts
//!
//! Crawl descriptions carry counts in many shapes: `50-70K DAU`,
//! `4.2K skill installs`, `11,396 agents claimed`, `300+ members`. The
//! patterns are tried in a fixed order and the first hit wins.

use regex::Regex;
use std::sync::LazyLock;

static NO_ACTIVITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bno\s+(?:visible\s+|recent\s+|observable\s+)?activity\b|\bzero\s+activity\b")
        .unwrap()
});

static K_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*[-–]\s*(\d+(?:\.\d+)?)[kK]\b").unwrap()
});

static K_DECIMAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)[kK]\b").unwrap()
});

static GROUPED_UNITS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^\d.,])(\d{1,3}(?:,\d{3})+)\+?\s*(?:agents|users|instances|members|posts)\b")
        .unwrap()
});

static BARE_UNITS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^\d.,])(\d+)\+?\s*(?:agents?|users?|instances?|members?|posts?|skills?|servers?|installs?)\b",
    )
    .unwrap()
});

/// Extract an agent count from a description fragment
///
/// Returns `None` both for explicit "no activity" phrasing and when no
/// count is recognised.
pub fn parse_agent_count(text: &str) -> Option<u64> {
    if NO_ACTIVITY_REGEX.is_match(text) {
        return None;
    }

    if let Some(caps) = K_RANGE_REGEX.captures(text) {
        return scale_thousands(&caps[2]);
    }

    if let Some(caps) = K_DECIMAL_REGEX.captures(text) {
        return scale_thousands(&caps[1]);
    }

    if let Some(caps) = GROUPED_UNITS_REGEX.captures(text) {
        return caps[1].replace(',', "").parse().ok();
    }

    if let Some(caps) = BARE_UNITS_REGEX.captures(text) {
        return caps[1].parse().ok();
    }

    None
}

/// Parse a captured number, applying a `K` multiplier when present
///
/// Grouping commas are ignored. Used for protocol star and partner counts.
pub fn parse_scaled(number: &str, thousands: bool) -> Option<u64> {
    let number = number.replace(',', "");
    if thousands {
        scale_thousands(&number)
    } else if let Ok(n) = number.parse::<u64>() {
        Some(n)
    } else {
        number
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(round_half_up)
    }
}

fn scale_thousands(number: &str) -> Option<u64> {
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(round_half_up(value * 1000.0))
}

fn round_half_up(value: f64) -> u64 {
    (value + 0.5).floor() as u64
}
