//! Display lookup tables for renderers
//!
//! Pure mappings from model labels to colours and compact number strings.
//! Any label that is not recognised maps to [`FALLBACK_COLOR`].

use crate::{Label, Severity, Status, Trust};

/// Neutral grey used for anything without a dedicated colour
pub const FALLBACK_COLOR: &str = "#8b949e";

pub const fn status_color(status: Status) -> &'static str {
    match status {
        Status::Surging => "#a371f7",
        Status::Active => "#3fb950",
        Status::Steady => "#58a6ff",
        Status::Quiet => FALLBACK_COLOR,
        Status::Warning => "#d29922",
        Status::Down => "#f85149",
        Status::Critical => "#da3633",
        Status::Avoid => "#6e7681",
    }
}

pub const fn trust_color(trust: Trust) -> &'static str {
    match trust {
        Trust::High => "#3fb950",
        Trust::MediumHigh => "#7ee787",
        Trust::Medium => "#d29922",
        Trust::Low => "#db6d28",
        Trust::Critical => "#f85149",
        Trust::Avoid => "#6e7681",
    }
}

pub const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "#f85149",
        Severity::High => "#db6d28",
        Severity::Medium => "#d29922",
        Severity::Low => "#58a6ff",
        Severity::Info => FALLBACK_COLOR,
    }
}

/// Colour for a raw label, tried as status, then trust, then severity
pub fn color_for_label(label: &str) -> &'static str {
    if let Some(status) = Status::from_label(label) {
        return status_color(status);
    }
    if let Some(trust) = Trust::from_label(label) {
        return trust_color(trust);
    }
    Severity::from_label(label)
        .map(severity_color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Compact agent count: `—` for unknown, `950`, `11.4K`, `1.2M`
pub fn format_count(count: Option<u64>) -> String {
    match count {
        None => "—".to_string(),
        // 999_950 rounds to 1000.0K, so promote on the rounded value
        Some(n) if n >= 1_000 && (n as f64 / 100.0).round() < 10_000.0 => {
            trim_decimal(n as f64 / 1_000.0, "K")
        }
        Some(n) if n >= 1_000 => trim_decimal(n as f64 / 1_000_000.0, "M"),
        Some(n) => n.to_string(),
    }
}

fn trim_decimal(value: f64, suffix: &str) -> String {
    let text = format!("{:.1}", value);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}
