//! Crawl header and section splitting
//!
//! A section starts with one of the known titles on its own line,
//! immediately followed by a rule line (`-----`, `─────` or `=====`).
//! Its body runs until the next section title. Text between the
//! `PULSE ◇ <date> ◇ crawl #<n>` header and the first section is the
//! inline space list.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)PULSE\s*◇\s*(\d{4}-\d{2}-\d{2})\s*◇\s*crawl\s*#\s*(\d+)").unwrap()
});

/// Named sections of a crawl report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    KnownSpaces,
    NewSpaces,
    TrustNotes,
    BeCareful,
    Signals,
    Protocols,
}

impl SectionKind {
    pub const ALL: [Self; 6] = [
        Self::KnownSpaces,
        Self::NewSpaces,
        Self::TrustNotes,
        Self::BeCareful,
        Self::Signals,
        Self::Protocols,
    ];

    /// Title line as it appears in the report
    pub const fn title(self) -> &'static str {
        match self {
            Self::KnownSpaces => "KNOWN SPACES",
            Self::NewSpaces => "NEW SPACES",
            Self::TrustNotes => "TRUST NOTES",
            Self::BeCareful => "BE CAREFUL",
            Self::Signals => "SIGNALS",
            Self::Protocols => "PROTOCOLS EMERGING",
        }
    }

    fn from_title(line: &str) -> Option<Self> {
        let line = line.trim().to_uppercase();
        Self::ALL.into_iter().find(|kind| line.starts_with(kind.title()))
    }
}

/// Header fields of a crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlHeader {
    pub crawl: Option<u32>,
    pub date: Option<NaiveDate>,
    /// Line index of the header, when found
    line: Option<usize>,
}

/// Find the crawl header; a missing header yields all `None`
pub fn parse_header(lines: &[&str]) -> CrawlHeader {
    lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| {
            let caps = HEADER_REGEX.captures(line)?;
            Some(CrawlHeader {
                crawl: caps[2].parse().ok(),
                date: NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok(),
                line: Some(i),
            })
        })
        .unwrap_or_default()
}

/// A crawl report split into its sections
#[derive(Debug, Default)]
pub struct Sections<'a> {
    pub header: CrawlHeader,
    /// Lines between the header and the first section title
    pub inline: Vec<&'a str>,
    bodies: HashMap<SectionKind, Vec<&'a str>>,
}

impl<'a> Sections<'a> {
    pub fn split(text: &'a str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let header = parse_header(&lines);

        let mut sections = Sections {
            header,
            ..Sections::default()
        };
        let mut current: Option<SectionKind> = None;
        let mut i = header.line.map(|l| l + 1).unwrap_or(0);

        while i < lines.len() {
            let line = lines[i];
            if let Some(kind) = section_start(&lines, i) {
                current = Some(kind);
                // entries for repeated titles accumulate
                sections.bodies.entry(kind).or_default();
                i += 2;
                continue;
            }
            match current {
                Some(kind) => sections.bodies.entry(kind).or_default().push(line),
                None => sections.inline.push(line),
            }
            i += 1;
        }

        sections
    }

    /// Body lines of a section; empty when the section is absent
    pub fn body(&self, kind: SectionKind) -> &[&'a str] {
        self.bodies.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        self.bodies.contains_key(&kind)
    }
}

fn section_start(lines: &[&str], i: usize) -> Option<SectionKind> {
    let kind = SectionKind::from_title(lines[i])?;
    let rule = lines.get(i + 1)?.trim();
    let is_rule = !rule.is_empty() && rule.chars().all(|c| matches!(c, '-' | '─' | '━' | '='));
    is_rule.then_some(kind)
}
