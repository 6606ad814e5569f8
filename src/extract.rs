//! Section extraction from completion output.
//!
//! Deterministic text parse — no model call. Each section lives under a
//! `### <label>` heading; everything up to the next `###` heading (or end of
//! text) belongs to it. A missing heading yields an empty string, never an
//! error, so a malformed completion degrades to empty fields instead of
//! failing the request.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::storage::MemoField;

fn section_pattern(label: &str) -> Regex {
    // Heading line, optional blank lines, then lazy capture up to the next
    // heading or end of text. The regex crate has no lookahead, so the
    // delimiter is consumed by a non-capturing group instead.
    Regex::new(&format!(
        r"(?s)### {}\n*(.*?)(?:\n###|\z)",
        regex::escape(label)
    ))
    .expect("section heading pattern")
}

static BACKGROUND_RE: Lazy<Regex> = Lazy::new(|| section_pattern("1. Background"));
static PROPOSAL_RE: Lazy<Regex> = Lazy::new(|| section_pattern("2. Proposal"));
static RECOMMENDATION_RE: Lazy<Regex> = Lazy::new(|| section_pattern("3. Recommendation"));

fn pattern_for(field: MemoField) -> &'static Regex {
    match field {
        MemoField::Background => &BACKGROUND_RE,
        MemoField::Proposal => &PROPOSAL_RE,
        MemoField::Recommendation => &RECOMMENDATION_RE,
    }
}

/// Extract one labeled section, trimmed. Empty string when the heading is
/// absent.
pub fn extract_section(content: &str, field: MemoField) -> String {
    pattern_for(field)
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// The three memo sections, as returned by the generate endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Sections {
    pub background: String,
    pub proposal: String,
    pub recommendation: String,
}

/// Extract all three sections in one pass over the completion text.
pub fn extract_all(content: &str) -> Sections {
    Sections {
        background: extract_section(content, MemoField::Background),
        proposal: extract_section(content, MemoField::Proposal),
        recommendation: extract_section(content, MemoField::Recommendation),
    }
}
