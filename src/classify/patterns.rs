//! Textual heading patterns.
//!
//! A numeric prefix only counts when it is followed by whitespace and more
//! text, so "1.Title" or "3.14" stay body text. Three-part numbers such as
//! "1.1.1 Deep" match neither pattern.

use crate::model::HeadingLevel;
use regex::Regex;
use std::sync::LazyLock;

/// "SECTION IV ..." (keyword in any case, numeral upper-case)
static RE_SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?i:section)\s+[IVXLCDM]+\b").unwrap());

/// "CHAPTER 12 ..." (keyword in any case)
static RE_CHAPTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?i:chapter)\s+\d+\b").unwrap());

/// "1.2 Title"
static RE_SUB_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\d+\s+\S").unwrap());

/// "1. Title"
static RE_TOP_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+\S").unwrap());

/// Matches a "SECTION <roman>" or "CHAPTER <n>" marker.
pub fn match_marker(text: &str) -> Option<HeadingLevel> {
    if RE_SECTION_MARKER.is_match(text) {
        Some(HeadingLevel::Section)
    } else if RE_CHAPTER_MARKER.is_match(text) {
        Some(HeadingLevel::Chapter)
    } else {
        None
    }
}

/// Matches a numbered heading, finer pattern first.
pub fn match_numbered(text: &str) -> Option<HeadingLevel> {
    if RE_SUB_NUMBERED.is_match(text) {
        Some(HeadingLevel::Chapter)
    } else if RE_TOP_NUMBERED.is_match(text) {
        Some(HeadingLevel::Section)
    } else {
        None
    }
}
