//! Structure classification: raw text units to a two-level book outline.
//!
//! Each unit is classified independently, then accumulated in a single
//! left-to-right pass.
//!
//! # Priority Order
//!
//! 1. **Style hint** - a known heading style name decides the level outright
//! 2. **Textual markers** - "SECTION IV", "CHAPTER 3" (when enabled)
//! 3. **Sub-numbered pattern** - "1.1 Title" is a chapter
//! 4. **Top-numbered pattern** - "1. Title" is a section
//!
//! Anything else is body text. Ambiguity is always resolved by this order;
//! classification never fails.

mod patterns;

pub use patterns::{match_marker, match_numbered};

use crate::model::{BookStructure, ContentBlock, HeadingEntry, HeadingLevel, TextUnit};
use log::debug;

/// Title given to the heading synthesized for leading body text.
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "SECTION I — INTRODUCTION";

/// Style names that mark a section.
pub const SECTION_STYLES: &[&str] = &["Heading 1", "Titolo 1"];

/// Style names that mark a chapter.
pub const CHAPTER_STYLES: &[&str] = &["Heading 2", "Titolo 2"];

/// What to do with a heading that owns no body text.
///
/// Source variants disagree here; `Retain` is the reference behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyBlockPolicy {
    /// Emit an empty block for every heading.
    #[default]
    Retain,
    /// Emit blocks only for headings followed by body text.
    Drop,
}

/// Configuration for structure classification.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Recognize "SECTION <roman>" and "CHAPTER <n>" markers.
    pub recognize_markers: bool,

    /// Style names classified as sections.
    pub section_styles: Vec<String>,

    /// Style names classified as chapters.
    pub chapter_styles: Vec<String>,

    /// Title of the section synthesized when body text precedes any heading.
    pub placeholder_title: String,

    /// Handling of headings with no body text.
    pub empty_blocks: EmptyBlockPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            recognize_markers: true,
            section_styles: SECTION_STYLES.iter().map(|s| s.to_string()).collect(),
            chapter_styles: CHAPTER_STYLES.iter().map(|s| s.to_string()).collect(),
            placeholder_title: DEFAULT_PLACEHOLDER_TITLE.to_string(),
            empty_blocks: EmptyBlockPolicy::Retain,
        }
    }
}

impl ClassifierConfig {
    /// Create a new classifier config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable textual marker recognition.
    pub fn with_markers(mut self, enable: bool) -> Self {
        self.recognize_markers = enable;
        self
    }

    /// Add a style name that marks a section.
    pub fn with_section_style(mut self, name: impl Into<String>) -> Self {
        self.section_styles.push(name.into());
        self
    }

    /// Add a style name that marks a chapter.
    pub fn with_chapter_style(mut self, name: impl Into<String>) -> Self {
        self.chapter_styles.push(name.into());
        self
    }

    /// Set the placeholder title for leading body text.
    pub fn with_placeholder_title(mut self, title: impl Into<String>) -> Self {
        self.placeholder_title = title.into();
        self
    }

    /// Set the empty block policy.
    pub fn with_empty_blocks(mut self, policy: EmptyBlockPolicy) -> Self {
        self.empty_blocks = policy;
        self
    }
}

/// Classification of a single text unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingDecision {
    /// Heading from a known style name.
    Style(HeadingLevel),

    /// Heading from a "SECTION"/"CHAPTER" marker.
    Marker(HeadingLevel),

    /// Heading from a numeric prefix.
    Numbered(HeadingLevel),

    /// Body text.
    Body,
}

impl HeadingDecision {
    /// Check if this decision results in a heading.
    pub fn is_heading(&self) -> bool {
        !matches!(self, HeadingDecision::Body)
    }

    /// Get the heading level if this is a heading.
    pub fn level(&self) -> Option<HeadingLevel> {
        match self {
            HeadingDecision::Style(level)
            | HeadingDecision::Marker(level)
            | HeadingDecision::Numbered(level) => Some(*level),
            HeadingDecision::Body => None,
        }
    }
}

/// Structure classifier.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier with the given configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Create a classifier with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ClassifierConfig::default())
    }

    /// Classify a single unit. Blank units are body text here; the
    /// accumulation pass skips them before asking.
    pub fn decide(&self, unit: &TextUnit) -> HeadingDecision {
        if let Some(level) = unit.style_hint.as_deref().and_then(|s| self.style_level(s)) {
            return HeadingDecision::Style(level);
        }

        let text = unit.text();

        if self.config.recognize_markers {
            if let Some(level) = match_marker(text) {
                return HeadingDecision::Marker(level);
            }
        }

        match match_numbered(text) {
            Some(level) => HeadingDecision::Numbered(level),
            None => HeadingDecision::Body,
        }
    }

    fn style_level(&self, style: &str) -> Option<HeadingLevel> {
        if self.config.section_styles.iter().any(|s| s == style) {
            Some(HeadingLevel::Section)
        } else if self.config.chapter_styles.iter().any(|s| s == style) {
            Some(HeadingLevel::Chapter)
        } else {
            None
        }
    }

    /// Build headings and content blocks from a unit stream.
    pub fn classify<I>(&self, units: I) -> BookStructure
    where
        I: IntoIterator<Item = TextUnit>,
    {
        let mut acc = Accumulator::new(&self.config);

        for unit in units {
            if unit.is_blank() {
                continue;
            }
            match self.decide(&unit).level() {
                Some(level) => acc.push_heading(level, unit.text().to_string()),
                None => acc.push_body(unit.text().to_string()),
            }
        }

        let structure = acc.finish();
        debug!(
            "classified {} headings ({} sections, {} chapters), {} blocks",
            structure.headings.len(),
            structure.section_count(),
            structure.chapter_count(),
            structure.blocks.len()
        );
        structure
    }
}

/// Classify units with the default configuration.
pub fn classify<I>(units: I) -> BookStructure
where
    I: IntoIterator<Item = TextUnit>,
{
    Classifier::with_defaults().classify(units)
}

/// Single-pass accumulation state.
struct Accumulator<'a> {
    config: &'a ClassifierConfig,
    structure: BookStructure,
    /// Level of the heading currently collecting body text
    current: Option<HeadingLevel>,
    buffer: Vec<String>,
}

impl<'a> Accumulator<'a> {
    fn new(config: &'a ClassifierConfig) -> Self {
        Self {
            config,
            structure: BookStructure::new(),
            current: None,
            buffer: Vec::new(),
        }
    }

    fn push_heading(&mut self, level: HeadingLevel, text: String) {
        self.flush();
        self.structure.headings.push(HeadingEntry::new(level, text));
        self.current = Some(level);
    }

    fn push_body(&mut self, text: String) {
        if self.current.is_none() {
            let title = self.config.placeholder_title.clone();
            self.structure.headings.push(HeadingEntry::section(title));
            self.current = Some(HeadingLevel::Section);
        }
        self.buffer.push(text);
    }

    /// Emits the buffer as a block owned by the most recent heading.
    fn flush(&mut self) {
        let paragraphs = std::mem::take(&mut self.buffer);
        let Some(level) = self.current.take() else {
            return;
        };
        if paragraphs.is_empty() && self.config.empty_blocks == EmptyBlockPolicy::Drop {
            return;
        }
        self.structure.blocks.push(ContentBlock {
            level,
            heading_index: self.structure.headings.len() - 1,
            paragraphs,
        });
    }

    fn finish(mut self) -> BookStructure {
        self.flush();
        self.structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<TextUnit> {
        texts.iter().map(|t| TextUnit::line(*t)).collect()
    }

    fn block(level: HeadingLevel, heading_index: usize, paragraphs: &[&str]) -> ContentBlock {
        ContentBlock {
            level,
            heading_index,
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Blocks never outnumber headings and each matches its owner's level.
    fn assert_ownership(structure: &BookStructure) {
        assert!(structure.blocks.len() <= structure.headings.len());
        let mut last_owner = None;
        for b in &structure.blocks {
            let owner = &structure.headings[b.heading_index];
            assert_eq!(b.level, owner.level);
            assert!(last_owner.map_or(true, |prev| b.heading_index > prev));
            last_owner = Some(b.heading_index);
        }
    }

    #[test]
    fn test_numbered_outline() {
        let s = classify(lines(&[
            "1. Overview",
            "Some body text.",
            "1.1 Details",
            "More text.",
        ]));

        assert_eq!(
            s.headings,
            vec![
                HeadingEntry::section("1. Overview"),
                HeadingEntry::chapter("1.1 Details"),
            ]
        );
        assert_eq!(
            s.blocks,
            vec![
                block(HeadingLevel::Section, 0, &["Some body text."]),
                block(HeadingLevel::Chapter, 1, &["More text."]),
            ]
        );
        assert_ownership(&s);
    }

    #[test]
    fn test_leading_body_gets_placeholder_section() {
        let s = classify(lines(&["Just a line."]));
        assert_eq!(s.headings, vec![HeadingEntry::section(DEFAULT_PLACEHOLDER_TITLE)]);
        assert_eq!(s.blocks, vec![block(HeadingLevel::Section, 0, &["Just a line."])]);
    }

    #[test]
    fn test_custom_placeholder_title() {
        let classifier = Classifier::new(
            ClassifierConfig::new().with_placeholder_title("Introductory Chapter"),
        );
        let s = classifier.classify(lines(&["Prose first.", "1. Then a heading"]));
        assert_eq!(s.headings[0], HeadingEntry::section("Introductory Chapter"));
        assert_eq!(s.headings[1], HeadingEntry::section("1. Then a heading"));
        assert_eq!(s.blocks[0].paragraphs, vec!["Prose first."]);
    }

    #[test]
    fn test_style_headings_retain_trailing_empty_block() {
        let units = vec![
            TextUnit::styled("Random Title", "Heading 1"),
            TextUnit::styled("Another Title", "Heading 2"),
        ];
        let s = classify(units);

        assert_eq!(
            s.headings,
            vec![
                HeadingEntry::section("Random Title"),
                HeadingEntry::chapter("Another Title"),
            ]
        );
        assert_eq!(
            s.blocks,
            vec![
                block(HeadingLevel::Section, 0, &[]),
                block(HeadingLevel::Chapter, 1, &[]),
            ]
        );
    }

    #[test]
    fn test_drop_policy_omits_empty_blocks() {
        let classifier =
            Classifier::new(ClassifierConfig::new().with_empty_blocks(EmptyBlockPolicy::Drop));
        let units = vec![
            TextUnit::styled("Part", "Heading 1"),
            TextUnit::styled("First", "Heading 2"),
            TextUnit::styled("Body.", "Normal"),
            TextUnit::styled("Second", "Heading 2"),
        ];
        let s = classifier.classify(units);

        assert_eq!(s.headings.len(), 3);
        assert_eq!(s.blocks, vec![block(HeadingLevel::Chapter, 1, &["Body."])]);
        assert_ownership(&s);
    }

    #[test]
    fn test_italian_style_names() {
        let units = vec![
            TextUnit::styled("Parte prima", "Titolo 1"),
            TextUnit::styled("Capitolo", "Titolo 2"),
        ];
        let s = classify(units);
        assert_eq!(s.headings[0].level, HeadingLevel::Section);
        assert_eq!(s.headings[1].level, HeadingLevel::Chapter);
    }

    #[test]
    fn test_style_beats_pattern() {
        let classifier = Classifier::with_defaults();
        // numbered like a section, styled as a chapter
        let unit = TextUnit::styled("1. Overview", "Heading 2");
        assert_eq!(
            classifier.decide(&unit),
            HeadingDecision::Style(HeadingLevel::Chapter)
        );
    }

    #[test]
    fn test_unknown_style_falls_through_to_patterns() {
        let classifier = Classifier::with_defaults();
        assert_eq!(
            classifier.decide(&TextUnit::styled("1.2 Setup", "Heading 3")),
            HeadingDecision::Numbered(HeadingLevel::Chapter)
        );
        assert_eq!(
            classifier.decide(&TextUnit::styled("Plain words", "Normal")),
            HeadingDecision::Body
        );
    }

    #[test]
    fn test_marker_beats_numbers() {
        let classifier = Classifier::with_defaults();
        assert_eq!(
            classifier.decide(&TextUnit::line("CHAPTER 2 — 1. Odd numbering")),
            HeadingDecision::Marker(HeadingLevel::Chapter)
        );
    }

    #[test]
    fn test_markers_can_be_disabled() {
        let classifier = Classifier::new(ClassifierConfig::new().with_markers(false));
        assert_eq!(
            classifier.decide(&TextUnit::line("SECTION II — Tools")),
            HeadingDecision::Body
        );
        assert_eq!(
            classifier.decide(&TextUnit::line("2. Tools")),
            HeadingDecision::Numbered(HeadingLevel::Section)
        );
    }

    #[test]
    fn test_extra_style_names() {
        let classifier = Classifier::new(
            ClassifierConfig::new()
                .with_section_style("Part Title")
                .with_chapter_style("Chapter Title"),
        );
        assert_eq!(
            classifier.decide(&TextUnit::styled("Beginnings", "Part Title")),
            HeadingDecision::Style(HeadingLevel::Section)
        );
        assert_eq!(
            classifier.decide(&TextUnit::styled("Setup", "Chapter Title")),
            HeadingDecision::Style(HeadingLevel::Chapter)
        );
    }

    #[test]
    fn test_blank_units_are_skipped() {
        let s = classify(lines(&["", "   ", "1. Start", "\t", "Body", " "]));
        assert_eq!(s.headings, vec![HeadingEntry::section("1. Start")]);
        assert_eq!(s.blocks, vec![block(HeadingLevel::Section, 0, &["Body"])]);
    }

    #[test]
    fn test_fully_blank_input() {
        assert_eq!(classify(Vec::new()), BookStructure::new());
        assert_eq!(classify(lines(&["", "  "])), BookStructure::new());
    }

    #[test]
    fn test_text_is_trimmed() {
        let s = classify(lines(&["   1. Overview  ", "  body  "]));
        assert_eq!(s.headings[0].text, "1. Overview");
        assert_eq!(s.blocks[0].paragraphs, vec!["body"]);
    }

    #[test]
    fn test_numeric_edge_cases() {
        let s = classify(lines(&[
            "1. Intro",
            "1.Title without space",
            "1.1.1 Third level",
            "3.14 percent of readers skip this",
        ]));
        // a decimal followed by words has the sub-numbered shape
        assert_eq!(s.headings.len(), 2);
        assert_eq!(s.headings[1], HeadingEntry::chapter("3.14 percent of readers skip this"));
        assert_eq!(
            s.blocks[0].paragraphs,
            vec!["1.Title without space", "1.1.1 Third level"]
        );
    }

    #[test]
    fn test_consecutive_headings_and_ownership() {
        let s = classify(lines(&[
            "SECTION I — Foundations",
            "CHAPTER 1 — Basics",
            "Text a.",
            "Text b.",
            "CHAPTER 2 — Next",
            "SECTION II — Growth",
            "Text c.",
        ]));
        assert_eq!(s.headings.len(), 4);
        assert_eq!(s.blocks.len(), 4);
        assert!(s.blocks[0].is_empty());
        assert_eq!(s.blocks[1].paragraphs, vec!["Text a.", "Text b."]);
        assert!(s.blocks[2].is_empty());
        assert_eq!(s.blocks[3].level, HeadingLevel::Section);
        assert_eq!(s.blocks[3].paragraphs, vec!["Text c."]);
        assert_ownership(&s);
    }

    #[test]
    fn test_decision_helpers() {
        assert!(HeadingDecision::Marker(HeadingLevel::Section).is_heading());
        assert!(!HeadingDecision::Body.is_heading());
        assert_eq!(
            HeadingDecision::Numbered(HeadingLevel::Chapter).level(),
            Some(HeadingLevel::Chapter)
        );
        assert_eq!(HeadingDecision::Body.level(), None);
    }
}
