//! Two-level book structure produced by the classifier.

use serde::Serialize;

/// Structural level of a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HeadingLevel {
    /// Top-level division, always starts a fresh page
    Section,
    /// Second-level division nested under a section
    Chapter,
}

impl HeadingLevel {
    /// Returns the numeric outline level (1 for sections, 2 for chapters).
    pub fn number(&self) -> u8 {
        match self {
            HeadingLevel::Section => 1,
            HeadingLevel::Chapter => 2,
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingLevel::Section => write!(f, "Section"),
            HeadingLevel::Chapter => write!(f, "Chapter"),
        }
    }
}

/// A recognized heading, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    pub level: HeadingLevel,
    pub text: String,
}

impl HeadingEntry {
    /// Creates a heading entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Creates a section heading.
    pub fn section(text: impl Into<String>) -> Self {
        Self::new(HeadingLevel::Section, text)
    }

    /// Creates a chapter heading.
    pub fn chapter(text: impl Into<String>) -> Self {
        Self::new(HeadingLevel::Chapter, text)
    }
}

/// Body paragraphs owned by one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    /// Level of the owning heading
    pub level: HeadingLevel,
    /// Index of the owning heading in `BookStructure::headings`
    pub heading_index: usize,
    /// Body paragraphs in document order (may be empty)
    pub paragraphs: Vec<String>,
}

impl ContentBlock {
    /// Returns true if the block carries no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Headings plus their content blocks.
///
/// Every block is owned by exactly one heading and blocks appear in the
/// same order as their owners, so `blocks.len() <= headings.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookStructure {
    pub headings: Vec<HeadingEntry>,
    pub blocks: Vec<ContentBlock>,
}

impl BookStructure {
    /// Creates an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no heading was recognized.
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Returns the number of section headings.
    pub fn section_count(&self) -> usize {
        self.count_level(HeadingLevel::Section)
    }

    /// Returns the number of chapter headings.
    pub fn chapter_count(&self) -> usize {
        self.count_level(HeadingLevel::Chapter)
    }

    fn count_level(&self, level: HeadingLevel) -> usize {
        self.headings.iter().filter(|h| h.level == level).count()
    }

    /// Returns the total number of body paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.blocks.iter().map(|b| b.paragraphs.len()).sum()
    }

    /// Returns the number of whitespace-separated words in headings and body.
    pub fn word_count(&self) -> usize {
        let heading_words: usize = self
            .headings
            .iter()
            .map(|h| h.text.split_whitespace().count())
            .sum();
        let body_words: usize = self
            .blocks
            .iter()
            .flat_map(|b| b.paragraphs.iter())
            .map(|p| p.split_whitespace().count())
            .sum();
        heading_words + body_words
    }

    /// Iterates headings in order together with the block each one owns.
    pub fn entries(&self) -> impl Iterator<Item = (&HeadingEntry, Option<&ContentBlock>)> {
        let mut blocks = self.blocks.iter().peekable();
        self.headings.iter().enumerate().map(move |(index, heading)| {
            let block = blocks.next_if(|b| b.heading_index == index);
            (heading, block)
        })
    }

    /// Returns a copy with heading texts replaced, keeping levels and blocks.
    ///
    /// `headings` must have the same length as the current heading list;
    /// extra or missing entries are ignored.
    pub fn with_headings(&self, headings: Vec<HeadingEntry>) -> Self {
        let mut result = self.clone();
        for (slot, heading) in result.headings.iter_mut().zip(headings) {
            slot.text = heading.text;
        }
        result
    }

    /// Returns the structure as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BookStructure {
        BookStructure {
            headings: vec![
                HeadingEntry::section("1. Overview"),
                HeadingEntry::chapter("1.1 Details"),
                HeadingEntry::chapter("1.2 More"),
            ],
            blocks: vec![
                ContentBlock {
                    level: HeadingLevel::Section,
                    heading_index: 0,
                    paragraphs: vec!["Some body text.".into()],
                },
                ContentBlock {
                    level: HeadingLevel::Chapter,
                    heading_index: 2,
                    paragraphs: vec!["More text here.".into(), "And here.".into()],
                },
            ],
        }
    }

    #[test]
    fn test_counts() {
        let s = sample();
        assert_eq!(s.section_count(), 1);
        assert_eq!(s.chapter_count(), 2);
        assert_eq!(s.paragraph_count(), 3);
        assert_eq!(s.word_count(), 6 + 3 + 5);
    }

    #[test]
    fn test_entries_pair_blocks_with_owners() {
        let s = sample();
        let pairs: Vec<_> = s
            .entries()
            .map(|(h, b)| (h.text.as_str(), b.map(|b| b.paragraphs.len())))
            .collect();
        assert_eq!(
            pairs,
            vec![("1. Overview", Some(1)), ("1.1 Details", None), ("1.2 More", Some(2))]
        );
    }

    #[test]
    fn test_with_headings_keeps_blocks() {
        let s = sample();
        let renamed = s.with_headings(vec![
            HeadingEntry::section("SECTION I — OVERVIEW"),
            HeadingEntry::chapter("CHAPTER 1 — Details"),
            HeadingEntry::chapter("CHAPTER 2 — More"),
        ]);
        assert_eq!(renamed.headings[0].text, "SECTION I — OVERVIEW");
        assert_eq!(renamed.blocks, s.blocks);
    }

    #[test]
    fn test_level_numbers() {
        assert_eq!(HeadingLevel::Section.number(), 1);
        assert_eq!(HeadingLevel::Chapter.number(), 2);
    }

    #[test]
    fn test_json_output() {
        let json = sample().to_json();
        assert!(json.contains("\"Section\""));
        assert!(json.contains("\"heading_index\": 2"));
    }
}
