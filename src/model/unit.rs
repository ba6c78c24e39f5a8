//! Raw text units produced by the input readers.

use serde::Serialize;

/// One input paragraph or line.
///
/// Styled inputs (DOCX) attach the paragraph's style name as a hint;
/// line-oriented inputs (PDF, plain text) leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TextUnit {
    /// Raw text, possibly with surrounding whitespace
    pub content: String,
    /// Named paragraph style, e.g. "Heading 1"
    pub style_hint: Option<String>,
}

impl TextUnit {
    /// Creates a unit without a style hint.
    pub fn line(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style_hint: None,
        }
    }

    /// Creates a unit carrying a paragraph style name.
    pub fn styled(content: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style_hint: Some(style.into()),
        }
    }

    /// Returns the content with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.content.trim()
    }

    /// Returns true if the unit has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text().is_empty()
    }
}

/// Splits extracted plain text into unstyled units, one per non-blank line.
pub fn split_lines(text: &str) -> Vec<TextUnit> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(TextUnit::line)
        .collect()
}
