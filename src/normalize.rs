//! Heading title normalization ("heuristic cleaning").
//!
//! Rewrites heading text into the canonical display form
//!
//! - sections: `SECTION I — TITLE`, `SECTION II — TITLE`, ...
//! - chapters: `CHAPTER 1 — Title`, `CHAPTER 2 — Title`, ...
//!
//! Levels and order never change. Chapter numbers run through the whole
//! document and are not reset at section boundaries. Running the pass on
//! its own output gives the same output.

use crate::model::{BookStructure, HeadingEntry, HeadingLevel};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Acronyms restored to their canonical spelling after title-casing.
pub const DEFAULT_ACRONYMS: &[&str] = &[
    "AI", "LLM", "API", "SaaS", "SQL", "CPU", "GPU", "UI", "UX", "CLI", "SDK",
];

/// Separator placed between the label and the title.
const DASH: &str = "—";

// Dashes are folded to '-' before these run.
static RE_SECTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:section)\s+[IVXLCDM]+(?:(?:\s*[-:.]\s*|\s+)(.*))?$").unwrap()
});

static RE_CHAPTER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:chapter)\s+\d+(?:(?:\s*[-:.]\s*|\s+)(.*))?$").unwrap()
});

static RE_TOP_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

static RE_SUB_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+\s*").unwrap());

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\p{L})([\p{L}'’]*)").unwrap());

static DEFAULT_NORMALIZER: LazyLock<TitleNormalizer> = LazyLock::new(TitleNormalizer::new);

/// Whether heading titles are normalized before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanMode {
    /// Keep heading text exactly as classified.
    None,
    /// Renumber and restyle headings.
    #[default]
    Heuristic,
}

impl CleanMode {
    /// Applies the mode to a structure; blocks are left untouched.
    pub fn apply(&self, structure: &BookStructure) -> BookStructure {
        match self {
            CleanMode::None => structure.clone(),
            CleanMode::Heuristic => structure.with_headings(normalize(&structure.headings)),
        }
    }
}

impl std::str::FromStr for CleanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CleanMode::None),
            "heuristic" => Ok(CleanMode::Heuristic),
            other => Err(format!("unknown clean mode '{}'", other)),
        }
    }
}

/// Normalizes headings with the default acronym list.
pub fn normalize(headings: &[HeadingEntry]) -> Vec<HeadingEntry> {
    DEFAULT_NORMALIZER.normalize(headings)
}

/// Heading title normalizer.
#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    acronyms: Vec<String>,
    acronym_re: Option<Regex>,
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleNormalizer {
    /// Creates a normalizer with the default acronym list.
    pub fn new() -> Self {
        Self::with_acronyms(DEFAULT_ACRONYMS.iter().copied())
    }

    /// Creates a normalizer restoring the given acronyms.
    pub fn with_acronyms<I, S>(acronyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let acronyms: Vec<String> = acronyms
            .into_iter()
            .map(Into::into)
            .filter(|a| !a.is_empty())
            .collect();

        let acronym_re = if acronyms.is_empty() {
            None
        } else {
            let alternation = acronyms
                .iter()
                .map(|a| regex::escape(a))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).ok()
        };

        Self {
            acronyms,
            acronym_re,
        }
    }

    /// Returns the acronym allow-list.
    pub fn acronyms(&self) -> &[String] {
        &self.acronyms
    }

    /// Rewrites every heading into its canonical display form.
    pub fn normalize(&self, headings: &[HeadingEntry]) -> Vec<HeadingEntry> {
        let mut section_index = 0;
        let mut chapter_index = 0;

        headings
            .iter()
            .map(|heading| {
                let (label, title) = match heading.level {
                    HeadingLevel::Section => {
                        section_index += 1;
                        (
                            format!("SECTION {}", to_roman(section_index)),
                            self.section_title(&heading.text),
                        )
                    }
                    HeadingLevel::Chapter => {
                        chapter_index += 1;
                        (
                            format!("CHAPTER {}", chapter_index),
                            self.chapter_title(&heading.text),
                        )
                    }
                };
                let text = if title.is_empty() {
                    label
                } else {
                    format!("{} {} {}", label, DASH, title)
                };
                HeadingEntry::new(heading.level, text)
            })
            .collect()
    }

    /// Extracts the upper-cased display title of a section heading.
    pub fn section_title(&self, text: &str) -> String {
        let text = clean_text(text);
        let title = match RE_SECTION_PREFIX.captures(&text) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str()).to_string(),
            None => RE_TOP_NUMBER.replace(&text, "").into_owned(),
        };
        title.trim().to_uppercase()
    }

    /// Extracts the title-cased display title of a chapter heading.
    pub fn chapter_title(&self, text: &str) -> String {
        let text = clean_text(text);
        let title = match RE_CHAPTER_PREFIX.captures(&text) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str()).to_string(),
            None => RE_SUB_NUMBER.replace(&text, "").into_owned(),
        };
        self.restore_acronyms(&title_case(title.trim()))
    }

    fn restore_acronyms(&self, text: &str) -> String {
        let Some(re) = &self.acronym_re else {
            return text.to_string();
        };
        re.replace_all(text, |caps: &Captures| {
            let found = &caps[0];
            self.acronyms
                .iter()
                .find(|a| a.eq_ignore_ascii_case(found))
                .cloned()
                .unwrap_or_else(|| found.to_string())
        })
        .into_owned()
    }
}

/// NFC, dashes folded to '-', whitespace collapsed, trailing periods dropped.
fn clean_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let dashed = composed.replace(['—', '–'], "-");
    let collapsed = dashed.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches(['.', ' ']).to_string()
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A first letter whose upper case is several letters ("ß" to "SS") keeps
/// only the first of them upper-cased.
pub fn title_case(text: &str) -> String {
    RE_WORD
        .replace_all(text, |caps: &Captures| {
            let mut upper = caps[1].chars().flat_map(char::to_uppercase);
            let head: String = upper.next().into_iter().collect();
            let tail: String = upper.collect();
            format!("{}{}{}", head, tail.to_lowercase(), caps[2].to_lowercase())
        })
        .into_owned()
}

/// Converts a positive number to upper-case roman numerals.
pub fn to_roman(mut n: usize) -> String {
    const TABLE: &[(usize, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut result = String::new();
    for &(value, numeral) in TABLE {
        while n >= value {
            result.push_str(numeral);
            n -= value;
        }
    }
    result
}
