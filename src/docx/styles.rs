//! Paragraph style table from `word/styles.xml`.
//!
//! Paragraphs reference styles by id (`Heading1`, `Titolo1`, ...). The
//! classifier works on display names, so ids are resolved here. Built-in
//! styles are stored under lower-case names (`heading 1`) and are mapped
//! to the names Word shows (`Heading 1`).

use super::xml::{attr, local_name, local_name_end};
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

/// Paragraph style names keyed by style id.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    /// Creates an empty style sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a paragraph style.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), display_name(&name.into()));
    }

    /// Returns the display name of the style with the given id.
    ///
    /// Unknown ids fall back to a display name derived from the id itself.
    pub fn resolve(&self, id: &str) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| name_from_id(id))
    }

    /// Sets the style used by paragraphs without an explicit reference.
    pub fn set_default_paragraph(&mut self, name: impl Into<String>) {
        self.default_paragraph = Some(display_name(&name.into()));
    }

    /// Returns the name of the default paragraph style.
    pub fn default_paragraph(&self) -> Option<&str> {
        self.default_paragraph.as_deref()
    }

    /// Returns the number of paragraph styles.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no paragraph style is known.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parses paragraph styles from styles.xml.
pub fn parse_styles(xml: &str) -> Result<StyleSheet> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut sheet = StyleSheet::new();
    let mut buf = Vec::new();
    // (id, is_default) of the paragraph style being read
    let mut current: Option<(String, bool)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if local_name(&e) == "style" {
                    current = paragraph_style_id(&e);
                }
            }
            Ok(Event::Empty(e)) => match local_name(&e).as_str() {
                "name" => {
                    if let (Some((id, is_default)), Some(name)) = (&current, attr(&e, "val")) {
                        sheet.insert(id.clone(), name);
                        if *is_default {
                            let name = sheet.resolve(id);
                            sheet.set_default_paragraph(name);
                        }
                    }
                }
                "style" => {
                    // a style without children still counts, named by its id
                    if let Some((id, is_default)) = paragraph_style_id(&e) {
                        sheet.insert(id.clone(), name_from_id(&id));
                        if is_default {
                            let name = sheet.resolve(&id);
                            sheet.set_default_paragraph(name);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if local_name_end(&e) == "style" {
                    current = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheet)
}

fn paragraph_style_id(e: &quick_xml::events::BytesStart) -> Option<(String, bool)> {
    if attr(e, "type").as_deref() != Some("paragraph") {
        return None;
    }
    let id = attr(e, "styleId")?;
    let is_default = matches!(attr(e, "default").as_deref(), Some("1") | Some("true"));
    Some((id, is_default))
}

/// Maps built-in lower-case style names to their UI names.
fn display_name(name: &str) -> String {
    if let Some(level) = name.strip_prefix("heading ") {
        if level.chars().all(|c| c.is_ascii_digit()) {
            return format!("Heading {}", level);
        }
    }
    if let Some(level) = name.strip_prefix("toc ") {
        if level.chars().all(|c| c.is_ascii_digit()) {
            return format!("TOC {}", level);
        }
    }

    match name {
        "normal" => "Normal".to_string(),
        "title" => "Title".to_string(),
        "subtitle" => "Subtitle".to_string(),
        "caption" => "Caption".to_string(),
        "quote" => "Quote".to_string(),
        "footnote text" => "Footnote Text".to_string(),
        _ => name.to_string(),
    }
}

/// Derives a display name from a style id ("Heading1" -> "Heading 1").
fn name_from_id(id: &str) -> String {
    let digits = id.trim_start_matches(|c: char| !c.is_ascii_digit());
    let stem = &id[..id.len() - digits.len()];
    if !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && !stem.is_empty()
        && !stem.ends_with(' ')
    {
        format!("{} {}", stem, digits)
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Titolo2">
    <w:name w:val="heading 2"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="MyQuote">
    <w:name w:val="Block Quote"/>
  </w:style>
  <w:style w:type="character" w:styleId="Strong">
    <w:name w:val="Strong"/>
  </w:style>
</w:styles>"#;

    #[test]
    fn test_parse_styles() {
        let sheet = parse_styles(STYLES).unwrap();
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.resolve("Heading1"), "Heading 1");
        assert_eq!(sheet.resolve("Titolo2"), "Heading 2");
        assert_eq!(sheet.resolve("MyQuote"), "Block Quote");
        assert_eq!(sheet.default_paragraph(), Some("Normal"));
    }

    #[test]
    fn test_character_styles_ignored() {
        let sheet = parse_styles(STYLES).unwrap();
        // resolved from the id only
        assert_eq!(sheet.resolve("Strong"), "Strong");
    }

    #[test]
    fn test_unknown_ids() {
        let sheet = StyleSheet::new();
        assert!(sheet.is_empty());
        assert_eq!(sheet.resolve("Heading2"), "Heading 2");
        assert_eq!(sheet.resolve("Titolo1"), "Titolo 1");
        assert_eq!(sheet.resolve("BodyText"), "BodyText");
        assert_eq!(sheet.resolve("42"), "42");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("heading 3"), "Heading 3");
        assert_eq!(display_name("toc 1"), "TOC 1");
        assert_eq!(display_name("title"), "Title");
        assert_eq!(display_name("heading x"), "heading x");
        assert_eq!(display_name("Custom"), "Custom");
    }
}
