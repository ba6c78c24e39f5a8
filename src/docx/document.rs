//! Paragraph extraction from `word/document.xml`.
//!
//! Only paragraphs that are direct children of `w:body` become text units.
//! Tables, content controls and drawings are skipped whole.

use super::styles::StyleSheet;
use super::xml::{attr, local_name, local_name_end, skip_element};
use crate::error::{Error, Result};
use crate::model::TextUnit;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Parses body paragraphs into text units carrying their style names.
pub fn parse_document(xml: &str, styles: &StyleSheet) -> Result<Vec<TextUnit>> {
    let mut parser = DocumentParser::new(xml, styles);
    parser.parse()
}

/// Document parser state machine.
struct DocumentParser<'a> {
    reader: Reader<&'a [u8]>,
    styles: &'a StyleSheet,
}

impl<'a> DocumentParser<'a> {
    fn new(xml: &'a str, styles: &'a StyleSheet) -> Self {
        // run text keeps its spaces
        let reader = Reader::from_str(xml);
        Self { reader, styles }
    }

    fn parse(&mut self) -> Result<Vec<TextUnit>> {
        let mut units = Vec::new();
        let mut buf = Vec::new();
        let mut in_body = false;

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = local_name(&e);
                    match name.as_str() {
                        "body" => in_body = true,
                        "p" if in_body => {
                            buf.clear();
                            let unit = self.parse_paragraph()?;
                            if !unit.is_blank() {
                                units.push(unit);
                            }
                        }
                        _ if in_body => {
                            // tbl, sdt, sectPr, customXml, ...
                            buf.clear();
                            skip_element(&mut self.reader)?;
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(e)) => {
                    if local_name_end(&e) == "body" {
                        in_body = false;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(units)
    }

    /// Parses a <w:p> element after its start tag.
    fn parse_paragraph(&mut self) -> Result<TextUnit> {
        let mut style_id: Option<String> = None;
        let mut text = String::new();
        let mut in_text = false;
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = local_name(&e);
                    match name.as_str() {
                        "pPr" => {
                            buf.clear();
                            style_id = self.parse_paragraph_properties()?;
                        }
                        "t" => in_text = true,
                        "del" | "delText" | "instrText" | "rPr" | "drawing" | "pict"
                        | "object" | "AlternateContent" | "footnoteReference" => {
                            buf.clear();
                            skip_element(&mut self.reader)?;
                        }
                        _ => {}
                    }
                }
                Ok(Event::Empty(e)) => match local_name(&e).as_str() {
                    "tab" => text.push('\t'),
                    "br" | "cr" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Text(t)) if in_text => {
                    let s = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    text.push_str(&s);
                }
                Ok(Event::End(e)) => match local_name_end(&e).as_str() {
                    "t" => in_text = false,
                    "p" => break,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        let style_hint = match style_id {
            Some(id) => Some(self.styles.resolve(&id)),
            None => self.styles.default_paragraph().map(str::to_string),
        };

        Ok(TextUnit {
            content: text,
            style_hint,
        })
    }

    /// Reads <w:pPr> and returns the referenced style id.
    fn parse_paragraph_properties(&mut self) -> Result<Option<String>> {
        let mut style_id = None;
        let mut depth = 1;
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::Empty(e)) => {
                    if depth == 1 && local_name(&e) == "pStyle" {
                        style_id = attr(&e, "val");
                    }
                }
                Ok(Event::End(_)) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(style_id)
    }
}
