//! Small quick-xml helpers shared by the DOCX part parsers.

use crate::error::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Reader;

/// Returns the element name without its namespace prefix.
pub(crate) fn local_name(e: &BytesStart) -> String {
    std::str::from_utf8(e.local_name().as_ref())
        .unwrap_or("")
        .to_string()
}

/// Returns the closing element name without its namespace prefix.
pub(crate) fn local_name_end(e: &BytesEnd) -> String {
    std::str::from_utf8(e.local_name().as_ref())
        .unwrap_or("")
        .to_string()
}

/// Gets an attribute value by local name ("w:val" matches "val").
pub(crate) fn attr(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name.as_bytes() {
            if let Ok(val) = attr.unescape_value() {
                return Some(val.into_owned());
            }
        }
    }
    None
}

/// Skips an element and all its children.
pub(crate) fn skip_element(reader: &mut Reader<&[u8]>) -> Result<()> {
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
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

    Ok(())
}

/// Reads the text content of the current element up to its end tag.
pub(crate) fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(t)) => {
                let s = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                text.push_str(&s);
            }
            Ok(Event::CData(t)) => text.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::Start(_)) => depth += 1,
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

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_matches_local_name() {
        let mut reader = Reader::from_str(r#"<w:pStyle w:val="Heading1"/>"#);
        let mut buf = Vec::new();
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Empty(e) => {
                assert_eq!(local_name(&e), "pStyle");
                assert_eq!(attr(&e, "val").as_deref(), Some("Heading1"));
                assert_eq!(attr(&e, "styleId"), None);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_read_text_unescapes() {
        let mut reader = Reader::from_str("<dc:title>Tom &amp; Jerry</dc:title><next/>");
        let mut buf = Vec::new();
        reader.read_event_into(&mut buf).unwrap();
        assert_eq!(read_text(&mut reader).unwrap(), "Tom & Jerry");
    }

    #[test]
    fn test_skip_element_stops_at_matching_end() {
        let mut reader = Reader::from_str("<a><b><c/></b><b/></a><d/>");
        let mut buf = Vec::new();
        reader.read_event_into(&mut buf).unwrap();
        skip_element(&mut reader).unwrap();
        buf.clear();
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Empty(e) => assert_eq!(local_name(&e), "d"),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
