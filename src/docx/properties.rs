//! Core document properties from `docProps/core.xml`.

use super::xml::{local_name, read_text};
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Title and author recorded in the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub creator: Option<String>,
}

/// Parses `dc:title` and `dc:creator`; blank values are treated as absent.
pub fn parse_core_properties(xml: &str) -> Result<CoreProperties> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut props = CoreProperties::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = local_name(&e);
                if name == "title" || name == "creator" {
                    buf.clear();
                    let value = read_text(&mut reader)?.trim().to_string();
                    if !value.is_empty() {
                        if name == "title" {
                            props.title = Some(value);
                        } else {
                            props.creator = Some(value);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(props)
}
