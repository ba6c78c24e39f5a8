//! DOCX (WordprocessingML) manuscript reader.
//!
//! A DOCX file is a ZIP package. The reader needs `word/document.xml`;
//! `word/styles.xml` and `docProps/core.xml` are used when present.

mod container;
mod document;
mod properties;
mod styles;
mod xml;

pub use container::{paths, DocxContainer};
pub use document::parse_document;
pub use properties::{parse_core_properties, CoreProperties};
pub use styles::{parse_styles, StyleSheet};

use crate::error::Result;
use crate::model::TextUnit;
use log::debug;
use std::io::{Read, Seek};

/// DOCX manuscript reader.
pub struct DocxReader {
    container: DocxContainer,
}

impl DocxReader {
    /// Opens a DOCX document from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let container = DocxContainer::from_reader(reader)?;
        Ok(Self { container })
    }

    /// Opens a DOCX document from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = DocxContainer::from_bytes(data)?;
        Ok(Self { container })
    }

    /// Reads the paragraph style table; empty when the part is missing.
    pub fn styles(&mut self) -> Result<StyleSheet> {
        match self.container.read_styles()? {
            Some(xml) => parse_styles(&xml),
            None => Ok(StyleSheet::new()),
        }
    }

    /// Reads body paragraphs as text units with style hints.
    pub fn read_units(&mut self) -> Result<Vec<TextUnit>> {
        let styles = self.styles()?;
        let document = self.container.read_document()?;
        let units = parse_document(&document, &styles)?;
        debug!(
            "docx: {} paragraph styles, {} non-blank paragraphs",
            styles.len(),
            units.len()
        );
        Ok(units)
    }

    /// Reads title and author from the core properties.
    pub fn properties(&mut self) -> Result<CoreProperties> {
        match self.container.read_core_properties()? {
            Some(xml) => parse_core_properties(&xml),
            None => Ok(CoreProperties::default()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Builds an in-memory ZIP package from (path, content) pairs.
    pub(crate) fn build_package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (path, content) in parts {
            zip.start_file(*path, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    /// Builds a minimal manuscript with styled headings.
    pub(crate) fn sample_manuscript() -> Vec<u8> {
        let document = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>Preface text.</w:t></w:r></w:p>
<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Getting started</w:t></w:r></w:p>
<w:p><w:r><w:t>Section intro.</w:t></w:r></w:p>
<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>first steps with the api</w:t></w:r></w:p>
<w:p><w:r><w:t>Chapter body.</w:t></w:r></w:p>
<w:p><w:r><w:t>2. Numbered section</w:t></w:r></w:p>
</w:body>
</w:document>"#;
        let styles = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
</w:styles>"#;
        let core = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>Sample Book</dc:title><dc:creator>Sample Author</dc:creator>
</cp:coreProperties>"#;
        build_package(&[
            (paths::DOCUMENT_XML, document),
            (paths::STYLES_XML, styles),
            (paths::CORE_XML, core),
        ])
    }

    #[test]
    fn test_read_units() {
        let mut reader = DocxReader::from_bytes(sample_manuscript()).unwrap();
        let units = reader.read_units().unwrap();
        assert_eq!(units.len(), 6);
        assert_eq!(units[0], TextUnit::styled("Preface text.", "Normal"));
        assert_eq!(units[1], TextUnit::styled("Getting started", "Heading 1"));
        assert_eq!(units[3].style_hint.as_deref(), Some("Heading 2"));
    }

    #[test]
    fn test_properties() {
        let mut reader = DocxReader::from_bytes(sample_manuscript()).unwrap();
        let props = reader.properties().unwrap();
        assert_eq!(props.title.as_deref(), Some("Sample Book"));
        assert_eq!(props.creator.as_deref(), Some("Sample Author"));
    }

    #[test]
    fn test_without_optional_parts() {
        let bytes = build_package(&[(
            paths::DOCUMENT_XML,
            r#"<w:document xmlns:w="w"><w:body><w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p></w:body></w:document>"#,
        )]);
        let mut reader = DocxReader::from_reader(Cursor::new(bytes)).unwrap();
        let units = reader.read_units().unwrap();
        assert_eq!(units, vec![TextUnit::styled("Intro", "Heading 1")]);
        assert_eq!(reader.properties().unwrap(), CoreProperties::default());
    }
}
