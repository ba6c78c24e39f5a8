//! ZIP container wrapper for DOCX packages.

use crate::error::{Error, Result};
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

/// Package part paths.
pub mod paths {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const DOCUMENT_XML: &str = "word/document.xml";
    pub const STYLES_XML: &str = "word/styles.xml";
    pub const CORE_XML: &str = "docProps/core.xml";
}

/// ZIP container wrapper for DOCX files.
pub struct DocxContainer {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl DocxContainer {
    /// Opens a DOCX container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Opens a DOCX container from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = ZipArchive::new(cursor)?;
        Ok(Self { archive })
    }

    /// Reads a part from the archive as a UTF-8 string.
    pub fn read_file(&mut self, path: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Reads a part if present; a missing part is not an error.
    pub fn read_optional(&mut self, path: &str) -> Result<Option<String>> {
        if !self.file_exists(path) {
            return Ok(None);
        }
        self.read_file(path).map(Some)
    }

    /// Reads the main document part.
    pub fn read_document(&mut self) -> Result<String> {
        self.read_file(paths::DOCUMENT_XML)
    }

    /// Reads the style definitions part, if any.
    pub fn read_styles(&mut self) -> Result<Option<String>> {
        self.read_optional(paths::STYLES_XML)
    }

    /// Reads the core properties part, if any.
    pub fn read_core_properties(&mut self) -> Result<Option<String>> {
        self.read_optional(paths::CORE_XML)
    }

    /// Checks if a part exists in the archive.
    pub fn file_exists(&mut self, path: &str) -> bool {
        self.archive.by_name(path).is_ok()
    }
}
