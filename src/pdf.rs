//! PDF manuscript reader.
//!
//! PDFs carry no usable style information, so every extracted line becomes
//! an unstyled text unit and classification relies on textual patterns.

use crate::error::{Error, Result};
use crate::model::{split_lines, TextUnit};
use log::{debug, warn};
use lopdf::Document;

/// PDF manuscript reader.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Opens a PDF document from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)?;
        if document.is_encrypted() {
            return Err(Error::Pdf("encrypted documents are not supported".into()));
        }
        Ok(Self { document })
    }

    /// Returns the number of pages.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Extracts the text of every page, in page order.
    ///
    /// A page whose content cannot be decoded is logged and skipped.
    pub fn read_text(&self) -> Result<String> {
        let pages = self.document.get_pages();
        if pages.is_empty() {
            return Err(Error::Pdf("document has no pages".into()));
        }

        let mut text = String::new();
        for page_number in pages.keys() {
            match self.document.extract_text(&[*page_number]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    if !text.ends_with('\n') {
                        text.push('\n');
                    }
                }
                Err(e) => warn!("pdf: skipping page {}: {}", page_number, e),
            }
        }
        Ok(text)
    }

    /// Extracts every non-blank line as an unstyled text unit.
    pub fn read_units(&self) -> Result<Vec<TextUnit>> {
        let units = split_lines(&self.read_text()?);
        debug!("pdf: {} pages, {} lines", self.page_count(), units.len());
        Ok(units)
    }
}
