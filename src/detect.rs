//! Format detection for manuscript inputs.

use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Magic bytes for ZIP archive (DOCX)
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Magic bytes for PDF
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Supported manuscript format types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Office Open XML word processing document (paragraphs carry styles)
    Docx,
    /// Portable Document Format (text lines only)
    Pdf,
    /// Plain UTF-8 text (text lines only)
    Text,
}

impl FormatType {
    /// Returns true if readers of this format supply paragraph style hints.
    pub fn has_style_hints(&self) -> bool {
        matches!(self, FormatType::Docx)
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Docx => write!(f, "DOCX"),
            FormatType::Pdf => write!(f, "PDF"),
            FormatType::Text => write!(f, "Plain text"),
        }
    }
}

/// Detect format from a file extension alone.
///
/// Returns `None` when the path has no extension; returns
/// `UnsupportedFormat` for extensions that are known not to be manuscripts.
pub fn detect_format_from_extension(path: impl AsRef<Path>) -> Result<Option<FormatType>> {
    let ext = match path.as_ref().extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return Ok(None),
    };

    match ext.as_str() {
        "docx" => Ok(Some(FormatType::Docx)),
        "pdf" => Ok(Some(FormatType::Pdf)),
        "txt" | "text" | "md" => Ok(Some(FormatType::Text)),
        "doc" | "odt" | "rtf" | "pages" => Err(Error::UnsupportedFormat(format!(".{}", ext))),
        _ => Ok(None),
    }
}

/// Detect manuscript format from a file path.
///
/// The extension decides first; files without a recognized extension are
/// sniffed by content.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let path = path.as_ref();
    if let Some(format) = detect_format_from_extension(path)? {
        return Ok(format);
    }

    let mut file = std::fs::File::open(path)?;
    detect_format(&mut file)
}

/// Detect manuscript format from a reader.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<FormatType> {
    let mut buffer = [0u8; 512];

    reader.seek(SeekFrom::Start(0))?;
    let bytes_read = reader.read(&mut buffer)?;
    reader.seek(SeekFrom::Start(0))?;

    detect_format_from_bytes(&buffer[..bytes_read])
}

/// Detect manuscript format from bytes.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if data.is_empty() {
        return Err(Error::InvalidData("empty input".into()));
    }

    if data.starts_with(&ZIP_MAGIC) {
        return Ok(FormatType::Docx);
    }

    if data.starts_with(PDF_MAGIC) {
        return Ok(FormatType::Pdf);
    }

    if looks_like_text(data) {
        return Ok(FormatType::Text);
    }

    Err(Error::UnknownFormat)
}

/// Checks whether a prefix of the data is UTF-8 text.
///
/// The prefix may end in the middle of a multi-byte sequence, so an
/// incomplete trailing character is tolerated.
fn looks_like_text(data: &[u8]) -> bool {
    if data.contains(&0) {
        return false;
    }
    match std::str::from_utf8(data) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}
