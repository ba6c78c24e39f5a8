//! Book rendering to DOCX and PDF.
//!
//! Both formats share the same page order: title page, copyright page,
//! table of contents, then every heading followed by the body text of the
//! block it owns. Every section starts a fresh page, and so does the
//! heading that follows a section's own text.

mod docx;
mod front_matter;
mod options;

#[cfg(feature = "pdf")]
mod fonts;
#[cfg(feature = "pdf")]
mod office;
#[cfg(feature = "pdf")]
mod pdf;

pub use docx::DocxRenderer;
pub use options::{PageSize, PdfEngine, RenderOptions};

#[cfg(feature = "pdf")]
pub use office::convert_docx_to_pdf;
#[cfg(feature = "pdf")]
pub use pdf::PdfRenderer;

use crate::error::Result;
use crate::model::{BookMetadata, BookStructure, HeadingLevel};
use std::path::Path;

/// Returns true if a page break goes between two consecutive headings.
pub(crate) fn breaks_page(previous: HeadingLevel, next: HeadingLevel) -> bool {
    previous == HeadingLevel::Section || next == HeadingLevel::Section
}

/// Renders a book to DOCX bytes.
pub fn render_docx(
    structure: &BookStructure,
    metadata: &BookMetadata,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    DocxRenderer::new(options.clone()).render(structure, metadata)
}

/// Renders a book to PDF bytes with the configured engine.
///
/// With `PdfEngine::Office`, a failed conversion is logged and the
/// built-in engine is used instead.
#[cfg(feature = "pdf")]
pub fn render_pdf(
    structure: &BookStructure,
    metadata: &BookMetadata,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    if options.pdf_engine == PdfEngine::Office {
        let docx = render_docx(structure, metadata, options)?;
        match convert_docx_to_pdf(&docx, &options.office_command) {
            Ok(pdf) => return Ok(pdf),
            Err(e) => log::warn!("office conversion failed, using built-in PDF engine: {}", e),
        }
    }
    PdfRenderer::new(options.clone()).render(structure, metadata)
}

/// Renders a book to DOCX and writes it to a file.
pub fn write_docx(
    structure: &BookStructure,
    metadata: &BookMetadata,
    path: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<()> {
    let bytes = render_docx(structure, metadata, options)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Renders a book to PDF and writes it to a file.
#[cfg(feature = "pdf")]
pub fn write_pdf(
    structure: &BookStructure,
    metadata: &BookMetadata,
    path: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<()> {
    let bytes = render_pdf(structure, metadata, options)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingEntry;

    fn book() -> (BookStructure, BookMetadata) {
        let structure = BookStructure {
            headings: vec![HeadingEntry::section("SECTION I — ONLY")],
            blocks: Vec::new(),
        };
        (structure, BookMetadata::new("Title", "Author"))
    }

    #[test]
    fn test_write_docx() {
        let (structure, meta) = book();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        write_docx(&structure, &meta, &path, &RenderOptions::default()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_office_engine_falls_back() {
        let (structure, meta) = book();
        let options = RenderOptions::new()
            .with_pdf_engine(PdfEngine::Office)
            .with_office_command("folio-test-no-such-office");
        let bytes = render_pdf(&structure, &meta, &options).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_write_pdf() {
        let (structure, meta) = book();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        write_pdf(&structure, &meta, &path, &RenderOptions::default()).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-"));
    }
}
