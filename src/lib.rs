//! # folio
//!
//! Turns DOCX and PDF manuscripts into book layouts.
//!
//! The manuscript is read into raw text units, classified into a two-level
//! outline (Sections containing Chapters), optionally normalized into
//! canonical heading titles, and rendered as a DOCX and/or PDF book with a
//! title page, copyright page and table of contents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use folio::{BookMetadata, Folio};
//!
//! fn main() -> folio::Result<()> {
//!     let manuscript = Folio::new().parse("manuscript.docx")?;
//!     println!("{} chapters", manuscript.structure().chapter_count());
//!
//!     let metadata = BookMetadata::new("My Book", "Jane Roe");
//!     manuscript.write_docx(&metadata, "My_Book.docx")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `docx` (default): DOCX manuscript input
//! - `pdf` (default): PDF manuscript input and PDF output

pub mod classify;
pub mod detect;
pub mod error;
pub mod model;
pub mod normalize;
pub mod render;

#[cfg(feature = "docx")]
pub mod docx;

#[cfg(feature = "pdf")]
pub mod pdf;

// Re-exports
pub use classify::{classify, Classifier, ClassifierConfig, EmptyBlockPolicy, HeadingDecision};
pub use detect::{detect_format, detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use model::{BookMetadata, BookStructure, ContentBlock, HeadingEntry, HeadingLevel, TextUnit};
pub use normalize::{normalize, CleanMode, TitleNormalizer};
pub use render::{PageSize, PdfEngine, RenderOptions};

use log::{debug, info, warn};
use std::path::Path;

/// Reads a manuscript file into raw text units.
///
/// The format is detected from the extension, then from the content.
pub fn read_units(path: impl AsRef<Path>) -> Result<Vec<TextUnit>> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    let data = std::fs::read(path)?;
    Ok(read_source(data, format)?.units)
}

/// Reads manuscript bytes of a known format into raw text units.
pub fn read_units_from_bytes(data: Vec<u8>, format: FormatType) -> Result<Vec<TextUnit>> {
    Ok(read_source(data, format)?.units)
}

/// Parses a manuscript file into its raw (uncleaned) book structure.
///
/// # Example
///
/// ```no_run
/// let structure = folio::parse_file("manuscript.pdf")?;
/// for heading in &structure.headings {
///     println!("{}: {}", heading.level, heading.text);
/// }
/// # Ok::<(), folio::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<BookStructure> {
    Ok(classify(read_units(path)?))
}

/// Parses manuscript bytes into their raw book structure.
///
/// The format is detected from the content.
pub fn parse_bytes(data: &[u8]) -> Result<BookStructure> {
    let format = detect_format_from_bytes(data)?;
    Ok(classify(read_units_from_bytes(data.to_vec(), format)?))
}

/// Text units plus the document properties found alongside them.
struct Source {
    units: Vec<TextUnit>,
    title: Option<String>,
    author: Option<String>,
}

fn read_source(data: Vec<u8>, format: FormatType) -> Result<Source> {
    match format {
        #[cfg(feature = "docx")]
        FormatType::Docx => {
            let mut reader = docx::DocxReader::from_bytes(data)?;
            let units = reader.read_units()?;
            let properties = reader.properties().unwrap_or_else(|e| {
                warn!("ignoring unreadable document properties: {}", e);
                docx::CoreProperties::default()
            });
            Ok(Source {
                units,
                title: properties.title,
                author: properties.creator,
            })
        }
        #[cfg(feature = "pdf")]
        FormatType::Pdf => Ok(Source {
            units: pdf::PdfReader::from_bytes(&data)?.read_units()?,
            title: None,
            author: None,
        }),
        FormatType::Text => {
            let text = String::from_utf8(data)
                .map_err(|e| Error::InvalidData(format!("text input is not UTF-8: {}", e)))?;
            Ok(Source {
                units: model::split_lines(text.trim_start_matches('\u{feff}')),
                title: None,
                author: None,
            })
        }
        #[allow(unreachable_patterns)]
        _ => Err(Error::UnsupportedFormat(format!(
            "{} input requires the '{}' feature",
            format,
            format.to_string().to_lowercase()
        ))),
    }
}

/// Builder for reading, classifying and cleaning manuscripts.
///
/// # Example
///
/// ```no_run
/// use folio::{CleanMode, ClassifierConfig, Folio, PageSize, RenderOptions};
///
/// let manuscript = Folio::new()
///     .with_classifier(ClassifierConfig::new().with_markers(false))
///     .with_clean_mode(CleanMode::None)
///     .with_render_options(RenderOptions::new().with_page_size(PageSize::Letter))
///     .parse("manuscript.docx")?;
/// println!("{}", manuscript.structure().to_json());
/// # Ok::<(), folio::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Folio {
    classifier: ClassifierConfig,
    clean_mode: CleanMode,
    render_options: RenderOptions,
}

impl Folio {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the classifier configuration.
    pub fn with_classifier(mut self, config: ClassifierConfig) -> Self {
        self.classifier = config;
        self
    }

    /// Sets the heading clean mode.
    pub fn with_clean_mode(mut self, mode: CleanMode) -> Self {
        self.clean_mode = mode;
        self
    }

    /// Sets the rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Parses a manuscript file.
    pub fn parse(self, path: impl AsRef<Path>) -> Result<Manuscript> {
        let path = path.as_ref();
        let format = detect_format_from_path(path)?;
        info!("reading {} as {}", path.display(), format);
        let data = std::fs::read(path)?;
        self.parse_bytes(data, format)
    }

    /// Parses manuscript bytes of a known format.
    pub fn parse_bytes(self, data: Vec<u8>, format: FormatType) -> Result<Manuscript> {
        let source = read_source(data, format)?;
        debug!("{} text units read", source.units.len());
        let mut manuscript = self.parse_units(source.units);
        manuscript.format = Some(format);
        manuscript.title_hint = source.title;
        manuscript.author_hint = source.author;
        Ok(manuscript)
    }

    /// Classifies already extracted text units.
    pub fn parse_units(self, units: Vec<TextUnit>) -> Manuscript {
        let unit_count = units.len();
        let raw = Classifier::new(self.classifier).classify(units);
        let structure = self.clean_mode.apply(&raw);
        info!(
            "{} sections, {} chapters, {} paragraphs",
            structure.section_count(),
            structure.chapter_count(),
            structure.paragraph_count()
        );
        Manuscript {
            format: None,
            unit_count,
            title_hint: None,
            author_hint: None,
            raw,
            structure,
            render_options: self.render_options,
        }
    }
}

/// A classified manuscript ready for rendering.
#[derive(Debug, Clone)]
pub struct Manuscript {
    format: Option<FormatType>,
    unit_count: usize,
    title_hint: Option<String>,
    author_hint: Option<String>,
    raw: BookStructure,
    structure: BookStructure,
    render_options: RenderOptions,
}

impl Manuscript {
    /// Returns the structure that will be rendered (cleaned if enabled).
    pub fn structure(&self) -> &BookStructure {
        &self.structure
    }

    /// Returns the structure as classified, before cleaning.
    pub fn raw_structure(&self) -> &BookStructure {
        &self.raw
    }

    /// Returns the input format, if read from a file or bytes.
    pub fn format(&self) -> Option<FormatType> {
        self.format
    }

    /// Returns the number of text units read from the input.
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    /// Returns the title recorded in the input document, if any.
    pub fn title_hint(&self) -> Option<&str> {
        self.title_hint.as_deref()
    }

    /// Returns the author recorded in the input document, if any.
    pub fn author_hint(&self) -> Option<&str> {
        self.author_hint.as_deref()
    }

    /// Fills a blank title or author from the input document's properties.
    pub fn complete_metadata(&self, mut metadata: BookMetadata) -> BookMetadata {
        if metadata.title.trim().is_empty() {
            if let Some(title) = &self.title_hint {
                metadata.title = title.clone();
            }
        }
        if metadata.author.trim().is_empty() {
            if let Some(author) = &self.author_hint {
                metadata.author = author.clone();
            }
        }
        metadata
    }

    /// Returns the rendering options.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Renders the book to DOCX bytes.
    pub fn to_docx(&self, metadata: &BookMetadata) -> Result<Vec<u8>> {
        render::render_docx(&self.structure, metadata, &self.render_options)
    }

    /// Renders the book to PDF bytes.
    #[cfg(feature = "pdf")]
    pub fn to_pdf(&self, metadata: &BookMetadata) -> Result<Vec<u8>> {
        render::render_pdf(&self.structure, metadata, &self.render_options)
    }

    /// Renders the book to a DOCX file.
    pub fn write_docx(&self, metadata: &BookMetadata, path: impl AsRef<Path>) -> Result<()> {
        render::write_docx(&self.structure, metadata, path, &self.render_options)
    }

    /// Renders the book to a PDF file.
    #[cfg(feature = "pdf")]
    pub fn write_pdf(&self, metadata: &BookMetadata, path: impl AsRef<Path>) -> Result<()> {
        render::write_pdf(&self.structure, metadata, path, &self.render_options)
    }
}
