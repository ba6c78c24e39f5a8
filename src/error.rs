//! Error types for folio library.

use std::io;
use thiserror::Error;

/// Result type alias for folio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for folio library.
///
/// The structure classifier and title normalizer never produce errors;
/// every variant here comes from reading a manuscript, rendering a book,
/// or validating options.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not supported (e.g. `.odt`,
    /// or PDF input without the `pdf` feature).
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive parsing error.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// XML parsing error in DOCX parts.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// PDF loading or text extraction error.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Required part of the package is missing.
    #[error("Missing required component: {0}")]
    MissingComponent(String),

    /// Book generation (DOCX, PDF or external conversion) failed.
    #[error("Render failure: {0}")]
    RenderFailure(String),

    /// Page size string is not one of the supported formats.
    #[error("Invalid page size '{0}': use '6x9' or '8.5x11'")]
    InvalidPageSize(String),

    /// Required book metadata (title, author) is missing or blank.
    #[error("Missing book metadata: {0}")]
    MissingMetadata(&'static str),
}

impl Error {
    /// Returns true if the error was raised while reading the source manuscript.
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::ZipArchive(_)
                | Error::XmlParse(_)
                | Error::Pdf(_)
                | Error::InvalidData(_)
                | Error::MissingComponent(_)
        )
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}
