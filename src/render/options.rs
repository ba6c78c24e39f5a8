//! Layout options for book rendering.

use crate::error::{Error, Result};
use std::str::FromStr;

/// Points per centimetre.
const PT_PER_CM: f32 = 72.0 / 2.54;

/// Supported trim sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// 6 x 9 inch trade paperback
    Trade6x9,
    /// 8.5 x 11 inch US Letter
    #[default]
    Letter,
}

impl PageSize {
    /// Page width in points.
    pub fn width_pt(&self) -> f32 {
        match self {
            PageSize::Trade6x9 => 432.0,
            PageSize::Letter => 612.0,
        }
    }

    /// Page height in points.
    pub fn height_pt(&self) -> f32 {
        match self {
            PageSize::Trade6x9 => 648.0,
            PageSize::Letter => 792.0,
        }
    }

    /// Page width in twentieths of a point.
    pub fn width_twips(&self) -> u32 {
        (self.width_pt() * 20.0) as u32
    }

    /// Page height in twentieths of a point.
    pub fn height_twips(&self) -> u32 {
        (self.height_pt() * 20.0) as u32
    }
}

impl FromStr for PageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "6x9" => Ok(PageSize::Trade6x9),
            "8.5x11" => Ok(PageSize::Letter),
            _ => Err(Error::InvalidPageSize(s.to_string())),
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSize::Trade6x9 => write!(f, "6x9"),
            PageSize::Letter => write!(f, "8.5x11"),
        }
    }
}

/// How the PDF output is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfEngine {
    /// Built-in layout engine
    #[default]
    Native,
    /// Convert the rendered DOCX with an installed office suite,
    /// falling back to the built-in engine on failure
    Office,
}

impl FromStr for PdfEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(PdfEngine::Native),
            "office" => Ok(PdfEngine::Office),
            other => Err(format!("unknown PDF engine '{}'", other)),
        }
    }
}

/// Options for DOCX and PDF book rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Trim size of every page.
    pub page_size: PageSize,

    /// Margin on all four sides, in centimetres.
    pub margin_cm: f32,

    /// Title size on the title page, in points.
    pub title_size: f32,

    /// Subtitle size on the title page, in points.
    pub subtitle_size: f32,

    /// Author line size on the title page, in points.
    pub author_size: f32,

    /// "TABLE OF CONTENTS" caption size, in points.
    pub toc_caption_size: f32,

    /// Section heading size, in points.
    pub section_size: f32,

    /// Chapter heading size, in points.
    pub chapter_size: f32,

    /// Body text size, in points.
    pub body_size: f32,

    /// Body line height, in points.
    pub body_leading: f32,

    /// Font family written into the DOCX styles.
    pub docx_font: String,

    /// PDF production engine.
    pub pdf_engine: PdfEngine,

    /// Whether PDF content streams are deflate-compressed.
    pub compress_pdf: bool,

    /// Year printed in the copyright notice; the current year when unset.
    pub copyright_year: Option<i32>,

    /// Office suite executable used by `PdfEngine::Office`.
    pub office_command: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin_cm: 2.5,
            title_size: 24.0,
            subtitle_size: 12.0,
            author_size: 11.0,
            toc_caption_size: 13.0,
            section_size: 12.0,
            chapter_size: 11.0,
            body_size: 11.0,
            body_leading: 15.0,
            docx_font: "Arial".to_string(),
            pdf_engine: PdfEngine::Native,
            compress_pdf: true,
            copyright_year: None,
            office_command: "soffice".to_string(),
        }
    }
}

impl RenderOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the margin in centimetres.
    pub fn with_margin_cm(mut self, margin_cm: f32) -> Self {
        self.margin_cm = margin_cm;
        self
    }

    /// Sets the body text size and line height.
    pub fn with_body_size(mut self, size: f32, leading: f32) -> Self {
        self.body_size = size;
        self.body_leading = leading;
        self
    }

    /// Sets the DOCX font family.
    pub fn with_docx_font(mut self, font: impl Into<String>) -> Self {
        self.docx_font = font.into();
        self
    }

    /// Sets the PDF engine.
    pub fn with_pdf_engine(mut self, engine: PdfEngine) -> Self {
        self.pdf_engine = engine;
        self
    }

    /// Enables or disables PDF stream compression.
    pub fn with_compression(mut self, enable: bool) -> Self {
        self.compress_pdf = enable;
        self
    }

    /// Fixes the copyright year.
    pub fn with_copyright_year(mut self, year: i32) -> Self {
        self.copyright_year = Some(year);
        self
    }

    /// Sets the office suite executable.
    pub fn with_office_command(mut self, command: impl Into<String>) -> Self {
        self.office_command = command.into();
        self
    }

    /// Margin in points.
    pub fn margin_pt(&self) -> f32 {
        self.margin_cm * PT_PER_CM
    }

    /// Margin in twentieths of a point.
    pub fn margin_twips(&self) -> u32 {
        (self.margin_pt() * 20.0).round() as u32
    }
}
