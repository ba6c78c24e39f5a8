//! Native PDF book renderer.
//!
//! Lays out the book with the standard Helvetica fonts and writes it with
//! lopdf. Layout runs in three passes: the table of contents is laid out
//! once with placeholder numbers to learn how many pages it takes, then
//! the body is laid out to learn where every heading lands, then the
//! contents are laid out again with the real page numbers.

use super::fonts::{encode, wrap, Font};
use super::front_matter::{self, COPYRIGHT_CAPTION, TOC_CAPTION};
use super::RenderOptions;
use crate::error::Result;
use crate::model::{BookMetadata, BookStructure, HeadingLevel};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};
use std::io::Write;

/// Page number baseline, 1 cm above the bottom edge.
const FOOTER_Y: f32 = 28.35;
const FOOTER_SIZE: f32 = 9.0;

/// Width reserved for page numbers in the table of contents.
const TOC_NUMBER_COLUMN: f32 = 36.0;
const TOC_CHAPTER_INDENT: f32 = 16.0;

/// Share of the content height above the title and above the author line.
const TITLE_TOP_SPACE: f32 = 0.38;
const TITLE_BOTTOM_SPACE: f32 = 0.28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Justify,
}

/// Formatting of one kind of paragraph.
#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font: Font,
    size: f32,
    leading: f32,
    align: Align,
    indent: f32,
    space_before: f32,
    space_after: f32,
}

impl TextStyle {
    fn new(font: Font, size: f32, leading: f32, align: Align) -> Self {
        Self {
            font,
            size,
            leading,
            align,
            indent: 0.0,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    fn spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    fn indented(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }
}

/// One positioned run of encoded text.
#[derive(Debug, Clone)]
struct TextOp {
    font: Font,
    size: f32,
    x: f32,
    y: f32,
    word_spacing: f32,
    text: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
struct Page {
    ops: Vec<TextOp>,
}

/// Top-to-bottom text flow over fixed-size pages.
struct Flow<'a> {
    options: &'a RenderOptions,
    pages: Vec<Page>,
    cursor: f32,
}

impl<'a> Flow<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        let mut flow = Self {
            options,
            pages: vec![Page::default()],
            cursor: 0.0,
        };
        flow.cursor = flow.top();
        flow
    }

    fn top(&self) -> f32 {
        self.options.page_size.height_pt() - self.options.margin_pt()
    }

    fn bottom(&self) -> f32 {
        self.options.margin_pt()
    }

    fn left(&self) -> f32 {
        self.options.margin_pt()
    }

    fn width(&self) -> f32 {
        self.options.page_size.width_pt() - 2.0 * self.options.margin_pt()
    }

    fn content_height(&self) -> f32 {
        self.top() - self.bottom()
    }

    /// Zero-based index of the current page.
    fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= self.top() - 0.01
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.top();
    }

    /// Starts a new page unless `needed` points still fit.
    fn ensure_space(&mut self, needed: f32) {
        if !self.at_page_top() && self.cursor - needed < self.bottom() {
            self.new_page();
        }
    }

    fn skip(&mut self, amount: f32) {
        self.cursor = (self.cursor - amount).max(self.bottom());
    }

    fn push(&mut self, op: TextOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Advances one line, breaking the page if needed, and returns the baseline.
    fn advance(&mut self, leading: f32, size: f32) -> f32 {
        if self.cursor - leading < self.bottom() {
            self.new_page();
        }
        self.cursor -= leading;
        self.cursor + (leading - size) / 2.0 + size * 0.2
    }

    /// Lays out a wrapped paragraph; '\n' forces a line break.
    fn paragraph(&mut self, text: &str, style: TextStyle) {
        if !self.at_page_top() {
            self.skip(style.space_before);
        }

        let width = self.width() - style.indent;
        for segment in text.split('\n') {
            let lines = wrap(style.font, style.size, &encode(segment), width);
            let count = lines.len();
            for (i, line) in lines.into_iter().enumerate() {
                let justify = style.align == Align::Justify && i + 1 < count;
                self.line(line, style, justify);
            }
        }

        self.skip(style.space_after);
    }

    fn line(&mut self, text: Vec<u8>, style: TextStyle, justify: bool) {
        let y = self.advance(style.leading, style.size);
        let line_width = style.font.text_width(&text, style.size);
        let available = self.width() - style.indent;

        let x = match style.align {
            Align::Center => self.left() + (self.width() - line_width) / 2.0,
            Align::Left | Align::Justify => self.left() + style.indent,
        };

        let spaces = text.iter().filter(|b| **b == b' ').count();
        let word_spacing = if justify && spaces > 0 {
            ((available - line_width) / spaces as f32).max(0.0)
        } else {
            0.0
        };

        self.push(TextOp {
            font: style.font,
            size: style.size,
            x,
            y,
            word_spacing,
            text,
        });
    }

    /// Lays out a contents entry with dot leaders and a right-aligned number.
    fn toc_entry(&mut self, text: &str, page_number: usize, style: TextStyle) {
        if !self.at_page_top() {
            self.skip(style.space_before);
        }

        let width = self.width() - style.indent - TOC_NUMBER_COLUMN;
        let mut lines = wrap(style.font, style.size, &encode(text), width);
        let last = lines.pop().unwrap_or_default();
        for line in lines {
            self.line(line, style, false);
        }

        let y = self.advance(style.leading, style.size);
        let x = self.left() + style.indent;
        let text_width = style.font.text_width(&last, style.size);

        let number = page_number.to_string().into_bytes();
        let number_width = style.font.text_width(&number, style.size);
        let right = self.left() + self.width();

        let dot_width = style.font.text_width(b".", style.size);
        let dots_start = x + text_width + dot_width;
        let dots_end = right - number_width - dot_width;
        let dots = ((dots_end - dots_start) / dot_width).floor().max(0.0) as usize;

        self.push(TextOp {
            font: style.font,
            size: style.size,
            x,
            y,
            word_spacing: 0.0,
            text: last,
        });
        if dots > 0 {
            self.push(TextOp {
                font: Font::Regular,
                size: style.size,
                x: dots_start,
                y,
                word_spacing: 0.0,
                text: vec![b'.'; dots],
            });
        }
        self.push(TextOp {
            font: style.font,
            size: style.size,
            x: right - number_width,
            y,
            word_spacing: 0.0,
            text: number,
        });

        self.skip(style.space_after);
    }

    /// Returns the laid out pages without trailing empty ones.
    fn finish(mut self) -> Vec<Page> {
        while self.pages.last().is_some_and(|p| p.ops.is_empty()) {
            self.pages.pop();
        }
        self.pages
    }
}

/// Result of laying out a whole book.
struct BookLayout {
    pages: Vec<Page>,
    /// One-based page number of every heading, in heading order.
    heading_pages: Vec<usize>,
}

/// Native PDF book renderer.
pub struct PdfRenderer {
    options: RenderOptions,
}

impl PdfRenderer {
    /// Creates a new renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Renders the book into PDF bytes.
    pub fn render(&self, structure: &BookStructure, metadata: &BookMetadata) -> Result<Vec<u8>> {
        metadata.validate()?;
        let layout = self.layout(structure, metadata);
        debug!(
            "pdf: {} pages, {} headings",
            layout.pages.len(),
            layout.heading_pages.len()
        );
        self.write(layout.pages, metadata)
    }

    fn body_style(&self) -> TextStyle {
        let opts = &self.options;
        TextStyle::new(Font::Regular, opts.body_size, opts.body_leading, Align::Left)
    }

    fn heading_style(&self, level: HeadingLevel) -> TextStyle {
        let opts = &self.options;
        match level {
            HeadingLevel::Section => {
                TextStyle::new(Font::Bold, opts.section_size, opts.section_size + 4.0, Align::Left)
                    .spacing(12.0, 8.0)
            }
            HeadingLevel::Chapter => {
                TextStyle::new(Font::Bold, opts.chapter_size, opts.chapter_size + 4.0, Align::Left)
                    .spacing(10.0, 6.0)
            }
        }
    }

    fn toc_style(&self, level: HeadingLevel) -> TextStyle {
        let opts = &self.options;
        match level {
            HeadingLevel::Section => {
                TextStyle::new(Font::Bold, opts.body_size, opts.body_size + 4.0, Align::Left)
                    .spacing(4.0, 2.0)
            }
            HeadingLevel::Chapter => TextStyle::new(
                Font::Regular,
                opts.body_size - 1.0,
                opts.body_size + 3.0,
                Align::Left,
            )
            .indented(TOC_CHAPTER_INDENT)
            .spacing(0.0, 2.0),
        }
    }

    fn layout(&self, structure: &BookStructure, metadata: &BookMetadata) -> BookLayout {
        let front = self.layout_front_matter(metadata);

        let placeholders = vec![0; structure.headings.len()];
        let toc_pages = self.layout_contents(structure, &placeholders).len();

        let first_body_page = front.len() + toc_pages + 1;
        let (body, heading_pages) = self.layout_body(structure, first_body_page);
        let contents = self.layout_contents(structure, &heading_pages);

        let mut pages = front;
        pages.extend(contents);
        pages.extend(body);

        BookLayout {
            pages,
            heading_pages,
        }
    }

    /// Title page and copyright page.
    fn layout_front_matter(&self, metadata: &BookMetadata) -> Vec<Page> {
        let opts = &self.options;
        let mut flow = Flow::new(opts);

        let height = flow.content_height();
        flow.skip(height * TITLE_TOP_SPACE);
        flow.paragraph(
            metadata.title.trim(),
            TextStyle::new(Font::Bold, opts.title_size, opts.title_size + 4.0, Align::Center),
        );
        if let Some(subtitle) = metadata.subtitle() {
            flow.paragraph(
                subtitle,
                TextStyle::new(
                    Font::Regular,
                    opts.subtitle_size,
                    opts.subtitle_size + 4.0,
                    Align::Center,
                )
                .spacing(6.0, 0.0),
            );
        }
        flow.skip(height * TITLE_BOTTOM_SPACE);
        flow.paragraph(
            metadata.author.trim(),
            TextStyle::new(Font::Regular, opts.author_size, opts.author_size + 4.0, Align::Center),
        );

        flow.new_page();
        let year = front_matter::copyright_year(opts);
        flow.paragraph(
            COPYRIGHT_CAPTION,
            TextStyle::new(Font::Bold, opts.body_size, opts.body_leading, Align::Left)
                .spacing(0.0, 8.0),
        );
        for line in front_matter::copyright_lines(metadata, year) {
            flow.paragraph(&line, self.body_style().spacing(0.0, 6.0));
        }

        flow.finish()
    }

    /// Table of contents pages for the given heading page numbers.
    fn layout_contents(&self, structure: &BookStructure, page_numbers: &[usize]) -> Vec<Page> {
        let opts = &self.options;
        let mut flow = Flow::new(opts);

        flow.paragraph(
            TOC_CAPTION,
            TextStyle::new(
                Font::Bold,
                opts.toc_caption_size,
                opts.toc_caption_size + 4.0,
                Align::Center,
            )
            .spacing(0.0, 12.0),
        );
        for (heading, page_number) in structure.headings.iter().zip(page_numbers) {
            flow.toc_entry(&heading.text, *page_number, self.toc_style(heading.level));
        }

        flow.finish()
    }

    /// Body pages and the page number of every heading.
    fn layout_body(&self, structure: &BookStructure, first_page: usize) -> (Vec<Page>, Vec<usize>) {
        if structure.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let mut flow = Flow::new(&self.options);
        let body = self.body_style().spacing(0.0, 6.0);
        let body = TextStyle {
            align: Align::Justify,
            ..body
        };
        let mut heading_pages = Vec::with_capacity(structure.headings.len());
        let mut previous = None;

        for (heading, block) in structure.entries() {
            if previous.is_some_and(|level| super::breaks_page(level, heading.level)) {
                flow.new_page();
            }
            previous = Some(heading.level);
            let style = self.heading_style(heading.level);
            // keep the heading with the first lines of its text
            flow.ensure_space(style.space_before + style.leading + 2.0 * body.leading);
            heading_pages.push(first_page + flow.page_index());
            flow.paragraph(&heading.text, style);

            if let Some(block) = block {
                for paragraph in &block.paragraphs {
                    flow.paragraph(paragraph, body);
                }
            }
        }

        (flow.finish(), heading_pages)
    }

    /// Serializes laid out pages with page numbers into a PDF file.
    fn write(&self, mut pages: Vec<Page>, metadata: &BookMetadata) -> Result<Vec<u8>> {
        let width = self.options.page_size.width_pt();
        let height = self.options.page_size.height_pt();

        for (i, page) in pages.iter_mut().enumerate() {
            let number = (i + 1).to_string().into_bytes();
            let number_width = Font::Regular.text_width(&number, FOOTER_SIZE);
            page.ops.push(TextOp {
                font: Font::Regular,
                size: FOOTER_SIZE,
                x: (width - number_width) / 2.0,
                y: FOOTER_Y,
                word_spacing: 0.0,
                text: number,
            });
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in [Font::Regular, Font::Bold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource(), font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page in &pages {
            let content = Content {
                operations: page_operations(page),
            };
            let content_id = doc.add_object(self.content_stream(content.encode()?)?);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });

        let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let mut info = dictionary! {
            "Title" => text_string(metadata.title.trim()),
            "Author" => text_string(metadata.author.trim()),
            "Creator" => text_string(concat!("folio ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(created),
        };
        if let Some(subtitle) = metadata.subtitle() {
            info.set("Subject", text_string(subtitle));
        }
        let info_id = doc.add_object(info);

        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    fn content_stream(&self, data: Vec<u8>) -> Result<Stream> {
        if !self.options.compress_pdf {
            return Ok(Stream::new(dictionary! {}, data));
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data)?;
        let compressed = encoder.finish()?;
        Ok(Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed))
    }
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(page.ops.len() * 6);
    for op in &page.ops {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![op.font.resource().into(), op.size.into()],
        ));
        operations.push(Operation::new("Tw", vec![op.word_spacing.into()]));
        operations.push(Operation::new("Td", vec![op.x.into(), op.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(op.text.clone(), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// PDF text string: literal for ASCII, UTF-16BE with a byte order mark otherwise.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
