//! DOCX book renderer.
//!
//! Writes a self-contained WordprocessingML package: title page, copyright
//! page, a table of contents field, then the headings and body text. Page
//! numbers come from a PAGE field in the footer.

use super::front_matter::{self, COPYRIGHT_CAPTION, TOC_CAPTION};
use super::RenderOptions;
use crate::error::Result;
use crate::model::{BookMetadata, BookStructure, HeadingLevel};
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/><Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/></Relationships>"#;

const FOOTER_REL_ID: &str = "rId3";

/// Blank paragraphs above the title.
const TITLE_TOP_PADDING: usize = 12;

/// Blank paragraphs between the subtitle and the author line.
const TITLE_BOTTOM_PADDING: usize = 16;

/// Paragraph formatting for one emitted paragraph.
#[derive(Debug, Clone, Copy, Default)]
struct Para<'a> {
    style: Option<&'a str>,
    align: Option<&'a str>,
    size: Option<f32>,
    bold: bool,
}

impl<'a> Para<'a> {
    fn styled(style: &'a str) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }

    fn centered(size: f32, bold: bool) -> Self {
        Self {
            align: Some("center"),
            size: Some(size),
            bold,
            ..Default::default()
        }
    }
}

/// Accumulates `w:body` content.
#[derive(Default)]
struct BodyWriter {
    xml: String,
}

impl BodyWriter {
    fn paragraph(&mut self, text: &str, para: Para) {
        self.xml.push_str("<w:p>");
        self.paragraph_properties(&para);
        self.run(text, &para);
        self.xml.push_str("</w:p>");
    }

    fn blank(&mut self, count: usize) {
        for _ in 0..count {
            self.xml.push_str("<w:p/>");
        }
    }

    fn page_break(&mut self) {
        self.xml
            .push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
    }

    fn paragraph_properties(&mut self, para: &Para) {
        if para.style.is_none() && para.align.is_none() {
            return;
        }
        self.xml.push_str("<w:pPr>");
        if let Some(style) = para.style {
            self.xml
                .push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, style));
        }
        if let Some(align) = para.align {
            self.xml.push_str(&format!(r#"<w:jc w:val="{}"/>"#, align));
        }
        self.xml.push_str("</w:pPr>");
    }

    fn run(&mut self, text: &str, para: &Para) {
        if text.is_empty() {
            return;
        }
        self.xml.push_str("<w:r>");
        if para.bold || para.size.is_some() {
            self.xml.push_str("<w:rPr>");
            if para.bold {
                self.xml.push_str("<w:b/>");
            }
            if let Some(size) = para.size {
                let half_points = half_points(size);
                self.xml.push_str(&format!(
                    r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
                    half_points
                ));
            }
            self.xml.push_str("</w:rPr>");
        }
        self.text(text);
        self.xml.push_str("</w:r>");
    }

    /// Writes run content, turning tabs and newlines into their elements.
    fn text(&mut self, text: &str) {
        let mut first_line = true;
        for line in text.split('\n') {
            if !first_line {
                self.xml.push_str("<w:br/>");
            }
            first_line = false;

            let mut first_cell = true;
            for cell in line.split('\t') {
                if !first_cell {
                    self.xml.push_str("<w:tab/>");
                }
                first_cell = false;
                if !cell.is_empty() {
                    self.xml.push_str(&format!(
                        r#"<w:t xml:space="preserve">{}</w:t>"#,
                        escape_text(cell)
                    ));
                }
            }
        }
    }

    /// Writes the TOC field, pre-filled with the heading list as its result.
    fn toc_field(&mut self, structure: &BookStructure) {
        const BEGIN: &str = r#"<w:r><w:fldChar w:fldCharType="begin" w:dirty="true"/></w:r><w:r><w:instrText xml:space="preserve"> TOC \o "1-2" \h \z \u </w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r>"#;
        const END: &str = r#"<w:r><w:fldChar w:fldCharType="end"/></w:r>"#;

        if structure.headings.is_empty() {
            self.xml.push_str("<w:p>");
            self.xml.push_str(BEGIN);
            self.xml.push_str(END);
            self.xml.push_str("</w:p>");
            return;
        }

        let last = structure.headings.len() - 1;
        for (i, heading) in structure.headings.iter().enumerate() {
            let para = Para::styled(toc_style(heading.level));
            self.xml.push_str("<w:p>");
            self.paragraph_properties(&para);
            if i == 0 {
                self.xml.push_str(BEGIN);
            }
            self.run(&heading.text, &para);
            if i == last {
                self.xml.push_str(END);
            }
            self.xml.push_str("</w:p>");
        }
    }
}

/// Escapes text content, dropping characters XML 1.0 does not allow.
fn escape_text(text: &str) -> String {
    let legal: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    escape(legal.as_str()).into_owned()
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn half_points(size: f32) -> u32 {
    (size * 2.0).round() as u32
}

fn heading_style(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::Section => "Heading1",
        HeadingLevel::Chapter => "Heading2",
    }
}

fn toc_style(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::Section => "TOC1",
        HeadingLevel::Chapter => "TOC2",
    }
}

/// DOCX book renderer.
pub struct DocxRenderer {
    options: RenderOptions,
}

impl DocxRenderer {
    /// Creates a new renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Renders the book into DOCX bytes.
    pub fn render(&self, structure: &BookStructure, metadata: &BookMetadata) -> Result<Vec<u8>> {
        metadata.validate()?;

        let parts: [(&str, String); 7] = [
            ("[Content_Types].xml", with_decl(CONTENT_TYPES)),
            ("_rels/.rels", with_decl(PACKAGE_RELS)),
            ("word/_rels/document.xml.rels", with_decl(DOCUMENT_RELS)),
            ("word/document.xml", self.document_xml(structure, metadata)),
            ("word/styles.xml", self.styles_xml()),
            ("word/settings.xml", settings_xml()),
            ("word/footer1.xml", footer_xml()),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        for (path, content) in &parts {
            zip.start_file(*path, options)?;
            zip.write_all(content.as_bytes())?;
        }
        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(core_xml(metadata).as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }

    /// Builds `word/document.xml`.
    fn document_xml(&self, structure: &BookStructure, metadata: &BookMetadata) -> String {
        let opts = &self.options;
        let mut body = BodyWriter::default();

        // Title page
        body.blank(TITLE_TOP_PADDING);
        body.paragraph(metadata.title.trim(), Para::centered(opts.title_size, true));
        if let Some(subtitle) = metadata.subtitle() {
            body.paragraph(subtitle, Para::centered(opts.subtitle_size, false));
        }
        body.blank(TITLE_BOTTOM_PADDING);
        body.paragraph(metadata.author.trim(), Para::centered(opts.author_size, false));
        body.page_break();

        // Copyright page
        let year = front_matter::copyright_year(opts);
        body.paragraph(
            COPYRIGHT_CAPTION,
            Para {
                size: Some(opts.body_size),
                bold: true,
                ..Default::default()
            },
        );
        for line in front_matter::copyright_lines(metadata, year) {
            body.paragraph(&line, Para::default());
        }
        body.page_break();

        // Contents
        body.paragraph(TOC_CAPTION, Para::centered(opts.toc_caption_size, true));
        body.toc_field(structure);
        body.page_break();

        // Headings and blocks
        let mut previous = None;
        for (heading, block) in structure.entries() {
            if previous.is_some_and(|level| super::breaks_page(level, heading.level)) {
                body.page_break();
            }
            previous = Some(heading.level);
            body.paragraph(&heading.text, Para::styled(heading_style(heading.level)));
            if let Some(block) = block {
                for paragraph in &block.paragraphs {
                    body.paragraph(
                        paragraph,
                        Para {
                            align: Some("both"),
                            ..Default::default()
                        },
                    );
                }
            }
        }

        let margin = opts.margin_twips();
        format!(
            r#"{decl}<w:document xmlns:w="{w}" xmlns:r="{r}"><w:body>{body}<w:sectPr><w:footerReference w:type="default" r:id="{footer}"/><w:pgSz w:w="{pw}" w:h="{ph}"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
            decl = XML_DECL,
            w = NS_W,
            r = NS_R,
            body = body.xml,
            footer = FOOTER_REL_ID,
            pw = opts.page_size.width_twips(),
            ph = opts.page_size.height_twips(),
            m = margin,
        )
    }

    /// Builds `word/styles.xml`.
    fn styles_xml(&self) -> String {
        let opts = &self.options;
        let font = escape(opts.docx_font.as_str());
        let heading = |level: HeadingLevel, size: f32| {
            format!(
                r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr><w:b/><w:bCs/><w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/></w:rPr></w:style>"#,
                id = heading_style(level),
                name = format!("heading {}", level.number()),
                outline = level.number() - 1,
                sz = half_points(size),
            )
        };
        let toc = |id: &str, name: &str, indent: u32| {
            format!(
                r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="39"/><w:pPr><w:spacing w:after="100"/><w:ind w:left="{indent}"/></w:pPr></w:style>"#,
                id = id,
                name = name,
                indent = indent,
            )
        };

        format!(
            r#"{decl}<w:styles xmlns:w="{w}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/><w:sz w:val="{body}"/><w:szCs w:val="{body}"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>{h1}{h2}<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:b/><w:sz w:val="{title}"/><w:szCs w:val="{title}"/></w:rPr></w:style>{toc1}{toc2}<w:style w:type="paragraph" w:styleId="Footer"><w:name w:val="footer"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/></w:pPr></w:style></w:styles>"#,
            decl = XML_DECL,
            w = NS_W,
            font = font,
            body = half_points(opts.body_size),
            title = half_points(opts.title_size),
            h1 = heading(HeadingLevel::Section, opts.section_size),
            h2 = heading(HeadingLevel::Chapter, opts.chapter_size),
            toc1 = toc("TOC1", "toc 1", 0),
            toc2 = toc("TOC2", "toc 2", 240),
        )
    }
}

fn with_decl(xml: &str) -> String {
    format!("{}{}", XML_DECL, xml)
}

fn settings_xml() -> String {
    format!(
        r#"{}<w:settings xmlns:w="{}"><w:updateFields w:val="true"/><w:defaultTabStop w:val="720"/><w:characterSpacingControl w:val="doNotCompress"/></w:settings>"#,
        XML_DECL, NS_W
    )
}

fn footer_xml() -> String {
    format!(
        r#"{}<w:ftr xmlns:w="{}" xmlns:r="{}"><w:p><w:pPr><w:pStyle w:val="Footer"/><w:jc w:val="center"/></w:pPr><w:fldSimple w:instr=" PAGE "><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p></w:ftr>"#,
        XML_DECL, NS_W, NS_R
    )
}

fn core_xml(metadata: &BookMetadata) -> String {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let subject = metadata
        .subtitle()
        .map(|s| format!("<dc:subject>{}</dc:subject>", escape_text(s)))
        .unwrap_or_default();
    format!(
        r#"{decl}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title>{subject}<dc:creator>{creator}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified></cp:coreProperties>"#,
        decl = XML_DECL,
        title = escape_text(metadata.title.trim()),
        subject = subject,
        creator = escape_text(metadata.author.trim()),
        now = now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, HeadingEntry};
    use crate::render::PageSize;
    use std::io::Read;
    use zip::ZipArchive;

    fn sample() -> BookStructure {
        BookStructure {
            headings: vec![
                HeadingEntry::section("SECTION I — START"),
                HeadingEntry::chapter("CHAPTER 1 — Tom & Jerry"),
                HeadingEntry::section("SECTION II — END"),
            ],
            blocks: vec![
                ContentBlock {
                    level: HeadingLevel::Section,
                    heading_index: 0,
                    paragraphs: vec!["Opening words.".into()],
                },
                ContentBlock {
                    level: HeadingLevel::Chapter,
                    heading_index: 1,
                    paragraphs: vec!["First <chapter> text.".into(), "Second\tline".into()],
                },
            ],
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn render(options: RenderOptions) -> Vec<u8> {
        let meta = BookMetadata::new("My Book", "Jane Roe").with_subtitle("A Study");
        DocxRenderer::new(options.with_copyright_year(2024))
            .render(&sample(), &meta)
            .unwrap()
    }

    #[test]
    fn test_package_parts() {
        let bytes = render(RenderOptions::default());
        let archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/settings.xml",
            "word/footer1.xml",
            "docProps/core.xml",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
    }

    #[test]
    fn test_document_content() {
        let xml = read_part(&render(RenderOptions::default()), "word/document.xml");

        assert!(xml.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
        assert!(xml.contains(r#"w:top="1417""#));
        assert!(xml.contains("My Book"));
        assert!(xml.contains("A Study"));
        assert!(xml.contains("© 2024 Jane Roe - All Rights Reserved."));
        assert!(xml.contains(TOC_CAPTION));
        assert!(xml.contains(r#"TOC \o"#));
        assert!(xml.contains("CHAPTER 1 — Tom &amp; Jerry"));
        assert!(xml.contains("First &lt;chapter&gt; text."));
        assert!(xml.contains("Second</w:t><w:tab/>"));
        assert!(xml.contains(r#"<w:pStyle w:val="Heading2"/>"#));
        assert!(xml.contains(r#"<w:jc w:val="both"/>"#));
    }

    #[test]
    fn test_control_characters_dropped() {
        let structure = BookStructure {
            headings: vec![HeadingEntry::section("Form\u{c}feed")],
            blocks: vec![ContentBlock {
                level: HeadingLevel::Section,
                heading_index: 0,
                paragraphs: vec!["page\u{c}one\u{1} \u{b}two\tthree".into()],
            }],
        };
        let meta = BookMetadata::new("Bell\u{7}", "Jane Roe");
        let bytes = DocxRenderer::new(RenderOptions::default())
            .render(&structure, &meta)
            .unwrap();

        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains("Formfeed"));
        assert!(xml.contains("pageone two</w:t><w:tab/>"));
        assert!(!xml.contains(|c: char| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));

        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Bell</dc:title>"));
    }

    #[test]
    fn test_section_page_breaks() {
        let xml = read_part(&render(RenderOptions::default()), "word/document.xml");
        let page_breaks = xml.matches(r#"<w:br w:type="page"/>"#).count();
        // title, copyright, contents, after the first section, before the second
        assert_eq!(page_breaks, 5);
    }

    #[test]
    fn test_trade_size_and_styles() {
        let bytes = render(RenderOptions::new().with_page_size(PageSize::Trade6x9));
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains(r#"<w:pgSz w:w="8640" w:h="12960"/>"#));

        let styles = read_part(&bytes, "word/styles.xml");
        assert!(styles.contains(r#"w:ascii="Arial""#));
        assert!(styles.contains(r#"<w:outlineLvl w:val="1"/>"#));

        let settings = read_part(&bytes, "word/settings.xml");
        assert!(settings.contains("updateFields"));
        let footer = read_part(&bytes, "word/footer1.xml");
        assert!(footer.contains(r#"w:instr=" PAGE ""#));
    }

    #[test]
    fn test_core_properties() {
        let core = read_part(&render(RenderOptions::default()), "docProps/core.xml");
        assert!(core.contains("<dc:title>My Book</dc:title>"));
        assert!(core.contains("<dc:creator>Jane Roe</dc:creator>"));
        assert!(core.contains("<dc:subject>A Study</dc:subject>"));
    }

    #[test]
    fn test_missing_metadata_rejected() {
        let meta = BookMetadata::new("", "Jane Roe");
        let result = DocxRenderer::new(RenderOptions::default()).render(&sample(), &meta);
        assert!(matches!(result, Err(crate::Error::MissingMetadata("title"))));
    }

    #[test]
    fn test_empty_structure() {
        let meta = BookMetadata::new("Empty", "Nobody");
        let bytes = DocxRenderer::new(RenderOptions::default())
            .render(&BookStructure::new(), &meta)
            .unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains(r#"w:fldCharType="end""#));
    }
}
