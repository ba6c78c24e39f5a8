//! folio CLI - manuscript to book layout tool
//!
//! A command-line tool for turning DOCX and PDF manuscripts into styled
//! DOCX and PDF books.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use folio::{
    BookMetadata, ClassifierConfig, CleanMode, EmptyBlockPolicy, FormatType, Folio, Manuscript,
    PageSize, PdfEngine, RenderOptions,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Manuscript to book layout conversion
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Turn DOCX/PDF manuscripts into book layouts",
    long_about = "folio - manuscript to book layout tool.\n\n\
                  Detects the Section/Chapter outline of a manuscript and renders a\n\
                  DOCX and PDF book with title page, copyright page and table of contents.\n\n\
                  Usage:\n  \
                  folio convert <file> --title T --author A   Build the book\n  \
                  folio outline <file>                        Show detected headings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a manuscript into DOCX and PDF books
    Convert {
        /// Input file path ('-' reads stdin)
        input: PathBuf,

        /// Book title (default: title from the document properties)
        #[arg(long)]
        title: Option<String>,

        /// Author or brand (default: author from the document properties)
        #[arg(long)]
        author: Option<String>,

        /// Subtitle shown under the title
        #[arg(long)]
        subtitle: Option<String>,

        /// Rights holder on the copyright page (default: author)
        #[arg(long)]
        publisher: Option<String>,

        /// Page size
        #[arg(long, default_value = "8.5x11")]
        page: PageSize,

        /// DOCX output path (default: <Title>.docx)
        #[arg(long)]
        out_docx: Option<PathBuf>,

        /// PDF output path (default: <Title>.pdf)
        #[arg(long)]
        out_pdf: Option<PathBuf>,

        /// Skip PDF output
        #[arg(long)]
        no_pdf: bool,

        /// Heading clean mode
        #[arg(long, value_enum, default_value = "heuristic")]
        clean: CleanArg,

        /// PDF engine
        #[arg(long, value_enum, default_value = "native")]
        pdf_engine: EngineArg,

        /// Ignore SECTION/CHAPTER keyword markers
        #[arg(long)]
        no_markers: bool,

        /// Drop headings that have no body text
        #[arg(long)]
        drop_empty_blocks: bool,
    },

    /// Print the detected heading outline
    Outline {
        /// Input file path ('-' reads stdin)
        input: PathBuf,

        /// Heading clean mode
        #[arg(long, value_enum, default_value = "heuristic")]
        clean: CleanArg,

        /// Print the full structure as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show manuscript information and statistics
    Info {
        /// Input file path ('-' reads stdin)
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Heading clean mode
#[derive(Clone, Copy, ValueEnum)]
enum CleanArg {
    /// Keep headings as written
    None,
    /// Canonical SECTION/CHAPTER titles
    Heuristic,
}

impl From<CleanArg> for CleanMode {
    fn from(mode: CleanArg) -> Self {
        match mode {
            CleanArg::None => CleanMode::None,
            CleanArg::Heuristic => CleanMode::Heuristic,
        }
    }
}

/// PDF engine
#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    /// Built-in PDF writer
    Native,
    /// LibreOffice conversion of the DOCX
    Office,
}

impl From<EngineArg> for PdfEngine {
    fn from(engine: EngineArg) -> Self {
        match engine {
            EngineArg::Native => PdfEngine::Native,
            EngineArg::Office => PdfEngine::Office,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        if e
            .downcast_ref::<folio::Error>()
            .is_some_and(folio::Error::is_read_failure)
        {
            eprintln!(
                "{} check that the input is a valid DOCX, PDF or UTF-8 text file",
                "hint:".yellow().bold()
            );
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            title,
            author,
            subtitle,
            publisher,
            page,
            out_docx,
            out_pdf,
            no_pdf,
            clean,
            pdf_engine,
            no_markers,
            drop_empty_blocks,
        } => {
            let mut classifier = ClassifierConfig::new().with_markers(!no_markers);
            if drop_empty_blocks {
                classifier = classifier.with_empty_blocks(EmptyBlockPolicy::Drop);
            }
            let options = RenderOptions::new()
                .with_page_size(page)
                .with_pdf_engine(pdf_engine.into());
            let folio = Folio::new()
                .with_classifier(classifier)
                .with_clean_mode(clean.into())
                .with_render_options(options);

            let pb = create_spinner("Reading manuscript...");
            let manuscript = load(folio, &input)?;

            let mut metadata = manuscript.complete_metadata(BookMetadata::new(
                title.unwrap_or_default(),
                author.unwrap_or_default(),
            ));
            if let Some(subtitle) = subtitle {
                metadata = metadata.with_subtitle(subtitle);
            }
            if let Some(publisher) = publisher {
                metadata = metadata.with_publisher(publisher);
            }
            if let Err(e) = metadata.validate() {
                pb.finish_and_clear();
                return Err(e.into());
            }

            let stem = metadata.file_stem();
            let docx_path = out_docx.unwrap_or_else(|| PathBuf::from(format!("{}.docx", stem)));
            pb.set_message("Rendering DOCX...");
            manuscript.write_docx(&metadata, &docx_path)?;

            let pdf_path = if no_pdf {
                None
            } else {
                let path = out_pdf.unwrap_or_else(|| PathBuf::from(format!("{}.pdf", stem)));
                pb.set_message("Rendering PDF...");
                manuscript.write_pdf(&metadata, &path)?;
                Some(path)
            };

            pb.finish_and_clear();

            println!("{}", "Conversion Complete".green().bold());
            println!("{}", "─".repeat(40));
            println!("  {} {}", "✓".green(), docx_path.display());
            if let Some(path) = pdf_path {
                println!("  {} {}", "✓".green(), path.display());
            }
            print_statistics(&manuscript);
        }

        Commands::Outline { input, clean, json } => {
            let pb = create_spinner("Reading manuscript...");
            let manuscript = load(Folio::new().with_clean_mode(clean.into()), &input)?;
            pb.finish_and_clear();

            let structure = manuscript.structure();
            if json {
                println!("{}", serde_json::to_string_pretty(structure)?);
            } else if structure.is_empty() {
                println!("{} No headings found", "!".yellow().bold());
            } else {
                for (heading, block) in structure.entries() {
                    let paragraphs = block.map(|b| b.paragraphs.len()).unwrap_or(0);
                    match heading.level {
                        folio::HeadingLevel::Section => {
                            println!("{} {}", heading.text.bold(), dimmed_count(paragraphs))
                        }
                        folio::HeadingLevel::Chapter => {
                            println!("  {} {}", heading.text, dimmed_count(paragraphs))
                        }
                    }
                }
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing manuscript...");
            let manuscript = load(Folio::new(), &input)?;
            pb.finish_and_clear();

            println!("{}", "Manuscript Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "File".bold(), input.display());
            if let Some(format) = manuscript.format() {
                println!("{}: {}", "Format".bold(), format);
                let detection = if format.has_style_hints() {
                    "paragraph styles, then text patterns"
                } else {
                    "text patterns only"
                };
                println!("{}: {}", "Heading detection".bold(), detection);
            }
            if let Some(title) = manuscript.title_hint() {
                println!("{}: {}", "Title".bold(), title);
            }
            if let Some(author) = manuscript.author_hint() {
                println!("{}: {}", "Author".bold(), author);
            }
            println!("{}: {}", "Text units".bold(), manuscript.unit_count());
            print_statistics(&manuscript);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Parses a manuscript path, staging stdin into a temporary file for `-`.
fn load(folio: Folio, input: &Path) -> Result<Manuscript, Box<dyn std::error::Error>> {
    if input != Path::new("-") {
        return Ok(folio.parse(input)?);
    }

    let mut data = Vec::new();
    io::stdin().lock().read_to_end(&mut data)?;
    let format = folio::detect_format_from_bytes(&data)?;

    let dir = tempfile::tempdir()?;
    let staged = dir.path().join(format!("stdin.{}", extension(format)));
    fs::write(&staged, &data)?;
    Ok(folio.parse(&staged)?)
}

fn extension(format: FormatType) -> &'static str {
    match format {
        FormatType::Docx => "docx",
        FormatType::Pdf => "pdf",
        FormatType::Text => "txt",
    }
}

fn dimmed_count(paragraphs: usize) -> ColoredString {
    format!("({} paragraphs)", paragraphs).dimmed()
}

fn print_statistics(manuscript: &Manuscript) {
    let structure = manuscript.structure();
    println!("\n{}", "Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Headings".bold(), structure.headings.len());
    println!("{}: {}", "Sections".bold(), structure.section_count());
    println!("{}: {}", "Chapters".bold(), structure.chapter_count());
    println!("{}: {}", "Paragraphs".bold(), structure.paragraph_count());
    println!("{}: {}", "Words".bold(), structure.word_count());
}

fn print_version() {
    println!("{} {}", "folio".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Manuscript to book layout conversion");
    println!();
    println!("Input formats: DOCX, PDF, plain text");
    println!("Output formats: DOCX, PDF (6x9 in, 8.5x11 in)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_flags() {
        let cli = Cli::try_parse_from([
            "folio",
            "-vv",
            "convert",
            "book.docx",
            "--title",
            "My Book",
            "--page",
            "6x9",
            "--no-pdf",
            "--clean",
            "none",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Convert {
                input,
                title,
                author,
                page,
                no_pdf,
                clean,
                ..
            } => {
                assert_eq!(input, PathBuf::from("book.docx"));
                assert_eq!(title.as_deref(), Some("My Book"));
                assert!(author.is_none());
                assert_eq!(page, PageSize::Trade6x9);
                assert!(no_pdf);
                assert!(matches!(CleanMode::from(clean), CleanMode::None));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_convert_defaults() {
        let cli = Cli::try_parse_from(["folio", "convert", "-"]).unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Convert {
                input,
                page,
                no_pdf,
                clean,
                pdf_engine,
                ..
            } => {
                assert_eq!(input, PathBuf::from("-"));
                assert_eq!(page, PageSize::Letter);
                assert!(!no_pdf);
                assert!(matches!(CleanMode::from(clean), CleanMode::Heuristic));
                assert_eq!(PdfEngine::from(pdf_engine), PdfEngine::Native);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let result = Cli::try_parse_from(["folio", "convert", "book.docx", "--page", "a4"]);
        assert!(result.is_err());
    }
}
