//! pdfoutline CLI - title and heading outline extraction for PDF batches

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::discover_documents;
use pdfoutline::config::{resolve_input_dir, resolve_output_dir};
use pdfoutline::render::{self, JsonFormat};
use pdfoutline::{BatchRunner, BatchSummary, OutlineConfig, Outliner, TesseractEngine};

/// Container layout, used when it exists.
const CONTAINER_INPUT: &str = "/app/input";
const CONTAINER_OUTPUT: &str = "/app/output";

/// Local layout, used otherwise.
const LOCAL_INPUT: &str = "sample_dataset/pdfs";
const LOCAL_OUTPUT: &str = "sample_dataset/outputs";

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "pdfoutline contributors")]
#[command(version)]
#[command(about = "Write a JSON title and heading outline for every PDF in a directory", long_about = None)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in the input directory (default)
    Run(RunArgs),

    /// Print the outline of a single PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Dump the normalized text blocks of a single PDF
    Blocks {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct RunArgs {
    /// Input directory [default: /app/input, else sample_dataset/pdfs]
    #[arg(short, long, value_name = "DIR", env = "PDFOUTLINE_INPUT")]
    input: Option<PathBuf>,

    /// Output directory [default: /app/output, else sample_dataset/outputs]
    #[arg(short, long, value_name = "DIR", env = "PDFOUTLINE_OUTPUT")]
    output: Option<PathBuf>,

    /// Documents processed concurrently [default: number of CPUs]
    #[arg(short = 'j', long, value_name = "N", env = "PDFOUTLINE_MAX_WORKERS")]
    workers: Option<usize>,

    #[command(flatten)]
    extract: ExtractArgs,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Args, Clone)]
struct ExtractArgs {
    /// Only the first N pages contribute to the outline
    #[arg(long, value_name = "N", env = "PDFOUTLINE_MAX_PAGES")]
    max_pages: Option<usize>,

    /// OCR at most N images per document
    #[arg(long, value_name = "N", env = "PDFOUTLINE_MAX_IMAGES")]
    max_images: Option<usize>,

    /// Run tesseract on embedded images
    #[arg(long)]
    ocr: bool,

    /// Tesseract language (e.g. "eng", "jpn")
    #[arg(long, value_name = "LANG", requires = "ocr")]
    lang: Option<String>,

    /// Fail a document on the first unreadable page or image
    #[arg(long)]
    strict: bool,
}

impl ExtractArgs {
    /// The OCR engine requested on the command line, if any.
    fn engine(&self) -> Result<Option<TesseractEngine>, Box<dyn std::error::Error>> {
        if !self.ocr {
            return Ok(None);
        }

        let mut engine = TesseractEngine::new();
        if let Some(lang) = &self.lang {
            engine = engine.with_language(lang.as_str());
        }
        if !engine.is_available() {
            return Err("tesseract not found on PATH (required by --ocr)".into());
        }
        Ok(Some(engine))
    }

    fn outliner(&self) -> Result<Outliner, Box<dyn std::error::Error>> {
        let mut outliner = Outliner::new();
        if !self.strict {
            outliner = outliner.lenient();
        }
        if let Some(pages) = self.max_pages {
            outliner = outliner.with_max_pages(pages);
        }
        if let Some(images) = self.max_images {
            outliner = outliner.with_max_images(images);
        }
        if let Some(engine) = self.engine()? {
            outliner = outliner.with_ocr(engine);
        }
        Ok(outliner)
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run(args)) => cmd_run(args),
        Some(Commands::Outline {
            input,
            output,
            extract,
            compact,
        }) => cmd_outline(&input, output.as_deref(), &extract, compact),
        Some(Commands::Blocks {
            input,
            output,
            extract,
            compact,
        }) => cmd_blocks(&input, output.as_deref(), &extract, compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_run(cli.run),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = args.input.clone().unwrap_or_else(|| {
        resolve_input_dir(Path::new(CONTAINER_INPUT), Path::new(LOCAL_INPUT))
    });
    let output_dir = args.output.clone().unwrap_or_else(|| {
        resolve_output_dir(Path::new(CONTAINER_OUTPUT), Path::new(LOCAL_OUTPUT))
    });

    let mut config = OutlineConfig::new(input_dir, output_dir);
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(pages) = args.extract.max_pages {
        config = config.with_max_pages(pages);
    }
    if let Some(images) = args.extract.max_images {
        config = config.with_max_images(images);
    }
    if args.extract.strict {
        config = config.strict();
    }

    let mut runner = BatchRunner::new(config)?.with_format(json_format(args.compact));
    if let Some(engine) = args.extract.engine()? {
        runner = runner.with_ocr(Arc::new(engine));
    }

    let config = runner.config();
    let documents = discover_documents(&config.input_dir)?;
    println!(
        "{} {} PDF files in {}",
        "Found".green().bold(),
        documents.len(),
        config.input_dir.display()
    );
    if documents.is_empty() {
        println!("{}", "Nothing to do.".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let reports = runner.run(&documents, |report| {
        if let Err(e) = &report.result {
            pb.println(format!("{} {}: {}", "✗".red(), report.document_id(), e));
        }
        pb.set_message(report.document_id());
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    let summary = BatchSummary::from_reports(&reports, start.elapsed());
    println!("\n{}", "Summary:".green().bold());
    println!("  {} {} processed", "├─".dimmed(), summary.total);
    println!("  {} {} succeeded", "├─".dimmed(), summary.succeeded);
    if summary.failed > 0 {
        println!(
            "  {} {}",
            "├─".dimmed(),
            format!("{} failed", summary.failed).red()
        );
    }
    println!("  {} {:.2?} elapsed", "└─".dimmed(), summary.elapsed);
    println!(
        "{} {}",
        "Saved to".green(),
        runner.config().output_dir.display()
    );

    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    extract: &ExtractArgs,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let outline = extract.outliner()?.extract(input)?;
    let json = render::to_json(&outline, json_format(compact))?;
    write_or_print(output, &json)
}

fn cmd_blocks(
    input: &Path,
    output: Option<&Path>,
    extract: &ExtractArgs,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let blocks = extract.outliner()?.blocks(input)?;
    let json = render::blocks_to_json(&blocks, json_format(compact))?;
    write_or_print(output, &json)
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Title and heading outline extraction for PDF batches");

    let tesseract = if TesseractEngine::new().is_available() {
        "available".green()
    } else {
        "not found".yellow()
    };
    println!("OCR (tesseract): {}", tesseract);
}
