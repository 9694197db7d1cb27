//! Batch processing of a directory of PDFs.
//!
//! A fixed-size worker pool drains a queue of document paths. Every document
//! is processed independently: a failure (or panic) is recorded in that
//! document's [`DocumentReport`] and never stops its siblings.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;

use crate::classify::OutlineClassifier;
use crate::config::OutlineConfig;
use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::DocumentOutline;
use crate::normalize::BlockNormalizer;
use crate::ocr::OcrEngine;
use crate::parser::PdfSource;
use crate::render::{write_json, JsonFormat};

/// List the PDFs directly inside `dir`, sorted by path.
pub fn discover_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut documents: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();
    documents.sort();
    Ok(documents)
}

/// Output file for a document: `<output_dir>/<stem>.json`.
pub fn output_path_for(document: &Path, output_dir: &Path) -> PathBuf {
    let mut name = document.file_stem().unwrap_or_default().to_os_string();
    name.push(".json");
    output_dir.join(name)
}

/// Outcome of one document.
#[derive(Debug)]
pub struct DocumentReport {
    /// Input document
    pub path: PathBuf,
    /// Output artifact (only written on success)
    pub output: PathBuf,
    /// Wall time spent on this document
    pub elapsed: Duration,
    /// Number of outline entries written, or the failure
    pub result: Result<usize>,
}

impl DocumentReport {
    /// Whether the document produced an output file.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Document identifier used in logs (the file name).
    pub fn document_id(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Totals for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Summarize a set of reports.
    pub fn from_reports(reports: &[DocumentReport], elapsed: Duration) -> Self {
        let succeeded = reports.iter().filter(|r| r.is_success()).count();
        Self {
            total: reports.len(),
            succeeded,
            failed: reports.len() - succeeded,
            elapsed,
        }
    }
}

/// Runs the outline pipeline over many documents.
pub struct BatchRunner {
    config: OutlineConfig,
    ocr: Option<Arc<dyn OcrEngine>>,
    classifier: OutlineClassifier,
    format: JsonFormat,
}

impl BatchRunner {
    /// Create a runner. The configuration is validated here, before any work.
    pub fn new(config: OutlineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ocr: None,
            classifier: OutlineClassifier::new(),
            format: JsonFormat::Pretty,
        })
    }

    /// Run OCR on page images with this engine.
    pub fn with_ocr(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self
    }

    /// Use a custom classifier.
    pub fn with_classifier(mut self, classifier: OutlineClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the JSON layout of output files.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// The configuration in effect.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Discover and process every PDF in the configured input directory.
    pub fn run_dir<F>(&self, on_report: F) -> Result<Vec<DocumentReport>>
    where
        F: FnMut(&DocumentReport),
    {
        let documents = discover_documents(&self.config.input_dir)?;
        self.run(&documents, on_report)
    }

    /// Process `documents` on the worker pool.
    ///
    /// `on_report` is called on the calling thread as each document finishes,
    /// in completion order. The returned reports are in input order.
    pub fn run<F>(&self, documents: &[PathBuf], mut on_report: F) -> Result<Vec<DocumentReport>>
    where
        F: FnMut(&DocumentReport),
    {
        fs::create_dir_all(&self.config.output_dir)?;
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.config.max_workers.min(documents.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pdfoutline-worker-{}", i))
            .build()
            .map_err(|e| Error::Other(format!("failed to start worker pool: {}", e)))?;
        log::info!(
            "Processing {} documents with {} workers",
            documents.len(),
            workers
        );

        let (job_tx, job_rx) = unbounded::<(usize, &Path)>();
        for job in documents.iter().map(PathBuf::as_path).enumerate() {
            // The receiver is alive in this scope, so send cannot fail.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let (report_tx, report_rx) = unbounded::<(usize, DocumentReport)>();
        let mut slots: Vec<Option<DocumentReport>> = documents.iter().map(|_| None).collect();
        let pool = &pool;

        std::thread::scope(|scope| {
            scope.spawn(move || {
                pool.scope(|s| {
                    for _ in 0..workers {
                        let jobs = job_rx.clone();
                        let reports = report_tx.clone();
                        s.spawn(move |_| {
                            for (index, path) in jobs.iter() {
                                if reports.send((index, self.process_isolated(path))).is_err() {
                                    break;
                                }
                            }
                        });
                    }
                });
            });

            for (index, report) in report_rx.iter() {
                on_report(&report);
                slots[index] = Some(report);
            }
        });

        Ok(slots.into_iter().flatten().collect())
    }

    /// Process one document, converting a panic into an error report.
    fn process_isolated(&self, path: &Path) -> DocumentReport {
        let start = Instant::now();
        let output = output_path_for(path, &self.config.output_dir);

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.process_one(path, &output)))
            .unwrap_or_else(|_| Err(Error::Other("document processing panicked".to_string())));

        let report = DocumentReport {
            path: path.to_path_buf(),
            output,
            elapsed: start.elapsed(),
            result,
        };
        match &report.result {
            Ok(entries) => log::info!(
                "Processed {} -> {} ({} headings) in {:.2?}",
                report.document_id(),
                report.output.display(),
                entries,
                report.elapsed
            ),
            Err(e) => log::error!(
                "Failed {} after {:.2?}: {}",
                report.document_id(),
                report.elapsed,
                e
            ),
        }
        report
    }

    fn process_one(&self, path: &Path, output: &Path) -> Result<usize> {
        let outline = process_document_with(
            path,
            &self.config,
            self.ocr.as_deref(),
            &self.classifier,
        )?;
        let file = File::create(output)?;
        write_or_discard(&outline, self.format, BufWriter::new(file), output)?;
        Ok(outline.len())
    }
}

/// Write `outline` to `writer`; on failure remove the partial file at `output`.
fn write_or_discard<W: Write>(
    outline: &DocumentOutline,
    format: JsonFormat,
    writer: W,
    output: &Path,
) -> Result<()> {
    let result = write_json(outline, format, writer);
    if result.is_err() {
        if let Err(e) = fs::remove_file(output) {
            log::warn!("Could not remove partial output {}: {}", output.display(), e);
        }
    }
    result
}

/// Extract, normalize and classify one document.
pub fn process_document(
    path: &Path,
    config: &OutlineConfig,
    ocr: Option<&dyn OcrEngine>,
) -> Result<DocumentOutline> {
    process_document_with(path, config, ocr, &OutlineClassifier::new())
}

fn process_document_with(
    path: &Path,
    config: &OutlineConfig,
    ocr: Option<&dyn OcrEngine>,
    classifier: &OutlineClassifier,
) -> Result<DocumentOutline> {
    let source = PdfSource::open_with_options(path, config.extract_options())?;
    let fragments = source.extract_fragments(ocr)?;
    let blocks = BlockNormalizer::new(config.normalize_options()).normalize(&fragments);
    Ok(classifier.classify(&blocks))
}
