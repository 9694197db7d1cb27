//! # pdfoutline
//!
//! Infers a PDF's title and heading outline from font statistics, without
//! relying on tagged structure or bookmarks.
//!
//! Text comes from two sources: the native text layer (font size, font name
//! and position known) and OCR of embedded images (only position and glyph
//! height known). Both are normalized into [`TextBlock`]s, then the
//! [`OutlineClassifier`] picks the body font size, ranks larger and rarer
//! sizes into `H1`..`H6` tiers, and chooses a bold title.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Batch processing
//!
//! ```no_run
//! use pdfoutline::{BatchRunner, OutlineConfig};
//!
//! let config = OutlineConfig::new("input", "output").with_workers(4);
//! let reports = BatchRunner::new(config)?.run_dir(|_| {})?;
//! println!("{} documents", reports.len());
//! # Ok::<(), pdfoutline::Error>(())
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod normalize;
pub mod ocr;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{process_document, BatchRunner, BatchSummary, DocumentReport};
pub use classify::{ClassifierLimits, FontStatistics, OutlineClassifier};
pub use config::OutlineConfig;
pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentOutline, HeadingLevel, OcrData, OcrWord, OutlineEntry, PageFragments,
    TextBlock, VectorSpan, UNTITLED_DOCUMENT,
};
pub use normalize::{BlockNormalizer, NormalizeOptions};
pub use ocr::{OcrEngine, TesseractEngine};
pub use parser::{ErrorMode, ExtractOptions, PdfSource};
pub use render::JsonFormat;

use std::path::Path;

/// Infer the outline of a PDF file from its text layer.
///
/// # Example
///
/// ```no_run
/// let outline = pdfoutline::extract_outline("document.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    Outliner::new().extract(path)
}

/// Extract the normalized blocks of a PDF file from its text layer.
pub fn extract_blocks<P: AsRef<Path>>(path: P) -> Result<Vec<TextBlock>> {
    Outliner::new().blocks(path)
}

/// Classify blocks that were produced elsewhere.
pub fn classify_blocks(blocks: &[TextBlock]) -> DocumentOutline {
    OutlineClassifier::new().classify(blocks)
}

/// Builder for single-document extraction.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{Outliner, TesseractEngine};
///
/// let outline = Outliner::new()
///     .lenient()
///     .with_max_pages(20)
///     .with_ocr(TesseractEngine::new())
///     .extract("scan.pdf")?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
pub struct Outliner {
    options: ExtractOptions,
    ocr: Option<Box<dyn OcrEngine>>,
    classifier: OutlineClassifier,
}

impl Outliner {
    /// Create a builder: strict mode, no caps, no OCR.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            ocr: None,
            classifier: OutlineClassifier::new(),
        }
    }

    /// Skip unreadable pages and images instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Only the first N pages contribute blocks.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.options = self.options.with_max_pages(pages);
        self
    }

    /// OCR at most N images.
    pub fn with_max_images(mut self, images: usize) -> Self {
        self.options = self.options.with_max_images(images);
        self
    }

    /// Run OCR on page images.
    pub fn with_ocr(mut self, engine: impl OcrEngine + 'static) -> Self {
        self.ocr = Some(Box::new(engine));
        self
    }

    /// Use custom classifier limits.
    pub fn with_limits(mut self, limits: ClassifierLimits) -> Self {
        self.classifier = OutlineClassifier::with_limits(limits);
        self
    }

    /// Normalized blocks of a PDF file.
    pub fn blocks<P: AsRef<Path>>(&self, path: P) -> Result<Vec<TextBlock>> {
        let source = PdfSource::open_with_options(path, self.options)?;
        self.normalize(&source)
    }

    /// Normalized blocks of an in-memory PDF.
    pub fn blocks_from_bytes(&self, data: &[u8]) -> Result<Vec<TextBlock>> {
        let source = PdfSource::from_bytes_with_options(data, self.options)?;
        self.normalize(&source)
    }

    /// Title and outline of a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        Ok(self.classifier.classify(&self.blocks(path)?))
    }

    /// Title and outline of an in-memory PDF.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<DocumentOutline> {
        Ok(self.classifier.classify(&self.blocks_from_bytes(data)?))
    }

    fn normalize(&self, source: &PdfSource) -> Result<Vec<TextBlock>> {
        let fragments = source.extract_fragments(self.ocr.as_deref())?;
        Ok(BlockNormalizer::new(self.options.limits).normalize(&fragments))
    }
}

impl Default for Outliner {
    fn default() -> Self {
        Self::new()
    }
}
