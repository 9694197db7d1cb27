//! Run configuration.
//!
//! The configuration is resolved once at startup and passed explicitly to
//! the batch runner; nothing below this module reads the environment.

use std::path::{Path, PathBuf};

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::normalize::NormalizeOptions;
use crate::parser::{ErrorMode, ExtractOptions};

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineConfig {
    /// Directory scanned for `*.pdf` files
    pub input_dir: PathBuf,

    /// Directory receiving one `<stem>.json` per document
    pub output_dir: PathBuf,

    /// Leading pages that contribute blocks (`None` = all)
    pub max_pages_for_outline: Option<usize>,

    /// Images OCR'd per document (`None` = all)
    pub max_images_per_doc: Option<usize>,

    /// Documents processed concurrently
    pub max_workers: usize,

    /// How page and image failures inside one document are handled
    pub error_mode: ErrorMode,
}

impl OutlineConfig {
    /// Create a configuration with default caps and worker count.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            max_pages_for_outline: None,
            max_images_per_doc: None,
            max_workers: default_workers(),
            error_mode: ErrorMode::Lenient,
        }
    }

    /// Limit the number of leading pages.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages_for_outline = Some(pages);
        self
    }

    /// Limit the number of OCR'd images per document.
    pub fn with_max_images(mut self, images: usize) -> Self {
        self.max_images_per_doc = Some(images);
        self
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    /// Fail a document on the first unreadable page or image.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Reject settings that cannot run. Called before any document is touched.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.max_pages_for_outline == Some(0) {
            return Err(Error::InvalidConfig(
                "max_pages_for_outline must be at least 1".to_string(),
            ));
        }
        if self.max_images_per_doc == Some(0) {
            return Err(Error::InvalidConfig(
                "max_images_per_doc must be at least 1 (omit it to disable the cap)".to_string(),
            ));
        }
        if same_dir(&self.input_dir, &self.output_dir) {
            return Err(Error::InvalidConfig(format!(
                "input and output directory are the same: {}",
                self.input_dir.display()
            )));
        }
        Ok(())
    }

    /// Page and image caps for the normalizer.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            max_pages_for_outline: self.max_pages_for_outline,
            max_images_per_doc: self.max_images_per_doc,
        }
    }

    /// Options for the PDF decoder.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .with_error_mode(self.error_mode)
            .with_limits(self.normalize_options())
    }
}

/// Whether two directory paths name the same place. Existing paths are
/// compared after canonicalization, so `docs` and `./docs` match.
fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Worker count bounded by available processors.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Pick the input directory: `preferred` when it exists and holds at least
/// one PDF, otherwise `fallback`.
pub fn resolve_input_dir(preferred: &Path, fallback: &Path) -> PathBuf {
    let has_pdfs = std::fs::read_dir(preferred)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| has_pdf_extension(e.path()))
        })
        .unwrap_or(false);

    if has_pdfs {
        preferred.to_path_buf()
    } else {
        fallback.to_path_buf()
    }
}

/// Pick the output directory: `preferred` when it exists, otherwise `fallback`.
pub fn resolve_output_dir(preferred: &Path, fallback: &Path) -> PathBuf {
    if preferred.is_dir() {
        preferred.to_path_buf()
    } else {
        fallback.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OutlineConfig::new("in", "out")
            .with_max_pages(5)
            .with_max_images(10)
            .with_workers(3)
            .strict();

        assert_eq!(config.max_pages_for_outline, Some(5));
        assert_eq!(config.max_images_per_doc, Some(10));
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.error_mode, ErrorMode::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_workers_positive() {
        assert!(default_workers() >= 1);
        assert!(OutlineConfig::new("in", "out").validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = OutlineConfig::new("in", "out").with_workers(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_caps_rejected() {
        assert!(OutlineConfig::new("in", "out")
            .with_max_pages(0)
            .validate()
            .is_err());
        assert!(OutlineConfig::new("in", "out")
            .with_max_images(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_same_dirs_rejected() {
        assert!(OutlineConfig::new("docs", "docs").validate().is_err());
    }

    #[test]
    fn test_same_dir_through_different_spellings() {
        let root = tempfile::tempdir().unwrap();
        let docs = root.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        let dotted = root.path().join(".").join("docs");
        let roundabout = docs.join("..").join("docs");

        assert!(OutlineConfig::new(&docs, &dotted).validate().is_err());
        assert!(OutlineConfig::new(&docs, &roundabout).validate().is_err());

        let other = root.path().join("out");
        assert!(OutlineConfig::new(&docs, &other).validate().is_ok());
    }

    #[test]
    fn test_options_carry_caps() {
        let config = OutlineConfig::new("in", "out").with_max_pages(2);
        let extract = config.extract_options();
        assert_eq!(extract.limits.max_pages_for_outline, Some(2));
        assert_eq!(extract.limits.max_images_per_doc, None);
        assert_eq!(extract.error_mode, ErrorMode::Lenient);
    }

    #[test]
    fn test_resolve_input_dir() {
        let preferred = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();

        // Exists but holds no PDF
        std::fs::write(preferred.path().join("notes.txt"), "x").unwrap();
        assert_eq!(
            resolve_input_dir(preferred.path(), fallback.path()),
            fallback.path()
        );

        std::fs::write(preferred.path().join("a.pdf"), "%PDF-1.4").unwrap();
        assert_eq!(
            resolve_input_dir(preferred.path(), fallback.path()),
            preferred.path()
        );
    }

    #[test]
    fn test_resolve_output_dir() {
        let existing = tempfile::tempdir().unwrap();
        let missing = existing.path().join("missing");
        assert_eq!(
            resolve_output_dir(&missing, Path::new("fallback")),
            PathBuf::from("fallback")
        );
        assert_eq!(
            resolve_output_dir(existing.path(), Path::new("fallback")),
            existing.path()
        );
    }
}
