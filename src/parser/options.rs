//! Extraction options.

use crate::normalize::NormalizeOptions;

/// Options for pulling fragments out of a PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page and image caps
    pub limits: NormalizeOptions,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages and images).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page and image caps.
    pub fn with_limits(mut self, limits: NormalizeOptions) -> Self {
        self.limits = limits;
        self
    }

    /// Limit the number of leading pages.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.limits = self.limits.with_max_pages(pages);
        self
    }

    /// Limit the number of OCR'd images.
    pub fn with_max_images(mut self, images: usize) -> Self {
        self.limits = self.limits.with_max_images(images);
        self
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any page or image error
    #[default]
    Strict,
    /// Log and skip the failing page or image
    Lenient,
}
