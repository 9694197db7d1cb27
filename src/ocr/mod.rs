//! OCR engine boundary.
//!
//! Images embedded in a page are handed to an [`OcrEngine`], which returns
//! recognized words as parallel arrays ([`OcrData`]). The crate ships a
//! [`TesseractEngine`] that drives the `tesseract` command-line tool; any
//! other engine can be plugged in by implementing the trait.

mod tesseract;

pub use tesseract::{parse_tsv, TesseractEngine};

use crate::error::Result;
use crate::model::OcrData;

/// Encoding of an image extracted from a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// DCTDecode stream, a complete JPEG file
    Jpeg,
    /// JPXDecode stream, a complete JPEG 2000 file
    Jpeg2000,
    /// Decoded sample data without a container format
    Raw,
}

impl ImageFormat {
    /// Whether the bytes form a self-describing image file.
    pub fn is_encoded(self) -> bool {
        !matches!(self, ImageFormat::Raw)
    }
}

/// An image XObject pulled from a page.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Resource name on the page (e.g., "Im0")
    pub name: String,
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageData {
    /// Create image data.
    pub fn new(name: impl Into<String>, data: Vec<u8>, format: ImageFormat) -> Self {
        Self {
            name: name.into(),
            data,
            format,
            width: None,
            height: None,
        }
    }

    /// Set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Recognizes words in images.
///
/// Implementations must be shareable across worker threads.
pub trait OcrEngine: Send + Sync {
    /// Engine name, for logging.
    fn name(&self) -> &str;

    /// Whether the engine can read this image at all.
    fn supports(&self, _image: &ImageData) -> bool {
        true
    }

    /// Recognize the words in one image.
    fn recognize(&self, image: &ImageData) -> Result<OcrData>;
}
