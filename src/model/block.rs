//! Normalized text blocks.

use serde::{Deserialize, Serialize};

/// A fragment of text normalized from either the native text layer or OCR.
///
/// Blocks are produced once by [`crate::normalize::BlockNormalizer`] and only
/// read afterwards. Coordinates use a top-left origin with y growing downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Trimmed, non-empty text content
    pub text: String,
    /// 1-based page number
    pub page: u32,
    /// Font size in points, or glyph height in pixels for OCR blocks.
    /// `None` when the source reported no usable size.
    pub font_size: Option<f32>,
    /// Source font name (absent for OCR blocks)
    pub font_name: Option<String>,
    /// Whether the font name signals a bold weight
    pub is_bold: bool,
    /// Left edge of the bounding box
    pub x0: f32,
    /// Top edge of the bounding box
    pub y0: f32,
}

impl TextBlock {
    /// Create a plain block with no font information.
    pub fn new(text: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            page,
            font_size: None,
            font_name: None,
            is_bold: false,
            x0: 0.0,
            y0: 0.0,
        }
    }

    /// Set the font size. Non-positive or non-finite sizes are stored as `None`.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = usable_font_size(size);
        self
    }

    /// Set the font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Set the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.is_bold = bold;
        self
    }

    /// Set the top-left position.
    pub fn with_position(mut self, x0: f32, y0: f32) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    /// Whether this block came from OCR rather than the text layer.
    pub fn is_ocr(&self) -> bool {
        self.font_name.is_none()
    }

    /// Number of characters in the trimmed text.
    pub fn char_count(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Filter out sizes that cannot serve as a font-size observation.
pub(crate) fn usable_font_size(size: f32) -> Option<f32> {
    (size.is_finite() && size > 0.0).then_some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_builder() {
        let block = TextBlock::new("Introduction", 2)
            .with_font_size(14.0)
            .with_font_name("Arial-BoldMT")
            .with_bold(true)
            .with_position(72.0, 100.0);

        assert_eq!(block.page, 2);
        assert_eq!(block.font_size, Some(14.0));
        assert!(block.is_bold);
        assert!(!block.is_ocr());
        assert_eq!(block.x0, 72.0);
    }

    #[test]
    fn test_zero_font_size_is_absent() {
        assert_eq!(TextBlock::new("x", 1).with_font_size(0.0).font_size, None);
        assert_eq!(TextBlock::new("x", 1).with_font_size(-3.0).font_size, None);
        assert_eq!(
            TextBlock::new("x", 1).with_font_size(f32::NAN).font_size,
            None
        );
    }

    #[test]
    fn test_char_count_unicode() {
        let block = TextBlock::new("  Überblick  ", 1);
        assert_eq!(block.char_count(), 9);
    }
}
