//! Block normalization.
//!
//! Converts text-layer spans and OCR words into one uniform [`TextBlock`]
//! sequence per document. Output order is page by page; within a page all
//! text-layer blocks come first, followed by the OCR blocks of that page's
//! images in image order.

use crate::model::{usable_font_size, OcrWord, PageFragments, TextBlock, VectorSpan};

/// Caps bounding how much of a document is normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Only the first N pages contribute blocks (`None` = all pages)
    pub max_pages_for_outline: Option<usize>,
    /// At most N images per document contribute OCR blocks (`None` = all)
    pub max_images_per_doc: Option<usize>,
}

impl NormalizeOptions {
    /// Create options with no caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of leading pages.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages_for_outline = Some(pages);
        self
    }

    /// Limit the number of OCR'd images.
    pub fn with_max_images(mut self, images: usize) -> Self {
        self.max_images_per_doc = Some(images);
        self
    }

    /// Whether a page at this zero-based position is inside the page cap.
    pub fn includes_page(&self, position: usize) -> bool {
        self.max_pages_for_outline.map_or(true, |max| position < max)
    }

    /// Whether another image may be processed after `seen` images.
    pub fn allows_image(&self, seen: usize) -> bool {
        self.max_images_per_doc.map_or(true, |max| seen < max)
    }
}

/// Boldness as signalled by the font name: a case-sensitive `"Bold"` substring.
///
/// Fonts whose bold weight is spelled differently (`"Heavy"`, `"bold"`,
/// `"Black"`) are not detected.
pub fn is_bold_font(font_name: &str) -> bool {
    font_name.contains("Bold")
}

/// Builds [`TextBlock`]s from raw fragments.
#[derive(Debug, Clone, Default)]
pub struct BlockNormalizer {
    options: NormalizeOptions,
}

impl BlockNormalizer {
    /// Create a normalizer with the given caps.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// The caps in effect.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize one text-layer span. Returns `None` for whitespace-only text.
    pub fn normalize_span(&self, page: u32, span: &VectorSpan) -> Option<TextBlock> {
        let text = span.text.trim();
        if text.is_empty() {
            return None;
        }

        Some(TextBlock {
            text: text.to_string(),
            page,
            font_size: usable_font_size(span.font_size),
            font_name: Some(span.font_name.clone()),
            is_bold: is_bold_font(&span.font_name),
            x0: span.bbox.x0,
            y0: span.bbox.y0,
        })
    }

    /// Normalize one OCR word. Returns `None` for whitespace-only text.
    pub fn normalize_ocr_word(&self, page: u32, word: &OcrWord) -> Option<TextBlock> {
        let text = word.text.trim();
        if text.is_empty() {
            return None;
        }

        Some(TextBlock {
            text: text.to_string(),
            page,
            font_size: usable_font_size(word.height as f32),
            font_name: None,
            is_bold: false,
            x0: word.left as f32,
            y0: word.top as f32,
        })
    }

    /// Normalize all pages of a document.
    pub fn normalize(&self, pages: &[PageFragments]) -> Vec<TextBlock> {
        let mut blocks = Vec::new();
        let mut images_seen = 0usize;

        for (position, page) in pages.iter().enumerate() {
            if !self.options.includes_page(position) {
                log::debug!(
                    "Page cap reached after {} pages, skipping the rest",
                    position
                );
                break;
            }

            blocks.extend(
                page.spans
                    .iter()
                    .filter_map(|span| self.normalize_span(page.page, span)),
            );

            for image in &page.images {
                if !self.options.allows_image(images_seen) {
                    break;
                }
                images_seen += 1;
                blocks.extend(
                    image
                        .words()
                        .filter_map(|word| self.normalize_ocr_word(page.page, &word)),
                );
            }
        }

        log::debug!(
            "Normalized {} blocks from {} pages ({} images)",
            blocks.len(),
            pages.len(),
            images_seen
        );
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, OcrData};

    fn span(text: &str, size: f32, font: &str) -> VectorSpan {
        VectorSpan::new(text, BoundingBox::new(72.0, 100.0, 200.0, 112.0), size, font)
    }

    fn ocr(words: &[(&str, i32)]) -> OcrData {
        let mut data = OcrData::new();
        for (i, (text, height)) in words.iter().enumerate() {
            data.push(*text, 10 * i as i32, 40, *height);
        }
        data
    }

    #[test]
    fn test_bold_detection_is_case_sensitive() {
        assert!(is_bold_font("Helvetica-Bold"));
        assert!(is_bold_font("ABCDEF+Arial-BoldItalicMT"));
        assert!(!is_bold_font("helvetica-bold"));
        assert!(!is_bold_font("Arial-Black"));
        assert!(!is_bold_font("Roboto-Heavy"));
    }

    #[test]
    fn test_normalize_span() {
        let normalizer = BlockNormalizer::default();
        let block = normalizer
            .normalize_span(3, &span("  Overview  ", 16.0, "Times-Bold"))
            .unwrap();

        assert_eq!(block.text, "Overview");
        assert_eq!(block.page, 3);
        assert_eq!(block.font_size, Some(16.0));
        assert_eq!(block.font_name.as_deref(), Some("Times-Bold"));
        assert!(block.is_bold);
        assert_eq!((block.x0, block.y0), (72.0, 100.0));
    }

    #[test]
    fn test_whitespace_span_dropped() {
        let normalizer = BlockNormalizer::default();
        assert!(normalizer
            .normalize_span(1, &span(" \t ", 12.0, "Times"))
            .is_none());
    }

    #[test]
    fn test_normalize_ocr_word() {
        let normalizer = BlockNormalizer::default();
        let word = OcrWord {
            text: "Scanned".into(),
            left: 15,
            top: 30,
            height: 22,
        };
        let block = normalizer.normalize_ocr_word(2, &word).unwrap();

        assert_eq!(block.font_size, Some(22.0));
        assert_eq!(block.font_name, None);
        assert!(!block.is_bold);
        assert!(block.is_ocr());
        assert_eq!((block.x0, block.y0), (15.0, 30.0));
    }

    #[test]
    fn test_ocr_zero_height_has_no_size() {
        let normalizer = BlockNormalizer::default();
        let word = OcrWord {
            text: "x".into(),
            left: 0,
            top: 0,
            height: 0,
        };
        assert_eq!(normalizer.normalize_ocr_word(1, &word).unwrap().font_size, None);
    }

    #[test]
    fn test_page_order_vector_then_ocr() {
        let mut p1 = PageFragments::new(1);
        p1.add_span(span("Title", 20.0, "Arial-Bold"));
        p1.add_image(ocr(&[("from", 12), ("image", 12)]));
        p1.add_span(span("Body", 11.0, "Arial"));
        let mut p2 = PageFragments::new(2);
        p2.add_span(span("Next", 11.0, "Arial"));

        let blocks = BlockNormalizer::default().normalize(&[p1, p2]);
        let texts: Vec<_> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Title", "Body", "from", "image", "Next"]);
    }

    #[test]
    fn test_empty_ocr_words_dropped() {
        let mut page = PageFragments::new(1);
        page.add_image(ocr(&[("", 10), ("  ", 10), ("word", 10)]));

        let blocks = BlockNormalizer::default().normalize(&[page]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "word");
    }

    #[test]
    fn test_page_cap() {
        let pages: Vec<_> = (1..=5)
            .map(|n| {
                let mut page = PageFragments::new(n);
                page.add_span(span("text", 12.0, "Arial"));
                page
            })
            .collect();

        let normalizer = BlockNormalizer::new(NormalizeOptions::new().with_max_pages(2));
        let blocks = normalizer.normalize(&pages);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.page <= 2));
    }

    #[test]
    fn test_image_cap_spans_pages() {
        let mut p1 = PageFragments::new(1);
        p1.add_image(ocr(&[("one", 10)]));
        p1.add_image(ocr(&[("two", 10)]));
        let mut p2 = PageFragments::new(2);
        p2.add_image(ocr(&[("three", 10)]));
        p2.add_span(span("kept", 12.0, "Arial"));

        let normalizer = BlockNormalizer::new(NormalizeOptions::new().with_max_images(2));
        let texts: Vec<_> = normalizer
            .normalize(&[p1, p2])
            .into_iter()
            .map(|b| b.text)
            .collect();
        assert_eq!(texts, vec!["one", "two", "kept"]);
    }

    #[test]
    fn test_source_fragments_untouched() {
        let page = {
            let mut page = PageFragments::new(1);
            page.add_span(span("  padded ", 12.0, "Arial"));
            page
        };
        let before = page.clone();
        let _ = BlockNormalizer::default().normalize(std::slice::from_ref(&page));
        assert_eq!(page, before);
    }
}
