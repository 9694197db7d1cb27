//! PDF fragment source using lopdf.

use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use regex::Regex;

use crate::detect::{sniff_file, sniff_version};
use crate::error::{Error, Result};
use crate::model::{PageFragments, VectorSpan};
use crate::ocr::OcrEngine;

use super::images::page_images;
use super::options::{ErrorMode, ExtractOptions};
use super::spans::SpanDecoder;

/// Subset fonts carry a six-letter tag, e.g. "ABCDEF+Helvetica-Bold".
const SUBSET_PREFIX: &str = r"^[A-Z]{6}\+";

/// Letter-size fallback when a page has no usable MediaBox.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// A loaded PDF that yields raw text-layer and OCR fragments.
pub struct PdfSource {
    doc: LopdfDocument,
    options: ExtractOptions,
    subset_prefix: Regex,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        sniff_file(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc, options))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        sniff_version(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc, options))
    }

    fn from_document(doc: LopdfDocument, options: ExtractOptions) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }
        Self {
            doc,
            options,
            subset_prefix: Regex::new(SUBSET_PREFIX).expect("subset prefix pattern is valid"),
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get the PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// The options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract fragments from the leading pages, running OCR on page images
    /// when an engine is supplied.
    pub fn extract_fragments(&self, ocr: Option<&dyn OcrEngine>) -> Result<Vec<PageFragments>> {
        let limits = self.options.limits;
        let mut pages = Vec::new();
        let mut images_seen = 0usize;

        for (position, (page_num, page_id)) in self.doc.get_pages().into_iter().enumerate() {
            if !limits.includes_page(position) {
                break;
            }

            let mut page = PageFragments::new(page_num);
            match self.extract_page_spans(page_id) {
                Ok(spans) => page.spans = spans,
                Err(e) => self.tolerate(e, || format!("page {}", page_num))?,
            }

            if let Some(engine) = ocr {
                for image in page_images(&self.doc, page_id) {
                    if !limits.allows_image(images_seen) {
                        break;
                    }
                    if !engine.supports(&image) {
                        log::debug!(
                            "{} cannot read image {} on page {}, skipping",
                            engine.name(),
                            image.name,
                            page_num
                        );
                        continue;
                    }
                    images_seen += 1;
                    match engine.recognize(&image) {
                        Ok(data) => page.add_image(data),
                        Err(e) => self.tolerate(e, || {
                            format!("image {} on page {}", image.name, page_num)
                        })?,
                    }
                }
            }

            log::debug!(
                "Page {}: {} spans, {} OCR'd images",
                page_num,
                page.spans.len(),
                page.images.len()
            );
            pages.push(page);
        }

        Ok(pages)
    }

    /// Extract the text-layer spans of one page (1-based).
    pub fn page_spans(&self, page_num: u32) -> Result<Vec<VectorSpan>> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.extract_page_spans(*page_id)
    }

    fn extract_page_spans(&self, page_id: ObjectId) -> Result<Vec<VectorSpan>> {
        let fonts = self.doc.get_page_fonts(page_id)?;
        let content = self.doc.get_page_content(page_id)?;
        SpanDecoder::new(&self.doc, fonts, self.page_height(page_id), &self.subset_prefix)
            .decode(&content)
    }

    /// Page height from the MediaBox, looking through inherited attributes.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        let mut current = Some(page_id);
        while let Some(id) = current {
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            if let Ok(Object::Array(media_box)) = dict.get(b"MediaBox") {
                let values: Vec<f32> = media_box.iter().filter_map(|o| o.as_float().ok()).collect();
                if let [_, y0, _, y1] = values.as_slice() {
                    return (y1 - y0).abs();
                }
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        DEFAULT_PAGE_HEIGHT
    }

    /// In lenient mode, log the error and carry on; in strict mode, fail.
    fn tolerate(&self, err: Error, what: impl FnOnce() -> String) -> Result<()> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(err),
            ErrorMode::Lenient => {
                log::warn!("Skipping {}: {}", what(), err);
                Ok(())
            }
        }
    }
}
