//! Raw fragments as delivered by the document decoder and the OCR engine.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box, top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A span from the native text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSpan {
    /// Raw decoded text (untrimmed)
    pub text: String,
    /// Span bounds in page coordinates
    pub bbox: BoundingBox,
    /// Font size in points
    pub font_size: f32,
    /// Font family name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl VectorSpan {
    /// Create a new vector span.
    pub fn new(
        text: impl Into<String>,
        bbox: BoundingBox,
        font_size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
            font_name: font_name.into(),
        }
    }
}

/// A single word recognized by OCR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    pub left: i32,
    pub top: i32,
    /// Glyph box height in pixels
    pub height: i32,
}

/// OCR output for one image, stored as parallel arrays (one index per word).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrData {
    pub text: Vec<String>,
    pub left: Vec<i32>,
    pub top: Vec<i32>,
    pub height: Vec<i32>,
}

impl OcrData {
    /// Create empty OCR data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one word to every array.
    pub fn push(&mut self, text: impl Into<String>, left: i32, top: i32, height: i32) {
        self.text.push(text.into());
        self.left.push(left);
        self.top.push(top);
        self.height.push(height);
    }

    /// Number of complete word records (the shortest array bounds the count).
    pub fn len(&self) -> usize {
        self.text
            .len()
            .min(self.left.len())
            .min(self.top.len())
            .min(self.height.len())
    }

    /// Check if there are no words.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the arrays as word records.
    pub fn words(&self) -> impl Iterator<Item = OcrWord> + '_ {
        (0..self.len()).map(move |i| OcrWord {
            text: self.text[i].clone(),
            left: self.left[i],
            top: self.top[i],
            height: self.height[i],
        })
    }
}

impl FromIterator<OcrWord> for OcrData {
    fn from_iter<I: IntoIterator<Item = OcrWord>>(iter: I) -> Self {
        let mut data = OcrData::new();
        for word in iter {
            data.push(word.text, word.left, word.top, word.height);
        }
        data
    }
}

/// All raw fragments found on one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFragments {
    /// 1-based page number
    pub page: u32,
    /// Text-layer spans in content-stream order
    pub spans: Vec<VectorSpan>,
    /// OCR output, one entry per image on the page
    pub images: Vec<OcrData>,
}

impl PageFragments {
    /// Create an empty page.
    pub fn new(page: u32) -> Self {
        Self {
            page,
            spans: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Add a text-layer span.
    pub fn add_span(&mut self, span: VectorSpan) {
        self.spans.push(span);
    }

    /// Add OCR output for one image.
    pub fn add_image(&mut self, data: OcrData) {
        self.images.push(data);
    }
}
