//! Text-layer span extraction from page content streams.
//!
//! Walks the text operators of a content stream, tracking the text and
//! graphics matrices, and emits one [`VectorSpan`] per show-text operation.
//! Positions are converted from PDF user space (bottom-left origin) to a
//! top-left origin using the page height.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object};
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, VectorSpan};

/// Kerning adjustment (thousandths of an em) treated as a word gap in TJ arrays.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Approximate glyph metrics relative to the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;
const AVG_CHAR_WIDTH: f32 = 0.5;

/// Affine matrix `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6].iter().filter_map(get_number).collect();
        (n.len() == 6).then(|| Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state that survives across BT/ET.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: 0.0,
        }
    }
}

/// Decodes the spans of one page.
pub(crate) struct SpanDecoder<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    page_height: f32,
    subset_prefix: &'a Regex,
}

impl<'a> SpanDecoder<'a> {
    pub(crate) fn new(
        doc: &'a LopdfDocument,
        fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
        page_height: f32,
        subset_prefix: &'a Regex,
    ) -> Self {
        Self {
            doc,
            fonts,
            page_height,
            subset_prefix,
        }
    }

    /// Decode a content stream into spans, in stream order.
    pub(crate) fn decode(&self, content: &[u8]) -> Result<Vec<VectorSpan>> {
        let content = Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut state = TextState::default();
        let mut tm = Matrix::IDENTITY;
        let mut tlm = Matrix::IDENTITY;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => ctm = ctm_stack.pop().unwrap_or(Matrix::IDENTITY),
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    tm = Matrix::IDENTITY;
                    tlm = Matrix::IDENTITY;
                }
                "Tf" => {
                    if let [Object::Name(key), size, ..] = operands.as_slice() {
                        state.font_name = self.font_name(key);
                        state.font_key = key.clone();
                        state.font_size = get_number(size).unwrap_or(state.font_size);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if let [tx, ty, ..] = operands.as_slice() {
                        let tx = get_number(tx).unwrap_or(0.0);
                        let ty = get_number(ty).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        tlm = Matrix::translation(tx, ty).then(&tlm);
                        tm = tlm;
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        tlm = m;
                        tm = m;
                    }
                }
                "T*" => {
                    tlm = Matrix::translation(0.0, -state.leading).then(&tlm);
                    tm = tlm;
                }
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        let text = self.decode_string(&state.font_key, bytes);
                        self.emit(&mut spans, text, &state, &mut tm, &ctm);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        let text = self.decode_array(&state.font_key, items);
                        self.emit(&mut spans, text, &state, &mut tm, &ctm);
                    }
                }
                "'" | "\"" => {
                    tlm = Matrix::translation(0.0, -state.leading).then(&tlm);
                    tm = tlm;
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = operands.get(index) {
                        let text = self.decode_string(&state.font_key, bytes);
                        self.emit(&mut spans, text, &state, &mut tm, &ctm);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Record a span and advance the text matrix past it.
    fn emit(
        &self,
        spans: &mut Vec<VectorSpan>,
        text: String,
        state: &TextState,
        tm: &mut Matrix,
        ctm: &Matrix,
    ) {
        let chars = text.chars().count() as f32;
        let advance = chars * state.font_size * AVG_CHAR_WIDTH;

        if !text.trim().is_empty() {
            let trm = tm.then(ctm);
            let size = state.font_size * trm.vertical_scale();
            let (x, baseline) = (trm.e, trm.f);
            let width = advance * (trm.a * trm.a + trm.b * trm.b).sqrt();
            let bbox = BoundingBox::new(
                x,
                self.page_height - (baseline + size * ASCENT),
                x + width,
                self.page_height - (baseline - size * DESCENT),
            );
            spans.push(VectorSpan::new(text, bbox, size, state.font_name.clone()));
        }

        *tm = Matrix::translation(advance, 0.0).then(tm);
    }

    /// Base font name for a resource key, without any subset tag.
    fn font_name(&self, key: &[u8]) -> String {
        let base = self
            .fonts
            .get(key)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
        self.subset_prefix.replace(&base, "").to_string()
    }

    fn decode_string(&self, font_key: &[u8], bytes: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }

    /// TJ arrays mix strings with kerning; large negative kerns become spaces.
    fn decode_array(&self, font_key: &[u8], items: &[Object]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode_string(font_key, bytes)),
                other => {
                    let Some(adjustment) = get_number(other) else {
                        continue;
                    };
                    if -adjustment > TJ_SPACE_THRESHOLD
                        && combined
                            .chars()
                            .last()
                            .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c))
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Scripts written without spaces between words (Chinese, Japanese kana).
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x30FF
        | 0x3000..=0x303F)
}

/// Fallback decoding when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(content: &str) -> Vec<VectorSpan> {
        let doc = LopdfDocument::with_version("1.5");
        let prefix = Regex::new(r"^[A-Z]{6}\+").unwrap();
        SpanDecoder::new(&doc, BTreeMap::new(), 792.0, &prefix)
            .decode(content.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_matrix_composition() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let moved = Matrix::translation(10.0, 20.0).then(&scale);
        assert_eq!((moved.e, moved.f), (20.0, 40.0));
        assert_eq!(moved.vertical_scale(), 2.0);
    }

    #[test]
    fn test_simple_tj_span() {
        let spans = decode("BT /F1 12 Tf 100 700 Td (Hello World) Tj ET");
        assert_eq!(spans.len(), 1);

        let span = &spans[0];
        assert_eq!(span.text, "Hello World");
        assert_eq!(span.font_size, 12.0);
        assert_eq!(span.font_name, "F1");
        assert_eq!(span.bbox.x0, 100.0);
        // Top edge: 792 - (700 + 12 * 0.8)
        assert!((span.bbox.y0 - 82.4).abs() < 0.01);
    }

    #[test]
    fn test_text_matrix_scales_font_size() {
        let spans = decode("BT /F1 1 Tf 18 0 0 18 72 600 Tm (Heading) Tj ET");
        assert!((spans[0].font_size - 18.0).abs() < 0.001);
        assert_eq!(spans[0].bbox.x0, 72.0);
    }

    #[test]
    fn test_ctm_applies_to_position() {
        let spans = decode("q 1 0 0 1 50 0 cm BT /F1 10 Tf 10 500 Td (Shifted) Tj ET Q");
        assert_eq!(spans[0].bbox.x0, 60.0);
    }

    #[test]
    fn test_leading_moves_down() {
        let spans = decode("BT /F1 10 Tf 14 TL 72 700 Td (First) Tj T* (Second) Tj ET");
        assert_eq!(spans.len(), 2);
        assert!(spans[1].bbox.y0 > spans[0].bbox.y0);
        assert!((spans[1].bbox.y0 - spans[0].bbox.y0 - 14.0).abs() < 0.01);
    }

    #[test]
    fn test_tj_array_inserts_word_space() {
        let spans = decode("BT /F1 10 Tf 72 700 Td [(Hello) -300 (World) 50 (!)] TJ ET");
        assert_eq!(spans[0].text, "Hello World!");
    }

    #[test]
    fn test_blank_text_not_emitted() {
        let spans = decode("BT /F1 10 Tf 72 700 Td (   ) Tj ET");
        assert!(spans.is_empty());
    }

    #[test]
    fn test_decode_text_simple_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
        assert_eq!(decode_text_simple(&[0xE9]), "é");
    }

    #[test]
    fn test_spaceless_scripts() {
        assert!(is_spaceless_script_char('漢'));
        assert!(is_spaceless_script_char('か'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
