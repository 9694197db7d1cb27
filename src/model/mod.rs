//! Data model shared by extraction, normalization and classification.
//!
//! Raw fragments ([`VectorSpan`], [`OcrData`]) come from the decoder and the
//! OCR engine, are normalized into [`TextBlock`]s, and classified into a
//! [`DocumentOutline`].

mod block;
mod fragment;
mod outline;

pub use block::TextBlock;
pub(crate) use block::usable_font_size;
pub use fragment::{BoundingBox, OcrData, OcrWord, PageFragments, VectorSpan};
pub use outline::{DocumentOutline, HeadingLevel, OutlineEntry, UNTITLED_DOCUMENT};
