//! PDF decoding: text-layer spans and page images.

mod images;
mod options;
mod pdf_source;
mod spans;

pub use options::{ErrorMode, ExtractOptions};
pub use pdf_source::PdfSource;
