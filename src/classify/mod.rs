//! Title and outline inference from font statistics.
//!
//! The classifier sorts a document's blocks into reading order, finds the
//! dominant (body) font size, and treats larger, rarer sizes as heading
//! tiers. The first bold block larger than body text becomes the title.
//!
//! ```
//! use pdfoutline::classify::OutlineClassifier;
//! use pdfoutline::TextBlock;
//!
//! let mut blocks = vec![
//!     TextBlock::new("Annual Report", 1).with_font_size(24.0).with_bold(true),
//! ];
//! for i in 0..10 {
//!     blocks.push(
//!         TextBlock::new("Body text.", 1)
//!             .with_font_size(11.0)
//!             .with_position(72.0, 100.0 + i as f32 * 14.0),
//!     );
//! }
//!
//! let result = OutlineClassifier::new().classify(&blocks);
//! assert_eq!(result.title, "Annual Report");
//! ```

mod classifier;
mod stats;

pub use classifier::{ClassifierLimits, OutlineClassifier};
pub use stats::{key_to_size, size_key, FontStatistics};
