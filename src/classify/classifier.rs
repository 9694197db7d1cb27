//! Outline classifier.

use crate::model::{DocumentOutline, HeadingLevel, OutlineEntry, TextBlock, UNTITLED_DOCUMENT};

use super::stats::{size_key, FontStatistics};

/// Work and output caps applied while scanning a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierLimits {
    /// Only the first N blocks in reading order are scanned
    pub scan_window: usize,
    /// Scanning stops once this many entries have been collected
    pub candidate_cap: usize,
    /// Entries kept in the final outline
    pub outline_cap: usize,
    /// Title and bold-fallback text must be shorter than this (in characters)
    pub max_title_chars: usize,
}

impl Default for ClassifierLimits {
    fn default() -> Self {
        Self {
            scan_window: 50,
            candidate_cap: 15,
            outline_cap: 10,
            max_title_chars: 100,
        }
    }
}

/// Infers a title and heading outline from a document's blocks.
///
/// Classification is a pure function of the block sequence; one classifier
/// can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct OutlineClassifier {
    limits: ClassifierLimits,
}

impl OutlineClassifier {
    /// Create a classifier with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom limits.
    pub fn with_limits(limits: ClassifierLimits) -> Self {
        Self { limits }
    }

    /// The limits in effect.
    pub fn limits(&self) -> &ClassifierLimits {
        &self.limits
    }

    /// Classify one document.
    pub fn classify(&self, blocks: &[TextBlock]) -> DocumentOutline {
        if blocks.is_empty() {
            return DocumentOutline::untitled();
        }

        let Some(stats) = FontStatistics::from_blocks(blocks) else {
            log::debug!("No block carries a font size, nothing to classify");
            return DocumentOutline::untitled();
        };
        log::debug!(
            "Body size {:.1}pt ({} blocks), heading tiers {:?}",
            stats.body_size(),
            stats.body_count,
            stats.heading_sizes()
        );

        let ordered = reading_order(blocks);
        let mut title: Option<String> = None;
        let mut outline = Vec::new();

        for block in ordered.into_iter().take(self.limits.scan_window) {
            let text = block.text.trim();
            if text.is_empty() {
                continue;
            }

            let key = block.font_size.map(size_key);
            let short = text.chars().count() < self.limits.max_title_chars;

            if title.is_none()
                && block.is_bold
                && short
                && key.is_some_and(|k| k > stats.body_key)
            {
                title = Some(text.to_string());
                continue;
            }

            if let Some(level) = key.and_then(|k| stats.level_for_key(k)) {
                outline.push(OutlineEntry::new(level, text, block.page));
            } else if block.is_bold && short && key.is_some_and(|k| k >= stats.body_key) {
                outline.push(OutlineEntry::new(HeadingLevel::H6, text, block.page));
            }

            if outline.len() >= self.limits.candidate_cap {
                break;
            }
        }

        outline.truncate(self.limits.outline_cap);
        DocumentOutline::new(title.unwrap_or_else(|| UNTITLED_DOCUMENT.to_string()), outline)
    }
}

/// Stable sort by page, then top edge.
fn reading_order(blocks: &[TextBlock]) -> Vec<&TextBlock> {
    let mut ordered: Vec<&TextBlock> = blocks.iter().collect();
    ordered.sort_by(|a, b| a.page.cmp(&b.page).then(a.y0.total_cmp(&b.y0)));
    ordered
}
