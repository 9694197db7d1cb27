//! Font-size statistics for heading detection.

use std::collections::BTreeMap;

use crate::model::{HeadingLevel, TextBlock};

/// Bucket a font size to tenths of a point.
///
/// Sizes are truncated rather than rounded half-up, so 12.04 and 12.06 both
/// land in the 12.0 bucket. The small epsilon absorbs binary float error
/// (11.9 stored as 11.8999996 still buckets to 11.9).
///
/// The cost of truncation is that bucket edges sit on whole and tenth sizes,
/// where real fonts cluster: a size that falls short of 12.0 by more than
/// the epsilon (1e-4pt, e.g. 11.9988 from a scaled text matrix) lands in
/// 11.9 and splits the body bucket.
pub fn size_key(size: f32) -> i32 {
    (f64::from(size) * 10.0 + 1e-3).floor() as i32
}

/// Convert a bucket key back to a size in points.
pub fn key_to_size(key: i32) -> f32 {
    key as f32 / 10.0
}

/// Font-size distribution of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStatistics {
    /// Occurrences per bucketed size (key = tenths of a point)
    pub histogram: BTreeMap<i32, usize>,
    /// Bucket key of the body text size
    pub body_key: i32,
    /// Occurrences of the body size
    pub body_count: usize,
    /// Heading tiers, largest size first
    pub heading_tiers: Vec<(i32, HeadingLevel)>,
}

impl FontStatistics {
    /// Compute statistics from every block carrying a usable font size.
    ///
    /// Returns `None` if no block has a size.
    pub fn from_blocks(blocks: &[TextBlock]) -> Option<Self> {
        let mut histogram = BTreeMap::new();
        for size in blocks.iter().filter_map(|b| b.font_size) {
            *histogram.entry(size_key(size)).or_insert(0) += 1;
        }
        Self::from_histogram(histogram)
    }

    /// Derive the body size and heading tiers from a histogram.
    pub fn from_histogram(histogram: BTreeMap<i32, usize>) -> Option<Self> {
        // Ascending scan with strict `>` keeps the smallest size on ties.
        let mut body: Option<(i32, usize)> = None;
        for (&key, &count) in &histogram {
            if body.map_or(true, |(_, best)| count > best) {
                body = Some((key, count));
            }
        }
        let (body_key, body_count) = body?;

        // Larger and rarer than body text: count < body_count / 2.
        let heading_tiers = histogram
            .iter()
            .rev()
            .filter(|&(&key, &count)| key > body_key && count * 2 < body_count)
            .map(|(&key, _)| key)
            .zip(HeadingLevel::ALL)
            .collect();

        Some(Self {
            histogram,
            body_key,
            body_count,
            heading_tiers,
        })
    }

    /// Body text size in points.
    pub fn body_size(&self) -> f32 {
        key_to_size(self.body_key)
    }

    /// Heading level assigned to a bucketed size, if it is a tier.
    pub fn level_for_key(&self, key: i32) -> Option<HeadingLevel> {
        self.heading_tiers
            .iter()
            .find(|(tier, _)| *tier == key)
            .map(|(_, level)| *level)
    }

    /// Heading level for a raw font size.
    pub fn level_for_size(&self, size: f32) -> Option<HeadingLevel> {
        self.level_for_key(size_key(size))
    }

    /// Tier sizes in points, largest first.
    pub fn heading_sizes(&self) -> Vec<f32> {
        self.heading_tiers
            .iter()
            .map(|(key, _)| key_to_size(*key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(sizes: &[(f32, usize)]) -> Vec<TextBlock> {
        sizes
            .iter()
            .flat_map(|&(size, n)| (0..n).map(move |_| TextBlock::new("t", 1).with_font_size(size)))
            .collect()
    }

    #[test]
    fn test_size_key_truncates_to_tenths() {
        assert_eq!(size_key(12.04), 120);
        assert_eq!(size_key(12.06), 120);
        assert_eq!(size_key(12.1), 121);
        assert_eq!(size_key(11.9), 119);
        assert_eq!(size_key(24.0), 240);
    }

    #[test]
    fn test_font_statistics() {
        let stats = FontStatistics::from_blocks(&blocks(&[(12.0, 100), (18.0, 5), (24.0, 3)]))
            .unwrap();

        assert_eq!(stats.body_key, 120);
        assert_eq!(stats.body_count, 100);
        assert!((stats.body_size() - 12.0).abs() < f32::EPSILON);
        assert_eq!(stats.level_for_size(24.0), Some(HeadingLevel::H1));
        assert_eq!(stats.level_for_size(18.0), Some(HeadingLevel::H2));
        assert_eq!(stats.level_for_size(12.0), None);
    }

    #[test]
    fn test_near_sizes_share_bucket() {
        let mut input = blocks(&[(12.04, 3)]);
        input.extend(blocks(&[(12.06, 3)]));
        let stats = FontStatistics::from_blocks(&input).unwrap();
        assert_eq!(stats.histogram.len(), 1);
        assert_eq!(stats.body_count, 6);
    }

    #[test]
    fn test_tie_break_prefers_smallest_size() {
        let stats = FontStatistics::from_blocks(&blocks(&[(14.0, 4), (10.0, 4), (12.0, 4)]))
            .unwrap();
        assert_eq!(stats.body_key, 100);
    }

    #[test]
    fn test_frequent_large_size_is_not_a_tier() {
        // 16pt appears 5 times against 10 body blocks: not strictly under half.
        let stats =
            FontStatistics::from_blocks(&blocks(&[(10.0, 10), (16.0, 5), (20.0, 4)])).unwrap();
        assert_eq!(stats.heading_sizes(), vec![20.0]);
    }

    #[test]
    fn test_smaller_sizes_are_never_tiers() {
        let stats = FontStatistics::from_blocks(&blocks(&[(12.0, 10), (8.0, 1)])).unwrap();
        assert!(stats.heading_tiers.is_empty());
    }

    #[test]
    fn test_at_most_six_tiers() {
        let mut input = blocks(&[(10.0, 100)]);
        for size in [11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0] {
            input.extend(blocks(&[(size, 1)]));
        }
        let stats = FontStatistics::from_blocks(&input).unwrap();

        assert_eq!(stats.heading_tiers.len(), 6);
        assert_eq!(stats.level_for_size(18.0), Some(HeadingLevel::H1));
        assert_eq!(stats.level_for_size(13.0), Some(HeadingLevel::H6));
        assert_eq!(stats.level_for_size(12.0), None);
    }

    #[test]
    fn test_no_sizes() {
        let input = vec![TextBlock::new("a", 1), TextBlock::new("b", 1)];
        assert!(FontStatistics::from_blocks(&input).is_none());
    }

    #[test]
    fn test_bucket_edge_at_whole_sizes() {
        assert_eq!(size_key(12.0), 120);
        assert_eq!(size_key(11.99999), 120);
        // Beyond the epsilon the size drops into the bucket below.
        assert_eq!(size_key(11.9988), 119);
    }
}
