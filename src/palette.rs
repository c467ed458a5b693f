//! Species palettes and deterministic color selection.
//!
//! Index policy: the palette index is derived from the record's own values
//! (the sepal length/width ratio normalized over the batch), not from the
//! record's position in iteration order. Identical records therefore always
//! land on the same palette entry, whatever their row number.

use serde::Deserialize;

use crate::normalize::normalize;
use crate::record::IrisRecord;
use crate::stats::{color_ratio, DatasetStats};

/// One 8-bit RGB triple. Serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Additive brighten, clipped at the channel maximum.
    pub fn brighten(self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_add(amount),
            self.1.saturating_add(amount),
            self.2.saturating_add(amount),
        )
    }

    /// Per-channel multiplicative scale, clamped to `[0, 255]`.
    pub fn scaled(self, fr: f64, fg: f64, fb: f64) -> Rgb {
        let clamp = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Rgb(
            clamp(self.0 as f64 * fr),
            clamp(self.1 as f64 * fg),
            clamp(self.2 as f64 * fb),
        )
    }
}

/// Fallback palette for species labels with no configured palette.
/// Unseen labels are expected input, not malformed input.
pub const DEFAULT_PALETTE: [Rgb; 3] = [Rgb(128, 128, 128), Rgb(160, 160, 160), Rgb(192, 192, 192)];

/// Palette index for one record: the sepal length/width ratio normalized
/// over the batch into `[0, len - 1]` and truncated. Collapses to 0 when
/// the ratio is degenerate across the batch.
pub fn color_index(record: &IrisRecord, stats: &DatasetStats, palette_len: usize) -> usize {
    if palette_len == 0 {
        return 0;
    }
    let t = normalize(
        color_ratio(record),
        stats.color_ratio.min,
        stats.color_ratio.max,
    )
    .clamp(0.0, 1.0);
    let index = (t * (palette_len - 1) as f64) as usize;
    index % palette_len
}

/// `palette[index mod len]`, falling back to mid-gray for an empty palette.
pub fn pick_color(palette: &[Rgb], index: usize) -> Rgb {
    if palette.is_empty() {
        return DEFAULT_PALETTE[0];
    }
    palette[index % palette.len()]
}

/// Weighted average of colors. Weights are fractional representation of
/// each category in a subgroup and must sum to 1 over the entries given;
/// the blend divides by the actual sum so slight rounding in the weights
/// cannot brighten or darken the result.
pub fn blend(weighted: &[(Rgb, f64)]) -> Rgb {
    let total: f64 = weighted.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return DEFAULT_PALETTE[0];
    }
    let mut acc = [0.0f64; 3];
    for (color, w) in weighted {
        acc[0] += color.0 as f64 * w;
        acc[1] += color.1 as f64 * w;
        acc[2] += color.2 as f64 * w;
    }
    Rgb(
        (acc[0] / total).round().clamp(0.0, 255.0) as u8,
        (acc[1] / total).round().clamp(0.0, 255.0) as u8,
        (acc[2] / total).round().clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(sl: f64, sw: f64) -> IrisRecord {
        IrisRecord {
            sepal_length: sl,
            sepal_width: sw,
            petal_length: 1.0,
            petal_width: 1.0,
            species: "Iris-setosa".to_string(),
        }
    }

    #[test]
    fn test_identical_records_share_a_color_index() {
        let records = vec![rec(5.0, 3.0); 10];
        let stats = DatasetStats::aggregate(&records).unwrap();
        let indices: Vec<usize> = records.iter().map(|r| color_index(r, &stats, 3)).collect();
        assert!(indices.iter().all(|&i| i == indices[0]));
        // Degenerate ratio collapses to the first palette entry.
        assert_eq!(indices[0], 0);
    }

    #[test]
    fn test_index_spans_palette() {
        let records = vec![rec(4.0, 4.0), rec(6.0, 3.0), rec(8.0, 2.0)];
        let stats = DatasetStats::aggregate(&records).unwrap();
        assert_eq!(color_index(&records[0], &stats, 3), 0);
        assert_eq!(color_index(&records[2], &stats, 3), 2);
    }

    #[test]
    fn test_pick_color_wraps() {
        let palette = [Rgb(1, 1, 1), Rgb(2, 2, 2), Rgb(3, 3, 3)];
        assert_eq!(pick_color(&palette, 0), Rgb(1, 1, 1));
        assert_eq!(pick_color(&palette, 4), Rgb(2, 2, 2));
    }

    #[test]
    fn test_blend_even_weights() {
        let blended = blend(&[(Rgb(0, 0, 0), 0.5), (Rgb(200, 100, 50), 0.5)]);
        assert_eq!(blended, Rgb(100, 50, 25));
    }

    #[test]
    fn test_blend_single_category() {
        assert_eq!(blend(&[(Rgb(54, 162, 235), 1.0)]), Rgb(54, 162, 235));
    }

    #[test]
    fn test_brighten_clips() {
        assert_eq!(Rgb(250, 10, 200).brighten(70), Rgb(255, 80, 255));
    }

    #[test]
    fn test_scaled_clamps() {
        assert_eq!(Rgb(200, 200, 200).scaled(2.0, 0.5, 1.0), Rgb(255, 100, 200));
    }
}
