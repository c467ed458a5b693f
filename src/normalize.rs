//! Range normalization helpers.
//!
//! Every visual attribute in the engine is produced by composing these two
//! functions, so they must stay pure and referentially transparent: repeated
//! runs over identical input have to produce bit-identical output.

/// Map `value` from `[min, max]` into `[0, 1]`.
///
/// A degenerate range (`max == min`) collapses to `0.0` rather than
/// dividing by zero: a constant-valued field should resolve to a single
/// canonical position/size, not fail the batch.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    (value - min) / (max - min)
}

/// Map `t` in `[0, 1]` into `[new_min, new_max]`.
pub fn scale(t: f64, new_min: f64, new_max: f64) -> f64 {
    new_min + t * (new_max - new_min)
}

/// Range-to-range mapping with the normalized value clamped to `[0, 1]`,
/// so inputs outside the observed range stay bounded in the target range.
pub fn normalize_to(value: f64, min: f64, max: f64, new_min: f64, new_max: f64) -> f64 {
    scale(normalize(value, min, max).clamp(0.0, 1.0), new_min, new_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize(4.3, 4.3, 7.9), 0.0);
        assert_eq!(normalize(7.9, 4.3, 7.9), 1.0);
        let mid = normalize(6.1, 4.3, 7.9);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn test_degenerate_range_is_constant() {
        assert_eq!(normalize(5.0, 5.0, 5.0), 0.0);
        // The constant applies regardless of the value queried.
        assert_eq!(normalize(123.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(0.0, 40.0, 180.0), 40.0);
        assert_eq!(scale(1.0, 40.0, 180.0), 180.0);
        assert_eq!(scale(0.5, 0.0, 360.0), 180.0);
    }

    #[test]
    fn test_normalize_to_clamps_out_of_range() {
        // Value below the observed min must not escape the target range.
        assert_eq!(normalize_to(-10.0, 0.0, 1.0, 180.0, 240.0), 180.0);
        assert_eq!(normalize_to(99.0, 0.0, 1.0, 180.0, 240.0), 240.0);
    }
}
