//! Min-max score normalization.

/// Normalized value assigned to every score when the input range is
/// degenerate (a single item, or all scores equal). Keeps degenerate
/// batches rankable without dividing by zero.
pub const DEGENERATE_NORM: f32 = 0.5;

/// Rescale a batch of raw scores into `[0, 1]` via min-max.
///
/// An empty input yields an empty output. When all scores are equal
/// (including the single-item case) every score maps to
/// [`DEGENERATE_NORM`]; otherwise the minimum maps to 0.0 and the maximum
/// to 1.0. Pure function, never fails.
pub fn min_max(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }

    let min = raw.iter().copied().fold(f32::INFINITY, f32::min);
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;

    if range <= f32::EPSILON {
        return vec![DEGENERATE_NORM; raw.len()];
    }

    raw.iter().map(|score| (score - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_a_noop() {
        assert!(min_max(&[]).is_empty());
    }

    #[test]
    fn all_scores_land_in_unit_interval() {
        let normalized = min_max(&[3.2, -1.0, 17.5, 0.0, 5.5]);
        for score in &normalized {
            assert!((0.0..=1.0).contains(score), "score {score} out of bounds");
        }
    }

    #[test]
    fn extremes_map_to_zero_and_one() {
        let normalized = min_max(&[2.0, 8.0, 5.0]);
        assert_eq!(normalized[0], 0.0);
        assert_eq!(normalized[1], 1.0);
    }

    #[test]
    fn equal_scores_map_to_degenerate_constant() {
        assert_eq!(min_max(&[4.2, 4.2, 4.2]), vec![DEGENERATE_NORM; 3]);
        assert_eq!(min_max(&[9.9]), vec![DEGENERATE_NORM]);
    }
}
