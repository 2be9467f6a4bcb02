//! Empirical quantile estimation.
//!
//! The estimator sorts a private copy of the sample and linearly interpolates
//! between the two order statistics bracketing the fractional rank
//! `r = q * (n - 1)`. This is the "linear" rule used by NumPy, pandas and
//! polars ([`QuantileMethod::Linear`](polars::prelude::QuantileMethod::Linear)),
//! so results are directly comparable with those libraries.
//!
//! Probabilities outside `(0, 1)` are clamped rather than rejected:
//! `q <= 0` yields the minimum and `q >= 1` the maximum. Samples are not
//! clamped: NaN or infinite observations are rejected.

use crate::{Result, VarError};

/// Empirical quantile estimator over order statistics.
///
/// Stateless: every call sorts its own copy of the input, so the caller's
/// buffer is never reordered.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantileEstimator;

impl QuantileEstimator {
    /// Create a new estimator.
    pub const fn new() -> Self {
        Self
    }

    /// Estimate the `q`-th quantile of an unordered sample.
    ///
    /// # Arguments
    ///
    /// * `sample` - Observations in any order; duplicates allowed
    /// * `q` - Probability; values outside `(0, 1)` clamp to min/max
    ///
    /// # Errors
    ///
    /// Returns [`VarError::EmptySample`] if `sample` is empty and
    /// [`VarError::NonFiniteObservation`] if any value is NaN or infinite.
    pub fn quantile(&self, sample: &[f64], q: f64) -> Result<f64> {
        validate_sample(sample)?;
        let sorted = sorted_copy(sample);
        self.quantile_sorted(&sorted, q)
    }

    /// Estimate the `q`-th quantile of a sample already sorted ascending.
    ///
    /// Useful when several quantiles of the same sample are needed and the
    /// sort should happen once. The ordering is not checked.
    ///
    /// # Errors
    ///
    /// Same as [`QuantileEstimator::quantile`].
    pub fn quantile_sorted(&self, sorted: &[f64], q: f64) -> Result<f64> {
        validate_sample(sorted)?;
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Err(VarError::EmptySample);
        };

        // A NaN probability resolves to the minimum along with q <= 0
        if sorted.len() == 1 || q.is_nan() || q <= 0.0 {
            return Ok(min);
        }
        if q >= 1.0 {
            return Ok(max);
        }

        let last = sorted.len() - 1;
        let rank = q * last as f64;
        let lower = (rank.floor() as usize).min(last);
        let upper = (rank.ceil() as usize).min(last);

        let lo = sorted[lower];
        let hi = sorted[upper];
        if lower == upper || lo == hi {
            return Ok(lo);
        }

        let fraction = rank - lower as f64;
        Ok(lerp(lo, hi, fraction))
    }
}

/// Estimate the `q`-th quantile of `sample` with the default estimator.
///
/// See [`QuantileEstimator::quantile`].
pub fn quantile(sample: &[f64], q: f64) -> Result<f64> {
    QuantileEstimator::new().quantile(sample, q)
}

/// Estimate the `q`-th quantile of an ascending slice.
///
/// See [`QuantileEstimator::quantile_sorted`].
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Result<f64> {
    QuantileEstimator::new().quantile_sorted(sorted, q)
}

/// Reject empty samples and NaN or infinite observations.
pub(crate) fn validate_sample(sample: &[f64]) -> Result<()> {
    if sample.is_empty() {
        return Err(VarError::EmptySample);
    }
    if let Some((index, &value)) = sample.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(VarError::NonFiniteObservation { index, value });
    }
    Ok(())
}

/// Ascending copy of `sample` under the IEEE total order.
pub(crate) fn sorted_copy(sample: &[f64]) -> Vec<f64> {
    let mut sorted = sample.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

/// Interpolate between two adjacent order statistics.
///
/// Bounded to `[lo, hi]` so rounding can never push a value past the next
/// order statistic, which keeps the estimator monotone in `q`.
fn lerp(lo: f64, hi: f64, fraction: f64) -> f64 {
    (lo + (hi - lo) * fraction).max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use polars::prelude::{IntoLazy, QuantileMethod, col, lit};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use rstest::rstest;

    const SAMPLE: [f64; 7] = [-5.0, -3.0, -1.0, 0.0, 2.0, 4.0, 6.0];

    fn random_sample(rng: &mut StdRng, len: usize) -> Vec<f64> {
        (0..len).map(|_| rng.gen_range(-1_000.0..1_000.0)).collect()
    }

    #[rstest]
    #[case(0.5, 0.0)]
    #[case(0.25, -2.0)]
    #[case(0.75, 3.0)]
    #[case(1.0 / 6.0, -3.0)]
    #[case(0.1, -3.8)]
    fn test_quantile_known_values(#[case] q: f64, #[case] expected: f64) {
        let value = quantile(&SAMPLE, q).unwrap();
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_ignores_input_order() {
        let shuffled = [4.0, -1.0, 6.0, -5.0, 0.0, 2.0, -3.0];
        assert_relative_eq!(quantile(&shuffled, 0.25).unwrap(), -2.0, epsilon = 1e-12);
        assert_relative_eq!(quantile(&shuffled, 0.5).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.1)]
    #[case(f64::NEG_INFINITY)]
    #[case(f64::NAN)]
    fn test_quantile_low_boundary_is_min(#[case] q: f64) {
        assert_eq!(quantile(&SAMPLE, q).unwrap(), -5.0);
    }

    #[rstest]
    #[case(1.0)]
    #[case(1.5)]
    #[case(f64::INFINITY)]
    fn test_quantile_high_boundary_is_max(#[case] q: f64) {
        assert_eq!(quantile(&SAMPLE, q).unwrap(), 6.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn test_quantile_empty_sample(#[case] q: f64) {
        assert!(matches!(quantile(&[], q), Err(VarError::EmptySample)));
        assert!(matches!(quantile_sorted(&[], q), Err(VarError::EmptySample)));
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.99)]
    #[case(1.0)]
    fn test_quantile_rejects_non_finite_observations(#[case] q: f64) {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let sample = [1.0, bad, 2.0];
            assert!(matches!(
                quantile(&sample, q),
                Err(VarError::NonFiniteObservation { index: 1, .. })
            ));

            let sorted = [1.0, 2.0, bad];
            assert!(matches!(
                quantile_sorted(&sorted, q),
                Err(VarError::NonFiniteObservation { index: 2, .. })
            ));
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.01)]
    #[case(0.5)]
    #[case(0.99)]
    #[case(1.0)]
    fn test_quantile_single_element(#[case] q: f64) {
        assert_eq!(quantile(&[42.0], q).unwrap(), 42.0);
    }

    #[test]
    fn test_quantile_with_duplicates() {
        let sample = [1.0, 1.0, 1.0, 5.0];
        assert_eq!(quantile(&sample, 0.5).unwrap(), 1.0);
        // r = 0.9 * 3 = 2.7 -> 1 + 0.7 * (5 - 1)
        assert_relative_eq!(quantile(&sample, 0.9).unwrap(), 3.8, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_does_not_mutate_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let sample = random_sample(&mut rng, 101);
        let before = sample.clone();

        for q in [0.0, 0.01, 0.05, 0.5, 0.95, 1.0] {
            quantile(&sample, q).unwrap();
        }

        assert_eq!(sample, before);
    }

    #[test]
    fn test_quantile_bounds_are_min_and_max() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in [1, 2, 3, 10, 257] {
            let sample = random_sample(&mut rng, len);
            let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
            let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(quantile(&sample, 0.0).unwrap(), min);
            assert_eq!(quantile(&sample, 1.0).unwrap(), max);
        }
    }

    #[test]
    fn test_quantile_is_monotone_in_q() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in [2, 5, 50, 500] {
            let sample = random_sample(&mut rng, len);
            let sorted = sorted_copy(&sample);

            let mut previous = f64::NEG_INFINITY;
            for step in 0..=2_000_u32 {
                let q = f64::from(step) / 2_000.0;
                let value = quantile_sorted(&sorted, q).unwrap();
                assert!(
                    value >= previous,
                    "quantile decreased at q={q}: {value} < {previous}"
                );
                previous = value;
            }
        }
    }

    #[test]
    fn test_sorted_and_unsorted_paths_agree() {
        let mut rng = StdRng::seed_from_u64(3);
        let sample = random_sample(&mut rng, 64);
        let sorted = sorted_copy(&sample);
        for q in [0.0, 0.013, 0.05, 0.37, 0.5, 0.81, 0.99, 1.0] {
            assert_eq!(
                quantile(&sample, q).unwrap(),
                quantile_sorted(&sorted, q).unwrap()
            );
        }
    }

    #[test]
    fn test_matches_polars_linear_quantile() {
        let mut rng = StdRng::seed_from_u64(2024);
        let sample = random_sample(&mut rng, 250);
        let df = polars::df!["pnl" => sample.clone()].unwrap();

        for q in [0.01, 0.05, 0.25, 0.5, 0.75, 0.95, 0.99] {
            let expected = df
                .clone()
                .lazy()
                .select([col("pnl").quantile(lit(q), QuantileMethod::Linear)])
                .collect()
                .unwrap()
                .column("pnl")
                .unwrap()
                .f64()
                .unwrap()
                .get(0)
                .unwrap();

            assert_relative_eq!(quantile(&sample, q).unwrap(), expected, epsilon = 1e-9);
        }
    }
}
