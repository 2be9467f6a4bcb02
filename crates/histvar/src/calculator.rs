//! Historical-simulation Value-at-Risk.
//!
//! # Sign convention
//!
//! Samples hold signed P&L (or returns): gains are positive, losses negative.
//! VaR at confidence level `c` is the loss at the `1 - c` tail of that
//! distribution, reported as a magnitude:
//!
//! `VaR_c = -quantile(sample, 1 - c)`
//!
//! VaR is not floored at zero. A sample whose lower tail still shows a gain
//! yields a negative VaR, which usually points at a degenerate sample.
//!
//! # Example
//!
//! ```
//! use histvar::VarCalculator;
//!
//! let calc = VarCalculator::new(&[-100.0, -50.0, 0.0, 50.0, 100.0])?;
//! let var = calc.calculate_var(0.95)?;
//! assert!((var - 90.0).abs() < 1e-9);
//! # Ok::<(), histvar::VarError>(())
//! ```

use crate::{
    ConfidenceLevel, Result,
    quantile::{QuantileEstimator, sorted_copy, validate_sample},
};
use serde::Serialize;
use std::fmt;

/// A single VaR figure together with the context it was computed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarEstimate {
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence_level: ConfidenceLevel,
    /// Loss magnitude at the `1 - confidence_level` tail
    pub var: f64,
    /// Mean loss beyond VaR, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_shortfall: Option<f64>,
    /// Number of observations in the sample
    pub observations: usize,
}

impl fmt::Display for VarEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VaR({:.1}%): {:.4}",
            self.confidence_level.value() * 100.0,
            self.var
        )?;
        if let Some(es) = self.expected_shortfall {
            write!(f, ", ES: {es:.4}")?;
        }
        write!(f, " (n={})", self.observations)
    }
}

/// Historical VaR calculator over an owned P&L sample.
///
/// The calculator keeps its own copy of the observations; mutating the
/// caller's buffer afterwards has no effect on it. Results are recomputed on
/// every call.
#[derive(Debug, Clone)]
pub struct VarCalculator {
    sample: Vec<f64>,
    estimator: QuantileEstimator,
}

impl VarCalculator {
    /// Create a calculator from a copy of `sample`.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::EmptySample`](crate::VarError::EmptySample) for an
    /// empty sample and
    /// [`VarError::NonFiniteObservation`](crate::VarError::NonFiniteObservation)
    /// if any value is NaN or infinite.
    pub fn new(sample: &[f64]) -> Result<Self> {
        Self::from_vec(sample.to_vec())
    }

    /// Create a calculator that takes ownership of `sample`.
    ///
    /// # Errors
    ///
    /// Same as [`VarCalculator::new`].
    pub fn from_vec(sample: Vec<f64>) -> Result<Self> {
        validate_sample(&sample)?;
        Ok(Self {
            sample,
            estimator: QuantileEstimator::new(),
        })
    }

    /// Replace the stored sample.
    ///
    /// The new sample is validated first; on error the previous sample is
    /// left in place.
    ///
    /// # Errors
    ///
    /// Same as [`VarCalculator::new`].
    pub fn set_sample(&mut self, sample: &[f64]) -> Result<()> {
        validate_sample(sample)?;
        self.sample = sample.to_vec();
        Ok(())
    }

    /// The stored observations, in the order they were supplied.
    pub const fn sample(&self) -> &[f64] {
        self.sample.as_slice()
    }

    /// Number of stored observations. Always at least one.
    pub const fn observations(&self) -> usize {
        self.sample.len()
    }

    /// Historical VaR at `confidence_level`, as a loss magnitude.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`VarError::InvalidConfidenceLevel`](crate::VarError::InvalidConfidenceLevel)
    /// unless `0 < confidence_level < 1`.
    pub fn calculate_var(&self, confidence_level: f64) -> Result<f64> {
        self.var_at(ConfidenceLevel::new(confidence_level)?)
    }

    /// Historical VaR at an already validated confidence level.
    pub fn var_at(&self, level: ConfidenceLevel) -> Result<f64> {
        let tail = self.estimator.quantile(&self.sample, level.tail_probability())?;
        let var = -tail;

        tracing::debug!(
            confidence_level = level.value(),
            var,
            observations = self.sample.len(),
            "computed historical VaR"
        );
        if var < 0.0 {
            tracing::warn!(
                confidence_level = level.value(),
                var,
                "negative VaR: the loss tail of the sample is a gain"
            );
        }

        Ok(var)
    }

    /// Historical expected shortfall (conditional VaR) at `confidence_level`.
    ///
    /// The mean of all observations at or below the VaR threshold, negated
    /// into a loss magnitude. Never smaller than VaR at the same level.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`VarError::InvalidConfidenceLevel`](crate::VarError::InvalidConfidenceLevel)
    /// unless `0 < confidence_level < 1`.
    pub fn calculate_expected_shortfall(&self, confidence_level: f64) -> Result<f64> {
        self.expected_shortfall_at(ConfidenceLevel::new(confidence_level)?)
    }

    /// Historical expected shortfall at an already validated confidence level.
    pub fn expected_shortfall_at(&self, level: ConfidenceLevel) -> Result<f64> {
        let sorted = sorted_copy(&self.sample);
        let threshold = self
            .estimator
            .quantile_sorted(&sorted, level.tail_probability())?;

        // The minimum is always at or below the threshold, so the tail is non-empty
        let tail: Vec<f64> = sorted.into_iter().take_while(|&x| x <= threshold).collect();
        let mean = tail.iter().sum::<f64>() / tail.len() as f64;
        let es = -mean;

        tracing::debug!(
            confidence_level = level.value(),
            expected_shortfall = es,
            tail_observations = tail.len(),
            "computed historical expected shortfall"
        );

        Ok(es)
    }

    /// Compute a [`VarEstimate`] at one confidence level.
    pub fn estimate(
        &self,
        level: ConfidenceLevel,
        with_expected_shortfall: bool,
    ) -> Result<VarEstimate> {
        let var = self.var_at(level)?;
        let expected_shortfall = if with_expected_shortfall {
            Some(self.expected_shortfall_at(level)?)
        } else {
            None
        };

        Ok(VarEstimate {
            confidence_level: level,
            var,
            expected_shortfall,
            observations: self.sample.len(),
        })
    }

    /// Compute one [`VarEstimate`] per confidence level, in the given order.
    ///
    /// # Errors
    ///
    /// Fails on the first level outside `(0, 1)`.
    pub fn report(
        &self,
        levels: &[f64],
        with_expected_shortfall: bool,
    ) -> Result<Vec<VarEstimate>> {
        levels
            .iter()
            .map(|&level| self.estimate(ConfidenceLevel::new(level)?, with_expected_shortfall))
            .collect()
    }
}
