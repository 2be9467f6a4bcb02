//! Validated confidence levels.

use crate::{Result, VarError};
use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

/// A confidence level strictly inside the open interval (0, 1).
///
/// A 95% confidence level excludes the worst 5% of the loss distribution from
/// the VaR figure; that excluded mass is the [tail probability](Self::tail_probability).
/// Levels of exactly 0 or 1 are rejected: they are caller errors, not boundary
/// queries.
#[derive(Debug, Display, Clone, Copy, PartialEq, PartialOrd, Into, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// 95% confidence.
    pub const P95: Self = Self(0.95);

    /// 99% confidence.
    pub const P99: Self = Self(0.99);

    /// Validate a raw confidence level.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::InvalidConfidenceLevel`] unless `0 < level < 1`.
    /// NaN is rejected as well.
    pub const fn new(level: f64) -> Result<Self> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(VarError::InvalidConfidenceLevel(level))
        }
    }

    /// The raw level, e.g. `0.95`.
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Probability mass left in the loss tail, `1 - level`.
    pub const fn tail_probability(self) -> f64 {
        1.0 - self.0
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = VarError;

    fn try_from(level: f64) -> Result<Self> {
        Self::new(level)
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::P95
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.5)]
    #[case(0.95)]
    #[case(0.99)]
    #[case(1e-9)]
    fn test_accepts_open_interval(#[case] level: f64) {
        let cl = ConfidenceLevel::new(level).unwrap();
        assert_eq!(cl.value(), level);
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(1.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_rejects_outside_open_interval(#[case] level: f64) {
        let err = ConfidenceLevel::new(level).unwrap_err();
        assert!(matches!(err, VarError::InvalidConfidenceLevel(_)));
    }

    #[test]
    fn test_tail_probability() {
        assert_relative_eq!(ConfidenceLevel::P95.tail_probability(), 0.05, epsilon = 1e-12);
        assert_relative_eq!(ConfidenceLevel::P99.tail_probability(), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_display_and_conversion() {
        let cl = ConfidenceLevel::try_from(0.975).unwrap();
        assert_eq!(cl.to_string(), "0.975");
        let raw: f64 = cl.into();
        assert_eq!(raw, 0.975);
    }
}
