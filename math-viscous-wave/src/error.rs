//! Error types for fundamental-solution evaluation.
//!
//! Degenerate evaluation points (r = 0, t ≤ 0) are not errors: they evaluate
//! to zero and are reported through [`crate::plan::ZeroReason`]. The variants
//! below cover invalid inputs, intractable integration plans and cancellation.

use thiserror::Error;

/// Errors that can occur while planning or running a field evaluation.
#[derive(Debug, Error)]
pub enum WaveError {
    /// A physical constant is non-positive or non-finite.
    #[error("invalid physical parameter {name}: {value} (must be finite and > 0)")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// A tuning parameter of the estimator is out of range.
    #[error("invalid tolerance {name}: {value} ({expected})")]
    InvalidTolerance {
        /// Name of the offending tolerance
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Description of the accepted range
        expected: &'static str,
    },

    /// A sampling grid cannot be built.
    #[error("invalid {axis} grid: {reason}")]
    InvalidGrid {
        /// Grid axis ("radius" or "time")
        axis: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The estimator asked for more subintervals than allowed.
    #[error(
        "subinterval count {requested:.3e} at (r={r}, t={t}) exceeds the limit of {limit}"
    )]
    SubintervalLimit {
        /// Radius of the evaluation point
        r: f64,
        /// Time of the evaluation point
        t: f64,
        /// Subinterval count requested by the estimator (may be infinite)
        requested: f64,
        /// Configured maximum
        limit: usize,
    },

    /// The evaluation was cancelled through its cancellation token.
    #[error("evaluation cancelled after {completed} of {total} steps")]
    Cancelled {
        /// Completed grid points or subintervals
        completed: usize,
        /// Total grid points or subintervals
        total: usize,
    },

    /// Configuration file could not be read, parsed or written.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for field evaluation.
pub type Result<T> = std::result::Result<T, WaveError>;

impl WaveError {
    /// Returns `true` if the error comes from rejected user input.
    ///
    /// This includes `InvalidParameter`, `InvalidTolerance` and `InvalidGrid`.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            WaveError::InvalidParameter { .. }
                | WaveError::InvalidTolerance { .. }
                | WaveError::InvalidGrid { .. }
        )
    }

    /// Returns `true` if the estimator produced an intractable plan.
    pub fn is_numerical_error(&self) -> bool {
        matches!(self, WaveError::SubintervalLimit { .. })
    }

    /// Returns `true` if the evaluation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaveError::Cancelled { .. })
    }
}

/// Check that a physical constant is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(WaveError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WaveError::InvalidParameter {
            name: "wave_speed",
            value: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid physical parameter wave_speed: -1 (must be finite and > 0)"
        );
    }

    #[test]
    fn test_subinterval_limit_display() {
        let err = WaveError::SubintervalLimit {
            r: 0.5,
            t: 2.0,
            requested: 3.0e9,
            limit: 100_000_000,
        };
        let text = err.to_string();
        assert!(text.contains("3.000e9"));
        assert!(text.contains("r=0.5"));
        assert!(text.contains("100000000"));
    }

    #[test]
    fn test_error_categories() {
        let input = WaveError::InvalidTolerance {
            name: "relative_error",
            value: 2.0,
            expected: "must be in (0, 1)",
        };
        let numeric = WaveError::SubintervalLimit {
            r: 1.0,
            t: 1.0,
            requested: f64::INFINITY,
            limit: 10,
        };
        let cancelled = WaveError::Cancelled {
            completed: 3,
            total: 10,
        };

        assert!(input.is_input_error());
        assert!(!input.is_numerical_error());
        assert!(numeric.is_numerical_error());
        assert!(!numeric.is_cancelled());
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_input_error());
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("c", 2.0).unwrap(), 2.0);
        assert!(require_positive("c", 0.0).is_err());
        assert!(require_positive("c", f64::NAN).is_err());
        assert!(require_positive("c", f64::INFINITY).is_err());
    }
}
