//! Error types for the regarima-arma crate.

use regarima_linalg::LinalgError;

/// Error type for all fallible operations in the regarima-arma crate.
///
/// Model-invalid variants are raised before any filtering is attempted;
/// [`ArmaError::FilterBreakdown`] reports a numerical failure inside a
/// filter pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArmaError {
    /// Returned when a coefficient is NaN or infinite.
    #[error("ARMA coefficients contain non-finite values")]
    NonFiniteCoefficients,

    /// Returned when the innovation variance is not strictly positive and finite.
    #[error("invalid innovation variance: {sigma2}")]
    InvalidVariance {
        /// The rejected variance.
        sigma2: f64,
    },

    /// Returned when the AR polynomial has a root on or inside the unit circle.
    #[error("AR polynomial is non-stationary")]
    NonStationary,

    /// Returned when the MA polynomial has a root on or inside the unit circle.
    #[error("MA polynomial is non-invertible")]
    NonInvertible,

    /// Returned when a parameter vector lies outside the domain of its mapping.
    #[error("parameters out of domain: {0}")]
    OutOfDomain(String),

    /// Returned when a vector has the wrong length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// Returned when the one-step prediction variance becomes non-positive or NaN.
    #[error("filter breakdown at step {step}: prediction variance {variance}")]
    FilterBreakdown {
        /// Time index at which the failure was detected.
        step: usize,
        /// The offending variance.
        variance: f64,
    },

    /// Returned when a filter is used before [`crate::ArmaFilter::initialize`].
    #[error("filter used before initialisation")]
    NotInitialized,

    /// Linear-algebra failure.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}
