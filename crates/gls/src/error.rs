//! Error types for the regarima-gls crate.

use regarima_arma::ArmaError;
use regarima_linalg::LinalgError;

/// Error type for all fallible operations in the regarima-gls crate.
///
/// Rank deficiency of the design is not an error: dependent columns are
/// reported through [`crate::ConcentratedLikelihood::unused()`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GlsError {
    /// Returned when the response has no observations.
    #[error("response series is empty")]
    EmptySeries,

    /// Returned when the response or a regressor contains an infinite value.
    #[error("non-finite value in {0}")]
    NonFinite(String),

    /// Returned when a regressor has the wrong length.
    #[error("regressor {name}: expected length {expected}, got {got}")]
    LengthMismatch {
        /// Regressor name.
        name: String,
        /// Length of the response.
        expected: usize,
        /// Length supplied.
        got: usize,
    },

    /// Returned when a regressor name is already in use.
    #[error("duplicate regressor name: {0}")]
    DuplicateRegressor(String),

    /// Returned when removing a regressor that does not exist.
    #[error("unknown regressor: {0}")]
    UnknownRegressor(String),

    /// Returned when differencing and missing values leave no observation.
    #[error(
        "no observations left: length {len}, differencing {differencing}, missing {missing}"
    )]
    InsufficientData {
        /// Raw series length.
        len: usize,
        /// Differencing degree.
        differencing: usize,
        /// Number of missing observations.
        missing: usize,
    },

    /// Returned when a missing-value dummy is linearly dependent on earlier dummies.
    #[error("missing observation {index} cannot be identified")]
    MissingNotIdentified {
        /// Position of the missing observation in the raw series.
        index: usize,
    },

    /// Returned when the rank tolerance is not in `[0, 1)`.
    #[error("invalid rank tolerance: {0}")]
    InvalidTolerance(f64),

    /// Returned when the least-squares step produced no usable solution.
    #[error("estimation failed: {0}")]
    EstimationFailed(String),

    /// ARMA model or filter error.
    #[error(transparent)]
    Arma(#[from] ArmaError),

    /// Linear-algebra failure.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}
