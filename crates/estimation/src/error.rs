//! Error types for the regarima-estimation crate.

use regarima_arma::ArmaError;
use regarima_gls::GlsError;
use regarima_linalg::LinalgError;

/// Error type for all fallible operations in the regarima-estimation crate.
///
/// Inadmissible candidates met during a search never surface here: the
/// objective turns them into `+inf`. These variants describe failures of
/// a whole request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    /// GLS solver error.
    #[error(transparent)]
    Gls(#[from] GlsError),

    /// ARMA model or mapping error.
    #[error(transparent)]
    Arma(#[from] ArmaError),

    /// Linear-algebra failure.
    #[error(transparent)]
    Linalg(#[from] LinalgError),

    /// Returned when the initial model and the mapping disagree on the orders.
    #[error("order mismatch: mapping is ARMA({expected_p}, {expected_q}), model is ARMA({p}, {q})")]
    OrderMismatch {
        /// AR order of the mapping.
        expected_p: usize,
        /// MA order of the mapping.
        expected_q: usize,
        /// AR order of the model.
        p: usize,
        /// MA order of the model.
        q: usize,
    },

    /// Returned when a configuration value is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Returned when the minimizer itself fails (not on non-convergence).
    #[error("minimizer failed: {0}")]
    MinimizerFailed(String),

    /// Returned when the observed information cannot be computed.
    #[error("observed information unavailable: {0}")]
    InformationUnavailable(String),
}
