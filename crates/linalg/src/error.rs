//! Error types for the regarima-linalg crate.

/// Error type for all fallible operations in the regarima-linalg crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinalgError {
    /// Returned when operand shapes are incompatible.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length or row count.
        expected: usize,
        /// Length or row count actually supplied.
        got: usize,
    },

    /// Returned when an input contains NaN or infinite values.
    #[error("input contains non-finite values")]
    NonFinite,

    /// Returned when a pivot vanishes during a linear solve.
    #[error("matrix is singular (pivot {index})")]
    Singular {
        /// Index of the vanishing pivot.
        index: usize,
    },

    /// Returned when a Cholesky factorisation meets a non-positive pivot.
    #[error("matrix is not positive definite")]
    NotPositiveDefinite,
}
