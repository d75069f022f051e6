//! # regarima-linalg
//!
//! Dense vector and matrix kernels used by the GLS-ARMA likelihood engine.
//!
//! | Kernel | Function / type | Used by |
//! |--------|-----------------|---------|
//! | scaled sum of squares | [`sum_of_squares()`], [`norm2()`] | rescaling, rank detection |
//! | Householder QR (`nalgebra`) | [`Householder`] | concentrated likelihood |
//! | banded Cholesky | [`BandCholesky`] | Ansley filter |
//! | dense Cholesky (`nalgebra`) / solve | [`cholesky()`], [`spd_inverse()`], [`solve()`] | autocovariances, information matrix |
//!
//! All kernels take `ndarray` views. The QR and Cholesky kernels copy
//! into `nalgebra` matrices; every decomposition owns its buffers.

mod band;
mod convert;
mod dense;
mod error;
mod householder;
mod norm;

pub use band::BandCholesky;
pub use dense::{cholesky, solve, spd_inverse};
pub use error::LinalgError;
pub use householder::{Householder, LeastSquares};
pub use norm::{SumOfSquares, norm2, sum_of_squares};
