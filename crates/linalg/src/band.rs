//! Cholesky factorisation of symmetric band matrices.

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::LinalgError;

/// Lower Cholesky factor of a symmetric positive-definite band matrix.
///
/// The matrix is supplied row by row through a closure returning
/// `A[i, j]` for `i - bandwidth <= j <= i`. The factor is stored in
/// band form: `band[[i, d]] = L[i, i - d]`.
#[derive(Clone, Debug)]
pub struct BandCholesky {
    bandwidth: usize,
    band: Array2<f64>,
}

impl BandCholesky {
    /// Factorises the `n × n` band matrix whose lower band entries are given by `entry(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::NotPositiveDefinite`] when a pivot is not
    /// strictly positive (or is NaN).
    pub fn decompose<F>(n: usize, bandwidth: usize, entry: F) -> Result<Self, LinalgError>
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut band = Array2::zeros((n, bandwidth + 1));
        for i in 0..n {
            let lo = i.saturating_sub(bandwidth);
            for j in lo..=i {
                let mut s = entry(i, j);
                let klo = lo.max(j.saturating_sub(bandwidth));
                for k in klo..j {
                    s -= band[[i, i - k]] * band[[j, j - k]];
                }
                if i == j {
                    if s <= 0.0 || s.is_nan() {
                        return Err(LinalgError::NotPositiveDefinite);
                    }
                    band[[i, 0]] = s.sqrt();
                } else {
                    band[[i, i - j]] = s / band[[j, 0]];
                }
            }
        }
        Ok(Self { bandwidth, band })
    }

    /// Order of the factorised matrix.
    pub fn dim(&self) -> usize {
        self.band.nrows()
    }

    /// Half bandwidth (number of sub-diagonals).
    pub fn bandwidth(&self) -> usize {
        self.bandwidth
    }

    /// Diagonal of `L`.
    pub fn diagonal(&self) -> ArrayView1<'_, f64> {
        self.band.column(0)
    }

    /// `ln det(A) = 2 Σ ln L[i, i]`.
    pub fn log_determinant(&self) -> f64 {
        2.0 * self.band.column(0).iter().map(|d| d.ln()).sum::<f64>()
    }

    /// Solves `L x = b` (forward substitution).
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::DimensionMismatch`] when `b` has the wrong length.
    pub fn solve_lower(&self, b: ArrayView1<'_, f64>) -> Result<Array1<f64>, LinalgError> {
        let n = self.dim();
        if b.len() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: n,
                got: b.len(),
            });
        }
        let mut x = Array1::zeros(n);
        for i in 0..n {
            let mut acc = b[i];
            for k in i.saturating_sub(self.bandwidth)..i {
                acc -= self.band[[i, i - k]] * x[k];
            }
            x[i] = acc / self.band[[i, 0]];
        }
        Ok(x)
    }
}
