//! Small dense solvers.
//!
//! The Gaussian solve is local; Cholesky and the SPD inverse delegate to
//! `nalgebra`.

use nalgebra::{Cholesky, Dyn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::convert::{to_array2, to_dmatrix};
use crate::error::LinalgError;

/// Solves `A x = b` by Gaussian elimination with partial pivoting.
///
/// Intended for the small systems met in autocovariance computations.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LinalgError::DimensionMismatch`] | `A` not square or `b` of the wrong length |
/// | [`LinalgError::Singular`] | a pivot is zero or not finite |
pub fn solve(a: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>) -> Result<Array1<f64>, LinalgError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: n,
            got: a.ncols(),
        });
    }
    if b.len() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: n,
            got: b.len(),
        });
    }
    let mut m = a.to_owned();
    let mut x = b.to_owned();

    for c in 0..n {
        let mut piv = c;
        for i in c + 1..n {
            if m[[i, c]].abs() > m[[piv, c]].abs() {
                piv = i;
            }
        }
        let p = m[[piv, c]];
        if p == 0.0 || !p.is_finite() {
            return Err(LinalgError::Singular { index: c });
        }
        if piv != c {
            for j in 0..n {
                m.swap([c, j], [piv, j]);
            }
            x.swap(c, piv);
        }
        for i in c + 1..n {
            let f = m[[i, c]] / p;
            if f == 0.0 {
                continue;
            }
            for j in c..n {
                m[[i, j]] -= f * m[[c, j]];
            }
            x[i] -= f * x[c];
        }
    }
    for i in (0..n).rev() {
        let mut acc = x[i];
        for j in i + 1..n {
            acc -= m[[i, j]] * x[j];
        }
        x[i] = acc / m[[i, i]];
    }
    Ok(x)
}

/// Lower-triangular Cholesky factor `L` with `A = L L'` (`nalgebra`).
///
/// Only the lower triangle of `a` enters the factor.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LinalgError::DimensionMismatch`] | `a` is not square |
/// | [`LinalgError::NonFinite`] | `a` contains NaN or infinity |
/// | [`LinalgError::NotPositiveDefinite`] | a pivot is not strictly positive |
pub fn cholesky(a: ArrayView2<'_, f64>) -> Result<Array2<f64>, LinalgError> {
    let factor = factorise(a)?;
    Ok(to_array2(&factor.l()))
}

/// Inverse of a symmetric positive-definite matrix through its Cholesky factor.
///
/// # Errors
///
/// Propagates the errors of [`cholesky()`].
pub fn spd_inverse(a: ArrayView2<'_, f64>) -> Result<Array2<f64>, LinalgError> {
    let factor = factorise(a)?;
    Ok(to_array2(&factor.inverse()))
}

fn factorise(a: ArrayView2<'_, f64>) -> Result<Cholesky<f64, Dyn>, LinalgError> {
    if a.ncols() != a.nrows() {
        return Err(LinalgError::DimensionMismatch {
            expected: a.nrows(),
            got: a.ncols(),
        });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(LinalgError::NonFinite);
    }
    to_dmatrix(a)
        .cholesky()
        .ok_or(LinalgError::NotPositiveDefinite)
}
