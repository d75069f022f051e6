//! Householder QR decomposition with rank detection.
//!
//! The factorisation itself is `nalgebra`'s unpivoted QR. Columns keep
//! their original order: the first column whose `|R_jj|` falls below
//! `tolerance × ‖x_j‖` is dependent on the columns before it, so it is
//! flagged as unused and the remaining columns are factorised again. The
//! triangular factor always describes a full-rank sub-problem.

use nalgebra::{DMatrix, DVector, Dyn, QR};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

use crate::convert::{to_array1, to_array2, to_dvector};
use crate::error::LinalgError;
use crate::norm::norm2;

/// QR factorisation `A = Q R` of an `n × k` matrix with dependent columns removed.
#[derive(Clone, Debug)]
pub struct Householder {
    nrows: usize,
    ncols: usize,
    qr: Option<QR<f64, Dyn, Dyn>>,
    r: DMatrix<f64>,
    used: Vec<usize>,
    unused: Vec<usize>,
}

/// Solution of a least-squares problem `min ‖y - A b‖`.
#[derive(Clone, Debug)]
pub struct LeastSquares {
    /// Coefficients of the used columns, in the order of [`Householder::used()`].
    pub coefficients: Array1<f64>,
    /// `Q'y` beyond the first `rank` entries; its squared norm is the residual sum of squares.
    pub qty_tail: Array1<f64>,
}

impl Householder {
    /// Decomposes `a`, dropping columns whose orthogonal part falls below
    /// `tolerance × ‖original column‖`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LinalgError::NonFinite`] | `a` contains NaN or infinity |
    pub fn decompose(a: ArrayView2<'_, f64>, tolerance: f64) -> Result<Self, LinalgError> {
        if a.iter().any(|v| !v.is_finite()) {
            return Err(LinalgError::NonFinite);
        }
        let (n, k) = a.dim();
        let norms: Vec<f64> = (0..k).map(|j| norm2(a.column(j))).collect();
        let (mut used, mut unused): (Vec<usize>, Vec<usize>) =
            (0..k).partition(|&j| norms[j] > 0.0);

        let qr = loop {
            if used.is_empty() {
                break None;
            }
            let qr = DMatrix::from_fn(n, used.len(), |i, l| a[[i, used[l]]]).qr();
            let r = qr.r();
            let dependent = (0..used.len())
                .find(|&l| l >= n || r[(l, l)].abs() <= tolerance * norms[used[l]]);
            match dependent {
                Some(l) => unused.push(used.remove(l)),
                None => break Some(qr),
            }
        };
        unused.sort_unstable();
        let r = qr
            .as_ref()
            .map_or_else(|| DMatrix::zeros(0, 0), |qr| qr.r());

        Ok(Self {
            nrows: n,
            ncols: k,
            qr,
            r,
            used,
            unused,
        })
    }

    /// Number of rows of the decomposed matrix.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns of the decomposed matrix (used and unused).
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Numerical rank (number of used columns).
    pub fn rank(&self) -> usize {
        self.used.len()
    }

    /// Indices of the columns kept in the factorisation, in order.
    pub fn used(&self) -> &[usize] {
        &self.used
    }

    /// Indices of the columns detected as linearly dependent.
    pub fn unused(&self) -> &[usize] {
        &self.unused
    }

    /// Diagonal of `R`, one entry per used column.
    pub fn r_diagonal(&self) -> Array1<f64> {
        self.r.diagonal().iter().copied().collect()
    }

    /// Upper-triangular factor `R` (`rank × rank`) restricted to used columns.
    pub fn r(&self) -> Array2<f64> {
        to_array2(&self.r)
    }

    /// Applies `Q'` to `y` in place.
    pub fn apply_qt(&self, y: &mut Array1<f64>) {
        if let Some(qr) = &self.qr {
            let mut v = to_dvector(y.view());
            qr.q_tr_mul(&mut v);
            y.assign(&to_array1(&v));
        }
    }

    /// Solves `min ‖y - A b‖` over the used columns.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LinalgError::DimensionMismatch`] | `y.len() != nrows` |
    /// | [`LinalgError::NonFinite`] | `y` contains NaN or infinity |
    /// | [`LinalgError::Singular`] | a diagonal element of `R` vanished |
    pub fn least_squares(&self, y: ArrayView1<'_, f64>) -> Result<LeastSquares, LinalgError> {
        if y.len() != self.nrows {
            return Err(LinalgError::DimensionMismatch {
                expected: self.nrows,
                got: y.len(),
            });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(LinalgError::NonFinite);
        }
        let mut qty = y.to_owned();
        self.apply_qt(&mut qty);

        let rank = self.rank();
        let head = DVector::from_iterator(rank, qty.iter().take(rank).copied());
        let b = self
            .r
            .solve_upper_triangular(&head)
            .ok_or_else(|| self.singular())?;

        Ok(LeastSquares {
            coefficients: to_array1(&b),
            qty_tail: qty.slice(s![rank..]).to_owned(),
        })
    }

    /// Inverse of `R`, an upper-triangular `rank × rank` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::Singular`] if a diagonal element of `R` is zero.
    pub fn r_inverse(&self) -> Result<Array2<f64>, LinalgError> {
        let rank = self.rank();
        let inv = self
            .r
            .solve_upper_triangular(&DMatrix::identity(rank, rank))
            .ok_or_else(|| self.singular())?;
        Ok(to_array2(&inv))
    }

    fn singular(&self) -> LinalgError {
        let index = self
            .r
            .diagonal()
            .iter()
            .position(|&d| d == 0.0)
            .unwrap_or(0);
        LinalgError::Singular { index }
    }
}
