//! Exact ARMA filter via a banded Cholesky factor (Ansley's method).
//!
//! Differencing the series with the AR polynomial from observation `p`
//! on, `w_t = y_t - Σ φ_k y_{t-k}`, turns the dense covariance of `y`
//! into a band matrix of half-bandwidth `m = max(p, q)`: the first `p`
//! rows keep the ARMA autocovariances, the rest are MA(q). The
//! transform has unit determinant, so `ln det` of the band matrix is the
//! log-determinant of the original covariance.

use ndarray::{Array1, ArrayView1};
use regarima_linalg::BandCholesky;

use super::{ArmaFilter, FilterKind, Filtered, check_length};
use crate::autocov::{autocovariances, ma_autocovariances};
use crate::error::ArmaError;
use crate::spec::ArmaSpec;

#[derive(Clone, Debug)]
struct Factor {
    ar: Vec<f64>,
    n: usize,
    cholesky: BandCholesky,
    log_det: f64,
}

/// Exact banded-Cholesky filter. See the [module docs](self).
#[derive(Clone, Debug, Default)]
pub struct AnsleyFilter {
    factor: Option<Factor>,
}

impl AnsleyFilter {
    /// Uninitialised filter.
    pub fn new() -> Self {
        Self { factor: None }
    }

    /// Half-bandwidth of the factor, if initialised.
    pub fn bandwidth(&self) -> Option<usize> {
        self.factor.as_ref().map(|f| f.cholesky.bandwidth())
    }
}

/// Covariance `cov(w_i, w_j)` of the AR-transformed series for `i <= j`.
fn transformed_covariance(ar: &[f64], gamma: &[f64], ma_gamma: &[f64], i: usize, j: usize) -> f64 {
    let p = ar.len();
    let lag = j - i;
    if j < p {
        gamma[lag]
    } else if i < p {
        let mut v = gamma[lag];
        for (k, phi) in ar.iter().enumerate() {
            v -= phi * gamma[(j - k - 1).abs_diff(i)];
        }
        v
    } else {
        ma_gamma.get(lag).copied().unwrap_or(0.0)
    }
}

impl ArmaFilter for AnsleyFilter {
    fn initialize(&mut self, arma: &ArmaSpec, n: usize) -> Result<(), ArmaError> {
        self.factor = None;
        let order = arma.order();
        let m = order.p().max(order.q());
        let unit = arma.with_sigma2(1.0)?;
        let gamma = autocovariances(&unit, m + 1)?.to_vec();
        let ma_gamma = ma_autocovariances(arma.ma());
        let ar = arma.ar().to_vec();

        let cholesky = BandCholesky::decompose(n, m, |row, col| {
            transformed_covariance(&ar, &gamma, &ma_gamma, col, row)
        })?;
        let log_det = cholesky.log_determinant();
        self.factor = Some(Factor {
            ar,
            n,
            cholesky,
            log_det,
        });
        Ok(())
    }

    fn series_length(&self) -> usize {
        self.factor.as_ref().map_or(0, |f| f.n)
    }

    fn log_determinant(&self) -> f64 {
        self.factor.as_ref().map_or(0.0, |f| f.log_det)
    }

    fn filter(&self, y: ArrayView1<'_, f64>) -> Result<Filtered, ArmaError> {
        let factor = self.factor.as_ref().ok_or(ArmaError::NotInitialized)?;
        check_length(factor.n, y)?;

        let p = factor.ar.len();
        let w = Array1::from_shape_fn(factor.n, |t| {
            if t < p {
                y[t]
            } else {
                y[t] - factor
                    .ar
                    .iter()
                    .enumerate()
                    .map(|(k, phi)| phi * y[t - k - 1])
                    .sum::<f64>()
            }
        });
        let values = factor.cholesky.solve_lower(w.view())?;
        Ok(Filtered {
            values,
            log_det: factor.log_det,
        })
    }

    fn exemplar(&self) -> Box<dyn ArmaFilter> {
        Box::new(Self::new())
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Ansley
    }
}
