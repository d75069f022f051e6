//! Result of one concentrated-likelihood evaluation.

use std::f64::consts::PI;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Profiled Gaussian likelihood of a regression with ARMA errors.
///
/// Coefficients and their covariance are in the units of the original
/// data. Entries of dropped (dependent) columns are exactly zero.
///
/// | Quantity | Accessor |
/// |----------|----------|
/// | `ssqerr` | [`ConcentratedLikelihood::ssqerr()`] |
/// | `ln det Ω` (with missing-value correction) | [`ConcentratedLikelihood::log_determinant()`] |
/// | effective observations | [`ConcentratedLikelihood::n()`] |
/// | `log L` | [`ConcentratedLikelihood::log_likelihood()`] |
#[derive(Clone, Debug, PartialEq)]
pub struct ConcentratedLikelihood {
    pub(crate) n: usize,
    pub(crate) ssqerr: f64,
    pub(crate) log_ssqerr: f64,
    pub(crate) log_det: f64,
    pub(crate) coefficients: Array1<f64>,
    pub(crate) bvar: Array2<f64>,
    pub(crate) residuals: Array1<f64>,
    pub(crate) rank: usize,
    pub(crate) unused: Vec<usize>,
    pub(crate) n_missing: usize,
    pub(crate) names: Vec<String>,
}

impl ConcentratedLikelihood {
    /// `log L = -½ (n ln 2π + n ln(ssqerr / n) + n + ln det Ω)`.
    ///
    /// Evaluated from `ln ssqerr`, so it stays finite for data whose
    /// squared residuals overflow.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.n as f64;
        -0.5 * (n * (2.0 * PI).ln() + n * (self.log_ssqerr - n.ln()) + n + self.log_det)
    }

    /// Maximum-likelihood innovation variance `ssqerr / n`.
    pub fn sigma2(&self) -> f64 {
        self.ssqerr / self.n as f64
    }

    /// Standard error of the regression, `sqrt(ssqerr / df)`.
    pub fn ser(&self) -> f64 {
        (self.ssqerr / self.degrees_of_freedom().max(1) as f64).sqrt()
    }

    /// Akaike information criterion for `nparams` estimated parameters.
    pub fn aic(&self, nparams: usize) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * nparams as f64
    }

    /// Small-sample corrected AIC; infinite when `n <= nparams + 1`.
    pub fn aicc(&self, nparams: usize) -> f64 {
        let n = self.n as f64;
        let k = nparams as f64;
        if n - k - 1.0 <= 0.0 {
            return f64::INFINITY;
        }
        self.aic(nparams) + 2.0 * k * (k + 1.0) / (n - k - 1.0)
    }

    /// Bayesian information criterion for `nparams` estimated parameters.
    pub fn bic(&self, nparams: usize) -> f64 {
        -2.0 * self.log_likelihood() + nparams as f64 * (self.n as f64).ln()
    }

    /// Effective number of observations (after differencing and missing values).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Residual sum of squares of the filtered regression.
    pub fn ssqerr(&self) -> f64 {
        self.ssqerr
    }

    /// `ln ssqerr`.
    pub fn log_ssqerr(&self) -> f64 {
        self.log_ssqerr
    }

    /// Log-determinant including the missing-value correction.
    pub fn log_determinant(&self) -> f64 {
        self.log_det
    }

    /// Numerical rank of the design, dummies included.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Indices of design columns dropped as linearly dependent.
    pub fn unused(&self) -> &[usize] {
        &self.unused
    }

    /// Residual degrees of freedom, `n - (rank - missing)`.
    pub fn degrees_of_freedom(&self) -> usize {
        (self.n + self.n_missing).saturating_sub(self.rank)
    }

    /// Design column names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// All coefficients, missing-value dummies first.
    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.coefficients.view()
    }

    /// Coefficients of the mean and the regressors.
    pub fn regression_coefficients(&self) -> ArrayView1<'_, f64> {
        self.coefficients.slice(s![self.n_missing..])
    }

    /// Interpolated values of the missing observations, at levels.
    pub fn missing_estimates(&self) -> Array1<f64> {
        self.coefficients.slice(s![..self.n_missing]).mapv(|b| -b)
    }

    /// Covariance of all coefficients, `(X'Ω⁻¹X)⁻¹ · ssqerr / n`.
    pub fn bvar(&self) -> ArrayView2<'_, f64> {
        self.bvar.view()
    }

    /// Standard errors of all coefficients.
    pub fn std_errors(&self) -> Array1<f64> {
        self.bvar.diag().mapv(|v| v.max(0.0).sqrt())
    }

    /// t statistics; zero for dropped columns.
    pub fn t_stats(&self) -> Array1<f64> {
        let se = self.std_errors();
        Array1::from_shape_fn(se.len(), |i| {
            if se[i] > 0.0 {
                self.coefficients[i] / se[i]
            } else {
                0.0
            }
        })
    }

    /// Two-sided p-values from a Student-t with
    /// [`degrees_of_freedom`](Self::degrees_of_freedom) degrees of freedom.
    ///
    /// NaN when there are no residual degrees of freedom; one for dropped columns.
    pub fn p_values(&self) -> Array1<f64> {
        let t = self.t_stats();
        let Ok(dist) = StudentsT::new(0.0, 1.0, self.degrees_of_freedom() as f64) else {
            return Array1::from_elem(t.len(), f64::NAN);
        };
        t.mapv(|v| 2.0 * (1.0 - dist.cdf(v.abs())))
    }

    /// Filtered GLS residuals, one per differenced observation.
    pub fn residuals(&self) -> ArrayView1<'_, f64> {
        self.residuals.view()
    }
}
