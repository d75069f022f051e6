//! Concentrated-likelihood GLS solver.
//!
//! 1. Rescale the response and each column to unit root-mean-square.
//! 2. Filter the response and every column through one initialised
//!    [`ArmaFilter`]; the gain sequence is shared.
//! 3. Householder QR of the filtered design with rank detection; dropped
//!    columns get exact zeros in `b` and `bvar`.
//! 4. `ssqerr` from the filtered residuals; `+ 2 ln |R_ii|` per
//!    missing-value dummy in the log-determinant.
//! 5. Undo the scaling.

use ndarray::{Array1, Array2, Axis};
use regarima_arma::{ArmaFilter, ArmaSpec};
use regarima_linalg::{Householder, norm2, sum_of_squares};
use tracing::{debug, instrument, trace};

use crate::config::GlsConfig;
use crate::error::GlsError;
use crate::likelihood::ConcentratedLikelihood;
use crate::problem::{Design, RegressionProblem};

/// `ln(1e-24)`: residual-to-response sum-of-squares ratio treated as an exact fit.
const EXACT_FIT_LN: f64 = -24.0 * std::f64::consts::LN_10;

/// Scale factors applied before filtering.
struct Scaling {
    response: f64,
    columns: Array1<f64>,
}

impl Scaling {
    fn identity(k: usize) -> Self {
        Self {
            response: 1.0,
            columns: Array1::ones(k),
        }
    }

    /// `sqrt(rows) / ‖v‖`, or 1 for a zero vector.
    fn unit_rms(design: &Design) -> Self {
        let root = (design.y.len() as f64).sqrt();
        let factor = |nrm: f64| if nrm > 0.0 { root / nrm } else { 1.0 };
        Self {
            response: factor(norm2(design.y.view())),
            columns: design.x.columns().into_iter().map(|c| factor(norm2(c))).collect(),
        }
    }
}

/// Solves regressions with ARMA errors for a fixed ARMA model.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use regarima_arma::{ArmaSpec, CollapsingFilter};
/// use regarima_gls::{GlsSolver, RegressionProblem};
///
/// let problem = RegressionProblem::new(array![1.0, 2.5, 1.5, 3.0, 2.0, 3.5])
///     .unwrap()
///     .with_mean(true);
/// let arma = ArmaSpec::new(vec![0.3], vec![], 1.0).unwrap();
/// let mut filter = CollapsingFilter::new();
/// let ll = GlsSolver::default().solve(&problem, &arma, &mut filter).unwrap();
/// assert_eq!(ll.rank(), 1);
/// assert!(ll.log_likelihood().is_finite());
/// ```
#[derive(Clone, Debug, Default)]
pub struct GlsSolver {
    config: GlsConfig,
}

impl GlsSolver {
    /// Solver with the given configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`GlsConfig::validate`].
    pub fn new(config: GlsConfig) -> Result<Self, GlsError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The solver configuration.
    pub fn config(&self) -> &GlsConfig {
        &self.config
    }

    /// Evaluates the concentrated likelihood of `problem` under `arma`.
    ///
    /// `filter` is (re)initialised for `arma`; pass a fresh instance per
    /// concurrent evaluation.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GlsError::Arma`] | filter initialisation or breakdown |
    /// | [`GlsError::Linalg`] | non-finite filtered values or singular factor |
    /// | [`GlsError::MissingNotIdentified`] | a missing-value dummy is dependent |
    /// | [`GlsError::EstimationFailed`] | residual sum of squares is zero or not finite |
    #[instrument(
        skip_all,
        fields(rows = problem.len() - problem.differencing(), columns = problem.n_columns())
    )]
    pub fn solve(
        &self,
        problem: &RegressionProblem,
        arma: &ArmaSpec,
        filter: &mut dyn ArmaFilter,
    ) -> Result<ConcentratedLikelihood, GlsError> {
        let design = problem.design();
        let rows = design.y.len();
        let k = design.x.ncols();
        let m = design.n_missing;

        let scaling = if self.config.rescale() {
            Scaling::unit_rms(design)
        } else {
            Scaling::identity(k)
        };
        let y = &design.y * scaling.response;
        let x = &design.x * &scaling.columns.view().insert_axis(Axis(0));

        filter.initialize(arma, rows)?;
        let yl = filter.filter(y.view())?;
        let mut log_det = yl.log_det;
        let mut residuals = yl.values;
        let ln_ssq_response = sum_of_squares(residuals.view()).ln_value();

        let mut coefficients = Array1::zeros(k);
        let mut cov = Array2::zeros((k, k));
        let mut rank = 0;
        let mut unused = Vec::new();

        if k > 0 {
            let xl = filter.filter_columns(x.view())?;
            let qr = Householder::decompose(xl.view(), self.config.rank_tolerance())?;
            if let Some(&dummy) = qr.unused().iter().find(|&&j| j < m) {
                return Err(GlsError::MissingNotIdentified {
                    index: problem.missing()[dummy],
                });
            }
            let ls = qr.least_squares(residuals.view())?;
            let used = qr.used();
            for (l, &j) in used.iter().enumerate() {
                coefficients[j] = ls.coefficients[l];
                residuals.scaled_add(-ls.coefficients[l], &xl.column(j));
            }

            // Dummies come first and are all used, so R_ii belongs to dummy i.
            let r_diag = qr.r_diagonal();
            for i in 0..m {
                log_det += 2.0 * (r_diag[i] / scaling.columns[i]).abs().ln();
            }

            let r_inv = qr.r_inverse()?;
            let cov_used = r_inv.dot(&r_inv.t());
            for (a, &ja) in used.iter().enumerate() {
                for (b, &jb) in used.iter().enumerate() {
                    cov[[ja, jb]] = cov_used[[a, b]];
                }
            }
            rank = qr.rank();
            unused = qr.unused().to_vec();
            trace!(rank, ?unused, "design factorised");
        }

        let sy = scaling.response;
        let ssq_scaled = sum_of_squares(residuals.view());
        let ln_ssq_scaled = ssq_scaled.ln_value();
        // Overflows for extreme data; the likelihood uses log_ssqerr.
        let ssqerr = ssq_scaled.value() / (sy * sy);
        // A relative residual norm below 1e-12 is an exact fit up to rounding.
        if !ln_ssq_scaled.is_finite() || ln_ssq_scaled - ln_ssq_response <= EXACT_FIT_LN {
            return Err(GlsError::EstimationFailed(format!(
                "residual sum of squares is {ssqerr}"
            )));
        }
        let log_ssqerr = ln_ssq_scaled - 2.0 * sy.ln();
        let n = rows - m;

        let sx = &scaling.columns;
        let coefficients = Array1::from_shape_fn(k, |j| coefficients[j] * sx[j] / sy);
        let factor = ssqerr / n as f64;
        let bvar = Array2::from_shape_fn((k, k), |(a, b)| {
            let v = cov[[a, b]];
            if v == 0.0 { 0.0 } else { v * sx[a] * sx[b] * factor }
        });
        residuals.mapv_inplace(|v| v / sy);

        debug!(n, rank, ssqerr, log_ssqerr, log_det, "gls solved");
        Ok(ConcentratedLikelihood {
            n,
            ssqerr,
            log_ssqerr,
            log_det,
            coefficients,
            bvar,
            residuals,
            rank,
            unused,
            n_missing: m,
            names: design.names.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use regarima_arma::{AnsleyFilter, ArmaError, CollapsingFilter, FilterKind, Filtered};

    fn series() -> Array1<f64> {
        array![2.0, 3.1, 2.4, 4.0, 3.3, 5.2, 4.1, 5.0, 6.3, 5.5, 6.9, 6.1]
    }

    #[test]
    fn white_noise_mean_is_sample_mean() {
        let y = series();
        let problem = RegressionProblem::new(y.clone()).unwrap().with_mean(true);
        let ll = GlsSolver::default()
            .solve(&problem, &ArmaSpec::white_noise(), &mut CollapsingFilter::new())
            .unwrap();
        let mean = y.mean().unwrap();
        assert_abs_diff_eq!(ll.coefficients()[0], mean, epsilon = 1e-12);
        let ssq: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
        assert_abs_diff_eq!(ll.ssqerr(), ssq, epsilon = 1e-10);
        assert_abs_diff_eq!(ll.bvar()[[0, 0]], ssq / 12.0 / 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ll.log_determinant(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn no_regressors_uses_filtered_response() {
        let problem = RegressionProblem::new(series()).unwrap();
        let arma = ArmaSpec::new(vec![0.5], vec![], 1.0).unwrap();
        let ll = GlsSolver::default()
            .solve(&problem, &arma, &mut AnsleyFilter::new())
            .unwrap();
        let mut filter = AnsleyFilter::new();
        filter.initialize(&arma, 12).unwrap();
        let e = filter.filter(series().view()).unwrap();
        assert_eq!(ll.rank(), 0);
        assert!(ll.coefficients().is_empty());
        assert_abs_diff_eq!(ll.ssqerr(), e.values.dot(&e.values), epsilon = 1e-10);
        assert_abs_diff_eq!(ll.log_determinant(), e.log_det, epsilon = 1e-12);
    }

    #[test]
    fn rescaling_does_not_change_results() {
        let problem = RegressionProblem::new(series() * 1e6)
            .unwrap()
            .with_mean(true)
            .with_regressor("trend", Array1::from_shape_fn(12, |t| t as f64 * 1e-3))
            .unwrap();
        let arma = ArmaSpec::new(vec![0.4], vec![0.2], 1.0).unwrap();
        let scaled = GlsSolver::default()
            .solve(&problem, &arma, &mut CollapsingFilter::new())
            .unwrap();
        let plain = GlsSolver::new(GlsConfig::new().with_rescale(false))
            .unwrap()
            .solve(&problem, &arma, &mut CollapsingFilter::new())
            .unwrap();
        for j in 0..2 {
            let b = plain.coefficients()[j];
            assert_abs_diff_eq!(scaled.coefficients()[j], b, epsilon = 1e-8 * b.abs());
        }
        assert_abs_diff_eq!(
            scaled.log_likelihood(),
            plain.log_likelihood(),
            epsilon = 1e-7
        );
    }

    #[test]
    fn perfect_fit_is_an_estimation_failure() {
        let problem = RegressionProblem::new(Array1::from_elem(5, 3.0))
            .unwrap()
            .with_mean(true);
        let err = GlsSolver::default()
            .solve(&problem, &ArmaSpec::white_noise(), &mut CollapsingFilter::new())
            .unwrap_err();
        assert!(matches!(err, GlsError::EstimationFailed(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(GlsSolver::new(GlsConfig::new().with_rank_tolerance(2.0)).is_err());
    }

    /// Fails the way a filter does when a prediction variance turns negative.
    #[derive(Debug)]
    struct BreakingFilter;

    impl ArmaFilter for BreakingFilter {
        fn initialize(&mut self, _arma: &ArmaSpec, n: usize) -> Result<(), ArmaError> {
            Err(ArmaError::FilterBreakdown {
                step: n / 2,
                variance: -1e-3,
            })
        }

        fn series_length(&self) -> usize {
            0
        }

        fn log_determinant(&self) -> f64 {
            0.0
        }

        fn filter(&self, _y: ndarray::ArrayView1<'_, f64>) -> Result<Filtered, ArmaError> {
            Err(ArmaError::NotInitialized)
        }

        fn exemplar(&self) -> Box<dyn ArmaFilter> {
            Box::new(BreakingFilter)
        }

        fn kind(&self) -> FilterKind {
            FilterKind::Collapsing
        }
    }

    #[test]
    fn filter_breakdown_is_reported_not_clamped() {
        let problem = RegressionProblem::new(series()).unwrap().with_mean(true);
        let arma = ArmaSpec::new(vec![0.5], vec![], 1.0).unwrap();
        let err = GlsSolver::default()
            .solve(&problem, &arma, &mut BreakingFilter)
            .unwrap_err();
        assert_eq!(
            err,
            GlsError::Arma(ArmaError::FilterBreakdown {
                step: 6,
                variance: -1e-3
            })
        );
    }

    #[test]
    fn likelihood_survives_overflowing_sum_of_squares() {
        let n = 40;
        let trend = Array1::from_shape_fn(n, |t| t as f64 / n as f64);
        let y = Array1::from_shape_fn(n, |t| ((t * 7) % 5) as f64 + 3.0 * trend[t]);
        let arma = ArmaSpec::new(vec![0.4], vec![0.3], 1.0).unwrap();
        let c = 1e160;
        let build = |y: Array1<f64>| {
            RegressionProblem::new(y)
                .unwrap()
                .with_mean(true)
                .with_regressor("trend", trend.clone())
                .unwrap()
        };
        let solver = GlsSolver::default();
        let small = solver
            .solve(&build(y.clone()), &arma, &mut CollapsingFilter::new())
            .unwrap();
        let large = solver
            .solve(&build(y * c), &arma, &mut CollapsingFilter::new())
            .unwrap();

        assert_eq!(large.ssqerr(), f64::INFINITY);
        let shift = n as f64 * c.ln();
        approx::assert_relative_eq!(
            large.log_likelihood(),
            small.log_likelihood() - shift,
            max_relative = 1e-10
        );
        approx::assert_relative_eq!(
            large.log_ssqerr(),
            small.log_ssqerr() + 2.0 * c.ln(),
            max_relative = 1e-12
        );
        for j in 0..2 {
            approx::assert_relative_eq!(
                large.coefficients()[j],
                small.coefficients()[j] * c,
                max_relative = 1e-9
            );
        }
    }
}
