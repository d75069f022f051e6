//! GLS-ARMA estimation driver.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use regarima_arma::{
    AnsleyFilter, ArmaError, ArmaFilter, ArmaSpec, CollapsingFilter, FilterKind, ParameterMapping,
};
use regarima_gls::{ConcentratedLikelihood, GlsSolver, RegressionProblem};
use tracing::{debug, info, instrument, warn};

use crate::config::EstimationConfig;
use crate::error::EstimationError;
use crate::inference::{ArmaInference, observed_information};
use crate::minimizer::{Minimizer, NelderMeadMinimizer};
use crate::objective::{Criterion, LikelihoodObjective};
use crate::result::ArmaEstimate;

/// Concentrated-likelihood evaluation and ARMA parameter search for one
/// regression problem.
///
/// Every evaluation runs on its own filter obtained from a prototype via
/// [`ArmaFilter::exemplar`], so the estimator can be shared across threads.
///
/// # Example
///
/// ```
/// use ndarray::Array1;
/// use regarima_arma::{ArmaOrder, ArmaSpec, PacfMapping};
/// use regarima_estimation::{EstimationConfig, GlsArmaEstimator};
/// use regarima_gls::RegressionProblem;
///
/// let y = Array1::from_shape_fn(60, |t| (t as f64 * 0.8).sin() + 0.3 * (t as f64 * 2.1).cos());
/// let problem = RegressionProblem::new(y).unwrap().with_mean(true);
/// let estimator = GlsArmaEstimator::new(problem, EstimationConfig::default()).unwrap();
///
/// let start = ArmaSpec::new(vec![0.0], vec![], 1.0).unwrap();
/// let estimate = estimator
///     .optimize(&start, &PacfMapping::new(ArmaOrder::new(1, 0)))
///     .unwrap();
/// assert!(estimate.likelihood().log_likelihood().is_finite());
/// ```
#[derive(Debug)]
pub struct GlsArmaEstimator {
    problem: RegressionProblem,
    config: EstimationConfig,
    solver: GlsSolver,
    collapsing: CollapsingFilter,
    ansley: AnsleyFilter,
    filter_calls: AtomicUsize,
}

impl GlsArmaEstimator {
    /// Creates an estimator for `problem`.
    ///
    /// # Errors
    ///
    /// Propagates [`EstimationConfig::validate`].
    pub fn new(
        problem: RegressionProblem,
        config: EstimationConfig,
    ) -> Result<Self, EstimationError> {
        config.validate()?;
        let solver = GlsSolver::new(config.gls().clone())?;
        let collapsing = CollapsingFilter::new().with_epsilon(config.filter_epsilon());
        Ok(Self {
            problem,
            config,
            solver,
            collapsing,
            ansley: AnsleyFilter::new(),
            filter_calls: AtomicUsize::new(0),
        })
    }

    /// The regression problem.
    pub fn problem(&self) -> &RegressionProblem {
        &self.problem
    }

    /// The configuration.
    pub fn config(&self) -> &EstimationConfig {
        &self.config
    }

    /// Number of filter invocations so far.
    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::Relaxed)
    }

    /// Filter strategy used for models of `spec`'s order.
    pub fn filter_kind(&self, spec: &ArmaSpec) -> FilterKind {
        let rows = self.problem.len() - self.problem.differencing();
        self.config
            .filter_kind(self.problem.n_columns(), rows, spec.order().r())
    }

    fn fresh_filter(&self, kind: FilterKind) -> Box<dyn ArmaFilter> {
        match kind {
            FilterKind::Collapsing => self.collapsing.exemplar(),
            FilterKind::Ansley => self.ansley.exemplar(),
        }
    }

    /// Concentrated likelihood of the problem under `spec`.
    ///
    /// The innovation variance of `spec` is irrelevant: it is concentrated out.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`EstimationError::Arma`] | non-invertible MA part (rejected before filtering) |
    /// | [`EstimationError::Gls`] | filter breakdown or failed least squares |
    pub fn evaluate(&self, spec: &ArmaSpec) -> Result<ConcentratedLikelihood, EstimationError> {
        if !spec.is_invertible() {
            return Err(ArmaError::NonInvertible.into());
        }
        let mut filter = self.fresh_filter(self.filter_kind(spec));
        self.filter_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.solver.solve(&self.problem, spec, filter.as_mut())?)
    }

    /// Maps `params` through `mapping` and evaluates the result.
    ///
    /// Vectors outside the mapping's domain are rejected before any filter
    /// is touched.
    ///
    /// # Errors
    ///
    /// Returns [`EstimationError::Arma`] for out-of-domain vectors, otherwise
    /// as [`GlsArmaEstimator::evaluate`].
    pub fn evaluate_params(
        &self,
        mapping: &dyn ParameterMapping,
        params: &[f64],
    ) -> Result<ConcentratedLikelihood, EstimationError> {
        if !mapping.check_boundaries(params) {
            return Err(ArmaError::OutOfDomain(format!("{params:?}")).into());
        }
        let spec = mapping.map(params)?;
        self.evaluate(&spec)
    }

    /// Evaluates several models concurrently.
    ///
    /// Results are in the order of `specs`.
    #[instrument(skip_all, fields(candidates = specs.len()))]
    pub fn evaluate_many(
        &self,
        specs: &[ArmaSpec],
    ) -> Vec<Result<ConcentratedLikelihood, EstimationError>> {
        specs.par_iter().map(|spec| self.evaluate(spec)).collect()
    }

    /// Observed information of the ARMA coefficients at `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`EstimationError::InformationUnavailable`] when the
    /// likelihood is undefined near `spec` or the Hessian is not positive
    /// definite.
    pub fn information(&self, spec: &ArmaSpec) -> Result<ArmaInference, EstimationError> {
        observed_information(self, spec)
    }

    /// Searches for the ARMA model maximising the likelihood (or minimising
    /// the sum of squares), starting from `initial`, with the default
    /// Nelder–Mead minimizer.
    ///
    /// # Errors
    ///
    /// See [`GlsArmaEstimator::optimize_with`].
    pub fn optimize(
        &self,
        initial: &ArmaSpec,
        mapping: &dyn ParameterMapping,
    ) -> Result<ArmaEstimate, EstimationError> {
        let minimizer = NelderMeadMinimizer::new(self.config.max_iters(), self.config.tolerance());
        self.optimize_with(initial, mapping, &minimizer)
    }

    /// [`GlsArmaEstimator::optimize`] with a caller-supplied minimizer.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`EstimationError::OrderMismatch`] | `initial` and `mapping` differ in order |
    /// | [`EstimationError::Arma`] | `initial` outside the mapping's domain |
    /// | [`EstimationError::MinimizerFailed`] | the minimizer could not run |
    /// | [`EstimationError::Gls`] | the final model cannot be evaluated |
    #[instrument(skip_all, fields(p = initial.order().p(), q = initial.order().q()))]
    pub fn optimize_with(
        &self,
        initial: &ArmaSpec,
        mapping: &dyn ParameterMapping,
        minimizer: &dyn Minimizer,
    ) -> Result<ArmaEstimate, EstimationError> {
        let order = mapping.order();
        if initial.order() != order {
            return Err(EstimationError::OrderMismatch {
                expected_p: order.p(),
                expected_q: order.q(),
                p: initial.order().p(),
                q: initial.order().q(),
            });
        }
        let start = mapping.parameters_of(initial)?;
        let criterion = Criterion::from_max_likelihood(self.config.max_likelihood());
        let objective = LikelihoodObjective {
            estimator: self,
            mapping,
            criterion,
        };
        let value = |params: &[f64]| objective.value(params);
        let minimum = minimizer.minimize(&value, &start)?;
        if !minimum.converged {
            warn!(iterations = minimum.iterations, "minimizer hit iteration bound");
        }

        let unit = mapping.map(&minimum.params)?;
        let likelihood = self.evaluate(&unit)?;
        let spec = unit.with_sigma2(likelihood.sigma2())?;

        let inference = if self.config.compute_information() && order.n_params() > 0 {
            match self.information(&unit) {
                Ok(inference) => Some(inference),
                Err(err) => {
                    debug!(%err, "observed information skipped");
                    None
                }
            }
        } else {
            None
        };

        info!(
            iterations = minimum.iterations,
            converged = minimum.converged,
            log_likelihood = likelihood.log_likelihood(),
            filter_calls = self.filter_calls(),
            "arma estimation finished"
        );
        Ok(ArmaEstimate {
            spec,
            objective: criterion.value(&likelihood),
            likelihood,
            params: minimum.params,
            iterations: minimum.iterations,
            converged: minimum.converged,
            inference,
        })
    }
}
