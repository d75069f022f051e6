//! Result of a parameter search.

use regarima_arma::ArmaSpec;
use regarima_gls::ConcentratedLikelihood;

use crate::inference::ArmaInference;

/// Estimated ARMA model and its concentrated likelihood.
///
/// The model carries the maximum-likelihood innovation variance
/// `ssqerr / n`. A search stopped by the iteration bound still returns
/// its best point, with [`ArmaEstimate::converged()`] false.
#[derive(Debug, Clone)]
pub struct ArmaEstimate {
    pub(crate) spec: ArmaSpec,
    pub(crate) likelihood: ConcentratedLikelihood,
    pub(crate) params: Vec<f64>,
    pub(crate) objective: f64,
    pub(crate) iterations: u64,
    pub(crate) converged: bool,
    pub(crate) inference: Option<ArmaInference>,
}

impl ArmaEstimate {
    /// Estimated ARMA model.
    pub fn spec(&self) -> &ArmaSpec {
        &self.spec
    }

    /// Concentrated likelihood at the estimate.
    pub fn likelihood(&self) -> &ConcentratedLikelihood {
        &self.likelihood
    }

    /// Optimiser vector of the estimate, in the mapping's coordinates.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Final objective value.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Iterations used by the minimizer.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Whether the minimizer met its tolerance before the iteration bound.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Observed information, when requested and available.
    pub fn inference(&self) -> Option<&ArmaInference> {
        self.inference.as_ref()
    }

    /// ARMA coefficients, regression coefficients (dummies excluded) and
    /// the innovation variance.
    pub fn n_parameters(&self) -> usize {
        let ll = &self.likelihood;
        let missing = ll.coefficients().len() - ll.regression_coefficients().len();
        let regression = ll.rank().saturating_sub(missing);
        self.spec.order().n_params() + regression + 1
    }

    /// AIC with [`ArmaEstimate::n_parameters`].
    pub fn aic(&self) -> f64 {
        self.likelihood.aic(self.n_parameters())
    }

    /// BIC with [`ArmaEstimate::n_parameters`].
    pub fn bic(&self) -> f64 {
        self.likelihood.bic(self.n_parameters())
    }
}
