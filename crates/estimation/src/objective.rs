//! Scalar objective seen by the minimizer.

use regarima_arma::ParameterMapping;
use regarima_gls::ConcentratedLikelihood;
use tracing::trace;

use crate::error::EstimationError;
use crate::estimator::GlsArmaEstimator;

/// What the search minimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// `-2 log L`.
    MaxLikelihood,
    /// `ssqerr` alone (conditional sum of squares of the filtered residuals).
    SumOfSquares,
}

impl Criterion {
    pub fn from_max_likelihood(max_likelihood: bool) -> Self {
        if max_likelihood {
            Criterion::MaxLikelihood
        } else {
            Criterion::SumOfSquares
        }
    }

    /// Objective value of a likelihood evaluation.
    pub fn value(self, ll: &ConcentratedLikelihood) -> f64 {
        match self {
            Criterion::MaxLikelihood => -2.0 * ll.log_likelihood(),
            Criterion::SumOfSquares => ll.ssqerr(),
        }
    }
}

/// Objective over the mapping's parameter space.
///
/// Out-of-domain vectors and failed evaluations cost `+inf`.
pub(crate) struct LikelihoodObjective<'a> {
    pub(crate) estimator: &'a GlsArmaEstimator,
    pub(crate) mapping: &'a dyn ParameterMapping,
    pub(crate) criterion: Criterion,
}

impl LikelihoodObjective<'_> {
    pub(crate) fn value(&self, params: &[f64]) -> f64 {
        let evaluation = self.estimator.evaluate_params(self.mapping, params);
        if let Err(err) = &evaluation {
            trace!(?params, %err, "inadmissible candidate");
        }
        self.criterion.cost(evaluation)
    }
}

impl Criterion {
    /// Minimizer cost of an evaluation: failures and NaN become `+inf`.
    pub(crate) fn cost(self, evaluation: Result<ConcentratedLikelihood, EstimationError>) -> f64 {
        match evaluation {
            Ok(ll) => {
                let v = self.value(&ll);
                if v.is_nan() { f64::INFINITY } else { v }
            }
            Err(_) => f64::INFINITY,
        }
    }
}
