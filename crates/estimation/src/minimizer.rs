//! Pluggable minimizers for the parameter search.
//!
//! The driver only needs "minimise this scalar function from this start
//! point": [`Minimizer`] is that seam. [`NelderMeadMinimizer`] wraps the
//! `argmin` Nelder–Mead solver; inadmissible points arrive as `+inf`.

use std::fmt::Debug;

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;

use crate::error::EstimationError;

/// Scalar objective over an unconstrained parameter vector.
pub type Objective<'a> = dyn Fn(&[f64]) -> f64 + Sync + 'a;

/// Outcome of a minimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found.
    pub params: Vec<f64>,
    /// Objective at `params`.
    pub value: f64,
    /// Iterations performed.
    pub iterations: u64,
    /// `false` when the iteration bound stopped the search.
    pub converged: bool,
}

/// A local minimisation strategy.
pub trait Minimizer: Send + Sync + Debug {
    /// Minimises `objective` starting from `start`.
    ///
    /// Non-convergence is reported through [`Minimum::converged`], not as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`EstimationError::MinimizerFailed`] when the underlying
    /// solver cannot run at all.
    fn minimize(
        &self,
        objective: &Objective<'_>,
        start: &[f64],
    ) -> Result<Minimum, EstimationError>;
}

/// Nelder–Mead simplex search (`argmin`).
///
/// The initial simplex is the start point plus `step` along each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadMinimizer {
    max_iters: u64,
    sd_tolerance: f64,
    step: f64,
}

impl NelderMeadMinimizer {
    /// Defaults: step 0.1.
    pub fn new(max_iters: u64, sd_tolerance: f64) -> Self {
        Self {
            max_iters,
            sd_tolerance,
            step: 0.1,
        }
    }

    /// Sets the edge length of the initial simplex.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    fn simplex(&self, start: &[f64]) -> Vec<Vec<f64>> {
        let mut simplex = Vec::with_capacity(start.len() + 1);
        simplex.push(start.to_vec());
        for i in 0..start.len() {
            let mut vertex = start.to_vec();
            vertex[i] += self.step;
            simplex.push(vertex);
        }
        simplex
    }
}

/// `argmin` adapter around a borrowed objective.
struct Cost<'a, 'f> {
    objective: &'a Objective<'f>,
}

impl CostFunction for Cost<'_, '_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok((self.objective)(params))
    }
}

impl Minimizer for NelderMeadMinimizer {
    fn minimize(
        &self,
        objective: &Objective<'_>,
        start: &[f64],
    ) -> Result<Minimum, EstimationError> {
        if start.is_empty() {
            return Ok(Minimum {
                params: Vec::new(),
                value: objective(start),
                iterations: 0,
                converged: true,
            });
        }
        let solver = NelderMead::new(self.simplex(start))
            .with_sd_tolerance(self.sd_tolerance)
            .map_err(|e| EstimationError::MinimizerFailed(e.to_string()))?;
        let result = Executor::new(Cost { objective }, solver)
            .configure(|state| state.max_iters(self.max_iters))
            .run()
            .map_err(|e| EstimationError::MinimizerFailed(e.to_string()))?;

        let state = result.state();
        let params = state
            .get_best_param()
            .cloned()
            .unwrap_or_else(|| start.to_vec());
        let converged = !matches!(
            state.get_termination_status(),
            TerminationStatus::Terminated(TerminationReason::MaxItersReached)
        );
        Ok(Minimum {
            value: state.get_best_cost(),
            params,
            iterations: state.get_iter(),
            converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_quadratic_minimum() {
        let f = |x: &[f64]| (x[0] - 1.0).powi(2) + 2.0 * (x[1] + 0.5).powi(2);
        let min = NelderMeadMinimizer::new(500, 1e-12)
            .minimize(&f, &[0.0, 0.0])
            .unwrap();
        assert!(min.converged);
        assert_abs_diff_eq!(min.params[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(min.params[1], -0.5, epsilon = 1e-4);
    }

    #[test]
    fn infinite_cost_region_is_avoided() {
        let f = |x: &[f64]| {
            if x[0] > 0.3 {
                f64::INFINITY
            } else {
                (x[0] - 1.0).powi(2)
            }
        };
        let min = NelderMeadMinimizer::new(500, 1e-12)
            .minimize(&f, &[0.0])
            .unwrap();
        assert!(min.params[0] <= 0.3);
        assert!(min.value.is_finite());
    }

    #[test]
    fn iteration_bound_reports_non_convergence() {
        let f = |x: &[f64]| (x[0] - 100.0).powi(2) + (x[1] + 50.0).powi(2);
        let min = NelderMeadMinimizer::new(3, 1e-15)
            .minimize(&f, &[0.0, 0.0])
            .unwrap();
        assert!(!min.converged);
        assert_eq!(min.iterations, 3);
    }

    #[test]
    fn empty_start_evaluates_once() {
        let f = |_: &[f64]| 4.2;
        let min = NelderMeadMinimizer::new(10, 1e-8).minimize(&f, &[]).unwrap();
        assert_eq!(min.value, 4.2);
        assert!(min.converged);
    }
}
