//! Configuration of the parameter search.

use regarima_arma::{DEFAULT_EPSILON, FilterKind};
use regarima_gls::GlsConfig;

use crate::error::EstimationError;

/// Which ARMA filter the likelihood evaluations use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterChoice {
    /// Always the collapsing filter.
    Collapsing,
    /// Always the banded-Cholesky filter.
    Ansley,
    /// Banded Cholesky for many regressors or short series, collapsing otherwise.
    #[default]
    Adaptive,
}

/// Tunables of [`crate::GlsArmaEstimator`].
///
/// # Example
///
/// ```
/// use regarima_estimation::{EstimationConfig, FilterChoice};
///
/// let config = EstimationConfig::new()
///     .with_max_iters(500)
///     .with_filter(FilterChoice::Ansley)
///     .with_max_likelihood(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationConfig {
    max_iters: u64,
    tolerance: f64,
    max_likelihood: bool,
    filter: FilterChoice,
    regressor_threshold: usize,
    short_series_factor: usize,
    filter_epsilon: f64,
    gls: GlsConfig,
    compute_information: bool,
}

impl EstimationConfig {
    /// Defaults: 1000 iterations, tolerance 1e-9, maximum likelihood,
    /// adaptive filter (threshold 20 regressors, short-series factor 3),
    /// switch tolerance [`DEFAULT_EPSILON`], information computed.
    pub fn new() -> Self {
        Self {
            max_iters: 1000,
            tolerance: 1e-9,
            max_likelihood: true,
            filter: FilterChoice::Adaptive,
            regressor_threshold: 20,
            short_series_factor: 3,
            filter_epsilon: DEFAULT_EPSILON,
            gls: GlsConfig::default(),
            compute_information: true,
        }
    }

    /// Sets the iteration bound of the minimizer.
    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Sets the convergence tolerance of the minimizer.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// `true`: minimise `-2 log L`; `false`: minimise `ssqerr`.
    pub fn with_max_likelihood(mut self, max_likelihood: bool) -> Self {
        self.max_likelihood = max_likelihood;
        self
    }

    /// Sets the filter choice.
    pub fn with_filter(mut self, filter: FilterChoice) -> Self {
        self.filter = filter;
        self
    }

    /// Number of design columns from which the adaptive choice uses the banded filter.
    pub fn with_regressor_threshold(mut self, threshold: usize) -> Self {
        self.regressor_threshold = threshold;
        self
    }

    /// Series shorter than `factor * r` use the banded filter under the adaptive choice.
    pub fn with_short_series_factor(mut self, factor: usize) -> Self {
        self.short_series_factor = factor;
        self
    }

    /// Sets the steady-state switch tolerance of the collapsing filter.
    pub fn with_filter_epsilon(mut self, epsilon: f64) -> Self {
        self.filter_epsilon = epsilon;
        self
    }

    /// Sets the GLS solver configuration.
    pub fn with_gls(mut self, gls: GlsConfig) -> Self {
        self.gls = gls;
        self
    }

    /// Enables or disables the observed-information computation at the optimum.
    pub fn with_compute_information(mut self, compute: bool) -> Self {
        self.compute_information = compute;
        self
    }

    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_likelihood(&self) -> bool {
        self.max_likelihood
    }

    pub fn filter(&self) -> FilterChoice {
        self.filter
    }

    pub fn regressor_threshold(&self) -> usize {
        self.regressor_threshold
    }

    pub fn short_series_factor(&self) -> usize {
        self.short_series_factor
    }

    pub fn filter_epsilon(&self) -> f64 {
        self.filter_epsilon
    }

    pub fn gls(&self) -> &GlsConfig {
        &self.gls
    }

    pub fn compute_information(&self) -> bool {
        self.compute_information
    }

    /// Filter used for a design with `columns` columns, `rows` differenced
    /// observations and filter memory `r`.
    pub fn filter_kind(&self, columns: usize, rows: usize, r: usize) -> FilterKind {
        match self.filter {
            FilterChoice::Collapsing => FilterKind::Collapsing,
            FilterChoice::Ansley => FilterKind::Ansley,
            FilterChoice::Adaptive => {
                if columns >= self.regressor_threshold || rows < self.short_series_factor * r {
                    FilterKind::Ansley
                } else {
                    FilterKind::Collapsing
                }
            }
        }
    }

    /// Validates this configuration.
    ///
    /// Returns an error for a zero iteration bound, a non-positive or
    /// non-finite tolerance, a negative or non-finite switch tolerance, or
    /// an invalid GLS configuration.
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.max_iters == 0 {
            return Err(EstimationError::InvalidConfig(
                "max_iters must be at least 1".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(EstimationError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !self.filter_epsilon.is_finite() || self.filter_epsilon < 0.0 {
            return Err(EstimationError::InvalidConfig(format!(
                "filter epsilon must be non-negative, got {}",
                self.filter_epsilon
            )));
        }
        self.gls.validate()?;
        Ok(())
    }
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self::new()
    }
}
