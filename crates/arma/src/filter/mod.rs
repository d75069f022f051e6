//! Likelihood filters for stationary ARMA processes.
//!
//! A filter turns a series `y` into standardised one-step prediction
//! errors `e = L⁻¹ y` (with `Ω = L L'` the autocovariance matrix of the
//! process normalised to unit innovation variance) and reports
//! `ln det Ω`. Two strategies implement [`ArmaFilter`]:
//!
//! | Filter | Method | Cost | Exact |
//! |--------|--------|------|-------|
//! | [`CollapsingFilter`] | Chandrasekhar-type recursion, frozen once the gain has converged | `O(n·r)`, small constant | up to the switch tolerance |
//! | [`AnsleyFilter`] | banded Cholesky of the AR-transformed covariance | `O(n·m²)` | yes |
//!
//! The data-independent work (gain sequence, band factor, determinant)
//! is done once in [`ArmaFilter::initialize`]; [`ArmaFilter::filter`]
//! then only reads it, so the same initialised filter can process the
//! response and every regressor column.

mod ansley;
mod collapsing;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::ArmaError;
use crate::spec::ArmaSpec;

pub use ansley::AnsleyFilter;
pub use collapsing::{CollapsingFilter, DEFAULT_EPSILON};

/// Output of one filter pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Filtered {
    /// Standardised prediction errors, one per observation.
    pub values: Array1<f64>,
    /// `ln det Ω` of the normalised covariance matrix.
    pub log_det: f64,
}

/// Available filter strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterKind {
    /// [`CollapsingFilter`].
    #[default]
    Collapsing,
    /// [`AnsleyFilter`].
    Ansley,
}

impl FilterKind {
    /// Creates a fresh, uninitialised filter of this kind.
    ///
    /// `epsilon` is the steady-state switch tolerance of the collapsing
    /// filter; the Ansley filter ignores it.
    pub fn create(self, epsilon: f64) -> Box<dyn ArmaFilter> {
        match self {
            FilterKind::Collapsing => Box::new(CollapsingFilter::new().with_epsilon(epsilon)),
            FilterKind::Ansley => Box::new(AnsleyFilter::new()),
        }
    }
}

/// Common interface of the ARMA likelihood filters.
///
/// Instances are never shared between concurrent evaluations: obtain an
/// independent copy with [`ArmaFilter::exemplar`] for each one.
pub trait ArmaFilter: Send + Sync + std::fmt::Debug {
    /// Prepares the filter for `arma` and series of length `n`.
    ///
    /// # Errors
    ///
    /// Returns [`ArmaError::FilterBreakdown`] when a prediction variance
    /// becomes non-positive or NaN, or [`ArmaError::Linalg`] when the
    /// covariance cannot be factorised.
    fn initialize(&mut self, arma: &ArmaSpec, n: usize) -> Result<(), ArmaError>;

    /// Series length the filter was initialised for (0 before initialisation).
    fn series_length(&self) -> usize;

    /// `ln det Ω` for the initialised model and length.
    fn log_determinant(&self) -> f64;

    /// Filters one series of length [`ArmaFilter::series_length`].
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArmaError::NotInitialized`] | called before `initialize` |
    /// | [`ArmaError::DimensionMismatch`] | `y` has the wrong length |
    fn filter(&self, y: ArrayView1<'_, f64>) -> Result<Filtered, ArmaError>;

    /// Filters every column of `x`, reusing the initialised gains.
    ///
    /// # Errors
    ///
    /// Same as [`ArmaFilter::filter`].
    fn filter_columns(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ArmaError> {
        let mut out = Array2::zeros(x.raw_dim());
        for (j, col) in x.columns().into_iter().enumerate() {
            let filtered = self.filter(col)?;
            out.column_mut(j).assign(&filtered.values);
        }
        Ok(out)
    }

    /// A fresh, uninitialised instance with the same configuration.
    fn exemplar(&self) -> Box<dyn ArmaFilter>;

    /// The strategy implemented by this filter.
    fn kind(&self) -> FilterKind;
}

/// Shared length check for `filter` implementations.
fn check_length(expected: usize, y: ArrayView1<'_, f64>) -> Result<(), ArmaError> {
    if y.len() != expected {
        return Err(ArmaError::DimensionMismatch {
            expected,
            got: y.len(),
        });
    }
    Ok(())
}
