//! # regarima-arma
//!
//! Stationary ARMA(p,q) models and the filters that turn a series into
//! standardised one-step prediction errors for the concentrated
//! likelihood.
//!
//! ## Workflow
//!
//! ```mermaid
//! graph LR
//!     A["ArmaSpec::new(phi, theta, sigma2)?"] -->|"autocovariances"| B["c0[0..r]"]
//!     B -->|"initialize(&spec, n)?"| C["dyn ArmaFilter"]
//!     C -->|"filter(y)?"| D["Filtered { values, log_det }"]
//!     M["ParameterMapping::map(&params)?"] --> A
//! ```
//!
//! ## Filters
//!
//! ```
//! use ndarray::Array1;
//! use regarima_arma::{ArmaFilter, ArmaSpec, FilterKind};
//!
//! let spec = ArmaSpec::new(vec![0.6, -0.2], vec![0.3], 1.0).unwrap();
//! let y = Array1::from_shape_fn(40, |t| (t as f64 * 0.7).cos());
//!
//! let mut fast = FilterKind::Collapsing.create(1e-13);
//! let mut exact = FilterKind::Ansley.create(1e-13);
//! fast.initialize(&spec, y.len()).unwrap();
//! exact.initialize(&spec, y.len()).unwrap();
//!
//! let a = fast.filter(y.view()).unwrap();
//! let b = exact.filter(y.view()).unwrap();
//! assert!((a.log_det - b.log_det).abs() < 1e-8);
//! ```
//!
//! ## Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | phi | [`ArmaSpec::ar()`] | AR coefficients, `y_t = Σ φ_i y_{t-i} + …` |
//! | theta | [`ArmaSpec::ma()`] | MA coefficients, `… + ε_t + Σ θ_j ε_{t-j}` |
//! | sigma2 | [`ArmaSpec::sigma2()`] | innovation variance |
//! | r | [`ArmaOrder::r()`] | filter memory `max(p, q+1)` |
//! | logdet | [`Filtered::log_det`] | `ln det` of the unit-variance covariance matrix |

mod autocov;
mod error;
mod filter;
mod mapping;
mod order;
mod spec;

pub(crate) mod params;
pub(crate) mod state_space;

pub use autocov::{autocovariances, ma_autocovariances, psi_weights};
pub use error::ArmaError;
pub use filter::{
    AnsleyFilter, ArmaFilter, CollapsingFilter, DEFAULT_EPSILON, FilterKind, Filtered,
};
pub use mapping::{DirectMapping, PacfMapping, ParameterMapping};
pub use order::ArmaOrder;
pub use spec::ArmaSpec;
