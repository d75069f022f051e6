//! # regarima-estimation
//!
//! Nonlinear search for the ARMA parameters of a regression with ARMA
//! errors. The regression coefficients and the innovation variance are
//! concentrated out by [`regarima_gls`]; the search only sees the ARMA
//! coefficients, through a [`regarima_arma::ParameterMapping`].
//!
//! ```mermaid
//! graph LR
//!     A["RegressionProblem"] --> B["GlsArmaEstimator::new(problem, config)?"]
//!     B -->|"evaluate(&spec)"| C["ConcentratedLikelihood"]
//!     B -->|"optimize(&start, &mapping)"| D["Minimizer (Nelder–Mead)"]
//!     D -->|"+inf outside the domain"| B
//!     D --> E["ArmaEstimate"]
//!     E -->|"optional"| F["ArmaInference (observed information)"]
//! ```
//!
//! | Concern | Type |
//! |---------|------|
//! | Likelihood of one model | [`GlsArmaEstimator::evaluate`] |
//! | Many models in parallel | [`GlsArmaEstimator::evaluate_many`] |
//! | Parameter search | [`GlsArmaEstimator::optimize`] |
//! | Custom minimizer | [`Minimizer`] |
//! | Filter strategy | [`FilterChoice`] |

mod config;
mod error;
mod estimator;
mod inference;
mod minimizer;
mod objective;
mod result;

pub use config::{EstimationConfig, FilterChoice};
pub use error::EstimationError;
pub use estimator::GlsArmaEstimator;
pub use inference::ArmaInference;
pub use minimizer::{Minimizer, Minimum, NelderMeadMinimizer, Objective};
pub use objective::Criterion;
pub use result::ArmaEstimate;
