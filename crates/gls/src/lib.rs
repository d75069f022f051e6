//! # regarima-gls
//!
//! Generalised least squares for regressions with stationary ARMA
//! errors, with the regression coefficients and the innovation variance
//! concentrated out of the Gaussian likelihood.
//!
//! ```mermaid
//! graph LR
//!     A["RegressionProblem::new(y)?"] -->|"with_mean / with_regressor / with_differencing"| B["cached design"]
//!     B -->|"GlsSolver::solve(&problem, &arma, &mut filter)?"| C["ConcentratedLikelihood"]
//!     C --> D[".log_likelihood()"]
//!     C --> E[".coefficients() / .bvar()"]
//!     C --> F[".residuals()"]
//! ```
//!
//! Missing observations (NaN in the response) enter as impulse dummy
//! columns; the solver corrects the log-determinant so the result is the
//! exact likelihood of the observed data.

mod config;
mod error;
mod likelihood;
mod problem;
mod solver;

pub use config::GlsConfig;
pub use error::GlsError;
pub use likelihood::ConcentratedLikelihood;
pub use problem::RegressionProblem;
pub use solver::GlsSolver;
