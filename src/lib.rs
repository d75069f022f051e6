//! # regarima
//!
//! Concentrated-likelihood estimation of regressions with stationary ARMA
//! errors. This crate re-exports the workspace:
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`linalg`] | `regarima-linalg` | dense and banded kernels, Householder QR |
//! | [`arma`] | `regarima-arma` | models, autocovariances, filters, parameter mappings |
//! | [`gls`] | `regarima-gls` | regression problems and the GLS solver |
//! | [`estimation`] | `regarima-estimation` | parameter search and observed information |
//!
//! ```
//! use ndarray::Array1;
//! use regarima::{ArmaOrder, ArmaSpec, EstimationConfig, GlsArmaEstimator, PacfMapping, RegressionProblem};
//!
//! let y = Array1::from_shape_fn(80, |t| (t as f64 * 0.7).sin() + 0.01 * t as f64);
//! let problem = RegressionProblem::new(y)?.with_mean(true);
//! let estimator = GlsArmaEstimator::new(problem, EstimationConfig::default())?;
//! let start = ArmaSpec::new(vec![0.0], vec![0.0], 1.0)?;
//! let estimate = estimator.optimize(&start, &PacfMapping::new(ArmaOrder::new(1, 1)))?;
//! println!("phi = {:?}, theta = {:?}", estimate.spec().ar(), estimate.spec().ma());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod logging;

pub use regarima_arma as arma;
pub use regarima_estimation as estimation;
pub use regarima_gls as gls;
pub use regarima_linalg as linalg;

pub use regarima_arma::{
    AnsleyFilter, ArmaError, ArmaFilter, ArmaOrder, ArmaSpec, CollapsingFilter, DirectMapping,
    FilterKind, Filtered, PacfMapping, ParameterMapping,
};
pub use regarima_estimation::{
    ArmaEstimate, ArmaInference, EstimationConfig, EstimationError, FilterChoice,
    GlsArmaEstimator, Minimizer, NelderMeadMinimizer,
};
pub use regarima_gls::{ConcentratedLikelihood, GlsConfig, GlsError, GlsSolver, RegressionProblem};
