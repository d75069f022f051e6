//! Observed information of the ARMA coefficients.
//!
//! Derivatives of `-log L` are taken by central differences (`finitediff`)
//! in the coefficient space `c = (φ, θ)`. The differences run in the
//! scaled coordinate `u` with `c = ĉ + STEP_SCALE · u`, so the unit
//! `sqrt(ε)` step of `finitediff` becomes a step of about `1.5e-4` in the
//! coefficients, which keeps the nested second differences well above
//! the rounding level of the likelihood.

use finitediff::FiniteDiff;
use ndarray::{Array1, Array2};
use regarima_arma::ArmaSpec;
use regarima_linalg::spd_inverse;

use crate::error::EstimationError;
use crate::estimator::GlsArmaEstimator;

const STEP_SCALE: f64 = 1e4;

/// Score, observed information and asymptotic covariance of the ARMA
/// coefficients at one point.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmaInference {
    coefficients: Array1<f64>,
    score: Array1<f64>,
    information: Array2<f64>,
    covariance: Array2<f64>,
}

impl ArmaInference {
    /// Coefficients `(φ_1..φ_p, θ_1..θ_q)` at which the derivatives were taken.
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    /// Gradient of `-log L`; close to zero at an interior optimum.
    pub fn score(&self) -> &Array1<f64> {
        &self.score
    }

    /// Hessian of `-log L` (observed information), symmetrised.
    pub fn information(&self) -> &Array2<f64> {
        &self.information
    }

    /// Inverse of the observed information.
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Square roots of the covariance diagonal.
    pub fn std_errors(&self) -> Array1<f64> {
        self.covariance.diag().mapv(f64::sqrt)
    }
}

fn symmetrize(h: &mut Array2<f64>) {
    let k = h.nrows();
    for i in 0..k {
        for j in i + 1..k {
            let avg = 0.5 * (h[[i, j]] + h[[j, i]]);
            h[[i, j]] = avg;
            h[[j, i]] = avg;
        }
    }
}

/// Observed information of `estimator`'s likelihood at `spec`.
pub(crate) fn observed_information(
    estimator: &GlsArmaEstimator,
    spec: &ArmaSpec,
) -> Result<ArmaInference, EstimationError> {
    let p = spec.order().p();
    let center: Vec<f64> = spec.ar().iter().chain(spec.ma()).copied().collect();
    let k = center.len();

    let neg_log_likelihood = |u: &Vec<f64>| -> f64 {
        let c: Vec<f64> = center
            .iter()
            .zip(u)
            .map(|(c, u)| c + STEP_SCALE * u)
            .collect();
        let (ar, ma) = c.split_at(p);
        ArmaSpec::new(ar.to_vec(), ma.to_vec(), 1.0)
            .ok()
            .and_then(|s| estimator.evaluate(&s).ok())
            .map_or(f64::NAN, |ll| -ll.log_likelihood())
    };
    let gradient = |u: &Vec<f64>| -> Vec<f64> { u.central_diff(&neg_log_likelihood) };

    let origin = vec![0.0; k];
    let score_u = gradient(&origin);
    let hessian_u = origin.central_hessian(&gradient);

    let score = Array1::from_iter(score_u.iter().map(|g| g / STEP_SCALE));
    let mut information = Array2::from_shape_fn((k, k), |(i, j)| {
        hessian_u[i][j] / (STEP_SCALE * STEP_SCALE)
    });
    if score.iter().chain(information.iter()).any(|v| !v.is_finite()) {
        return Err(EstimationError::InformationUnavailable(
            "likelihood not defined around the estimate".into(),
        ));
    }
    symmetrize(&mut information);
    let covariance = spd_inverse(information.view()).map_err(|e| {
        EstimationError::InformationUnavailable(format!("information not positive definite: {e}"))
    })?;

    Ok(ArmaInference {
        coefficients: Array1::from_vec(center),
        score,
        information,
        covariance,
    })
}
