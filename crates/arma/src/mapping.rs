//! Mappings between optimiser vectors and ARMA specifications.
//!
//! The vector layout is `[φ-part (p values), θ-part (q values)]` for both
//! mappings. Mapped specifications always carry unit innovation variance;
//! the variance is concentrated out of the likelihood.

use std::fmt::Debug;

use crate::error::ArmaError;
use crate::order::ArmaOrder;
use crate::params::{coeffs_to_unconstrained, is_stable, unconstrained_to_coeffs};
use crate::spec::ArmaSpec;

/// Bijection between an optimisation vector and admissible ARMA models.
pub trait ParameterMapping: Send + Sync + Debug {
    /// Orders of the mapped models.
    fn order(&self) -> ArmaOrder;

    /// Length of the optimisation vector.
    fn dim(&self) -> usize {
        self.order().n_params()
    }

    /// True when `params` lies in the domain of [`ParameterMapping::map`].
    fn check_boundaries(&self, params: &[f64]) -> bool;

    /// Maps `params` to a unit-variance specification.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArmaError::DimensionMismatch`] | `params.len() != dim()` |
    /// | [`ArmaError::OutOfDomain`] | non-finite entries |
    /// | [`ArmaError::NonStationary`] | AR part outside the stationary region |
    /// | [`ArmaError::NonInvertible`] | MA part outside the invertible region |
    fn map(&self, params: &[f64]) -> Result<ArmaSpec, ArmaError>;

    /// Inverse of [`ParameterMapping::map`].
    ///
    /// # Errors
    ///
    /// Returns [`ArmaError::OutOfDomain`] when `spec` has other orders or
    /// cannot be represented.
    fn parameters_of(&self, spec: &ArmaSpec) -> Result<Vec<f64>, ArmaError>;

    /// Human-readable name of parameter `i`.
    fn description(&self, i: usize) -> Option<String>;

    /// `(lower, upper)` bounds of parameter `i`, for reporting.
    fn bounds(&self, i: usize) -> Option<(f64, f64)>;
}

fn check_dim(order: ArmaOrder, params: &[f64]) -> Result<(), ArmaError> {
    if params.len() != order.n_params() {
        return Err(ArmaError::DimensionMismatch {
            expected: order.n_params(),
            got: params.len(),
        });
    }
    Ok(())
}

fn check_order(order: ArmaOrder, spec: &ArmaSpec) -> Result<(), ArmaError> {
    if spec.order() != order {
        return Err(ArmaError::OutOfDomain(format!(
            "expected ARMA({}, {}), got ARMA({}, {})",
            order.p(),
            order.q(),
            spec.order().p(),
            spec.order().q()
        )));
    }
    Ok(())
}

fn coefficient_name(order: ArmaOrder, i: usize) -> Option<String> {
    if i < order.p() {
        Some(format!("phi({})", i + 1))
    } else if i < order.n_params() {
        Some(format!("theta({})", i - order.p() + 1))
    } else {
        None
    }
}

fn negated(v: &[f64]) -> Vec<f64> {
    v.iter().map(|x| -x).collect()
}

/// Unconstrained parameterisation through partial autocorrelations.
///
/// Each coordinate goes through `tanh` into `(-1, 1)` and the Levinson–Durbin
/// recursion; the MA polynomial `1 + Σ θ_j B^j` is built from the
/// negated recursion output. Every finite vector maps to a stationary and
/// invertible model.
///
/// # Example
///
/// ```
/// use regarima_arma::{ArmaOrder, PacfMapping, ParameterMapping};
///
/// let mapping = PacfMapping::new(ArmaOrder::new(1, 1));
/// let spec = mapping.map(&[0.5f64.atanh(), 0.0]).unwrap();
/// assert!((spec.ar()[0] - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacfMapping {
    order: ArmaOrder,
}

impl PacfMapping {
    pub fn new(order: ArmaOrder) -> Self {
        Self { order }
    }
}

impl ParameterMapping for PacfMapping {
    fn order(&self) -> ArmaOrder {
        self.order
    }

    fn check_boundaries(&self, params: &[f64]) -> bool {
        params.len() == self.dim() && params.iter().all(|v| v.is_finite())
    }

    fn map(&self, params: &[f64]) -> Result<ArmaSpec, ArmaError> {
        check_dim(self.order, params)?;
        if !self.check_boundaries(params) {
            return Err(ArmaError::OutOfDomain("non-finite parameter".into()));
        }
        let (alpha, beta) = params.split_at(self.order.p());
        let ar = unconstrained_to_coeffs(alpha);
        let neg_ma = unconstrained_to_coeffs(beta);
        // tanh saturates at ±1 for |x| > ~19, which lands on the boundary.
        if !is_stable(&neg_ma) {
            return Err(ArmaError::NonInvertible);
        }
        ArmaSpec::new(ar, negated(&neg_ma), 1.0)
    }

    fn parameters_of(&self, spec: &ArmaSpec) -> Result<Vec<f64>, ArmaError> {
        check_order(self.order, spec)?;
        let mut params = coeffs_to_unconstrained(spec.ar())
            .ok_or_else(|| ArmaError::OutOfDomain("AR part is not stationary".into()))?;
        let ma = coeffs_to_unconstrained(&negated(spec.ma()))
            .ok_or_else(|| ArmaError::OutOfDomain("MA part is not invertible".into()))?;
        params.extend(ma);
        Ok(params)
    }

    fn description(&self, i: usize) -> Option<String> {
        coefficient_name(self.order, i).map(|name| format!("atanh pacf of {name}"))
    }

    fn bounds(&self, i: usize) -> Option<(f64, f64)> {
        (i < self.dim()).then_some((f64::NEG_INFINITY, f64::INFINITY))
    }
}

/// The coefficients themselves, restricted to the stationary and
/// invertible region.
///
/// Not surjective onto `R^(p+q)`: vectors outside the region are rejected
/// by [`ParameterMapping::check_boundaries`] before any model is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectMapping {
    order: ArmaOrder,
}

impl DirectMapping {
    pub fn new(order: ArmaOrder) -> Self {
        Self { order }
    }
}

/// Binomial coefficient as `f64`.
fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

impl ParameterMapping for DirectMapping {
    fn order(&self) -> ArmaOrder {
        self.order
    }

    fn check_boundaries(&self, params: &[f64]) -> bool {
        if params.len() != self.dim() || !params.iter().all(|v| v.is_finite()) {
            return false;
        }
        let (ar, ma) = params.split_at(self.order.p());
        is_stable(ar) && is_stable(&negated(ma))
    }

    fn map(&self, params: &[f64]) -> Result<ArmaSpec, ArmaError> {
        check_dim(self.order, params)?;
        if !params.iter().all(|v| v.is_finite()) {
            return Err(ArmaError::OutOfDomain("non-finite parameter".into()));
        }
        let (ar, ma) = params.split_at(self.order.p());
        if !is_stable(ar) {
            return Err(ArmaError::NonStationary);
        }
        if !is_stable(&negated(ma)) {
            return Err(ArmaError::NonInvertible);
        }
        ArmaSpec::new(ar.to_vec(), ma.to_vec(), 1.0)
    }

    fn parameters_of(&self, spec: &ArmaSpec) -> Result<Vec<f64>, ArmaError> {
        check_order(self.order, spec)?;
        let params: Vec<f64> = spec.ar().iter().chain(spec.ma()).copied().collect();
        if !self.check_boundaries(&params) {
            return Err(ArmaError::OutOfDomain(
                "coefficients outside the admissible region".into(),
            ));
        }
        Ok(params)
    }

    fn description(&self, i: usize) -> Option<String> {
        coefficient_name(self.order, i)
    }

    /// `|c_k| < C(m, k)` holds for every coefficient of a polynomial of
    /// degree `m` with all roots outside the unit circle.
    fn bounds(&self, i: usize) -> Option<(f64, f64)> {
        let (degree, k) = if i < self.order.p() {
            (self.order.p(), i + 1)
        } else if i < self.dim() {
            (self.order.q(), i - self.order.p() + 1)
        } else {
            return None;
        };
        let b = binomial(degree, k);
        Some((-b, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pacf_mapping_round_trip() {
        let mapping = PacfMapping::new(ArmaOrder::new(2, 2));
        let spec = ArmaSpec::new(vec![0.5, -0.3], vec![0.4, 0.2], 1.0).unwrap();
        let params = mapping.parameters_of(&spec).unwrap();
        let back = mapping.map(&params).unwrap();
        for (a, b) in back.ar().iter().zip(spec.ar()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
        for (a, b) in back.ma().iter().zip(spec.ma()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn pacf_mapping_always_admissible() {
        let mapping = PacfMapping::new(ArmaOrder::new(2, 2));
        for params in [[3.0, -2.5, 4.0, 1.5], [-5.0, 5.0, -5.0, 5.0], [0.0; 4]] {
            let spec = mapping.map(&params).unwrap();
            assert!(spec.is_invertible());
            assert!(is_stable(spec.ar()));
        }
    }

    #[test]
    fn pacf_mapping_ma2_sign() {
        // Second MA partial autocorrelation alone gives θ₂ = -κ₂.
        let mapping = PacfMapping::new(ArmaOrder::new(0, 2));
        let spec = mapping.map(&[0.0, 0.5f64.atanh()]).unwrap();
        assert_abs_diff_eq!(spec.ma()[0], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(spec.ma()[1], -0.5, epsilon = 1e-12);
    }

    #[test]
    fn pacf_mapping_rejects_nan() {
        let mapping = PacfMapping::new(ArmaOrder::new(1, 0));
        assert!(!mapping.check_boundaries(&[f64::NAN]));
        assert!(matches!(
            mapping.map(&[f64::NAN]),
            Err(ArmaError::OutOfDomain(_))
        ));
    }

    #[test]
    fn direct_mapping_rejects_explosive_ar() {
        let mapping = DirectMapping::new(ArmaOrder::new(1, 0));
        assert!(!mapping.check_boundaries(&[1.2]));
        assert_eq!(mapping.map(&[1.2]).unwrap_err(), ArmaError::NonStationary);
        assert!(mapping.check_boundaries(&[0.5]));
    }

    #[test]
    fn direct_mapping_rejects_non_invertible_ma() {
        let mapping = DirectMapping::new(ArmaOrder::new(0, 1));
        assert_eq!(mapping.map(&[-1.5]).unwrap_err(), ArmaError::NonInvertible);
    }

    #[test]
    fn direct_mapping_bounds_are_binomial() {
        let mapping = DirectMapping::new(ArmaOrder::new(3, 1));
        assert_eq!(mapping.bounds(0), Some((-3.0, 3.0)));
        assert_eq!(mapping.bounds(1), Some((-3.0, 3.0)));
        assert_eq!(mapping.bounds(2), Some((-1.0, 1.0)));
        assert_eq!(mapping.bounds(3), Some((-1.0, 1.0)));
        assert_eq!(mapping.bounds(4), None);
    }

    #[test]
    fn descriptions() {
        let mapping = DirectMapping::new(ArmaOrder::new(1, 2));
        assert_eq!(mapping.description(0).as_deref(), Some("phi(1)"));
        assert_eq!(mapping.description(2).as_deref(), Some("theta(2)"));
        assert_eq!(mapping.description(3), None);
    }

    #[test]
    fn wrong_order_is_out_of_domain() {
        let mapping = DirectMapping::new(ArmaOrder::new(1, 0));
        let spec = ArmaSpec::new(vec![0.2, 0.1], vec![], 1.0).unwrap();
        assert!(matches!(
            mapping.parameters_of(&spec),
            Err(ArmaError::OutOfDomain(_))
        ));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let mapping = PacfMapping::new(ArmaOrder::new(1, 1));
        assert!(matches!(
            mapping.map(&[0.1]),
            Err(ArmaError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn mappings_are_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<PacfMapping>();
        assert_impl::<DirectMapping>();
        assert_impl::<Box<dyn ParameterMapping>>();
    }
}
