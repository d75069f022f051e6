//! Stationary ARMA model specifications.

use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::ArmaError;
use crate::order::ArmaOrder;
use crate::params;

/// A stationary ARMA(p,q) model with known coefficients.
///
/// ```text
/// y_t = φ_1 y_{t-1} + … + φ_p y_{t-p} + ε_t + θ_1 ε_{t-1} + … + θ_q ε_{t-q},   ε_t ~ N(0, σ²)
/// ```
///
/// Construction fails fast on non-stationary AR parts, so every
/// `ArmaSpec` in circulation can be filtered. Invertibility of the MA
/// part is not required here; [`ArmaSpec::is_invertible()`] reports it
/// and the parameter mappings enforce it.
///
/// # Example
///
/// ```
/// use regarima_arma::{ArmaError, ArmaSpec};
///
/// let spec = ArmaSpec::new(vec![0.5], vec![0.3], 1.0).unwrap();
/// assert_eq!(spec.order().r(), 2);
///
/// let err = ArmaSpec::new(vec![1.2], vec![], 1.0).unwrap_err();
/// assert!(matches!(err, ArmaError::NonStationary));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ArmaSpec {
    ar: Vec<f64>,
    ma: Vec<f64>,
    sigma2: f64,
}

impl ArmaSpec {
    /// Creates a specification from AR coefficients `phi`, MA coefficients
    /// `theta` and innovation variance `sigma2`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArmaError::NonFiniteCoefficients`] | any coefficient is NaN or infinite |
    /// | [`ArmaError::InvalidVariance`] | `sigma2 <= 0` or not finite |
    /// | [`ArmaError::NonStationary`] | AR roots on or inside the unit circle |
    pub fn new(ar: Vec<f64>, ma: Vec<f64>, sigma2: f64) -> Result<Self, ArmaError> {
        if ar.iter().chain(ma.iter()).any(|c| !c.is_finite()) {
            return Err(ArmaError::NonFiniteCoefficients);
        }
        if !sigma2.is_finite() || sigma2 <= 0.0 {
            return Err(ArmaError::InvalidVariance { sigma2 });
        }
        if !params::is_stable(&ar) {
            return Err(ArmaError::NonStationary);
        }
        Ok(Self { ar, ma, sigma2 })
    }

    /// Unit-variance white noise.
    pub fn white_noise() -> Self {
        Self {
            ar: Vec::new(),
            ma: Vec::new(),
            sigma2: 1.0,
        }
    }

    /// Returns a copy with a different innovation variance.
    ///
    /// # Errors
    ///
    /// Returns [`ArmaError::InvalidVariance`] if `sigma2` is not strictly positive and finite.
    pub fn with_sigma2(&self, sigma2: f64) -> Result<Self, ArmaError> {
        if !sigma2.is_finite() || sigma2 <= 0.0 {
            return Err(ArmaError::InvalidVariance { sigma2 });
        }
        Ok(Self {
            sigma2,
            ..self.clone()
        })
    }

    /// Returns the AR coefficients (`phi`).
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    /// Returns the MA coefficients (`theta`).
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    /// Returns the innovation variance (`sigma2`).
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Returns the `(p, q)` order.
    pub fn order(&self) -> ArmaOrder {
        ArmaOrder::new(self.ar.len(), self.ma.len())
    }

    /// True when the MA polynomial `1 + Σ θ_j B^j` has all roots outside the unit circle.
    pub fn is_invertible(&self) -> bool {
        let neg: Vec<f64> = self.ma.iter().map(|t| -t).collect();
        params::is_stable(&neg)
    }

    /// Generates `n_sim` independent paths of length `n` from this model.
    ///
    /// Each path is driven by Gaussian innovations after a burn-in of 100
    /// steps. Returns an [`Array2<f64>`] with shape `(n, n_sim)`.
    pub fn simulate<R: Rng>(&self, n: usize, n_sim: usize, rng: &mut R) -> Array2<f64> {
        const BURN_IN: usize = 100;

        let mut output = Array2::zeros((n, n_sim));
        if n == 0 || n_sim == 0 {
            return output;
        }
        let Ok(normal) = Normal::new(0.0, self.sigma2.sqrt()) else {
            return output;
        };

        let p = self.ar.len();
        let q = self.ma.len();
        let n_tot = BURN_IN + n;

        for sim in 0..n_sim {
            let eps: Vec<f64> = (0..n_tot).map(|_| normal.sample(rng)).collect();
            let mut y = vec![0.0; n_tot];
            for t in 0..n_tot {
                let mut val = eps[t];
                for i in 0..p.min(t) {
                    val += self.ar[i] * y[t - 1 - i];
                }
                for j in 0..q.min(t) {
                    val += self.ma[j] * eps[t - 1 - j];
                }
                y[t] = val;
            }
            for (i, &val) in y[BURN_IN..].iter().enumerate() {
                output[[i, sim]] = val;
            }
        }
        output
    }
}

impl Default for ArmaSpec {
    fn default() -> Self {
        Self::white_noise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn accessors_round_trip() {
        let spec = ArmaSpec::new(vec![0.5, -0.3], vec![0.4], 2.0).unwrap();
        assert_eq!(spec.ar(), &[0.5, -0.3]);
        assert_eq!(spec.ma(), &[0.4]);
        assert_eq!(spec.sigma2(), 2.0);
        assert_eq!(spec.order(), ArmaOrder::new(2, 1));
    }

    #[test]
    fn rejects_non_stationary() {
        assert_eq!(
            ArmaSpec::new(vec![1.2], vec![], 1.0).unwrap_err(),
            ArmaError::NonStationary
        );
        assert_eq!(
            ArmaSpec::new(vec![1.0], vec![], 1.0).unwrap_err(),
            ArmaError::NonStationary
        );
    }

    #[test]
    fn rejects_bad_variance() {
        assert!(matches!(
            ArmaSpec::new(vec![0.5], vec![], 0.0),
            Err(ArmaError::InvalidVariance { .. })
        ));
        assert!(matches!(
            ArmaSpec::new(vec![0.5], vec![], f64::NAN),
            Err(ArmaError::InvalidVariance { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_coefficients() {
        assert_eq!(
            ArmaSpec::new(vec![], vec![f64::INFINITY], 1.0).unwrap_err(),
            ArmaError::NonFiniteCoefficients
        );
    }

    #[test]
    fn non_invertible_ma_is_allowed_but_reported() {
        let spec = ArmaSpec::new(vec![], vec![1.5], 1.0).unwrap();
        assert!(!spec.is_invertible());
        let spec = ArmaSpec::new(vec![], vec![0.5, 0.3], 1.0).unwrap();
        assert!(spec.is_invertible());
        // 1 + 0.5B - 0.6B^2 has a root inside the unit circle.
        let spec = ArmaSpec::new(vec![], vec![0.5, -0.6], 1.0).unwrap();
        assert!(!spec.is_invertible());
    }

    #[test]
    fn with_sigma2_keeps_coefficients() {
        let spec = ArmaSpec::new(vec![0.5], vec![0.3], 1.0).unwrap();
        let scaled = spec.with_sigma2(4.0).unwrap();
        assert_eq!(scaled.ar(), spec.ar());
        assert_eq!(scaled.ma(), spec.ma());
        assert_eq!(scaled.sigma2(), 4.0);
    }

    #[test]
    fn simulate_shape() {
        let spec = ArmaSpec::new(vec![0.5], vec![], 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(spec.simulate(100, 5, &mut rng).shape(), &[100, 5]);
        assert_eq!(spec.simulate(0, 5, &mut rng).shape(), &[0, 5]);
    }

    #[test]
    fn simulate_deterministic_with_seed() {
        let spec = ArmaSpec::new(vec![0.5], vec![0.3], 1.0).unwrap();
        let a = spec.simulate(50, 3, &mut StdRng::seed_from_u64(7));
        let b = spec.simulate(50, 3, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn simulate_ar1_variance() {
        let phi = 0.7;
        let spec = ArmaSpec::new(vec![phi], vec![], 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(456);
        let col = spec.simulate(10_000, 1, &mut rng).column(0).to_owned();
        let mean = col.mean().unwrap();
        let var = col.mapv(|x| (x - mean).powi(2)).mean().unwrap();
        let expected = 1.0 / (1.0 - phi * phi);
        assert!((var - expected).abs() < 0.2, "var = {var}, expected = {expected}");
    }
}
