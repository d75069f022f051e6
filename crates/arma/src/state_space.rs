//! ARMA state-space representation used by the collapsing filter.
//!
//! The state holds the current observation and its forecasts,
//! `x_t = (y_t, y_{t+1|t}, …, y_{t+r-1|t})`, so that
//!
//! ```text
//! x[t+1] = T * x[t] + ψ * e[t+1]     (state transition)
//! y[t]   = x[t][0]                    (observation)
//! ```
//!
//! where `T` shifts the state up by one slot and feeds the AR
//! polynomial back into the last slot. `T` is never formed: the
//! filter only needs `T * v`, which costs `O(r)`.

use ndarray::{Array1, ArrayView1, ArrayViewMut1};

use crate::autocov::autocovariances;
use crate::error::ArmaError;
use crate::spec::ArmaSpec;

/// State-space form of an ARMA(p,q) model normalised to unit innovation variance.
#[derive(Clone, Debug)]
pub(crate) struct StateSpace {
    r: usize,
    ar: Vec<f64>,
    c0: Array1<f64>,
}

impl StateSpace {
    /// Builds the state-space form of `spec`.
    ///
    /// `c0` holds the autocovariances at lags `0..r` divided by `sigma2`,
    /// i.e. the covariance between the state and the observation at the
    /// stationary start.
    pub(crate) fn new(spec: &ArmaSpec) -> Result<Self, ArmaError> {
        let r = spec.order().r();
        let mut c0 = autocovariances(spec, r)?;
        c0.mapv_inplace(|v| v / spec.sigma2());
        Ok(Self {
            r,
            ar: spec.ar().to_vec(),
            c0,
        })
    }

    /// State dimension `r = max(p, q+1)`.
    pub(crate) fn r(&self) -> usize {
        self.r
    }

    /// Normalised autocovariances at lags `0..r`.
    pub(crate) fn c0(&self) -> &Array1<f64> {
        &self.c0
    }

    /// AR feedback term `Σ φ_j v[r-j]` written into the last state slot.
    #[inline]
    fn feedback(&self, v: ArrayView1<'_, f64>) -> f64 {
        self.ar
            .iter()
            .enumerate()
            .map(|(j, phi)| phi * v[self.r - 1 - j])
            .sum()
    }

    /// `v <- T v`.
    #[inline]
    pub(crate) fn transition_in_place(&self, mut v: ArrayViewMut1<'_, f64>) {
        let last = self.feedback(v.view());
        for i in 0..self.r - 1 {
            v[i] = v[i + 1];
        }
        v[self.r - 1] = last;
    }

    /// `T v` as a new vector.
    pub(crate) fn transition(&self, v: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = v.to_owned();
        self.transition_in_place(out.view_mut());
        out
    }

    /// Gain at the stationary start, `T Σ Z' = T c0`.
    pub(crate) fn initial_gain(&self) -> Array1<f64> {
        self.transition(self.c0.view())
    }

    /// Explicit transition matrix, for inspection.
    #[cfg(test)]
    pub(crate) fn transition_matrix(&self) -> ndarray::Array2<f64> {
        let mut t = ndarray::Array2::zeros((self.r, self.r));
        for i in 0..self.r - 1 {
            t[[i, i + 1]] = 1.0;
        }
        for (j, phi) in self.ar.iter().enumerate() {
            t[[self.r - 1, self.r - 1 - j]] = *phi;
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn state_space(ar: &[f64], ma: &[f64]) -> StateSpace {
        StateSpace::new(&ArmaSpec::new(ar.to_vec(), ma.to_vec(), 1.0).unwrap()).unwrap()
    }

    #[test]
    fn ar1() {
        let ss = state_space(&[0.5], &[]);
        assert_eq!(ss.r(), 1);
        assert_abs_diff_eq!(ss.transition_matrix()[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.c0()[0], 1.0 / 0.75, epsilon = 1e-12);
    }

    #[test]
    fn ma1() {
        let ss = state_space(&[], &[0.8]);
        assert_eq!(ss.r(), 2);
        // T = [[0, 1], [0, 0]]
        let t = ss.transition_matrix();
        assert_eq!(t, array![[0.0, 1.0], [0.0, 0.0]]);
    }

    #[test]
    fn arma22() {
        let ss = state_space(&[0.5, -0.3], &[0.4, 0.2]);
        assert_eq!(ss.r(), 3);
        // Last row carries φ_2, φ_1 in front of the last slot.
        let t = ss.transition_matrix();
        assert_eq!(
            t,
            array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, -0.3, 0.5]]
        );
    }

    #[test]
    fn transition_matches_matrix_product() {
        let ss = state_space(&[0.5, -0.3, 0.1], &[0.4]);
        let v = array![1.0, -2.0, 0.5];
        let expected = ss.transition_matrix().dot(&v);
        let got = ss.transition(v.view());
        for i in 0..3 {
            assert_abs_diff_eq!(got[i], expected[i], epsilon = 1e-15);
        }
    }

    #[test]
    fn white_noise_is_degenerate() {
        let ss = state_space(&[], &[]);
        assert_eq!(ss.r(), 1);
        assert_eq!(ss.c0()[0], 1.0);
        assert_eq!(ss.initial_gain()[0], 0.0);
    }

    #[test]
    fn c0_is_normalised_by_sigma2() {
        let spec = ArmaSpec::new(vec![0.5], vec![0.3], 4.0).unwrap();
        let ss = StateSpace::new(&spec).unwrap();
        let unit = state_space(&[0.5], &[0.3]);
        for i in 0..2 {
            assert_abs_diff_eq!(ss.c0()[i], unit.c0()[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StateSpace>();
    }
}
