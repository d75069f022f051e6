//! Collapsing (Chandrasekhar-type) Kalman filter.
//!
//! The gain recursion runs on two length-`r` vectors instead of the
//! `r x r` state covariance: `K` (the Kalman gain `T P Z'`) and its
//! square-root companion `L`, which carries the rank-one covariance
//! decrement between consecutive steps. With `z = L[0]`:
//!
//! ```text
//! h'  = h - z²
//! L'  = (T L - K z / h) · sqrt(h / h')
//! K'  = K - z · T L
//! ```
//!
//! Everything is normalised to unit innovation variance, so `h`
//! decreases monotonically towards 1. Once `h - 1 <= epsilon` the gain is
//! frozen and the remaining steps are plain fixed-gain updates whose
//! `ln h` contributions are added in bulk.

use ndarray::{Array1, ArrayView1};
use tracing::{debug, trace};

use super::{ArmaFilter, FilterKind, Filtered, check_length};
use crate::error::ArmaError;
use crate::spec::ArmaSpec;
use crate::state_space::StateSpace;

/// Default tolerance on `h - 1` for the switch to the fixed-gain regime.
pub const DEFAULT_EPSILON: f64 = 1e-13;

/// Per-step gain and variance recursion.
#[derive(Clone, Debug)]
struct FilterState {
    gain: Array1<f64>,
    root: Array1<f64>,
    variance: f64,
}

impl FilterState {
    fn start(ss: &StateSpace) -> Result<Self, ArmaError> {
        let variance = ss.c0()[0];
        check_variance(0, variance)?;
        let gain = ss.initial_gain();
        let root = &gain / variance.sqrt();
        Ok(Self {
            gain,
            root,
            variance,
        })
    }

    /// Moves the recursion from step `step - 1` to `step`.
    fn advance(&mut self, ss: &StateSpace, step: usize) -> Result<(), ArmaError> {
        let z = self.root[0];
        let h = self.variance;
        let next = h - z * z;
        check_variance(step, next)?;

        let t_root = ss.transition(self.root.view());
        let ratio = (h / next).sqrt();
        let zh = z / h;
        for i in 0..ss.r() {
            self.root[i] = (t_root[i] - self.gain[i] * zh) * ratio;
            self.gain[i] -= z * t_root[i];
        }
        self.variance = next;
        Ok(())
    }
}

fn check_variance(step: usize, variance: f64) -> Result<(), ArmaError> {
    if variance <= 0.0 || variance.is_nan() {
        return Err(ArmaError::FilterBreakdown { step, variance });
    }
    Ok(())
}

/// Gain sequence computed by [`CollapsingFilter::initialize`].
///
/// `gains[t]` and `variances[t]` belong to step `t`; steps past the
/// last entry reuse it (fixed-gain regime).
#[derive(Clone, Debug)]
struct GainSequence {
    ss: StateSpace,
    n: usize,
    exact: usize,
    gains: Vec<Array1<f64>>,
    variances: Vec<f64>,
    log_det: f64,
}

/// Fast adaptive ARMA filter. See the [module docs](self).
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use regarima_arma::{ArmaFilter, ArmaSpec, CollapsingFilter};
///
/// let spec = ArmaSpec::new(vec![0.5], vec![], 1.0).unwrap();
/// let mut filter = CollapsingFilter::new();
/// filter.initialize(&spec, 3).unwrap();
/// let out = filter.filter(array![1.0, 0.5, 0.25].view()).unwrap();
/// // AR(1): after the first step the errors are y_t - 0.5 y_{t-1}.
/// assert!((out.values[1]).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct CollapsingFilter {
    epsilon: f64,
    prepared: Option<GainSequence>,
}

impl CollapsingFilter {
    /// Filter with the default switch tolerance.
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            prepared: None,
        }
    }

    /// Sets the tolerance on `h - 1` below which the gain is frozen.
    ///
    /// Zero keeps the recursion exact until `h` reaches 1 in floating point.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Switch tolerance.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of steps run with the exact recursion, if initialised.
    ///
    /// Equals the series length when the gain never converged.
    pub fn exact_steps(&self) -> Option<usize> {
        self.prepared.as_ref().map(|p| p.exact)
    }
}

impl Default for CollapsingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArmaFilter for CollapsingFilter {
    fn initialize(&mut self, arma: &ArmaSpec, n: usize) -> Result<(), ArmaError> {
        self.prepared = None;
        let ss = StateSpace::new(arma)?;

        let mut gains = Vec::new();
        let mut variances = Vec::new();
        let mut log_det = 0.0;
        let mut exact = n;

        if n > 0 {
            let mut state = FilterState::start(&ss)?;
            let mut t = 0;
            loop {
                gains.push(state.gain.clone());
                variances.push(state.variance);
                if state.variance - 1.0 <= self.epsilon {
                    log_det += (n - t) as f64 * state.variance.ln();
                    exact = t;
                    debug!(
                        step = t,
                        n,
                        variance = state.variance,
                        "collapsing filter reached steady state"
                    );
                    break;
                }
                log_det += state.variance.ln();
                t += 1;
                if t == n {
                    trace!(n, variance = state.variance, "collapsing filter stayed exact");
                    break;
                }
                state.advance(&ss, t)?;
            }
        }

        self.prepared = Some(GainSequence {
            ss,
            n,
            exact,
            gains,
            variances,
            log_det,
        });
        Ok(())
    }

    fn series_length(&self) -> usize {
        self.prepared.as_ref().map_or(0, |p| p.n)
    }

    fn log_determinant(&self) -> f64 {
        self.prepared.as_ref().map_or(0.0, |p| p.log_det)
    }

    fn filter(&self, y: ArrayView1<'_, f64>) -> Result<Filtered, ArmaError> {
        let prepared = self.prepared.as_ref().ok_or(ArmaError::NotInitialized)?;
        check_length(prepared.n, y)?;

        let ss = &prepared.ss;
        let last = prepared.variances.len().saturating_sub(1);
        let mut mean = Array1::<f64>::zeros(ss.r());
        let mut values = Array1::<f64>::zeros(prepared.n);
        for (t, &obs) in y.iter().enumerate() {
            let row = t.min(last);
            let h = prepared.variances[row];
            let gain = &prepared.gains[row];
            let err = obs - mean[0];
            values[t] = err / h.sqrt();
            ss.transition_in_place(mean.view_mut());
            mean.scaled_add(err / h, gain);
        }
        Ok(Filtered {
            values,
            log_det: prepared.log_det,
        })
    }

    fn exemplar(&self) -> Box<dyn ArmaFilter> {
        Box::new(Self::new().with_epsilon(self.epsilon))
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Collapsing
    }
}
