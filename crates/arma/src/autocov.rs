//! Theoretical autocovariances of ARMA processes.
//!
//! For `y_t = Σ φ_i y_{t-i} + ε_t + Σ θ_j ε_{t-j}` the autocovariances
//! satisfy
//!
//! ```text
//! γ(k) - Σ φ_i γ(|k - i|) = σ² Σ_{j=k..q} θ_j ψ_{j-k}      (θ_0 = 1)
//! ```
//!
//! The first `p + 1` equations form a small linear system; later lags
//! follow from the AR recursion.

use ndarray::{Array1, Array2};
use regarima_linalg::solve;

use crate::error::ArmaError;
use crate::spec::ArmaSpec;

/// MA(∞) weights `ψ_0 .. ψ_{n-1}` of the process.
pub fn psi_weights(ar: &[f64], ma: &[f64], n: usize) -> Vec<f64> {
    let mut psi = vec![0.0; n];
    if n == 0 {
        return psi;
    }
    psi[0] = 1.0;
    for j in 1..n {
        let mut v = ma.get(j - 1).copied().unwrap_or(0.0);
        for i in 1..=j.min(ar.len()) {
            v += ar[i - 1] * psi[j - i];
        }
        psi[j] = v;
    }
    psi
}

/// Autocovariances of the pure MA part `Σ θ_k θ_{k+d}` (`θ_0 = 1`), lags `0..=q`.
pub fn ma_autocovariances(ma: &[f64]) -> Vec<f64> {
    let q = ma.len();
    let theta = |k: usize| if k == 0 { 1.0 } else { ma[k - 1] };
    (0..=q)
        .map(|d| (0..=q - d).map(|k| theta(k) * theta(k + d)).sum())
        .collect()
}

/// Autocovariances `γ(0) .. γ(nlags - 1)` of `spec`.
///
/// # Errors
///
/// Returns [`ArmaError::Linalg`] if the Yule–Walker type system is
/// singular, which cannot happen for a stationary specification.
pub fn autocovariances(spec: &ArmaSpec, nlags: usize) -> Result<Array1<f64>, ArmaError> {
    let ar = spec.ar();
    let ma = spec.ma();
    let p = ar.len();
    let q = ma.len();
    let sigma2 = spec.sigma2();

    let psi = psi_weights(ar, ma, q + 1);
    let theta = |k: usize| if k == 0 { 1.0 } else { ma[k - 1] };
    let rhs = |k: usize| -> f64 {
        if k > q {
            0.0
        } else {
            sigma2 * (k..=q).map(|j| theta(j) * psi[j - k]).sum::<f64>()
        }
    };

    let mut a = Array2::<f64>::zeros((p + 1, p + 1));
    let mut b = Array1::<f64>::zeros(p + 1);
    for k in 0..=p {
        a[[k, k]] += 1.0;
        for i in 1..=p {
            a[[k, k.abs_diff(i)]] -= ar[i - 1];
        }
        b[k] = rhs(k);
    }
    let head = solve(a.view(), b.view())?;

    let mut gamma = Vec::with_capacity(nlags.max(p + 1));
    gamma.extend(head.iter().copied());
    for k in p + 1..nlags {
        let mut v = rhs(k);
        for i in 1..=p {
            v += ar[i - 1] * gamma[k - i];
        }
        gamma.push(v);
    }
    gamma.truncate(nlags);
    Ok(Array1::from_vec(gamma))
}
