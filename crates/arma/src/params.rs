//! Partial-autocorrelation (PACF) transforms of polynomial coefficients.
//!
//! The Levinson–Durbin recursion maps partial autocorrelations in
//! `(-1, 1)` to stationary AR coefficients (Jones 1980, Monahan 1984);
//! the step-down recursion inverts it and doubles as a stationarity test.
//! Coefficients follow the convention `1 - Σ c_i B^i`.

/// Maps partial autocorrelations to polynomial coefficients (Levinson–Durbin).
pub fn pacf_to_coeffs(r: &[f64]) -> Vec<f64> {
    let p = r.len();
    if p == 0 {
        return Vec::new();
    }
    let mut phi = vec![0.0; p];
    let mut prev = vec![0.0; p];
    phi[0] = r[0];
    for k in 1..p {
        prev[..k].copy_from_slice(&phi[..k]);
        phi[k] = r[k];
        for j in 0..k {
            phi[j] = prev[j] - r[k] * prev[k - 1 - j];
        }
    }
    phi
}

/// Step-down recursion: recovers the partial autocorrelations of `1 - Σ c_i B^i`.
///
/// Returns `None` when some partial autocorrelation has modulus `>= 1`,
/// i.e. when the polynomial has a root on or inside the unit circle.
pub fn coeffs_to_pacf(coeffs: &[f64]) -> Option<Vec<f64>> {
    let p = coeffs.len();
    let mut r = vec![0.0; p];
    let mut cur = coeffs.to_vec();
    for k in (0..p).rev() {
        let kappa = cur[k];
        if !kappa.is_finite() || kappa.abs() >= 1.0 {
            return None;
        }
        r[k] = kappa;
        let denom = 1.0 - kappa * kappa;
        let prev: Vec<f64> = (0..k)
            .map(|j| (cur[j] + kappa * cur[k - 1 - j]) / denom)
            .collect();
        cur = prev;
    }
    Some(r)
}

/// True when `1 - Σ c_i B^i` has all its roots strictly outside the unit circle.
pub fn is_stable(coeffs: &[f64]) -> bool {
    coeffs_to_pacf(coeffs).is_some()
}

/// Unconstrained reals → coefficients (`tanh` then Levinson–Durbin).
pub fn unconstrained_to_coeffs(alpha: &[f64]) -> Vec<f64> {
    let r: Vec<f64> = alpha.iter().map(|a| a.tanh()).collect();
    pacf_to_coeffs(&r)
}

/// Coefficients → unconstrained reals (step-down then `atanh`).
///
/// Returns `None` for unstable polynomials.
pub fn coeffs_to_unconstrained(coeffs: &[f64]) -> Option<Vec<f64>> {
    coeffs_to_pacf(coeffs).map(|r| r.iter().map(|k| k.atanh()).collect())
}
