//! Configuration of the GLS solver.

use crate::error::GlsError;

/// Tunables of [`crate::GlsSolver`].
///
/// # Example
///
/// ```
/// use regarima_gls::GlsConfig;
///
/// let config = GlsConfig::new().with_rank_tolerance(1e-10);
/// assert!(config.rescale());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GlsConfig {
    /// Rescale response and columns to unit root-mean-square before filtering.
    rescale: bool,
    /// Relative threshold below which a column counts as dependent.
    rank_tolerance: f64,
}

impl GlsConfig {
    /// Defaults: `rescale = true`, `rank_tolerance = 1e-12`.
    pub fn new() -> Self {
        Self {
            rescale: true,
            rank_tolerance: 1e-12,
        }
    }

    /// Enables or disables rescaling.
    pub fn with_rescale(mut self, rescale: bool) -> Self {
        self.rescale = rescale;
        self
    }

    /// Sets the rank-detection tolerance.
    pub fn with_rank_tolerance(mut self, tolerance: f64) -> Self {
        self.rank_tolerance = tolerance;
        self
    }

    /// Returns whether columns are rescaled.
    pub fn rescale(&self) -> bool {
        self.rescale
    }

    /// Returns the rank-detection tolerance.
    pub fn rank_tolerance(&self) -> f64 {
        self.rank_tolerance
    }

    /// Validates this configuration.
    ///
    /// Returns an error if the rank tolerance is outside `[0, 1)` or NaN.
    pub fn validate(&self) -> Result<(), GlsError> {
        if !(0.0..1.0).contains(&self.rank_tolerance) {
            return Err(GlsError::InvalidTolerance(self.rank_tolerance));
        }
        Ok(())
    }
}

impl Default for GlsConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GlsConfig::default();
        assert!(config.rescale());
        assert_eq!(config.rank_tolerance(), 1e-12);
    }

    #[test]
    fn rejects_bad_tolerance() {
        for tol in [-1e-3, 1.0, f64::NAN] {
            let config = GlsConfig::new().with_rank_tolerance(tol);
            assert!(matches!(
                config.validate(),
                Err(GlsError::InvalidTolerance(_))
            ));
        }
    }
}
