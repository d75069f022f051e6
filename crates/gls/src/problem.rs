//! Regression problems with missing values and differencing.
//!
//! A [`RegressionProblem`] holds the raw response (NaN marks a missing
//! observation), an optional mean, named regressors and the differencing
//! degree `d`. The transformed design (differenced response and
//! columns) is built on first use and cached until the problem changes.
//!
//! Column order of the design:
//!
//! | Block | Columns | Content |
//! |-------|---------|---------|
//! | missing dummies | `m` | impulse at each missing position, differenced |
//! | mean | 0 or 1 | ones (a drift term when `d > 0`) |
//! | regressors | `k` | user columns, differenced |
//!
//! Missing positions are filled with zero in the response, so the
//! coefficient of each dummy is minus the interpolated value.

use std::sync::OnceLock;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::GlsError;

#[derive(Clone, Debug, PartialEq)]
struct Regressor {
    name: String,
    values: Array1<f64>,
}

/// Transformed design shared by all evaluations on one problem.
#[derive(Clone, Debug)]
pub(crate) struct Design {
    pub(crate) y: Array1<f64>,
    pub(crate) x: Array2<f64>,
    pub(crate) n_missing: usize,
    pub(crate) names: Vec<String>,
}

/// Applies `(1 - B)^d` and drops the first `d` values.
fn difference(v: ArrayView1<'_, f64>, d: usize) -> Array1<f64> {
    let mut out = v.to_owned();
    for _ in 0..d {
        out = Array1::from_shape_fn(out.len().saturating_sub(1), |t| out[t + 1] - out[t]);
    }
    out
}

/// Response, regressors and missing-value structure of a regression with
/// ARMA errors.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use regarima_gls::RegressionProblem;
///
/// let problem = RegressionProblem::new(array![1.0, f64::NAN, 3.0, 4.5, 5.0])
///     .unwrap()
///     .with_mean(true)
///     .with_differencing(1)
///     .unwrap();
/// assert_eq!(problem.missing(), &[1]);
/// assert_eq!(problem.n(), 3); // 5 - 1 differenced - 1 missing
/// assert_eq!(problem.n_columns(), 2); // dummy + mean
/// ```
#[derive(Clone, Debug)]
pub struct RegressionProblem {
    raw: Array1<f64>,
    missing: Vec<usize>,
    mean: bool,
    regressors: Vec<Regressor>,
    differencing: usize,
    design: OnceLock<Design>,
}

impl RegressionProblem {
    /// Creates a problem from the raw response; NaN entries are missing.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GlsError::EmptySeries`] | `y` is empty |
    /// | [`GlsError::NonFinite`] | `y` contains an infinity |
    /// | [`GlsError::InsufficientData`] | every observation is missing |
    pub fn new(y: Array1<f64>) -> Result<Self, GlsError> {
        if y.is_empty() {
            return Err(GlsError::EmptySeries);
        }
        if y.iter().any(|v| v.is_infinite()) {
            return Err(GlsError::NonFinite("response".into()));
        }
        let missing: Vec<usize> = y
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.is_nan().then_some(i))
            .collect();
        let problem = Self {
            raw: y,
            missing,
            mean: false,
            regressors: Vec::new(),
            differencing: 0,
            design: OnceLock::new(),
        };
        problem.check_size(0)?;
        Ok(problem)
    }

    /// Adds or removes the mean column.
    pub fn with_mean(mut self, mean: bool) -> Self {
        self.set_mean(mean);
        self
    }

    /// Adds a named regressor given at the levels of the response.
    ///
    /// # Errors
    ///
    /// See [`RegressionProblem::add_regressor`].
    pub fn with_regressor(
        mut self,
        name: impl Into<String>,
        values: Array1<f64>,
    ) -> Result<Self, GlsError> {
        self.add_regressor(name, values)?;
        Ok(self)
    }

    /// Sets the differencing degree.
    ///
    /// # Errors
    ///
    /// See [`RegressionProblem::set_differencing`].
    pub fn with_differencing(mut self, d: usize) -> Result<Self, GlsError> {
        self.set_differencing(d)?;
        Ok(self)
    }

    /// Adds or removes the mean column, clearing the cached design.
    pub fn set_mean(&mut self, mean: bool) {
        if self.mean != mean {
            self.mean = mean;
            self.invalidate();
        }
    }

    /// Appends a regressor, clearing the cached design.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GlsError::LengthMismatch`] | length differs from the response |
    /// | [`GlsError::NonFinite`] | NaN or infinite entries |
    /// | [`GlsError::DuplicateRegressor`] | name already used |
    pub fn add_regressor(
        &mut self,
        name: impl Into<String>,
        values: Array1<f64>,
    ) -> Result<(), GlsError> {
        let name = name.into();
        if values.len() != self.raw.len() {
            return Err(GlsError::LengthMismatch {
                name,
                expected: self.raw.len(),
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GlsError::NonFinite(name));
        }
        if self.regressors.iter().any(|r| r.name == name) {
            return Err(GlsError::DuplicateRegressor(name));
        }
        self.regressors.push(Regressor { name, values });
        self.invalidate();
        Ok(())
    }

    /// Removes a regressor by name and returns its values.
    ///
    /// # Errors
    ///
    /// Returns [`GlsError::UnknownRegressor`] if no regressor has that name.
    pub fn remove_regressor(&mut self, name: &str) -> Result<Array1<f64>, GlsError> {
        let pos = self
            .regressors
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| GlsError::UnknownRegressor(name.to_string()))?;
        let removed = self.regressors.remove(pos);
        self.invalidate();
        Ok(removed.values)
    }

    /// Changes the differencing degree, clearing the cached design.
    ///
    /// # Errors
    ///
    /// Returns [`GlsError::InsufficientData`] when fewer than one
    /// observed value would remain.
    pub fn set_differencing(&mut self, d: usize) -> Result<(), GlsError> {
        self.check_size(d)?;
        if self.differencing != d {
            self.differencing = d;
            self.invalidate();
        }
        Ok(())
    }

    fn check_size(&self, d: usize) -> Result<(), GlsError> {
        if self.raw.len() <= d + self.missing.len() {
            return Err(GlsError::InsufficientData {
                len: self.raw.len(),
                differencing: d,
                missing: self.missing.len(),
            });
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.design.take();
    }

    /// Raw series length.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Always false: empty series are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Effective number of observations `len - d - missing`.
    pub fn n(&self) -> usize {
        self.raw.len() - self.differencing - self.missing.len()
    }

    /// Positions of the missing observations in the raw series.
    pub fn missing(&self) -> &[usize] {
        &self.missing
    }

    /// Differencing degree.
    pub fn differencing(&self) -> usize {
        self.differencing
    }

    /// Whether the design contains a mean column.
    pub fn has_mean(&self) -> bool {
        self.mean
    }

    /// Regressor names, in column order.
    pub fn regressor_names(&self) -> impl Iterator<Item = &str> {
        self.regressors.iter().map(|r| r.name.as_str())
    }

    /// Number of regression columns, mean included, dummies excluded.
    pub fn n_regressors(&self) -> usize {
        usize::from(self.mean) + self.regressors.len()
    }

    /// Total number of design columns, dummies included.
    pub fn n_columns(&self) -> usize {
        self.missing.len() + self.n_regressors()
    }

    /// True when the transformed design is cached.
    pub fn is_cached(&self) -> bool {
        self.design.get().is_some()
    }

    /// Differenced response with missing positions filled by zero.
    pub fn transformed_response(&self) -> ArrayView1<'_, f64> {
        self.design().y.view()
    }

    /// Differenced design matrix in the column order of the module docs.
    pub fn design_matrix(&self) -> ArrayView2<'_, f64> {
        self.design().x.view()
    }

    /// Design column names: `missing(i)`, `mean`, then the regressor names.
    pub fn column_names(&self) -> &[String] {
        &self.design().names
    }

    pub(crate) fn design(&self) -> &Design {
        self.design.get_or_init(|| self.build_design())
    }

    fn build_design(&self) -> Design {
        let d = self.differencing;
        let rows = self.raw.len() - d;
        let filled = self.raw.mapv(|v| if v.is_nan() { 0.0 } else { v });
        let y = difference(filled.view(), d);

        let mut x = Array2::zeros((rows, self.n_columns()));
        let mut names = Vec::with_capacity(self.n_columns());
        let mut col = 0;
        for &i in &self.missing {
            let mut impulse = Array1::zeros(self.raw.len());
            impulse[i] = 1.0;
            x.column_mut(col).assign(&difference(impulse.view(), d));
            names.push(format!("missing({i})"));
            col += 1;
        }
        if self.mean {
            x.column_mut(col).fill(1.0);
            names.push("mean".to_string());
            col += 1;
        }
        for r in &self.regressors {
            x.column_mut(col).assign(&difference(r.values.view(), d));
            names.push(r.name.clone());
            col += 1;
        }

        Design {
            y,
            x,
            n_missing: self.missing.len(),
            names,
        }
    }
}
