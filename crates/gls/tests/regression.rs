//! End-to-end checks of the concentrated-likelihood solver.

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use regarima_arma::{AnsleyFilter, ArmaFilter, ArmaSpec, CollapsingFilter, autocovariances};
use regarima_gls::{GlsSolver, RegressionProblem};
use regarima_linalg::{cholesky, solve};

fn simulated(spec: &ArmaSpec, n: usize, seed: u64) -> Array1<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    spec.simulate(n, 1, &mut rng).column(0).to_owned()
}

fn trend(n: usize) -> Array1<f64> {
    Array1::from_shape_fn(n, |t| t as f64 / n as f64)
}

fn wave(n: usize) -> Array1<f64> {
    Array1::from_shape_fn(n, |t| (t as f64 * 0.9).sin())
}

#[test]
fn dependent_column_is_dropped_with_exact_zeros() {
    let n = 60;
    let arma = ArmaSpec::new(vec![0.4], vec![0.3], 1.0).unwrap();
    let y = simulated(&arma, n, 11) + &(trend(n) * 2.0) - &wave(n);
    let problem = RegressionProblem::new(y.clone())
        .unwrap()
        .with_regressor("trend", trend(n))
        .unwrap()
        .with_regressor("wave", wave(n))
        .unwrap()
        .with_regressor("sum", trend(n) + &wave(n))
        .unwrap();
    let reduced = RegressionProblem::new(y)
        .unwrap()
        .with_regressor("trend", trend(n))
        .unwrap()
        .with_regressor("wave", wave(n))
        .unwrap();

    let solver = GlsSolver::default();
    let full = solver
        .solve(&problem, &arma, &mut CollapsingFilter::new())
        .unwrap();
    let direct = solver
        .solve(&reduced, &arma, &mut CollapsingFilter::new())
        .unwrap();

    assert_eq!(full.rank(), 2);
    assert_eq!(full.unused(), &[2]);
    assert_eq!(full.coefficients()[2], 0.0);
    for j in 0..3 {
        assert_eq!(full.bvar()[[2, j]], 0.0);
        assert_eq!(full.bvar()[[j, 2]], 0.0);
    }
    for j in 0..2 {
        assert_abs_diff_eq!(full.coefficients()[j], direct.coefficients()[j], epsilon = 1e-10);
        for l in 0..2 {
            assert_abs_diff_eq!(full.bvar()[[j, l]], direct.bvar()[[j, l]], epsilon = 1e-12);
        }
    }
    assert_abs_diff_eq!(full.ssqerr(), direct.ssqerr(), epsilon = 1e-9);
}

#[test]
fn white_noise_missing_values_match_shortened_series() {
    let n = 40;
    let arma = ArmaSpec::white_noise();
    let mut y = simulated(&arma, n, 5) + 3.0 + &trend(n);
    let missing = [4, 17, 30];

    let keep: Vec<usize> = (0..n).filter(|i| !missing.contains(i)).collect();
    let short_y: Array1<f64> = keep.iter().map(|&i| y[i]).collect();
    let short_x: Array1<f64> = keep.iter().map(|&i| trend(n)[i]).collect();
    for &i in &missing {
        y[i] = f64::NAN;
    }

    let with_gaps = RegressionProblem::new(y)
        .unwrap()
        .with_mean(true)
        .with_regressor("trend", trend(n))
        .unwrap();
    let shortened = RegressionProblem::new(short_y)
        .unwrap()
        .with_mean(true)
        .with_regressor("trend", short_x)
        .unwrap();

    let solver = GlsSolver::default();
    let a = solver
        .solve(&with_gaps, &arma, &mut CollapsingFilter::new())
        .unwrap();
    let b = solver
        .solve(&shortened, &arma, &mut CollapsingFilter::new())
        .unwrap();

    assert_eq!(a.n(), n - missing.len());
    assert_eq!(a.n(), b.n());
    for j in 0..2 {
        assert_abs_diff_eq!(
            a.regression_coefficients()[j],
            b.coefficients()[j],
            epsilon = 1e-10
        );
    }
    assert_abs_diff_eq!(a.ssqerr(), b.ssqerr(), epsilon = 1e-9);
    assert_abs_diff_eq!(a.log_likelihood(), b.log_likelihood(), epsilon = 1e-9);
    // Interpolated values are the fitted regression at the gaps.
    let fitted = b.coefficients()[0] + b.coefficients()[1] * trend(n)[17];
    assert_abs_diff_eq!(a.missing_estimates()[1], fitted, epsilon = 1e-9);
}

/// Exact GLS on the observed subset with a dense covariance matrix.
fn dense_gls(
    arma: &ArmaSpec,
    y: &Array1<f64>,
    x: &Array2<f64>,
    observed: &[usize],
) -> (Array1<f64>, f64) {
    let n_all = y.len();
    let g = autocovariances(arma, n_all).unwrap();
    let n = observed.len();
    let omega = Array2::from_shape_fn((n, n), |(i, j)| g[observed[i].abs_diff(observed[j])]);
    let l = cholesky(omega.view()).unwrap();
    let whiten = |v: &Array1<f64>| -> Array1<f64> {
        let mut out = Array1::zeros(n);
        for i in 0..n {
            let mut acc = v[i];
            for k in 0..i {
                acc -= l[[i, k]] * out[k];
            }
            out[i] = acc / l[[i, i]];
        }
        out
    };
    let yo: Array1<f64> = observed.iter().map(|&i| y[i]).collect();
    let yw = whiten(&yo);
    let mut xw = Array2::zeros((n, x.ncols()));
    for j in 0..x.ncols() {
        let col: Array1<f64> = observed.iter().map(|&i| x[[i, j]]).collect();
        xw.column_mut(j).assign(&whiten(&col));
    }
    let b = solve(xw.t().dot(&xw).view(), xw.t().dot(&yw).view()).unwrap();
    let resid = &yw - &xw.dot(&b);
    let ssq = resid.dot(&resid);
    let log_det: f64 = 2.0 * (0..n).map(|i| l[[i, i]].ln()).sum::<f64>();
    let nf = n as f64;
    let ll = -0.5 * (nf * (2.0 * PI).ln() + nf * (ssq / nf).ln() + nf + log_det);
    (b, ll)
}

#[test]
fn ar_missing_values_match_dense_observed_likelihood() {
    let n = 50;
    let arma = ArmaSpec::new(vec![0.7], vec![-0.2], 1.0).unwrap();
    let full_y = simulated(&arma, n, 23) + 1.5;
    let missing = [0, 12, 13, 49];
    let observed: Vec<usize> = (0..n).filter(|i| !missing.contains(i)).collect();
    let mut y = full_y.clone();
    for &i in &missing {
        y[i] = f64::NAN;
    }

    let mut x = Array2::zeros((n, 2));
    x.column_mut(0).fill(1.0);
    x.column_mut(1).assign(&wave(n));
    let (b_ref, ll_ref) = dense_gls(&arma, &full_y, &x, &observed);

    let problem = RegressionProblem::new(y)
        .unwrap()
        .with_mean(true)
        .with_regressor("wave", wave(n))
        .unwrap();
    let mut filters: Vec<Box<dyn ArmaFilter>> =
        vec![Box::new(CollapsingFilter::new()), Box::new(AnsleyFilter::new())];
    for filter in filters.iter_mut() {
        let ll = GlsSolver::default()
            .solve(&problem, &arma, filter.as_mut())
            .unwrap();
        assert_eq!(ll.n(), observed.len());
        assert_abs_diff_eq!(ll.regression_coefficients()[0], b_ref[0], epsilon = 1e-8);
        assert_abs_diff_eq!(ll.regression_coefficients()[1], b_ref[1], epsilon = 1e-8);
        assert_abs_diff_eq!(ll.log_likelihood(), ll_ref, epsilon = 1e-8);
    }
}

#[test]
fn repeated_evaluation_is_identical() {
    let n = 80;
    let arma = ArmaSpec::new(vec![0.5, -0.2], vec![0.4], 1.0).unwrap();
    let problem = RegressionProblem::new(simulated(&arma, n, 99))
        .unwrap()
        .with_mean(true)
        .with_regressor("trend", trend(n))
        .unwrap();
    let solver = GlsSolver::default();
    let mut filter = CollapsingFilter::new();
    let first = solver.solve(&problem, &arma, &mut filter).unwrap();
    let second = solver.solve(&problem, &arma, &mut filter).unwrap();
    assert_eq!(first, second);
}

#[test]
fn differencing_with_drift() {
    let n = 100;
    let noise = simulated(&ArmaSpec::white_noise(), n, 4);
    // Random walk with drift 0.5.
    let mut y = Array1::zeros(n);
    for t in 1..n {
        y[t] = y[t - 1] + 0.5 + noise[t];
    }
    let problem = RegressionProblem::new(y)
        .unwrap()
        .with_mean(true)
        .with_differencing(1)
        .unwrap();
    let ll = GlsSolver::default()
        .solve(&problem, &ArmaSpec::white_noise(), &mut CollapsingFilter::new())
        .unwrap();
    assert_eq!(ll.n(), n - 1);
    let drift = ll.coefficients()[0];
    assert!((drift - 0.5).abs() < 3.0 * ll.std_errors()[0], "drift {drift}");
}
