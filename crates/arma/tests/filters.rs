//! Cross-validation of the collapsing and banded-Cholesky filters.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::Array1;
use rand::SeedableRng;
use regarima_arma::{AnsleyFilter, ArmaFilter, ArmaSpec, CollapsingFilter, FilterKind};

fn models() -> Vec<ArmaSpec> {
    vec![
        ArmaSpec::new(vec![0.5], vec![], 1.0).unwrap(),
        ArmaSpec::new(vec![], vec![-0.6], 1.0).unwrap(),
        ArmaSpec::new(vec![0.8], vec![0.4], 2.5).unwrap(),
        ArmaSpec::new(vec![1.2, -0.5], vec![-0.3, 0.2], 1.0).unwrap(),
        ArmaSpec::new(vec![0.1, 0.0, 0.0, 0.7], vec![0.5], 0.3).unwrap(),
        ArmaSpec::new(vec![], vec![0.95], 1.0).unwrap(),
    ]
}

fn simulated(spec: &ArmaSpec, n: usize, seed: u64) -> Array1<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    spec.simulate(n, 1, &mut rng).column(0).to_owned()
}

#[test]
fn collapsing_and_ansley_agree() {
    for (k, spec) in models().iter().enumerate() {
        let n = 300;
        let y = simulated(spec, n, 100 + k as u64);

        let mut fast = CollapsingFilter::new();
        let mut exact = AnsleyFilter::new();
        fast.initialize(spec, n).unwrap();
        exact.initialize(spec, n).unwrap();
        let a = fast.filter(y.view()).unwrap();
        let b = exact.filter(y.view()).unwrap();

        assert_relative_eq!(a.log_det, b.log_det, epsilon = 1e-8, max_relative = 1e-8);
        for t in 0..n {
            assert_abs_diff_eq!(a.values[t], b.values[t], epsilon = 1e-8);
        }
    }
}

#[test]
fn filtered_values_have_unit_variance() {
    for (k, spec) in models().iter().enumerate() {
        let n = 5000;
        let y = simulated(spec, n, 7 + k as u64);
        let mut filter = FilterKind::Collapsing.create(1e-13);
        filter.initialize(spec, n).unwrap();
        let e = filter.filter(y.view()).unwrap().values;
        // Filters run at unit innovation variance; rescale by sigma2.
        let var = e.iter().map(|v| v * v).sum::<f64>() / n as f64 / spec.sigma2();
        assert!((var - 1.0).abs() < 0.08, "model {k}: variance {var}");
    }
}

#[test]
fn single_observation_with_unit_memory() {
    for spec in [
        ArmaSpec::white_noise(),
        ArmaSpec::new(vec![-0.4], vec![], 1.0).unwrap(),
    ] {
        assert_eq!(spec.order().r(), 1);
        for kind in [FilterKind::Collapsing, FilterKind::Ansley] {
            let mut filter = kind.create(1e-13);
            filter.initialize(&spec, 1).unwrap();
            let out = filter.filter(Array1::from_vec(vec![1.5]).view()).unwrap();
            assert_eq!(out.values.len(), 1);
            assert!(out.values[0].is_finite());
            assert!(out.log_det.is_finite());
        }
    }
}

#[test]
fn exemplars_run_independently_across_threads() {
    let spec = ArmaSpec::new(vec![0.6], vec![0.3], 1.0).unwrap();
    let y = simulated(&spec, 200, 3);
    let mut prototype = CollapsingFilter::new();
    prototype.initialize(&spec, 200).unwrap();
    let expected = prototype.filter(y.view()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut filter = prototype.exemplar();
                let (spec, y) = (&spec, &y);
                scope.spawn(move || {
                    filter.initialize(spec, y.len()).unwrap();
                    filter.filter(y.view()).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
