// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Field Property Tests
// ─────────────────────────────────────────────────────────────────────
//! End-to-end properties of generated fields: reproducibility,
//! redraw semantics, chunk invariance and second-order statistics.

use std::sync::Arc;

use randmeth_core::{
    AnyModel, CovarianceModel, Exponential, FieldError, Gaussian, GeneratorConfig, ModelParams,
    RandMeth, SeedArg,
};

fn gaussian(dim: usize, var: f64, len_scale: f64) -> Gaussian {
    Gaussian::new(ModelParams::new(dim, var, len_scale)).unwrap()
}

fn config(mode_count: usize) -> GeneratorConfig {
    GeneratorConfig {
        mode_count,
        ..Default::default()
    }
}

fn line(n: usize, step: f64) -> Vec<f64> {
    (0..n).map(|i| i as f64 * step).collect()
}

#[test]
fn test_independent_generators_agree() {
    let a = RandMeth::new(gaussian(3, 1.0, 4.0), config(500), Some(1234)).unwrap();
    let b = RandMeth::new(gaussian(3, 1.0, 4.0), config(500), Some(1234)).unwrap();
    assert_eq!(**a.modes(), **b.modes());

    let x = line(40, 0.37);
    let y = line(40, 1.1);
    let z = line(40, -0.6);
    assert_eq!(
        a.evaluate(&[&x, &y, &z]).unwrap(),
        b.evaluate(&[&x, &y, &z]).unwrap()
    );
}

#[test]
fn test_seed_42_scenario() {
    let g = RandMeth::new(gaussian(1, 1.0, 1.0), config(1000), Some(42)).unwrap();
    let v = g.evaluate_point(&[0.0]).unwrap();
    assert!(v.is_finite());
    assert!(v.abs() < 5.0, "field(0) = {v}");

    let again = RandMeth::new(gaussian(1, 1.0, 1.0), config(1000), Some(42)).unwrap();
    assert_eq!(again.evaluate_point(&[0.0]).unwrap(), v);
}

#[test]
fn test_mode_count_change_scenario() {
    let mut g = RandMeth::new(gaussian(2, 1.0, 1.0), config(1000), Some(42)).unwrap();
    let before = Arc::clone(g.modes());
    g.set_mode_count(500).unwrap();
    assert!(!Arc::ptr_eq(&before, g.modes()));
    assert_eq!(g.modes().len(), 500);
    assert!(g.modes().wavevectors().iter().all(|row| row.len() == 500));
}

#[test]
fn test_noop_update_identity() {
    let mut g = RandMeth::new(gaussian(2, 1.0, 1.0), config(100), Some(7)).unwrap();
    let before = Arc::clone(g.modes());
    let generation = g.generation();
    assert!(!g.update(gaussian(2, 1.0, 1.0), SeedArg::KeepCurrent).unwrap());
    assert!(Arc::ptr_eq(&before, g.modes()));
    assert_eq!(g.generation(), generation);
}

#[test]
fn test_dimension_consistency() {
    for dim in 1..=3 {
        let g = RandMeth::new(gaussian(dim, 1.0, 1.0), config(64), Some(1)).unwrap();
        assert_eq!(g.dim(), dim);
        assert_eq!(g.modes().wavevectors().len(), dim);

        let x: &[f64] = &[0.0, 1.0];
        let short = vec![x; dim - 1];
        assert_eq!(
            g.evaluate(&short).unwrap_err(),
            FieldError::MissingCoordinate {
                dim,
                given: dim - 1
            }
        );
    }
}

#[test]
fn test_chunk_invariance_tiny_vs_huge() {
    let model = Exponential::new(ModelParams::new(2, 2.0, 3.0)).unwrap();
    let tiny = RandMeth::new(
        model,
        GeneratorConfig {
            mode_count: 300,
            chunk_tmp_size: 7.0,
            ..Default::default()
        },
        Some(99),
    )
    .unwrap();
    let huge = RandMeth::new(
        model,
        GeneratorConfig {
            mode_count: 300,
            chunk_tmp_size: 1e12,
            ..Default::default()
        },
        Some(99),
    )
    .unwrap();
    let x = line(100, 0.25);
    let y = line(100, 0.75);
    let a = tiny.evaluate(&[&x, &y]).unwrap();
    let b = huge.evaluate(&[&x, &y]).unwrap();
    for (u, v) in a.iter().zip(&b) {
        assert!((u - v).abs() < 1e-9, "{u} vs {v}");
    }
}

#[test]
fn test_field_variance_matches_model() {
    // Spatial mean square over a domain much larger than ℓ, averaged
    // over several realisations, approaches var.
    let var = 2.5;
    let x = line(500, 7.3);
    let y = line(500, 3.1);
    let mut mean_sq = 0.0;
    let seeds = [1u64, 2, 3, 4, 5];
    for seed in seeds {
        let g = RandMeth::new(gaussian(2, var, 1.0), config(1000), Some(seed)).unwrap();
        let f = g.evaluate(&[&x, &y]).unwrap();
        mean_sq += f.iter().map(|v| v * v).sum::<f64>() / f.len() as f64;
    }
    mean_sq /= seeds.len() as f64;
    assert!((mean_sq / var - 1.0).abs() < 0.3, "mean square {mean_sq}");
}

#[test]
fn test_nugget_is_not_cached() {
    let model = Gaussian::new(ModelParams::new(1, 1.0, 1.0).with_nugget(0.3)).unwrap();
    let g = RandMeth::new(model, config(200), Some(5)).unwrap();
    let x = line(32, 0.5);
    let a = g.evaluate(&[&x]).unwrap();
    let b = g.evaluate(&[&x]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_any_model_from_json() {
    let model = AnyModel::from_json(
        r#"{"model": "exponential", "dim": 3, "var": 1.0, "len_scale": 5.0}"#,
    )
    .unwrap();
    let cfg = GeneratorConfig::from_json(r#"{"mode_count": 256}"#).unwrap();
    let g = RandMeth::new(model, cfg, Some(3)).unwrap();
    assert_eq!(g.mode_count(), 256);
    assert_eq!(g.model().name(), "Exponential");

    let axis = line(4, 1.0);
    let grid = g.evaluate_structured(&[&axis, &axis, &axis]).unwrap();
    assert_eq!(grid.len(), 64);
    assert!(grid.iter().all(|v| v.is_finite()));
}

#[test]
fn test_switching_model_kind_redraws() {
    let g0: AnyModel = gaussian(2, 1.0, 2.0).into();
    let e0: AnyModel = Exponential::new(ModelParams::new(2, 1.0, 2.0)).unwrap().into();
    let mut g = RandMeth::new(g0, config(100), Some(8)).unwrap();
    assert!(g.set_model(e0).unwrap());
    assert_eq!(g.seed(), 8);
    assert_eq!(g.generation(), 1);
    assert!(!g.set_model(e0).unwrap());
}
