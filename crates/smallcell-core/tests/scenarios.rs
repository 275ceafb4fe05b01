//! End-to-end scenarios with hand-derived expected values.
//!
//! Expectations are rebuilt from the closed-form formulas rather than
//! copied from engine output, so a regression in any stage shows up here.

use smallcell_core::assessment::{AssessOptions, DecisionMode, assess};
use smallcell_core::coverage::q_function;
use smallcell_core::decision::Recommendation;
use smallcell_core::link_budget::SignalQuality;
use smallcell_core::propagation::{PropagationModel, compare_models};
use smallcell_core::scenario::{
    Environment, FacadeMaterial, ScenarioConfig, ScenarioFile, ScenarioInput, ServiceType,
    Technology,
};

const DEMO: &str = include_str!("../../../demos/scenarios.toml");

fn fspl(distance_m: f64, frequency_mhz: f64) -> f64 {
    20.0 * (distance_m / 1000.0).log10() + 20.0 * frequency_mhz.log10() + 32.44
}

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

fn demo_batch() -> Vec<ScenarioConfig> {
    ScenarioFile::from_toml_str(DEMO)
        .unwrap()
        .batch()
        .into_iter()
        .map(|input| input.resolve().unwrap())
        .collect()
}

// ─── Demo file ───────────────────────────────────────────────────────────────

#[test]
fn demo_file_resolves_every_entry() {
    let batch = demo_batch();
    assert_eq!(batch.len(), 4);
    assert!(batch.iter().all(|c| c.bs_height_m == 25.0));
    assert_eq!(batch[2].technology, Technology::Nr);
    assert_eq!(batch[2].frequency_mhz, 3500.0);
    assert_eq!(batch[3].rsrp_threshold_dbm(), -110.0);
}

// ─── Dense urban office, 300 m ───────────────────────────────────────────────

#[test]
fn dense_urban_office_is_served_by_macro() {
    let cfg = &demo_batch()[0];
    assert_eq!(cfg.environment, Environment::UrbanDense);
    assert_eq!(cfg.shadowing_sigma_db, 10.0);

    let a = assess(cfg, &AssessOptions::default()).unwrap();

    // 300 m is inside the 900 m breakpoint: free-space slope + 15 dB clutter.
    assert!(approx(a.breakpoint_distance_m, 900.0, 1e-9));
    let outdoor = fspl(300.0, 1800.0) + 15.0;
    assert!(approx(a.link_budget.outdoor_path_loss_db, outdoor, 1e-9));

    let rsrp = 43.0 + 18.0 - outdoor - 25.0;
    assert!(approx(a.link_budget.rsrp_dbm, rsrp, 1e-9));
    assert!(approx(a.link_budget.rsrp_dbm, -66.09, 0.01));

    let p = q_function((-95.0 - rsrp) / 10.0);
    assert!(approx(a.probability().unwrap(), p, 1e-12));
    assert!(p > 0.99);
    assert_eq!(a.recommendation, Recommendation::MacroSufficient);
    assert_eq!(a.link_budget.quality, SignalQuality::Excellent);
}

// ─── Rural farmhouse, 100 m LOS ──────────────────────────────────────────────

#[test]
fn rural_line_of_sight_through_window() {
    let cfg = &demo_batch()[1];
    let a = assess(cfg, &AssessOptions::default()).unwrap();

    let outdoor = fspl(100.0, 1800.0);
    assert!(approx(a.link_budget.outdoor_path_loss_db, outdoor, 1e-9));
    assert!(approx(a.link_budget.rsrp_dbm, 61.0 - outdoor - 10.0, 1e-9));
    assert!(approx(a.link_budget.rsrp_dbm, -26.55, 0.01));
    assert_eq!(a.recommendation, Recommendation::MacroSufficient);
    assert!(a.advisories.is_empty());
}

// ─── 5G behind thick walls, 1.5 km ───────────────────────────────────────────

#[test]
fn nr_behind_thick_walls_needs_small_cell() {
    let cfg = &demo_batch()[2];
    let a = assess(cfg, &AssessOptions::default()).unwrap();

    // d_bp = 4 · 25 · 1.5 · 3.5e9 / 3e8 = 1750 m, so still free-space slope.
    assert!(approx(a.breakpoint_distance_m, 1750.0, 1e-9));
    let outdoor = fspl(1500.0, 3500.0) + 10.0;
    assert!(approx(a.link_budget.outdoor_path_loss_db, outdoor, 1e-9));
    assert_eq!(a.link_budget.building_entry_loss_db, 35.0);

    let rsrp = 40.0 + 20.0 - outdoor - 35.0;
    assert!(approx(a.link_budget.rsrp_dbm, rsrp, 1e-9));
    let p = q_function((-85.0 - rsrp) / 8.0);
    assert!(approx(a.probability().unwrap(), p, 1e-12));
    assert!(p < 0.5);

    assert_eq!(a.recommendation, Recommendation::SmallCellRequired);
    assert_eq!(a.link_budget.quality, SignalQuality::Weak);
    assert!(a.margin_deficit_db.unwrap() > 0.0);
    assert_eq!(a.advisories.len(), 2);
}

// ─── Beyond the breakpoint ───────────────────────────────────────────────────

#[test]
fn suburban_beyond_breakpoint_uses_nlos_slope() {
    let cfg = &demo_batch()[3];
    let a = assess(cfg, &AssessOptions::default()).unwrap();

    // 750 MHz: d_bp = 375 m, NLOS exponent 4 beyond it, +5 dB suburban.
    let d_bp = 375.0;
    assert!(approx(a.breakpoint_distance_m, d_bp, 1e-9));
    let outdoor = fspl(d_bp, 750.0) + 40.0 * (2500.0f64 / d_bp).log10() + 5.0;
    assert!(approx(a.link_budget.outdoor_path_loss_db, outdoor, 1e-9));

    // 750 MHz is below the ITU-R P.1411 envelope: result kept, warning attached.
    assert!(!a.outdoor.is_valid);
    assert!(a.warnings().iter().any(|w| w.starts_with("frequency 750 MHz")));
    assert_eq!(a.threshold_dbm, -110.0);
}

// ─── Technology comparison ───────────────────────────────────────────────────

#[test]
fn nr_pays_five_db_more_entry_loss_than_lte() {
    for material in FacadeMaterial::ALL {
        let lte = ScenarioConfig {
            facade_material: material,
            ..ScenarioConfig::default()
        };
        let nr = ScenarioConfig {
            technology: Technology::Nr,
            ..lte.clone()
        };
        let a_lte = assess(&lte, &AssessOptions::default()).unwrap();
        let a_nr = assess(&nr, &AssessOptions::default()).unwrap();
        assert!(approx(
            a_lte.link_budget.rsrp_dbm - a_nr.link_budget.rsrp_dbm,
            5.0,
            1e-9
        ));
    }
}

#[test]
fn flags_override_file_values() {
    let file = ScenarioFile::from_toml_str(DEMO).unwrap();
    let cli = ScenarioInput {
        distance_m: Some(50.0),
        service_type: Some(ServiceType::Gaming),
        ..Default::default()
    };
    let cfg = file.single().merged_with(cli).resolve().unwrap();
    assert_eq!(cfg.distance_m, 50.0);
    assert_eq!(cfg.service_type, ServiceType::Gaming);
    assert_eq!(cfg.rsrp_threshold_dbm(), -75.0);
    assert_eq!(cfg.bs_height_m, 25.0);
}

// ─── Model comparison ────────────────────────────────────────────────────────

#[test]
fn comparison_spread_brackets_every_model() {
    let cfg = ScenarioConfig {
        distance_m: 1500.0,
        bs_height_m: 35.0,
        ..ScenarioConfig::default()
    };
    let cmp = compare_models(&cfg);
    assert_eq!(cmp.results.len(), 4);
    for r in &cmp.results {
        assert!(r.path_loss_db >= cmp.spread.optimistic_db);
        assert!(r.path_loss_db <= cmp.spread.pessimistic_db);
    }
    assert!(approx(
        cmp.spread.uncertainty_db,
        cmp.spread.pessimistic_db - cmp.spread.optimistic_db,
        1e-12
    ));
    // Free space is always the most optimistic of the four here.
    assert_eq!(cmp.spread.optimistic, PropagationModel::Fspl);
    assert!(cmp.get(PropagationModel::Cost231Hata).unwrap().is_valid);
}

#[test]
fn deterministic_and_probabilistic_agree_far_from_threshold() {
    let cfg = ScenarioConfig {
        distance_m: 50.0,
        ..ScenarioConfig::default()
    };
    let prob = assess(&cfg, &AssessOptions::default()).unwrap();
    let det = assess(
        &cfg,
        &AssessOptions {
            mode: DecisionMode::Deterministic,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(prob.recommendation, det.recommendation);
    assert_eq!(prob.link_budget, det.link_budget);
}
