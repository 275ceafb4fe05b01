//! # Propagation Models
//!
//! Outdoor path loss between the macro site and the building facade.
//!
//! | Model            | Use                                         |
//! |------------------|---------------------------------------------|
//! | FSPL             | Theoretical lower bound, always computable  |
//! | ITU-R P.1411     | Two-slope micro-cellular, reference model   |
//! | COST-231 Hata    | Empirical macro-cellular, 1500–2000 MHz     |
//! | Simplified urban | Coarse exponent fallback for comparison     |
//!
//! Models are independent pure functions of a [`ScenarioConfig`]; none reads
//! another's output, so they can be evaluated in any order.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AdvisorError;
use crate::scenario::{Environment, ScenarioConfig};
use crate::validate;

/// Speed of light used for the breakpoint distance (m/s).
pub const SPEED_OF_LIGHT_M_S: f64 = 3.0e8;

/// FSPL constant for distance in km and frequency in MHz.
pub const FSPL_CONSTANT_DB: f64 = 32.44;

pub const PATH_LOSS_EXPONENT_LOS: f64 = 2.0;
pub const PATH_LOSS_EXPONENT_NLOS: f64 = 4.0;

/// Clutter offset of the simplified urban model over free space at 1 m.
pub const URBAN_CLUTTER_OFFSET_DB: f64 = 15.0;
pub const URBAN_PATH_LOSS_EXPONENT: f64 = 2.0;

// ─── Model catalog ──────────────────────────────────────────────────────────

/// Closed set of propagation models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationModel {
    Fspl,
    ItuP1411,
    Cost231Hata,
    SimplifiedUrban,
}

impl PropagationModel {
    pub const ALL: [PropagationModel; 4] = [
        PropagationModel::Fspl,
        PropagationModel::ItuP1411,
        PropagationModel::Cost231Hata,
        PropagationModel::SimplifiedUrban,
    ];

    /// Model feeding the link budget unless the caller picks another.
    pub const REFERENCE: PropagationModel = PropagationModel::ItuP1411;

    /// Path loss in dB, without domain checks or flooring.
    pub fn raw_path_loss_db(self, config: &ScenarioConfig) -> f64 {
        match self {
            PropagationModel::Fspl => fspl_db(config.distance_m, config.frequency_mhz),
            PropagationModel::ItuP1411 => itu_p1411_db(config),
            PropagationModel::Cost231Hata => cost231_hata_db(config),
            PropagationModel::SimplifiedUrban => simplified_urban_db(config),
        }
    }

    /// Evaluate the model, attaching its domain warnings.
    pub fn evaluate(self, config: &ScenarioConfig) -> PathLossResult {
        let domain = validate::model_warnings(self, config);
        let is_valid = domain.is_empty();
        let mut warnings: Vec<String> = domain.iter().map(ToString::to_string).collect();

        let raw = self.raw_path_loss_db(config);
        let path_loss_db = if raw < 0.0 {
            warnings.push(format!("{self} extrapolated to {raw:.2} dB, floored at 0 dB"));
            0.0
        } else {
            raw
        };

        tracing::debug!(
            model = %self,
            path_loss_db,
            is_valid,
            distance_m = config.distance_m,
            frequency_mhz = config.frequency_mhz,
            "path loss evaluated"
        );

        PathLossResult {
            model: self,
            path_loss_db,
            is_valid,
            warnings,
        }
    }
}

impl fmt::Display for PropagationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropagationModel::Fspl => "FSPL",
            PropagationModel::ItuP1411 => "ITU-R P.1411",
            PropagationModel::Cost231Hata => "COST-231 Hata",
            PropagationModel::SimplifiedUrban => "Simplified urban",
        };
        f.write_str(name)
    }
}

impl FromStr for PropagationModel {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' ', '.'], "_").as_str() {
            "fspl" | "free_space" => Ok(PropagationModel::Fspl),
            "itu" | "itu_p1411" | "itu_r_p_1411" | "p1411" => Ok(PropagationModel::ItuP1411),
            "cost231" | "cost_231" | "cost231_hata" | "cost_231_hata" | "hata" => {
                Ok(PropagationModel::Cost231Hata)
            }
            "urban" | "simplified_urban" => Ok(PropagationModel::SimplifiedUrban),
            other => Err(AdvisorError::UnknownVariant {
                kind: "propagation model",
                value: other.to_string(),
                expected: "fspl, itu_p1411, cost231_hata, simplified_urban",
            }),
        }
    }
}

/// Output of one model for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLossResult {
    pub model: PropagationModel,
    pub path_loss_db: f64,
    /// False when any input lies outside the model's calibration envelope.
    pub is_valid: bool,
    pub warnings: Vec<String>,
}

// ─── Formulas ───────────────────────────────────────────────────────────────

/// Free-space path loss: `20·log10(d_km) + 20·log10(f_MHz) + 32.44`.
pub fn fspl_db(distance_m: f64, frequency_mhz: f64) -> f64 {
    let distance_km = distance_m / 1000.0;
    20.0 * distance_km.log10() + 20.0 * frequency_mhz.log10() + FSPL_CONSTANT_DB
}

/// Two-ray breakpoint `4·h_BS·h_UE·f / c`, in metres.
pub fn breakpoint_distance_m(config: &ScenarioConfig) -> f64 {
    4.0 * config.bs_height_m * config.ue_height_m * (config.frequency_mhz * 1e6)
        / SPEED_OF_LIGHT_M_S
}

/// Per-environment clutter correction added by ITU-R P.1411.
pub fn itu_clutter_correction_db(environment: Environment) -> f64 {
    match environment {
        Environment::Rural => 0.0,
        Environment::Suburban => 5.0,
        Environment::Urban => 10.0,
        Environment::UrbanDense => 15.0,
    }
}

/// City-size correction `C_m` of COST-231 Hata.
pub fn cost231_city_correction_db(environment: Environment) -> f64 {
    match environment {
        Environment::Rural => -15.0,
        Environment::Suburban => -2.0,
        Environment::Urban => 0.0,
        Environment::UrbanDense => 3.0,
    }
}

/// ITU-R P.1411 two-slope model.
///
/// Free-space slope up to the breakpoint, then `10·n·log10(d/d_bp)` beyond
/// it (n = 2 LOS, 4 NLOS). The clutter correction applies on both sides so
/// the curve is continuous at `d_bp`.
pub fn itu_p1411_db(config: &ScenarioConfig) -> f64 {
    let d = config.distance_m;
    let d_bp = breakpoint_distance_m(config);
    let correction = itu_clutter_correction_db(config.environment);

    let basic = if d < d_bp {
        fspl_db(d, config.frequency_mhz)
    } else {
        let exponent = if config.line_of_sight {
            PATH_LOSS_EXPONENT_LOS
        } else {
            PATH_LOSS_EXPONENT_NLOS
        };
        fspl_db(d_bp, config.frequency_mhz) + 10.0 * exponent * (d / d_bp).log10()
    };
    basic + correction
}

/// COST-231 Hata macro-cell model (small/medium city mobile-height term).
pub fn cost231_hata_db(config: &ScenarioConfig) -> f64 {
    let log_f = config.frequency_mhz.log10();
    let log_hb = config.bs_height_m.log10();
    let d_km = config.distance_m / 1000.0;

    let a_hm = (1.1 * log_f - 0.7) * config.ue_height_m - (1.56 * log_f - 0.8);

    46.3 + 33.9 * log_f - 13.82 * log_hb - a_hm
        + (44.9 - 6.55 * log_hb) * d_km.log10()
        + cost231_city_correction_db(config.environment)
}

/// `PL0 + 10·n·log10(d_m)`, with `PL0` the free-space loss at 1 m plus a
/// fixed urban clutter offset.
pub fn simplified_urban_db(config: &ScenarioConfig) -> f64 {
    let pl0 = fspl_db(1.0, config.frequency_mhz) + URBAN_CLUTTER_OFFSET_DB;
    pl0 + 10.0 * URBAN_PATH_LOSS_EXPONENT * config.distance_m.log10()
}

// ─── Comparison ─────────────────────────────────────────────────────────────

/// Spread across models: optimistic bound, pessimistic bound, and the gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSpread {
    pub optimistic: PropagationModel,
    pub optimistic_db: f64,
    pub pessimistic: PropagationModel,
    pub pessimistic_db: f64,
    pub uncertainty_db: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparison {
    pub results: Vec<PathLossResult>,
    pub spread: ModelSpread,
}

impl ModelComparison {
    pub fn get(&self, model: PropagationModel) -> Option<&PathLossResult> {
        self.results.iter().find(|r| r.model == model)
    }
}

/// Run every model on the same scenario, in catalog order.
pub fn compare_models(config: &ScenarioConfig) -> ModelComparison {
    let results: Vec<PathLossResult> = PropagationModel::ALL
        .into_iter()
        .map(|m| m.evaluate(config))
        .collect();

    let min = results
        .iter()
        .min_by(|a, b| a.path_loss_db.total_cmp(&b.path_loss_db));
    let max = results
        .iter()
        .max_by(|a, b| a.path_loss_db.total_cmp(&b.path_loss_db));

    // ALL is non-empty, so both bounds exist.
    let spread = match (min, max) {
        (Some(lo), Some(hi)) => ModelSpread {
            optimistic: lo.model,
            optimistic_db: lo.path_loss_db,
            pessimistic: hi.model,
            pessimistic_db: hi.path_loss_db,
            uncertainty_db: hi.path_loss_db - lo.path_loss_db,
        },
        _ => ModelSpread {
            optimistic: PropagationModel::Fspl,
            optimistic_db: 0.0,
            pessimistic: PropagationModel::Fspl,
            pessimistic_db: 0.0,
            uncertainty_db: 0.0,
        },
    };

    ModelComparison { results, spread }
}

/// Bit-exact key over every scenario input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScenarioKey {
    enums: (u8, u8, u8, u8, bool),
    values: [u64; 8],
    threshold: Option<u64>,
}

impl From<&ScenarioConfig> for ScenarioKey {
    fn from(c: &ScenarioConfig) -> Self {
        ScenarioKey {
            enums: (
                c.technology as u8,
                c.environment as u8,
                c.facade_material as u8,
                c.service_type as u8,
                c.line_of_sight,
            ),
            values: [
                c.frequency_mhz.to_bits(),
                c.tx_power_dbm.to_bits(),
                c.tx_gain_dbi.to_bits(),
                c.rx_gain_dbi.to_bits(),
                c.distance_m.to_bits(),
                c.bs_height_m.to_bits(),
                c.ue_height_m.to_bits(),
                c.shadowing_sigma_db.to_bits(),
            ],
            threshold: c.rsrp_threshold_override_dbm.map(f64::to_bits),
        }
    }
}

/// Explicit memo of [`compare_models`], keyed by the full input tuple.
///
/// Entries are never invalidated implicitly; call [`ComparisonCache::clear`]
/// to drop them.
#[derive(Debug, Default)]
pub struct ComparisonCache {
    entries: HashMap<ScenarioKey, ModelComparison>,
    hits: u64,
    misses: u64,
}

impl ComparisonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, config: &ScenarioConfig) -> &ModelComparison {
        let key = ScenarioKey::from(config);
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.entries
            .entry(key)
            .or_insert_with(|| compare_models(config))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
