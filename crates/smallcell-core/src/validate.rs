//! Model validity domains.
//!
//! Every propagation model is only calibrated over a limited envelope of
//! frequency, distance and antenna heights. Leaving that envelope is not an
//! error: the models still produce a number, and the violation travels with
//! it as a [`DomainWarning`].

use std::fmt;

use serde::Serialize;

use crate::propagation::PropagationModel;
use crate::scenario::ScenarioConfig;

/// Nominal shadowing band for macro-to-indoor links.
pub const SIGMA_NOMINAL_DB: (f64, f64) = (4.0, 12.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainField {
    Frequency,
    Distance,
    BsHeight,
    UeHeight,
    ShadowingSigma,
}

impl DomainField {
    fn value(self, config: &ScenarioConfig) -> f64 {
        match self {
            DomainField::Frequency => config.frequency_mhz,
            DomainField::Distance => config.distance_m,
            DomainField::BsHeight => config.bs_height_m,
            DomainField::UeHeight => config.ue_height_m,
            DomainField::ShadowingSigma => config.shadowing_sigma_db,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DomainField::Frequency => "frequency",
            DomainField::Distance => "distance",
            DomainField::BsHeight => "BS height",
            DomainField::UeHeight => "UE height",
            DomainField::ShadowingSigma => "shadowing sigma",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            DomainField::Frequency => "MHz",
            DomainField::Distance | DomainField::BsHeight | DomainField::UeHeight => "m",
            DomainField::ShadowingSigma => "dB",
        }
    }
}

/// Inclusive calibration range for one input.
#[derive(Debug, Clone, Copy)]
pub struct DomainBound {
    pub field: DomainField,
    pub min: f64,
    pub max: f64,
}

impl DomainBound {
    pub const fn new(field: DomainField, min: f64, max: f64) -> Self {
        DomainBound { field, min, max }
    }
}

pub const ITU_P1411_DOMAIN: &[DomainBound] = &[
    DomainBound::new(DomainField::Frequency, 800.0, 6000.0),
    DomainBound::new(DomainField::Distance, 20.0, 5000.0),
    DomainBound::new(DomainField::BsHeight, 10.0, 50.0),
];

pub const COST231_DOMAIN: &[DomainBound] = &[
    DomainBound::new(DomainField::Frequency, 1500.0, 2000.0),
    DomainBound::new(DomainField::Distance, 1000.0, 20_000.0),
    DomainBound::new(DomainField::BsHeight, 30.0, 200.0),
    DomainBound::new(DomainField::UeHeight, 1.0, 10.0),
];

/// One input outside one model's envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainWarning {
    /// Model whose envelope was left; `None` for scenario-wide checks.
    pub model: Option<PropagationModel>,
    pub field: DomainField,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for DomainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.field.unit();
        match self.model {
            Some(model) => write!(
                f,
                "{} {} {unit} outside {model} range [{}-{}] {unit}",
                self.field.label(),
                self.value,
                self.min,
                self.max
            ),
            None => write!(
                f,
                "{} {} {unit} outside nominal range [{}-{}] {unit}",
                self.field.label(),
                self.value,
                self.min,
                self.max
            ),
        }
    }
}

/// Result of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub warnings: Vec<DomainWarning>,
}

impl ValidationReport {
    pub fn for_model(&self, model: PropagationModel) -> impl Iterator<Item = &DomainWarning> {
        self.warnings.iter().filter(move |w| w.model == Some(model))
    }
}

fn check_bounds(
    model: Option<PropagationModel>,
    bounds: &[DomainBound],
    config: &ScenarioConfig,
) -> Vec<DomainWarning> {
    bounds
        .iter()
        .filter_map(|b| {
            let value = b.field.value(config);
            (value < b.min || value > b.max).then_some(DomainWarning {
                model,
                field: b.field,
                value,
                min: b.min,
                max: b.max,
            })
        })
        .collect()
}

/// Domain violations for a single model. FSPL and the simplified urban
/// model have no envelope and never warn. Nothing is logged here; see
/// [`validate`].
pub fn model_warnings(model: PropagationModel, config: &ScenarioConfig) -> Vec<DomainWarning> {
    let bounds = match model {
        PropagationModel::ItuP1411 => ITU_P1411_DOMAIN,
        PropagationModel::Cost231Hata => COST231_DOMAIN,
        PropagationModel::Fspl | PropagationModel::SimplifiedUrban => return Vec::new(),
    };
    check_bounds(Some(model), bounds, config)
}

/// Check a scenario against every model's domain and the nominal σ band.
pub fn validate(config: &ScenarioConfig) -> ValidationReport {
    let mut warnings: Vec<DomainWarning> = PropagationModel::ALL
        .into_iter()
        .flat_map(|m| model_warnings(m, config))
        .collect();

    let sigma_bound = DomainBound {
        field: DomainField::ShadowingSigma,
        min: SIGMA_NOMINAL_DB.0,
        max: SIGMA_NOMINAL_DB.1,
    };
    warnings.extend(check_bounds(None, &[sigma_bound], config));

    for w in &warnings {
        match w.model {
            Some(model) => tracing::warn!(model = %model, "{w}"),
            None => tracing::warn!("{w}"),
        }
    }

    ValidationReport {
        is_valid: warnings.is_empty(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScenarioConfig {
        ScenarioConfig {
            frequency_mhz: 1800.0,
            distance_m: 1500.0,
            bs_height_m: 35.0,
            ue_height_m: 1.5,
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn in_domain_scenario_is_valid() {
        let report = validate(&config());
        assert!(report.is_valid, "unexpected warnings: {:?}", report.warnings);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn itu_frequency_below_range_is_flagged() {
        let cfg = ScenarioConfig {
            frequency_mhz: 750.0,
            ..config()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid);
        let itu: Vec<_> = report.for_model(PropagationModel::ItuP1411).collect();
        assert_eq!(itu.len(), 1);
        assert_eq!(itu[0].field, DomainField::Frequency);
        assert_eq!(itu[0].value, 750.0);
    }

    #[test]
    fn short_distance_flags_cost231_only() {
        let cfg = ScenarioConfig {
            distance_m: 300.0,
            ..config()
        };
        let report = validate(&cfg);
        assert_eq!(report.for_model(PropagationModel::ItuP1411).count(), 0);
        let cost: Vec<_> = report.for_model(PropagationModel::Cost231Hata).collect();
        assert_eq!(cost.len(), 1);
        assert_eq!(cost[0].field, DomainField::Distance);
    }

    #[test]
    fn tall_mast_flags_itu_height() {
        let cfg = ScenarioConfig {
            bs_height_m: 60.0,
            ..config()
        };
        let report = validate(&cfg);
        let itu: Vec<_> = report.for_model(PropagationModel::ItuP1411).collect();
        assert_eq!(itu.len(), 1);
        assert_eq!(itu[0].field, DomainField::BsHeight);
    }

    #[test]
    fn low_mast_and_handset_flag_cost231_heights() {
        let cfg = ScenarioConfig {
            bs_height_m: 20.0,
            ue_height_m: 0.8,
            ..config()
        };
        let fields: Vec<_> = model_warnings(PropagationModel::Cost231Hata, &cfg)
            .into_iter()
            .map(|w| w.field)
            .collect();
        assert_eq!(fields, vec![DomainField::BsHeight, DomainField::UeHeight]);
    }

    #[test]
    fn sigma_outside_nominal_band_is_flagged() {
        let cfg = ScenarioConfig {
            shadowing_sigma_db: 0.0,
            ..config()
        };
        let report = validate(&cfg);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].model, None);
        assert_eq!(report.warnings[0].field, DomainField::ShadowingSigma);
    }

    #[test]
    fn free_space_and_urban_models_never_warn() {
        let cfg = ScenarioConfig {
            frequency_mhz: 700.0,
            distance_m: 5.0,
            ..config()
        };
        assert!(model_warnings(PropagationModel::Fspl, &cfg).is_empty());
        assert!(model_warnings(PropagationModel::SimplifiedUrban, &cfg).is_empty());
    }

    #[test]
    fn warning_message_names_model_and_range() {
        let cfg = ScenarioConfig {
            distance_m: 8000.0,
            ..config()
        };
        let msgs: Vec<String> = validate(&cfg)
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect();
        assert!(
            msgs.iter()
                .any(|m| m == "distance 8000 m outside ITU-R P.1411 range [20-5000] m"),
            "{msgs:?}"
        );
    }
}
