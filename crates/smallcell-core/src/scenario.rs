//! Scenario configuration.
//!
//! A [`ScenarioInput`] is the partial, user-facing form (TOML file, CLI
//! flags). [`ScenarioInput::resolve`] fills the gaps from the technology,
//! environment and service defaults and checks the hard physical envelope,
//! producing a [`ScenarioConfig`] that every engine stage takes by reference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;
use crate::units;

pub const CONFIG_VERSION: u32 = 1;

pub const DEFAULT_DISTANCE_M: f64 = 200.0;
pub const DEFAULT_BS_HEIGHT_M: f64 = 25.0;
pub const DEFAULT_UE_HEIGHT_M: f64 = 1.5;

// ── Enumerated option sets ──────────────────────────────────────────

/// Radio access technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Technology {
    Lte,
    Nr,
}

/// Per-technology radio defaults for a typical macro site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechnologyDefaults {
    pub frequency_mhz: f64,
    pub tx_power_dbm: f64,
    pub tx_gain_dbi: f64,
    pub rx_gain_dbi: f64,
}

impl Technology {
    pub const ALL: [Technology; 2] = [Technology::Lte, Technology::Nr];

    pub fn defaults(self) -> TechnologyDefaults {
        match self {
            Technology::Lte => TechnologyDefaults {
                frequency_mhz: 1800.0,
                tx_power_dbm: 43.0,
                tx_gain_dbi: 18.0,
                rx_gain_dbi: 0.0,
            },
            Technology::Nr => TechnologyDefaults {
                frequency_mhz: 3500.0,
                tx_power_dbm: 40.0,
                tx_gain_dbi: 20.0,
                rx_gain_dbi: 0.0,
            },
        }
    }

    /// Short generation label used in reports and file names.
    pub fn generation(self) -> &'static str {
        match self {
            Technology::Lte => "4G",
            Technology::Nr => "5G",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Technology::Lte => write!(f, "lte"),
            Technology::Nr => write!(f, "nr"),
        }
    }
}

impl FromStr for Technology {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lte" | "4g" => Ok(Technology::Lte),
            "nr" | "5g" => Ok(Technology::Nr),
            other => Err(AdvisorError::UnknownVariant {
                kind: "technology",
                value: other.to_string(),
                expected: "lte, nr",
            }),
        }
    }
}

/// Propagation environment, ordered by clutter density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Environment {
    Rural,
    Suburban,
    Urban,
    UrbanDense,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Rural,
        Environment::Suburban,
        Environment::Urban,
        Environment::UrbanDense,
    ];

    /// Typical shadowing standard deviation for this clutter class.
    pub fn default_sigma_db(self) -> f64 {
        match self {
            Environment::Rural => 4.0,
            Environment::Suburban => 6.0,
            Environment::Urban => 8.0,
            Environment::UrbanDense => 10.0,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Environment::Rural => "open rural area",
            Environment::Suburban => "suburb, low-rise buildings",
            Environment::Urban => "standard urban area",
            Environment::UrbanDense => "city centre, high-rise buildings",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Rural => write!(f, "rural"),
            Environment::Suburban => write!(f, "suburban"),
            Environment::Urban => write!(f, "urban"),
            Environment::UrbanDense => write!(f, "urban_dense"),
        }
    }
}

impl FromStr for Environment {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "rural" => Ok(Environment::Rural),
            "suburban" => Ok(Environment::Suburban),
            "urban" => Ok(Environment::Urban),
            "urban_dense" => Ok(Environment::UrbanDense),
            other => Err(AdvisorError::UnknownVariant {
                kind: "environment",
                value: other.to_string(),
                expected: "rural, suburban, urban, urban_dense",
            }),
        }
    }
}

/// Building facade the signal has to cross to reach the indoor receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FacadeMaterial {
    StandardWindow,
    DoubleWindow,
    LightWall,
    StandardWall,
    ThickWall,
    ReinforcedConcrete,
}

impl FacadeMaterial {
    pub const ALL: [FacadeMaterial; 6] = [
        FacadeMaterial::StandardWindow,
        FacadeMaterial::DoubleWindow,
        FacadeMaterial::LightWall,
        FacadeMaterial::StandardWall,
        FacadeMaterial::ThickWall,
        FacadeMaterial::ReinforcedConcrete,
    ];

    /// Human-readable label ("standard wall").
    pub fn label(self) -> String {
        self.to_string().replace('_', " ")
    }
}

impl fmt::Display for FacadeMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FacadeMaterial::StandardWindow => "standard_window",
            FacadeMaterial::DoubleWindow => "double_window",
            FacadeMaterial::LightWall => "light_wall",
            FacadeMaterial::StandardWall => "standard_wall",
            FacadeMaterial::ThickWall => "thick_wall",
            FacadeMaterial::ReinforcedConcrete => "reinforced_concrete",
        };
        f.write_str(name)
    }
}

impl FromStr for FacadeMaterial {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        FacadeMaterial::ALL
            .into_iter()
            .find(|m| m.to_string() == key)
            .ok_or(AdvisorError::UnknownVariant {
                kind: "facade material",
                value: key,
                expected: "standard_window, double_window, light_wall, standard_wall, thick_wall, reinforced_concrete",
            })
    }
}

/// Service class to guarantee indoors; drives the default RSRP threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ServiceType {
    Voice,
    DataBasic,
    VideoSd,
    VideoHd,
    Gaming,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        ServiceType::Voice,
        ServiceType::DataBasic,
        ServiceType::VideoSd,
        ServiceType::VideoHd,
        ServiceType::Gaming,
    ];

    /// Minimum RSRP (dBm) the service needs.
    pub fn rsrp_threshold_dbm(self) -> f64 {
        match self {
            ServiceType::Voice => -105.0,
            ServiceType::DataBasic => -100.0,
            ServiceType::VideoSd => -95.0,
            ServiceType::VideoHd => -85.0,
            ServiceType::Gaming => -75.0,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceType::Voice => "voice",
            ServiceType::DataBasic => "data_basic",
            ServiceType::VideoSd => "video_sd",
            ServiceType::VideoHd => "video_hd",
            ServiceType::Gaming => "gaming",
        };
        f.write_str(name)
    }
}

impl FromStr for ServiceType {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        ServiceType::ALL
            .into_iter()
            .find(|t| t.to_string() == key)
            .ok_or(AdvisorError::UnknownVariant {
                kind: "service type",
                value: key,
                expected: "voice, data_basic, video_sd, video_hd, gaming",
            })
    }
}

// Config files accept the same spellings as the command line.
macro_rules! parse_from_string {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = AdvisorError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )+
    };
}

parse_from_string!(Technology, Environment, FacadeMaterial, ServiceType);

// ── Resolved configuration ──────────────────────────────────────────

/// Fully resolved scenario. Build it with [`ScenarioInput::resolve`] (or
/// [`ScenarioConfig::from_toml_str`]) so the hard envelope is checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioConfig {
    pub technology: Technology,
    pub frequency_mhz: f64,
    pub tx_power_dbm: f64,
    pub tx_gain_dbi: f64,
    pub rx_gain_dbi: f64,
    pub distance_m: f64,
    pub bs_height_m: f64,
    pub ue_height_m: f64,
    pub environment: Environment,
    pub line_of_sight: bool,
    pub facade_material: FacadeMaterial,
    pub service_type: ServiceType,
    pub shadowing_sigma_db: f64,
    pub rsrp_threshold_override_dbm: Option<f64>,
}

/// Inclusive bounds outside of which a scenario is rejected outright.
struct HardLimit {
    field: &'static str,
    min: f64,
    max: f64,
    unit: &'static str,
}

impl HardLimit {
    const fn new(field: &'static str, min: f64, max: f64, unit: &'static str) -> Self {
        HardLimit {
            field,
            min,
            max,
            unit,
        }
    }
}

const HARD_LIMITS: &[HardLimit] = &[
    HardLimit::new("frequency_mhz", 700.0, 6000.0, "MHz"),
    HardLimit::new("tx_power_dbm", 0.0, 60.0, "dBm"),
    HardLimit::new("tx_gain_dbi", -10.0, 30.0, "dBi"),
    HardLimit::new("rx_gain_dbi", -10.0, 10.0, "dBi"),
    HardLimit::new("distance_m", 1.0, 50_000.0, "m"),
    HardLimit::new("bs_height_m", 10.0, 100.0, "m"),
    HardLimit::new("ue_height_m", 0.5, 10.0, "m"),
    HardLimit::new("shadowing_sigma_db", 0.0, 20.0, "dB"),
];

impl ScenarioConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, AdvisorError> {
        ScenarioFile::from_toml_str(input)?.single().resolve()
    }

    /// RSRP threshold in force: the explicit override, else the service default.
    pub fn rsrp_threshold_dbm(&self) -> f64 {
        self.rsrp_threshold_override_dbm
            .unwrap_or_else(|| self.service_type.rsrp_threshold_dbm())
    }

    /// Effective isotropic radiated power of the macro site.
    pub fn eirp_dbm(&self) -> f64 {
        self.tx_power_dbm + self.tx_gain_dbi
    }

    pub fn eirp_watt(&self) -> f64 {
        units::dbm_to_watt(self.eirp_dbm())
    }

    /// Reject configurations no model can meaningfully evaluate.
    pub fn check(&self) -> Result<(), AdvisorError> {
        let values = [
            self.frequency_mhz,
            self.tx_power_dbm,
            self.tx_gain_dbi,
            self.rx_gain_dbi,
            self.distance_m,
            self.bs_height_m,
            self.ue_height_m,
            self.shadowing_sigma_db,
        ];
        for (limit, value) in HARD_LIMITS.iter().zip(values) {
            if !value.is_finite() {
                return Err(AdvisorError::field(limit.field, "must be a finite number"));
            }
            if value < limit.min || value > limit.max {
                return Err(AdvisorError::field(
                    limit.field,
                    format!(
                        "{value} {} outside [{} - {}] {}",
                        limit.unit, limit.min, limit.max, limit.unit
                    ),
                ));
            }
        }
        if let Some(threshold) = self.rsrp_threshold_override_dbm {
            if !threshold.is_finite() {
                return Err(AdvisorError::field(
                    "rsrp_threshold_dbm",
                    "must be a finite number",
                ));
            }
        }
        Ok(())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let tech = Technology::Lte.defaults();
        let environment = Environment::Urban;
        Self {
            technology: Technology::Lte,
            frequency_mhz: tech.frequency_mhz,
            tx_power_dbm: tech.tx_power_dbm,
            tx_gain_dbi: tech.tx_gain_dbi,
            rx_gain_dbi: tech.rx_gain_dbi,
            distance_m: DEFAULT_DISTANCE_M,
            bs_height_m: DEFAULT_BS_HEIGHT_M,
            ue_height_m: DEFAULT_UE_HEIGHT_M,
            environment,
            line_of_sight: false,
            facade_material: FacadeMaterial::LightWall,
            service_type: ServiceType::DataBasic,
            shadowing_sigma_db: environment.default_sigma_db(),
            rsrp_threshold_override_dbm: None,
        }
    }
}

// ── Partial input ───────────────────────────────────────────────────

/// Partial scenario as written in a config file or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioInput {
    /// Free-form label, used by batch reports only.
    pub name: Option<String>,
    pub technology: Option<Technology>,
    pub frequency_mhz: Option<f64>,
    pub tx_power_dbm: Option<f64>,
    pub tx_gain_dbi: Option<f64>,
    pub rx_gain_dbi: Option<f64>,
    pub distance_m: Option<f64>,
    pub bs_height_m: Option<f64>,
    pub ue_height_m: Option<f64>,
    pub environment: Option<Environment>,
    pub line_of_sight: Option<bool>,
    pub facade_material: Option<FacadeMaterial>,
    pub service_type: Option<ServiceType>,
    pub shadowing_sigma_db: Option<f64>,
    pub rsrp_threshold_dbm: Option<f64>,
}

impl ScenarioInput {
    /// Layer `overrides` on top of `self`; any field set in `overrides` wins.
    pub fn merged_with(self, overrides: ScenarioInput) -> ScenarioInput {
        ScenarioInput {
            name: overrides.name.or(self.name),
            technology: overrides.technology.or(self.technology),
            frequency_mhz: overrides.frequency_mhz.or(self.frequency_mhz),
            tx_power_dbm: overrides.tx_power_dbm.or(self.tx_power_dbm),
            tx_gain_dbi: overrides.tx_gain_dbi.or(self.tx_gain_dbi),
            rx_gain_dbi: overrides.rx_gain_dbi.or(self.rx_gain_dbi),
            distance_m: overrides.distance_m.or(self.distance_m),
            bs_height_m: overrides.bs_height_m.or(self.bs_height_m),
            ue_height_m: overrides.ue_height_m.or(self.ue_height_m),
            environment: overrides.environment.or(self.environment),
            line_of_sight: overrides.line_of_sight.or(self.line_of_sight),
            facade_material: overrides.facade_material.or(self.facade_material),
            service_type: overrides.service_type.or(self.service_type),
            shadowing_sigma_db: overrides.shadowing_sigma_db.or(self.shadowing_sigma_db),
            rsrp_threshold_dbm: overrides.rsrp_threshold_dbm.or(self.rsrp_threshold_dbm),
        }
    }

    /// Apply the default-resolution rules and check the hard envelope.
    ///
    /// Radio parameters default from the technology, σ from the
    /// environment, and the RSRP threshold stays tied to the service type
    /// unless explicitly overridden.
    pub fn resolve(self) -> Result<ScenarioConfig, AdvisorError> {
        let technology = self.technology.unwrap_or(Technology::Lte);
        let tech = technology.defaults();
        let environment = self.environment.unwrap_or(Environment::Urban);

        let config = ScenarioConfig {
            technology,
            frequency_mhz: self.frequency_mhz.unwrap_or(tech.frequency_mhz),
            tx_power_dbm: self.tx_power_dbm.unwrap_or(tech.tx_power_dbm),
            tx_gain_dbi: self.tx_gain_dbi.unwrap_or(tech.tx_gain_dbi),
            rx_gain_dbi: self.rx_gain_dbi.unwrap_or(tech.rx_gain_dbi),
            distance_m: self.distance_m.unwrap_or(DEFAULT_DISTANCE_M),
            bs_height_m: self.bs_height_m.unwrap_or(DEFAULT_BS_HEIGHT_M),
            ue_height_m: self.ue_height_m.unwrap_or(DEFAULT_UE_HEIGHT_M),
            environment,
            line_of_sight: self.line_of_sight.unwrap_or(false),
            facade_material: self.facade_material.unwrap_or(FacadeMaterial::LightWall),
            service_type: self.service_type.unwrap_or(ServiceType::DataBasic),
            shadowing_sigma_db: self
                .shadowing_sigma_db
                .unwrap_or_else(|| environment.default_sigma_db()),
            rsrp_threshold_override_dbm: self.rsrp_threshold_dbm,
        };
        config.check()?;
        Ok(config)
    }
}

// ── Config file ─────────────────────────────────────────────────────

/// On-disk layout: either a single `[scenario]` table or a `[[scenarios]]`
/// array for batch runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioFile {
    pub version: u32,
    pub scenario: Option<ScenarioInput>,
    pub scenarios: Vec<ScenarioInput>,
}

impl ScenarioFile {
    pub fn from_toml_str(input: &str) -> Result<Self, AdvisorError> {
        if input.trim().is_empty() {
            return Ok(ScenarioFile {
                version: CONFIG_VERSION,
                ..Default::default()
            });
        }
        let mut parsed: ScenarioFile =
            toml::from_str(input).map_err(|e| AdvisorError::ConfigParse(e.to_string()))?;
        if parsed.version == 0 {
            parsed.version = CONFIG_VERSION;
        }
        if parsed.version != CONFIG_VERSION {
            return Err(AdvisorError::UnsupportedVersion(parsed.version));
        }
        Ok(parsed)
    }

    /// The scenario for single-shot commands: `[scenario]`, else the first
    /// batch entry, else all defaults.
    pub fn single(&self) -> ScenarioInput {
        self.scenario
            .clone()
            .or_else(|| self.scenarios.first().cloned())
            .unwrap_or_default()
    }

    /// Batch entries in file order, each layered over `[scenario]` when
    /// present so shared values need writing only once.
    pub fn batch(&self) -> Vec<ScenarioInput> {
        let base = self.scenario.clone().unwrap_or_default();
        if self.scenarios.is_empty() {
            return vec![base];
        }
        self.scenarios
            .iter()
            .map(|entry| base.clone().merged_with(entry.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_resolves_to_defaults() {
        let cfg = ScenarioInput::default().resolve().unwrap();
        assert_eq!(cfg, ScenarioConfig::default());
        assert_eq!(cfg.frequency_mhz, 1800.0);
        assert_eq!(cfg.shadowing_sigma_db, 8.0);
        assert_eq!(cfg.rsrp_threshold_dbm(), -100.0);
    }

    #[test]
    fn nr_defaults_follow_technology() {
        let cfg = ScenarioInput {
            technology: Some(Technology::Nr),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(cfg.frequency_mhz, 3500.0);
        assert_eq!(cfg.tx_power_dbm, 40.0);
        assert_eq!(cfg.tx_gain_dbi, 20.0);
        assert_eq!(cfg.eirp_dbm(), 60.0);
        assert!((cfg.eirp_watt() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn sigma_defaults_follow_environment() {
        for env in Environment::ALL {
            let cfg = ScenarioInput {
                environment: Some(env),
                ..Default::default()
            }
            .resolve()
            .unwrap();
            assert_eq!(cfg.shadowing_sigma_db, env.default_sigma_db());
        }
    }

    #[test]
    fn threshold_override_beats_service_default() {
        let cfg = ScenarioInput {
            service_type: Some(ServiceType::Gaming),
            rsrp_threshold_dbm: Some(-110.0),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(cfg.rsrp_threshold_dbm(), -110.0);

        let cfg = ScenarioInput {
            service_type: Some(ServiceType::Gaming),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(cfg.rsrp_threshold_dbm(), -75.0);
    }

    #[test]
    fn negative_distance_is_fatal() {
        let err = ScenarioInput {
            distance_m: Some(-5.0),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::InvalidField {
                field: "distance_m",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_value_is_fatal() {
        let err = ScenarioInput {
            frequency_mhz: Some(f64::NAN),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();
        assert_eq!(
            err,
            AdvisorError::field("frequency_mhz", "must be a finite number")
        );
    }

    #[test]
    fn negative_sigma_is_fatal() {
        let result = ScenarioInput {
            shadowing_sigma_db: Some(-1.0),
            ..Default::default()
        }
        .resolve();
        assert!(result.is_err());
    }

    #[test]
    fn enum_parsing_accepts_aliases() {
        assert_eq!("4G".parse::<Technology>().unwrap(), Technology::Lte);
        assert_eq!("nr".parse::<Technology>().unwrap(), Technology::Nr);
        assert_eq!(
            "urban-dense".parse::<Environment>().unwrap(),
            Environment::UrbanDense
        );
        assert_eq!(
            "Standard Wall".parse::<FacadeMaterial>().unwrap(),
            FacadeMaterial::StandardWall
        );
        assert_eq!(
            "video_hd".parse::<ServiceType>().unwrap(),
            ServiceType::VideoHd
        );
        assert!("wimax".parse::<Technology>().is_err());
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for m in FacadeMaterial::ALL {
            assert_eq!(m.to_string().parse::<FacadeMaterial>().unwrap(), m);
        }
        for s in ServiceType::ALL {
            assert_eq!(s.to_string().parse::<ServiceType>().unwrap(), s);
        }
        for e in Environment::ALL {
            assert_eq!(e.to_string().parse::<Environment>().unwrap(), e);
        }
    }

    #[test]
    fn parse_single_scenario_toml() {
        let toml = r#"
            version = 1

            [scenario]
            technology = "nr"
            distance_m = 450.0
            environment = "urban_dense"
            facade_material = "thick_wall"
            service_type = "video_hd"
            line_of_sight = true
        "#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.technology, Technology::Nr);
        assert_eq!(cfg.distance_m, 450.0);
        assert_eq!(cfg.environment, Environment::UrbanDense);
        assert_eq!(cfg.facade_material, FacadeMaterial::ThickWall);
        assert!(cfg.line_of_sight);
        assert_eq!(cfg.shadowing_sigma_db, 10.0);
        assert_eq!(cfg.rsrp_threshold_dbm(), -85.0);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg = ScenarioConfig::from_toml_str("  \n").unwrap();
        assert_eq!(cfg, ScenarioConfig::default());
    }

    #[test]
    fn unknown_enum_value_in_toml_is_rejected() {
        let toml = r#"
            [scenario]
            environment = "jungle"
        "#;
        let err = ScenarioConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, AdvisorError::ConfigParse(_)));
    }

    #[test]
    fn misspelled_key_is_rejected() {
        let toml = r#"
            [scenario]
            distance = 4000.0
        "#;
        let err = ScenarioConfig::from_toml_str(toml).unwrap_err();
        match err {
            AdvisorError::ConfigParse(msg) => assert!(msg.contains("distance"), "{msg}"),
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let err = ScenarioFile::from_toml_str("version = 1
scenaro = 3").unwrap_err();
        assert!(matches!(err, AdvisorError::ConfigParse(_)));
    }

    #[test]
    fn toml_enums_accept_command_line_spellings() {
        let toml = r#"
            [scenario]
            technology = "LTE"
            environment = "Urban-Dense"
            facade_material = "Thick Wall"
            service_type = "VIDEO_HD"
        "#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.technology, Technology::Lte);
        assert_eq!(cfg.environment, Environment::UrbanDense);
        assert_eq!(cfg.facade_material, FacadeMaterial::ThickWall);
        assert_eq!(cfg.service_type, ServiceType::VideoHd);

        let cfg = ScenarioConfig::from_toml_str("[scenario]\ntechnology = \"5G\"").unwrap();
        assert_eq!(cfg.technology, Technology::Nr);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let err = ScenarioFile::from_toml_str("version = 7").unwrap_err();
        assert_eq!(err, AdvisorError::UnsupportedVersion(7));
    }

    #[test]
    fn batch_entries_inherit_shared_scenario() {
        let toml = r#"
            [scenario]
            technology = "lte"
            environment = "suburban"

            [[scenarios]]
            name = "near"
            distance_m = 100.0

            [[scenarios]]
            name = "far"
            distance_m = 1500.0
            environment = "rural"
        "#;
        let file = ScenarioFile::from_toml_str(toml).unwrap();
        let batch = file.batch();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].name.as_deref(), Some("near"));
        assert_eq!(batch[0].environment, Some(Environment::Suburban));
        assert_eq!(batch[1].environment, Some(Environment::Rural));
        assert_eq!(batch[1].distance_m, Some(1500.0));
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = ScenarioInput {
            distance_m: Some(100.0),
            frequency_mhz: Some(2100.0),
            ..Default::default()
        };
        let merged = base.merged_with(ScenarioInput {
            distance_m: Some(250.0),
            ..Default::default()
        });
        assert_eq!(merged.distance_m, Some(250.0));
        assert_eq!(merged.frequency_mhz, Some(2100.0));
    }
}
