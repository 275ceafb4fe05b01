//! End-to-end assessment of one scenario.
//!
//! Validation, the selected propagation model, the link budget, coverage
//! probability and the recommendation, bundled into one [`Assessment`] that
//! the front-end and exporters consume. Batch callers go through
//! [`assess_cached`] so repeated scenarios reuse one model comparison.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::chart::{RsrpDistribution, rsrp_distribution};
use crate::coverage::{CoverageEstimate, required_margin_for_reliability};
use crate::decision::{self, MACRO_SUFFICIENT_MIN, Recommendation};
use crate::error::AdvisorError;
use crate::link_budget::{LinkBudgetResult, compute_link_budget};
use crate::propagation::{
    self, ComparisonCache, ModelComparison, ModelSpread, PathLossResult, PropagationModel,
};
use crate::scenario::ScenarioConfig;
use crate::validate::{self, ValidationReport};

/// Probability below which an advisory is raised regardless of tier.
pub const LOW_PROBABILITY_ADVISORY: f64 = 0.5;

/// Density samples carried in [`Assessment::distribution`].
pub const DISTRIBUTION_SAMPLES: usize = 81;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    /// Shadowing-aware decision on coverage probability.
    #[default]
    Probabilistic,
    /// Mean RSRP against threshold only.
    Deterministic,
}

impl fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionMode::Probabilistic => write!(f, "probabilistic"),
            DecisionMode::Deterministic => write!(f, "deterministic"),
        }
    }
}

impl FromStr for DecisionMode {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "probabilistic" => Ok(DecisionMode::Probabilistic),
            "deterministic" => Ok(DecisionMode::Deterministic),
            other => Err(AdvisorError::UnknownVariant {
                kind: "decision mode",
                value: other.to_string(),
                expected: "probabilistic, deterministic",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssessOptions {
    /// Model feeding the link budget.
    pub model: PropagationModel,
    pub mode: DecisionMode,
    /// Reliability the required fade margin is computed for.
    pub target_reliability: f64,
}

impl Default for AssessOptions {
    fn default() -> Self {
        Self {
            model: PropagationModel::REFERENCE,
            mode: DecisionMode::Probabilistic,
            target_reliability: MACRO_SUFFICIENT_MIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub config: ScenarioConfig,
    pub mode: DecisionMode,
    pub validation: ValidationReport,
    pub outdoor: PathLossResult,
    /// Spread of outdoor loss across every model for the same scenario.
    pub model_spread: ModelSpread,
    pub link_budget: LinkBudgetResult,
    /// Free-space baseline for the same geometry.
    pub fspl_db: f64,
    pub breakpoint_distance_m: f64,
    pub threshold_dbm: f64,
    /// Mean RSRP minus threshold.
    pub margin_db: f64,
    /// Absent in deterministic mode.
    pub coverage: Option<CoverageEstimate>,
    pub target_reliability: f64,
    pub required_margin_db: Option<f64>,
    /// Required margin minus achieved margin; positive is a shortfall.
    pub margin_deficit_db: Option<f64>,
    pub recommendation: Recommendation,
    pub advisories: Vec<String>,
    /// Shadowing density around the mean RSRP, drawn with the scenario σ in
    /// either decision mode.
    pub distribution: RsrpDistribution,
}

/// Run the full pipeline for one scenario.
pub fn assess(
    config: &ScenarioConfig,
    options: &AssessOptions,
) -> Result<Assessment, AdvisorError> {
    config.check()?;
    let comparison = propagation::compare_models(config);
    assess_with(config, options, &comparison)
}

/// [`assess`], taking the model comparison from `cache`.
pub fn assess_cached(
    config: &ScenarioConfig,
    options: &AssessOptions,
    cache: &mut ComparisonCache,
) -> Result<Assessment, AdvisorError> {
    config.check()?;
    let comparison = cache.get_or_compute(config);
    assess_with(config, options, comparison)
}

fn assess_with(
    config: &ScenarioConfig,
    options: &AssessOptions,
    comparison: &ModelComparison,
) -> Result<Assessment, AdvisorError> {
    let validation = validate::validate(config);
    let outdoor = match comparison.get(options.model) {
        Some(result) => result.clone(),
        None => options.model.evaluate(config),
    };
    let link_budget = compute_link_budget(config, &outdoor);

    let threshold_dbm = config.rsrp_threshold_dbm();
    let margin_db = link_budget.rsrp_dbm - threshold_dbm;

    let (coverage, required_margin_db, recommendation) = match options.mode {
        DecisionMode::Probabilistic => {
            let estimate = CoverageEstimate::new(
                link_budget.rsrp_dbm,
                config.shadowing_sigma_db,
                threshold_dbm,
            );
            let required = required_margin_for_reliability(
                config.shadowing_sigma_db,
                options.target_reliability,
            )?;
            (Some(estimate), Some(required), estimate.recommendation)
        }
        DecisionMode::Deterministic => (
            None,
            None,
            decision::recommend_deterministic(link_budget.rsrp_dbm, threshold_dbm),
        ),
    };

    let mut advisories = Vec::new();
    if let Some(est) = &coverage {
        if est.probability < LOW_PROBABILITY_ADVISORY {
            advisories.push(format!(
                "coverage probability very low ({:.1}% < {:.0}%)",
                est.percent(),
                LOW_PROBABILITY_ADVISORY * 100.0
            ));
        }
    }
    if link_budget.quality.is_poor() {
        advisories.push(format!("signal quality {}", link_budget.quality));
    }

    let assessment = Assessment {
        config: config.clone(),
        mode: options.mode,
        validation,
        fspl_db: propagation::fspl_db(config.distance_m, config.frequency_mhz),
        breakpoint_distance_m: propagation::breakpoint_distance_m(config),
        threshold_dbm,
        margin_db,
        coverage,
        target_reliability: options.target_reliability,
        required_margin_db,
        margin_deficit_db: required_margin_db.map(|r| r - margin_db),
        recommendation,
        advisories,
        distribution: rsrp_distribution(
            link_budget.rsrp_dbm,
            config.shadowing_sigma_db,
            threshold_dbm,
            DISTRIBUTION_SAMPLES,
        ),
        outdoor,
        model_spread: comparison.spread,
        link_budget,
    };

    tracing::info!(
        technology = %config.technology,
        distance_m = config.distance_m,
        rsrp_dbm = assessment.link_budget.rsrp_dbm,
        probability = assessment.coverage.map(|c| c.probability),
        recommendation = %assessment.recommendation,
        warnings = assessment.outdoor.warnings.len(),
        "assessment complete"
    );

    Ok(assessment)
}

impl Assessment {
    pub fn probability(&self) -> Option<f64> {
        self.coverage.map(|c| c.probability)
    }

    /// Every warning attached to this result: domain violations of the
    /// model used, scenario-wide checks, then advisories.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = self.outdoor.warnings.clone();
        out.extend(
            self.validation
                .warnings
                .iter()
                .filter(|w| w.model.is_none())
                .map(ToString::to_string),
        );
        out.extend(self.advisories.iter().cloned());
        out
    }

    /// Domain warnings for models other than the one used, kept apart
    /// because they do not affect this result.
    pub fn other_model_warnings(&self) -> Vec<String> {
        self.validation
            .warnings
            .iter()
            .filter(|w| w.model.is_some_and(|m| m != self.outdoor.model))
            .map(ToString::to_string)
            .collect()
    }

    /// One-paragraph narrative for reports.
    pub fn summary(&self) -> String {
        let c = &self.config;
        let verdict = match (self.mode, self.recommendation) {
            (DecisionMode::Probabilistic, Recommendation::MacroSufficient) => "excellent",
            (DecisionMode::Deterministic, Recommendation::MacroSufficient) => "satisfactory",
            (_, Recommendation::SmallCellRecommended) => "marginal but acceptable",
            (_, Recommendation::SmallCellRequired) => "insufficient",
        };
        let evidence = match &self.coverage {
            Some(est) => format!(
                "Probabilistic analysis indicates {:.1}% reliability (sigma = {} dB).",
                est.percent(),
                est.sigma_db
            ),
            None => format!(
                "Computed RSRP is {:.2} dBm (threshold {:.0} dBm).",
                self.link_budget.rsrp_dbm, self.threshold_dbm
            ),
        };
        format!(
            "In a {} environment at {} m, {} ({} MHz) through a {} facade ({} dB) yields {} indoor coverage. {} {}",
            c.environment.to_string().replace('_', " "),
            c.distance_m,
            c.technology.generation(),
            c.frequency_mhz,
            c.facade_material.label(),
            self.link_budget.building_entry_loss_db,
            verdict,
            evidence,
            self.recommendation.guidance()
        )
    }
}
