//! Indoor link budget: outdoor path loss plus building entry loss, turned
//! into a mean RSRP and a signal-quality tier.

use std::fmt;

use serde::Serialize;

use crate::propagation::{PathLossResult, PropagationModel};
use crate::scenario::{FacadeMaterial, ScenarioConfig, Technology};

/// Extra entry loss applied to NR over the LTE table.
pub const NR_ENTRY_LOSS_PENALTY_DB: f64 = 5.0;

/// LTE building entry loss per facade material (dB).
pub fn lte_entry_loss_db(material: FacadeMaterial) -> f64 {
    match material {
        FacadeMaterial::StandardWindow => 10.0,
        FacadeMaterial::DoubleWindow => 15.0,
        FacadeMaterial::LightWall => 20.0,
        FacadeMaterial::StandardWall => 25.0,
        FacadeMaterial::ThickWall => 30.0,
        FacadeMaterial::ReinforcedConcrete => 35.0,
    }
}

/// Building entry loss for a technology. NR is derived from the LTE table
/// plus a flat penalty, so the two can never drift apart.
pub fn building_entry_loss_db(technology: Technology, material: FacadeMaterial) -> f64 {
    let base = lte_entry_loss_db(material);
    match technology {
        Technology::Lte => base,
        Technology::Nr => base + NR_ENTRY_LOSS_PENALTY_DB,
    }
}

// ── Signal quality ──────────────────────────────────────────────────

/// RSRP quality bins, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalQuality {
    Excellent,
    Good,
    Medium,
    Weak,
    Critical,
}

impl SignalQuality {
    /// Lower bounds (inclusive) of Excellent, Good, Medium and Weak, in dBm.
    /// Anything below the last cutoff is Critical.
    pub fn cutoffs_dbm(technology: Technology) -> [f64; 4] {
        match technology {
            Technology::Lte => [-75.0, -85.0, -95.0, -105.0],
            Technology::Nr => [-70.0, -80.0, -90.0, -100.0],
        }
    }

    pub fn classify(rsrp_dbm: f64, technology: Technology) -> SignalQuality {
        const TIERS: [SignalQuality; 4] = [
            SignalQuality::Excellent,
            SignalQuality::Good,
            SignalQuality::Medium,
            SignalQuality::Weak,
        ];
        SignalQuality::cutoffs_dbm(technology)
            .into_iter()
            .zip(TIERS)
            .find(|(cutoff, _)| rsrp_dbm >= *cutoff)
            .map(|(_, tier)| tier)
            .unwrap_or(SignalQuality::Critical)
    }

    pub fn is_poor(self) -> bool {
        matches!(self, SignalQuality::Weak | SignalQuality::Critical)
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalQuality::Excellent => "Excellent",
            SignalQuality::Good => "Good",
            SignalQuality::Medium => "Medium",
            SignalQuality::Weak => "Weak",
            SignalQuality::Critical => "Critical",
        };
        f.write_str(name)
    }
}

// ── Link budget ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkBudgetResult {
    /// Model whose outdoor loss fed this budget.
    pub model: PropagationModel,
    pub eirp_dbm: f64,
    pub rsrp_dbm: f64,
    pub outdoor_path_loss_db: f64,
    pub building_entry_loss_db: f64,
    pub total_path_loss_db: f64,
    pub quality: SignalQuality,
}

/// `RSRP = P_tx + G_tx + G_rx − PL_outdoor − BEL`.
pub fn compute_link_budget(config: &ScenarioConfig, outdoor: &PathLossResult) -> LinkBudgetResult {
    let eirp_dbm = config.eirp_dbm();
    let entry_loss = building_entry_loss_db(config.technology, config.facade_material);
    let total = outdoor.path_loss_db + entry_loss;
    let rsrp_dbm = eirp_dbm + config.rx_gain_dbi - total;
    let quality = SignalQuality::classify(rsrp_dbm, config.technology);

    tracing::info!(
        model = %outdoor.model,
        rsrp_dbm,
        eirp_dbm,
        outdoor_db = outdoor.path_loss_db,
        entry_loss_db = entry_loss,
        %quality,
        "link budget computed"
    );

    LinkBudgetResult {
        model: outdoor.model,
        eirp_dbm,
        rsrp_dbm,
        outdoor_path_loss_db: outdoor.path_loss_db,
        building_entry_loss_db: entry_loss,
        total_path_loss_db: total,
        quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nr_table_is_lte_plus_penalty() {
        for material in FacadeMaterial::ALL {
            assert_eq!(
                building_entry_loss_db(Technology::Nr, material),
                building_entry_loss_db(Technology::Lte, material) + 5.0
            );
        }
    }

    #[test]
    fn entry_loss_grows_with_facade_mass() {
        let losses: Vec<f64> = FacadeMaterial::ALL
            .into_iter()
            .map(lte_entry_loss_db)
            .collect();
        assert!(losses.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn lte_quality_bins() {
        let t = Technology::Lte;
        assert_eq!(SignalQuality::classify(-60.0, t), SignalQuality::Excellent);
        assert_eq!(SignalQuality::classify(-75.0, t), SignalQuality::Excellent);
        assert_eq!(SignalQuality::classify(-75.1, t), SignalQuality::Good);
        assert_eq!(SignalQuality::classify(-90.0, t), SignalQuality::Medium);
        assert_eq!(SignalQuality::classify(-105.0, t), SignalQuality::Weak);
        assert_eq!(SignalQuality::classify(-105.5, t), SignalQuality::Critical);
    }

    #[test]
    fn nr_cutoffs_are_five_db_tighter() {
        let lte = SignalQuality::cutoffs_dbm(Technology::Lte);
        let nr = SignalQuality::cutoffs_dbm(Technology::Nr);
        for (l, n) in lte.iter().zip(nr.iter()) {
            assert_eq!(n - l, 5.0);
        }
        // -72 dBm is Excellent on LTE but only Good on NR.
        assert_eq!(
            SignalQuality::classify(-72.0, Technology::Lte),
            SignalQuality::Excellent
        );
        assert_eq!(
            SignalQuality::classify(-72.0, Technology::Nr),
            SignalQuality::Good
        );
    }

    #[test]
    fn nan_rsrp_is_critical() {
        assert_eq!(
            SignalQuality::classify(f64::NAN, Technology::Lte),
            SignalQuality::Critical
        );
    }

    #[test]
    fn rsrp_is_eirp_plus_rx_gain_minus_losses() {
        let cfg = ScenarioConfig {
            rx_gain_dbi: 2.0,
            facade_material: FacadeMaterial::StandardWall,
            ..ScenarioConfig::default()
        };
        let outdoor = PathLossResult {
            model: PropagationModel::ItuP1411,
            path_loss_db: 100.0,
            is_valid: true,
            warnings: Vec::new(),
        };
        let lb = compute_link_budget(&cfg, &outdoor);
        assert_eq!(lb.eirp_dbm, 61.0);
        assert_eq!(lb.building_entry_loss_db, 25.0);
        assert_eq!(lb.total_path_loss_db, 125.0);
        assert_eq!(lb.rsrp_dbm, 61.0 + 2.0 - 125.0);
        assert_eq!(lb.quality, SignalQuality::Medium);
        assert_eq!(lb.model, PropagationModel::ItuP1411);
    }
}
