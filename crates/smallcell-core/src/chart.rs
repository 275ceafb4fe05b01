//! Plot-ready data for reports: the loss waterfall and the RSRP
//! distribution under shadowing. Rendering is left to the front-end.

use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::link_budget::LinkBudgetResult;

/// Span either side of the mean, in standard deviations.
pub const DISTRIBUTION_SPAN_SIGMAS: f64 = 4.0;

/// Substitute σ when plotting a deterministic (σ = 0) scenario.
pub const DEGENERATE_SIGMA_DB: f64 = 0.1;

// ── Waterfall ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Absolute level (bar from zero).
    Level,
    /// Signed change relative to the previous level.
    Delta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: &'static str,
    pub kind: StepKind,
    /// Level in dBm for [`StepKind::Level`], change in dB otherwise.
    pub value_db: f64,
    /// Running level after this step, in dBm.
    pub level_dbm: f64,
}

/// EIRP, outdoor loss, entry loss, receive gain, resulting RSRP.
pub fn loss_waterfall(budget: &LinkBudgetResult, rx_gain_dbi: f64) -> Vec<WaterfallStep> {
    let mut level = budget.eirp_dbm;
    let mut steps = vec![WaterfallStep {
        label: "EIRP",
        kind: StepKind::Level,
        value_db: level,
        level_dbm: level,
    }];

    for (label, delta) in [
        ("Outdoor path loss", -budget.outdoor_path_loss_db),
        ("Building entry loss", -budget.building_entry_loss_db),
        ("RX gain", rx_gain_dbi),
    ] {
        level += delta;
        steps.push(WaterfallStep {
            label,
            kind: StepKind::Delta,
            value_db: delta,
            level_dbm: level,
        });
    }

    steps.push(WaterfallStep {
        label: "RSRP",
        kind: StepKind::Level,
        value_db: budget.rsrp_dbm,
        level_dbm: budget.rsrp_dbm,
    });
    steps
}

// ── RSRP distribution ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsrpDistribution {
    pub mean_dbm: f64,
    pub sigma_db: f64,
    pub threshold_dbm: f64,
    /// `(rsrp_dbm, density)` pairs, ascending in RSRP.
    pub points: Vec<(f64, f64)>,
    /// Probability mass above the threshold.
    pub share_above: f64,
    pub share_below: f64,
}

/// Sample the Gaussian RSRP density over `mean ± 4σ`.
///
/// `samples` is clamped to at least 2. A zero or negative σ is replaced by
/// [`DEGENERATE_SIGMA_DB`] so the curve stays drawable; a non-finite mean
/// yields no points.
pub fn rsrp_distribution(
    mean_dbm: f64,
    sigma_db: f64,
    threshold_dbm: f64,
    samples: usize,
) -> RsrpDistribution {
    let sigma = if sigma_db > 0.0 { sigma_db } else { DEGENERATE_SIGMA_DB };
    let samples = samples.max(2);

    let normal = match Normal::new(mean_dbm, sigma) {
        Ok(n) if mean_dbm.is_finite() => n,
        _ => {
            return RsrpDistribution {
                mean_dbm,
                sigma_db: sigma,
                threshold_dbm,
                points: Vec::new(),
                share_above: 0.0,
                share_below: 0.0,
            };
        }
    };

    let lo = mean_dbm - DISTRIBUTION_SPAN_SIGMAS * sigma;
    let step = 2.0 * DISTRIBUTION_SPAN_SIGMAS * sigma / (samples - 1) as f64;
    let points = (0..samples)
        .map(|i| {
            let x = lo + step * i as f64;
            (x, normal.pdf(x))
        })
        .collect();

    let share_below = normal.cdf(threshold_dbm);
    RsrpDistribution {
        mean_dbm,
        sigma_db: sigma,
        threshold_dbm,
        points,
        share_above: 1.0 - share_below,
        share_below,
    }
}
