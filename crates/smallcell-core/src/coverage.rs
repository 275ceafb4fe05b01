//! # Coverage Probability
//!
//! Instantaneous RSRP is modelled as Gaussian in dB around the mean link
//! budget (log-normal shadowing):
//!
//! $$P(\text{RSRP} > T) = Q\left(\frac{T - \mu}{\sigma}\right), \quad Q(x) = \tfrac12 \operatorname{erfc}(x/\sqrt2)$$
//!
//! The inverse gives the fade margin needed for a target reliability.

use std::f64::consts::SQRT_2;

use serde::Serialize;
use statrs::function::erf::{erfc, erfc_inv};

use crate::decision::{Recommendation, recommend};
use crate::error::AdvisorError;

/// Standard-normal upper tail.
pub fn q_function(x: f64) -> f64 {
    0.5 * erfc(x / SQRT_2)
}

/// Inverse of [`q_function`] for `p` in (0, 1).
pub fn q_inverse(p: f64) -> f64 {
    SQRT_2 * erfc_inv(2.0 * p)
}

/// Probability that RSRP exceeds `threshold_dbm` under shadowing `sigma_db`.
///
/// `sigma_db <= 0` degenerates to a step: 1 above the threshold, 0 below,
/// 0.5 exactly on it. A NaN in any input gives 0, so the result always lies
/// in [0, 1].
pub fn coverage_probability(mean_rsrp_dbm: f64, sigma_db: f64, threshold_dbm: f64) -> f64 {
    if mean_rsrp_dbm.is_nan() || sigma_db.is_nan() || threshold_dbm.is_nan() {
        return 0.0;
    }
    if sigma_db <= 0.0 {
        return if mean_rsrp_dbm > threshold_dbm {
            1.0
        } else if mean_rsrp_dbm < threshold_dbm {
            0.0
        } else {
            0.5
        };
    }
    q_function((threshold_dbm - mean_rsrp_dbm) / sigma_db).clamp(0.0, 1.0)
}

/// Shadowing margin (dB above threshold) for `P(RSRP > T) >= target`.
pub fn required_margin_for_reliability(
    sigma_db: f64,
    target_probability: f64,
) -> Result<f64, AdvisorError> {
    if !(target_probability > 0.0 && target_probability < 1.0) {
        return Err(AdvisorError::InvalidProbability(target_probability));
    }
    if !sigma_db.is_finite() {
        return Err(AdvisorError::field(
            "shadowing_sigma_db",
            "must be a finite number",
        ));
    }
    if sigma_db <= 0.0 {
        return Ok(0.0);
    }
    // Q(-m/σ) = target  ⇒  m = σ · Q⁻¹(1 − target), positive above 50 %.
    Ok(sigma_db * q_inverse(1.0 - target_probability))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageEstimate {
    pub mean_rsrp_dbm: f64,
    pub sigma_db: f64,
    pub threshold_dbm: f64,
    pub probability: f64,
    pub recommendation: Recommendation,
}

impl CoverageEstimate {
    pub fn new(mean_rsrp_dbm: f64, sigma_db: f64, threshold_dbm: f64) -> Self {
        let probability = coverage_probability(mean_rsrp_dbm, sigma_db, threshold_dbm);
        tracing::debug!(
            mean_rsrp_dbm,
            sigma_db,
            threshold_dbm,
            probability,
            "coverage probability"
        );
        CoverageEstimate {
            mean_rsrp_dbm,
            sigma_db,
            threshold_dbm,
            probability,
            recommendation: recommend(probability),
        }
    }

    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}
