//! Logarithmic and linear power units.

use crate::error::AdvisorError;

/// dBm to watts.
pub fn dbm_to_watt(dbm: f64) -> f64 {
    10f64.powf((dbm - 30.0) / 10.0)
}

/// Watts to dBm. Power must be strictly positive.
pub fn watt_to_dbm(watt: f64) -> Result<f64, AdvisorError> {
    if watt.is_nan() || watt <= 0.0 {
        return Err(AdvisorError::NonPositivePower(watt));
    }
    Ok(10.0 * watt.log10() + 30.0)
}

pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Linear ratio to dB. Ratio must be strictly positive.
pub fn linear_to_db(ratio: f64) -> Result<f64, AdvisorError> {
    if ratio.is_nan() || ratio <= 0.0 {
        return Err(AdvisorError::NonPositivePower(ratio));
    }
    Ok(10.0 * ratio.log10())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reference_points() {
        assert!(approx(dbm_to_watt(30.0), 1.0));
        assert!(approx(dbm_to_watt(43.0), 19.952_623_149_688_8));
        assert!(approx(watt_to_dbm(1.0).unwrap(), 30.0));
        assert!(approx(watt_to_dbm(0.001).unwrap(), 0.0));
        assert!(approx(db_to_linear(3.0), 1.995_262_314_968_88));
        assert!(approx(linear_to_db(100.0).unwrap(), 20.0));
    }

    #[test]
    fn conversions_invert() {
        for dbm in [-120.0, -30.0, 0.0, 23.0, 46.0] {
            assert!(approx(watt_to_dbm(dbm_to_watt(dbm)).unwrap(), dbm));
            assert!(approx(linear_to_db(db_to_linear(dbm)).unwrap(), dbm));
        }
    }

    #[test]
    fn non_positive_power_is_rejected() {
        assert_eq!(watt_to_dbm(0.0), Err(AdvisorError::NonPositivePower(0.0)));
        assert!(watt_to_dbm(-1.0).is_err());
        assert!(linear_to_db(0.0).is_err());
        assert!(linear_to_db(f64::NAN).is_err());
    }
}
