//! Site-to-building distance from GPS coordinates.

use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS-84 position in decimal degrees, altitude in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m: 0.0,
        }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = altitude_m;
        self
    }

    fn check(&self) -> Result<(), AdvisorError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AdvisorError::InvalidCoordinates(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AdvisorError::InvalidCoordinates(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.altitude_m.is_finite() {
            return Err(AdvisorError::InvalidCoordinates(format!(
                "altitude {} is not finite",
                self.altitude_m
            )));
        }
        Ok(())
    }
}

/// Great-circle distance along the Earth's surface, in metres.
pub fn haversine_distance_m(a: &GeoPoint, b: &GeoPoint) -> Result<f64, AdvisorError> {
    a.check()?;
    b.check()?;

    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();
    Ok(EARTH_RADIUS_M * c)
}

/// Slant distance combining the surface distance with the altitude gap.
pub fn distance_3d_m(a: &GeoPoint, b: &GeoPoint) -> Result<f64, AdvisorError> {
    let ground = haversine_distance_m(a, b)?;
    Ok(ground.hypot(b.altitude_m - a.altitude_m))
}
