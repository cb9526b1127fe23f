//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcResult, QuoteError};
use crate::units::Kilometers;

/// Mean Earth radius used by the haversine formula (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// The factory all deliveries leave from (26°41'19.2"N 88°20'57.6"E)
pub const FACTORY: GeoPoint = GeoPoint {
    lat: 26.6886667,
    lng: 88.3493333,
};

/// WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(QuoteError::invalid_input(
                "lat",
                self.lat.to_string(),
                "Latitude must be between -90 and 90",
            ));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(QuoteError::invalid_input(
                "lng",
                self.lng.to_string(),
                "Longitude must be between -180 and 180",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lat: {:.6}, Lng: {:.6}", self.lat, self.lng)
    }
}

/// Great-circle distance between two points (haversine).
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> Kilometers {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Kilometers(EARTH_RADIUS_KM * c)
}
