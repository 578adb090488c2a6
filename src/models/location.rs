//! Coordinate model for geographic positions

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in decimal degrees, [-180, 180]
    pub lng: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are within their valid ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Round both components to the given number of decimal places
    #[must_use]
    pub fn rounded(&self, precision: u32) -> Self {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        Self {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }

    /// Google Maps pin URL for this position
    #[must_use]
    pub fn maps_url(&self) -> String {
        format!("https://maps.google.com/?q={},{}", self.lat, self.lng)
    }
}
