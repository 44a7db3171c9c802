//! Region of interest construction
//!
//! A region is the circular geographic area an analysis covers: a center
//! point in decimal degrees plus a radius in meters. Coordinates are passed
//! through as-is; out-of-range values are rejected by the remote engine, not
//! here.

use serde::{Deserialize, Serialize};

/// Circular region of interest, ready to embed in expression graphs and
/// engine requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
}

impl Region {
    /// Build a region from a center point and a buffer radius in kilometers.
    pub fn from_point_buffer(latitude: f64, longitude: f64, buffer_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_m: buffer_km * 1000.0,
        }
    }

    /// Buffer radius in kilometers, as entered by the user.
    pub fn radius_km(&self) -> f64 {
        self.radius_m / 1000.0
    }
}
