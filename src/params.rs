//! Analysis parameters: the one persisted entity.
//!
//! A record is created when the user submits the parameter form, mutated
//! once by the analysis routine to fill in results and artifact references,
//! and never deleted. `suitability_map` being set is the sole completion
//! flag; results and artifact references are either all unset or all set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form defaults. The UI constrains ranges (lat [-90,90], lon [-180,180],
/// buffer [5,100] km, weights [0,1]) but the data layer does not enforce
/// them; bad values fail downstream at the engine.
pub mod defaults {
    pub const LATITUDE: f64 = 50.5;
    pub const LONGITUDE: f64 = 2.0;
    pub const BUFFER_RADIUS_KM: u32 = 25;

    pub const WEIGHT_SLOPE: f64 = 0.3;
    pub const WEIGHT_ELEVATION: f64 = 0.2;
    pub const WEIGHT_WIND: f64 = 0.6;
    pub const WEIGHT_ROADS: f64 = 0.2;
    pub const WEIGHT_LANDCOVER: f64 = 0.4;
    pub const WEIGHT_NATURA: f64 = 0.3;

    pub const THRESHOLD_SLOPE_DEG: f64 = 5.0;
    pub const THRESHOLD_ELEVATION_M: f64 = 200.0;
    pub const THRESHOLD_WIND_MS: f64 = 2.0;
    pub const THRESHOLD_ROADS_M: f64 = 50.0;
    pub const THRESHOLD_NATURA_M: f64 = 2000.0;
}

/// User-supplied analysis inputs, default-populated where omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default = "d_latitude")]
    pub latitude: f64,
    #[serde(default = "d_longitude")]
    pub longitude: f64,
    /// Buffer radius in kilometers.
    #[serde(default = "d_buffer")]
    pub buffer_radius: u32,

    #[serde(default = "d_w_slope")]
    pub weight_slope: f64,
    #[serde(default = "d_w_elevation")]
    pub weight_elevation: f64,
    #[serde(default = "d_w_wind")]
    pub weight_wind: f64,
    #[serde(default = "d_w_roads")]
    pub weight_roads: f64,
    #[serde(default = "d_w_landcover")]
    pub weight_landcover: f64,
    #[serde(default = "d_w_natura")]
    pub weight_natura: f64,

    #[serde(default = "d_t_slope")]
    pub threshold_slope: f64,
    #[serde(default = "d_t_elevation")]
    pub threshold_elevation: f64,
    #[serde(default = "d_t_wind")]
    pub threshold_wind: f64,
    #[serde(default = "d_t_roads")]
    pub threshold_roads: f64,
    #[serde(default = "d_t_natura")]
    pub threshold_natura: f64,
}

fn d_latitude() -> f64 {
    defaults::LATITUDE
}
fn d_longitude() -> f64 {
    defaults::LONGITUDE
}
fn d_buffer() -> u32 {
    defaults::BUFFER_RADIUS_KM
}
fn d_w_slope() -> f64 {
    defaults::WEIGHT_SLOPE
}
fn d_w_elevation() -> f64 {
    defaults::WEIGHT_ELEVATION
}
fn d_w_wind() -> f64 {
    defaults::WEIGHT_WIND
}
fn d_w_roads() -> f64 {
    defaults::WEIGHT_ROADS
}
fn d_w_landcover() -> f64 {
    defaults::WEIGHT_LANDCOVER
}
fn d_w_natura() -> f64 {
    defaults::WEIGHT_NATURA
}
fn d_t_slope() -> f64 {
    defaults::THRESHOLD_SLOPE_DEG
}
fn d_t_elevation() -> f64 {
    defaults::THRESHOLD_ELEVATION_M
}
fn d_t_wind() -> f64 {
    defaults::THRESHOLD_WIND_MS
}
fn d_t_roads() -> f64 {
    defaults::THRESHOLD_ROADS_M
}
fn d_t_natura() -> f64 {
    defaults::THRESHOLD_NATURA_M
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            latitude: defaults::LATITUDE,
            longitude: defaults::LONGITUDE,
            buffer_radius: defaults::BUFFER_RADIUS_KM,
            weight_slope: defaults::WEIGHT_SLOPE,
            weight_elevation: defaults::WEIGHT_ELEVATION,
            weight_wind: defaults::WEIGHT_WIND,
            weight_roads: defaults::WEIGHT_ROADS,
            weight_landcover: defaults::WEIGHT_LANDCOVER,
            weight_natura: defaults::WEIGHT_NATURA,
            threshold_slope: defaults::THRESHOLD_SLOPE_DEG,
            threshold_elevation: defaults::THRESHOLD_ELEVATION_M,
            threshold_wind: defaults::THRESHOLD_WIND_MS,
            threshold_roads: defaults::THRESHOLD_ROADS_M,
            threshold_natura: defaults::THRESHOLD_NATURA_M,
        }
    }
}

/// The persisted analysis record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisParameters {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    // Region inputs
    pub latitude: f64,
    pub longitude: f64,
    /// Buffer radius in kilometers.
    pub buffer_radius: u32,

    // Per-criterion weights
    pub weight_slope: f64,
    pub weight_elevation: f64,
    pub weight_wind: f64,
    pub weight_roads: f64,
    pub weight_landcover: f64,
    pub weight_natura: f64,

    // Per-criterion thresholds (land cover has none: fixed class membership)
    pub threshold_slope: f64,
    pub threshold_elevation: f64,
    pub threshold_wind: f64,
    pub threshold_roads: f64,
    pub threshold_natura: f64,

    // Results, unset until the analysis has run
    pub mean_suitability: Option<f64>,
    pub min_suitability: Option<f64>,
    pub max_suitability: Option<f64>,

    // Artifact references, relative URLs under /static
    pub suitability_map: Option<String>,
    pub slope_map: Option<String>,
    pub elevation_map: Option<String>,
    pub wind_speed_map: Option<String>,
    pub roads_map: Option<String>,
    pub landcover_map: Option<String>,
    pub natura_2000_map: Option<String>,
}

impl AnalysisParameters {
    pub fn new(request: AnalysisRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            latitude: request.latitude,
            longitude: request.longitude,
            buffer_radius: request.buffer_radius,
            weight_slope: request.weight_slope,
            weight_elevation: request.weight_elevation,
            weight_wind: request.weight_wind,
            weight_roads: request.weight_roads,
            weight_landcover: request.weight_landcover,
            weight_natura: request.weight_natura,
            threshold_slope: request.threshold_slope,
            threshold_elevation: request.threshold_elevation,
            threshold_wind: request.threshold_wind,
            threshold_roads: request.threshold_roads,
            threshold_natura: request.threshold_natura,
            mean_suitability: None,
            min_suitability: None,
            max_suitability: None,
            suitability_map: None,
            slope_map: None,
            elevation_map: None,
            wind_speed_map: None,
            roads_map: None,
            landcover_map: None,
            natura_2000_map: None,
        }
    }

    /// The completion flag: the suitability map reference being set marks
    /// the record as analyzed, so a later view skips recomputation.
    pub fn is_complete(&self) -> bool {
        self.suitability_map.is_some()
    }

    /// Weights in criterion order: slope, elevation, wind, roads,
    /// land cover, natura.
    pub fn weights(&self) -> [f64; 6] {
        [
            self.weight_slope,
            self.weight_elevation,
            self.weight_wind,
            self.weight_roads,
            self.weight_landcover,
            self.weight_natura,
        ]
    }
}
