// Page templates for HTML rendering with Askama

use crate::params::{defaults, AnalysisParameters};
use askama::Template;

// ============================================================================
// Parameter Form
// ============================================================================

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub error: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub buffer_radius: u32,
    pub weight_slope: f64,
    pub weight_elevation: f64,
    pub weight_wind: f64,
    pub weight_roads: f64,
    pub weight_landcover: f64,
    pub weight_natura: f64,
    pub threshold_slope: f64,
    pub threshold_elevation: f64,
    pub threshold_wind: f64,
    pub threshold_roads: f64,
    pub threshold_natura: f64,
}

impl IndexTemplate {
    pub fn with_error(error: Option<String>) -> Self {
        Self {
            error,
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

// ============================================================================
// Results Page
// ============================================================================

pub struct StatsView {
    pub mean: String,
    pub min: String,
    pub max: String,
}

#[derive(Template)]
#[template(path = "pages/results.html")]
pub struct ResultsTemplate {
    pub id: String,
    pub created_at: String,
    pub latitude: f64,
    pub longitude: f64,
    pub buffer_radius: u32,
    pub stats: Option<StatsView>,
    pub suitability_map: String,
    pub slope_map: String,
    pub elevation_map: String,
    pub wind_speed_map: String,
    pub roads_map: String,
    pub landcover_map: String,
    pub natura_2000_map: String,
}

impl ResultsTemplate {
    /// Build the view from a completed record. Artifact references are set
    /// by the completion invariant; missing statistics render the
    /// unavailable banner.
    pub fn from_record(params: &AnalysisParameters) -> Self {
        let stats = match (
            params.mean_suitability,
            params.min_suitability,
            params.max_suitability,
        ) {
            (Some(mean), Some(min), Some(max)) => Some(StatsView {
                mean: format!("{mean:.2}"),
                min: format!("{min:.2}"),
                max: format!("{max:.2}"),
            }),
            _ => None,
        };

        Self {
            id: params.id.to_string(),
            created_at: params.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            latitude: params.latitude,
            longitude: params.longitude,
            buffer_radius: params.buffer_radius,
            stats,
            suitability_map: params.suitability_map.clone().unwrap_or_default(),
            slope_map: params.slope_map.clone().unwrap_or_default(),
            elevation_map: params.elevation_map.clone().unwrap_or_default(),
            wind_speed_map: params.wind_speed_map.clone().unwrap_or_default(),
            roads_map: params.roads_map.clone().unwrap_or_default(),
            landcover_map: params.landcover_map.clone().unwrap_or_default(),
            natura_2000_map: params.natura_2000_map.clone().unwrap_or_default(),
        }
    }
}
