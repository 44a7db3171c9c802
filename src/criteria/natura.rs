//! Protected-area criterion: distance to Natura 2000 sites.
//!
//! The sites asset is optional: when the probe cannot see it for the
//! queried region, the layer degrades to a constant placeholder equal to
//! the threshold itself, so the criterion evaluates exactly "suitable" at
//! the boundary and the analysis still completes.

use crate::engine::{GeoEngine, VisParams};
use crate::expr::Expr;
use crate::params::AnalysisParameters;
use crate::region::Region;

pub const TITLE: &str = "Distance from Natura 2000 Sites (m)";

pub const SITES_ASSET: &str = "projects/windsite/assets/natura2000_sites";

/// Distance saturation for the proximity transform.
const MAX_DISTANCE_M: f64 = 1_000_000.0;

/// Distance raster to the sites intersecting the region, or the placeholder
/// when the dataset is unavailable.
pub async fn layer<E: GeoEngine>(engine: &E, region: &Region, threshold_m: f64) -> Expr {
    match engine.features_available(SITES_ASSET, region).await {
        Ok(true) => sites_distance(region),
        Ok(false) => {
            tracing::warn!(asset = SITES_ASSET, "no protected sites visible for region; using placeholder distance");
            placeholder(region, threshold_m)
        }
        Err(e) => {
            tracing::warn!(asset = SITES_ASSET, error = %e, "protected sites unavailable; using placeholder distance");
            placeholder(region, threshold_m)
        }
    }
}

fn sites_distance(region: &Region) -> Expr {
    Expr::features(SITES_ASSET)
        .filter_bounds(region)
        .rasterize()
        .cost_distance(MAX_DISTANCE_M)
        .clip(region)
}

/// Constant layer at the threshold: inclusive `>=` makes every cell pass
/// with the criterion sitting exactly on the boundary.
fn placeholder(region: &Region, threshold_m: f64) -> Expr {
    Expr::constant(threshold_m).clip(region)
}

pub fn contribution(layer: &Expr, params: &AnalysisParameters) -> Expr {
    layer
        .clone()
        .gte(params.threshold_natura)
        .multiply(params.weight_natura)
}

pub fn vis() -> VisParams {
    VisParams::new(0.0, 10_000.0, &["red", "yellow", "green"])
}
