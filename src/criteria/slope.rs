//! Slope criterion: terrain slope derived from SRTM elevation.
//!
//! Suitable where slope is at most the user threshold (degrees, inclusive).
//! The slope derivation itself runs inside the remote engine.

use crate::engine::VisParams;
use crate::expr::Expr;
use crate::params::AnalysisParameters;
use crate::region::Region;

pub const TITLE: &str = "Slope (degrees)";

const ELEVATION_ASSET: &str = "USGS/SRTMGL1_003";

/// Slope raster over the region: SRTM elevation, clipped, then the engine's
/// terrain-slope derivation.
pub fn layer(region: &Region) -> Expr {
    Expr::image(ELEVATION_ASSET)
        .select("elevation")
        .clip(region)
        .terrain_slope()
}

/// Weighted indicator image: `(slope <= threshold) * weight`.
pub fn contribution(layer: &Expr, params: &AnalysisParameters) -> Expr {
    layer
        .clone()
        .lte(params.threshold_slope)
        .multiply(params.weight_slope)
}

pub fn vis() -> VisParams {
    VisParams::new(0.0, 20.0, &["green", "yellow", "red"])
}
