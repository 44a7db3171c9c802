//! Elevation criterion: SRTM elevation, suitable at or below the user
//! threshold (meters, inclusive).

use crate::engine::VisParams;
use crate::expr::Expr;
use crate::params::AnalysisParameters;
use crate::region::Region;

pub const TITLE: &str = "Elevation (m)";

const ELEVATION_ASSET: &str = "USGS/SRTMGL1_003";

pub fn layer(region: &Region) -> Expr {
    Expr::image(ELEVATION_ASSET).select("elevation").clip(region)
}

pub fn contribution(layer: &Expr, params: &AnalysisParameters) -> Expr {
    layer
        .clone()
        .lte(params.threshold_elevation)
        .multiply(params.weight_elevation)
}

pub fn vis() -> VisParams {
    VisParams::new(0.0, 500.0, &["green", "yellow", "red"])
}
