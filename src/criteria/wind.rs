//! Wind criterion: mean 10 m wind speed from ERA5 monthly reanalysis.
//!
//! Wind magnitude is `hypot(u, v)` per monthly image; the multi-year mean
//! (2018 through 2020) is the criterion layer. Suitable at or above the
//! user threshold (m/s, inclusive).

use crate::engine::VisParams;
use crate::expr::Expr;
use crate::params::AnalysisParameters;
use crate::region::Region;

pub const TITLE: &str = "Wind Speed (ms)";

const WIND_ASSET: &str = "ECMWF/ERA5/MONTHLY";
const U_BAND: &str = "u_component_of_wind_10m";
const V_BAND: &str = "v_component_of_wind_10m";
const DATE_START: &str = "2018-01-01";
const DATE_END: &str = "2021-01-01";

/// Mean wind speed raster. The hypot runs per monthly image before the
/// mean; averaging components first would underestimate speed wherever the
/// direction varies.
pub fn layer(region: &Region) -> Expr {
    let months = Expr::collection(WIND_ASSET).filter_date(DATE_START, DATE_END);
    months
        .clone()
        .select(U_BAND)
        .hypot(months.select(V_BAND))
        .mean()
        .clip(region)
}

pub fn contribution(layer: &Expr, params: &AnalysisParameters) -> Expr {
    layer
        .clone()
        .gte(params.threshold_wind)
        .multiply(params.weight_wind)
}

pub fn vis() -> VisParams {
    VisParams::new(0.0, 5.0, &["blue", "cyan", "green", "yellow", "red"])
}
