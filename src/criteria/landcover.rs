//! Land-cover criterion: Copernicus 100 m discrete classification.
//!
//! The only criterion without a numeric threshold: suitability is a fixed
//! class-membership test for agriculture (40) and herbaceous vegetation
//! (30). Not user-configurable.

use crate::engine::VisParams;
use crate::expr::Expr;
use crate::params::AnalysisParameters;
use crate::region::Region;

pub const TITLE: &str = "Land Cover";

const LANDCOVER_ASSET: &str = "COPERNICUS/Landcover/100m/Proba-V-C3/Global";
const CLASSIFICATION_BAND: &str = "discrete_classification";
const EPOCH_START: &str = "2019-01-01";
const EPOCH_END: &str = "2020-01-01";

pub const AGRICULTURE_CODE: u16 = 40;
pub const HERBACEOUS_CODE: u16 = 30;

/// Scalar mirror of the class-membership predicate.
pub fn is_suitable_class(code: u16) -> bool {
    code == AGRICULTURE_CODE || code == HERBACEOUS_CODE
}

pub fn layer(region: &Region) -> Expr {
    Expr::collection(LANDCOVER_ASSET)
        .filter_date(EPOCH_START, EPOCH_END)
        .first()
        .select(CLASSIFICATION_BAND)
        .clip(region)
}

/// `(class == 40 OR class == 30) * weight`.
pub fn contribution(layer: &Expr, params: &AnalysisParameters) -> Expr {
    layer
        .clone()
        .eq_value(AGRICULTURE_CODE as f64)
        .or(layer.clone().eq_value(HERBACEOUS_CODE as f64))
        .multiply(params.weight_landcover)
}

pub fn vis() -> VisParams {
    VisParams::new(
        0.0,
        200.0,
        &[
            "#282828", "#ffbb22", "#ffff4c", "#f096ff", "#fa0000", "#b4b4b4", "#f0f0f0",
            "#0032c8", "#0096a0", "#fae6a0", "#009900", "#000080",
        ],
    )
}

/// Legend entries for the land-cover map document.
pub fn legend() -> Vec<(&'static str, &'static str)> {
    vec![
        ("0: Unknown", "#282828"),
        ("20: Shrubs", "#ffbb22"),
        ("30: Herbaceous vegetation", "#ffff4c"),
        ("40: Cultivated / Agriculture", "#f096ff"),
        ("50: Urban / Built up", "#fa0000"),
        ("60: Bare / Sparse vegetation", "#b4b4b4"),
        ("70: Snow and Ice", "#f0f0f0"),
        ("80: Permanent water bodies", "#0032c8"),
        ("90: Herbaceous wetland", "#0096a0"),
        ("100: Moss and lichen", "#fae6a0"),
        ("111-126: Forest", "#009900"),
        ("200: Oceans, seas", "#000080"),
    ]
}
