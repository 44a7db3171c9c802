//! Suitability aggregation and normalization.
//!
//! The one piece of domain logic this service owns rather than delegates:
//! each criterion contributes `indicator * weight`, the contributions are
//! summed, and the sum is rescaled by the total weight to a 0-100 score.
//! The same formula exists twice on purpose: once as graph construction for
//! the remote engine, once as the scalar reference used by the tests.

use crate::expr::Expr;
use crate::params::AnalysisParameters;
use thiserror::Error;

/// Output band name of the combined image; zonal statistics keys derive
/// from it (`suitability_mean` and friends).
pub const SUITABILITY_BAND: &str = "suitability";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScoreError {
    /// All six weights are zero, so the normalization divisor vanishes.
    /// Rejected up front instead of producing NaN downstream.
    #[error("all criterion weights are zero; the suitability score is undefined")]
    ZeroWeights,
}

/// Direction of a threshold comparison. Both are non-strict, so a value
/// exactly at the threshold is suitable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Suitable when `value <= threshold` (slope, elevation).
    AtMost,
    /// Suitable when `value >= threshold` (wind, roads, natura).
    AtLeast,
}

/// Inclusive threshold predicate.
pub fn satisfies(value: f64, threshold: f64, comparison: Comparison) -> bool {
    match comparison {
        Comparison::AtMost => value <= threshold,
        Comparison::AtLeast => value >= threshold,
    }
}

/// Scalar per-criterion contribution: `indicator * weight`.
pub fn contribution(value: f64, threshold: f64, comparison: Comparison, weight: f64) -> f64 {
    if satisfies(value, threshold, comparison) {
        weight
    } else {
        0.0
    }
}

/// Normalization divisor: the literal sum of the six weights.
pub fn max_score(params: &AnalysisParameters) -> Result<f64, ScoreError> {
    let total: f64 = params.weights().iter().sum();
    if total == 0.0 {
        return Err(ScoreError::ZeroWeights);
    }
    Ok(total)
}

/// Scalar normalization: `raw / max_score * 100`. In [0,100] whenever
/// `0 <= raw <= max_score`, which holds by construction of the
/// contributions.
pub fn normalize(raw: f64, max_score: f64) -> f64 {
    raw / max_score * 100.0
}

/// Combine weighted contribution images into the normalized suitability
/// image the engine renders and reduces. Fails before any remote call when
/// every weight is zero.
pub fn combine(
    contributions: Vec<Expr>,
    params: &AnalysisParameters,
) -> Result<Expr, ScoreError> {
    let divisor = max_score(params)?;
    let raw = contributions
        .into_iter()
        .reduce(|acc, c| acc.add(c))
        .unwrap_or_else(|| Expr::constant(0.0));
    Ok(raw
        .divide(divisor)
        .multiply(100.0)
        .rename(SUITABILITY_BAND))
}

/// Round a statistic to two decimal places for reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sampled source values for one point, in physical units.
/// The scalar mirror of the six criterion layers.
#[derive(Debug, Clone, Copy)]
pub struct CriterionSample {
    pub slope_deg: f64,
    pub elevation_m: f64,
    pub wind_ms: f64,
    pub roads_distance_m: f64,
    pub landcover_class: u16,
    pub natura_distance_m: f64,
}

/// Scalar reference implementation of the full score for one sample point.
pub fn score_sample(
    sample: &CriterionSample,
    params: &AnalysisParameters,
) -> Result<f64, ScoreError> {
    let divisor = max_score(params)?;

    let raw = contribution(
        sample.slope_deg,
        params.threshold_slope,
        Comparison::AtMost,
        params.weight_slope,
    ) + contribution(
        sample.elevation_m,
        params.threshold_elevation,
        Comparison::AtMost,
        params.weight_elevation,
    ) + contribution(
        sample.wind_ms,
        params.threshold_wind,
        Comparison::AtLeast,
        params.weight_wind,
    ) + contribution(
        sample.roads_distance_m,
        params.threshold_roads,
        Comparison::AtLeast,
        params.weight_roads,
    ) + if crate::criteria::landcover::is_suitable_class(sample.landcover_class) {
        params.weight_landcover
    } else {
        0.0
    } + contribution(
        sample.natura_distance_m,
        params.threshold_natura,
        Comparison::AtLeast,
        params.weight_natura,
    );

    Ok(normalize(raw, divisor))
}
