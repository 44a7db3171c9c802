//! Analysis orchestrator.
//!
//! One synchronous pass per request: build the region, assemble the six
//! criterion graphs, aggregate and normalize, render seven map artifacts,
//! reduce zonal statistics, then persist everything onto the record in a
//! single save. Any failure before that save aborts the remainder and
//! leaves the record in its prior pre-analysis state; there is no partial
//! persistence and no automatic retry. A failed statistics reduction is the
//! one isolated stage: the analysis still succeeds with maps and the three
//! statistics left unset.

use crate::artifacts::{ArtifactWriter, LegendEntry};
use crate::criteria::{elevation, landcover, natura, roads, slope, wind};
use crate::engine::{EngineError, GeoEngine, Reducer, ReduceRequest, RenderRequest, VisParams};
use crate::expr::Expr;
use crate::params::AnalysisParameters;
use crate::region::Region;
use crate::store::{AnalysisStore, StoreError};
use crate::suitability::{self, ScoreError, SUITABILITY_BAND};
use thiserror::Error;
use uuid::Uuid;

pub const SUITABILITY_TITLE: &str = "Wind Farm Suitability (%)";

/// Zonal statistics sampling scale and pixel budget.
const STATS_SCALE_M: f64 = 100.0;
const STATS_MAX_PIXELS: u64 = 1_000_000_000;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("compute engine failure: {0}")]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("artifact write failed: {0}")]
    Artifact(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Zonal statistics of the normalized suitability, rounded for reporting.
#[derive(Debug, Clone, Copy)]
struct SuitabilityStats {
    mean: f64,
    min: f64,
    max: f64,
}

/// Run the full suitability analysis and persist the outcome.
///
/// Mutates `params` only after every fallible stage has succeeded, so a
/// caller that re-reads the store after an error observes the untouched
/// pre-analysis record.
pub async fn run_analysis<E: GeoEngine>(
    engine: &E,
    store: &AnalysisStore,
    artifacts: &ArtifactWriter,
    params: &mut AnalysisParameters,
) -> Result<(), AnalysisError> {
    let region = Region::from_point_buffer(
        params.latitude,
        params.longitude,
        f64::from(params.buffer_radius),
    );
    tracing::info!(
        id = %params.id,
        lat = params.latitude,
        lon = params.longitude,
        radius_km = params.buffer_radius,
        "starting suitability analysis"
    );

    // An all-zero weight vector makes the normalization divisor vanish;
    // reject it before the first remote call.
    suitability::max_score(params)?;

    // Criterion source layers. Natura may degrade to its placeholder.
    let slope_layer = slope::layer(&region);
    let elevation_layer = elevation::layer(&region);
    let wind_layer = wind::layer(&region);
    let roads_layer = roads::layer(&region);
    let landcover_layer = landcover::layer(&region);
    let natura_layer = natura::layer(engine, &region, params.threshold_natura).await;

    // Weighted, thresholded contributions, then the normalized composite.
    let combined = suitability::combine(
        vec![
            slope::contribution(&slope_layer, params),
            elevation::contribution(&elevation_layer, params),
            wind::contribution(&wind_layer, params),
            roads::contribution(&roads_layer, params),
            landcover::contribution(&landcover_layer, params),
            natura::contribution(&natura_layer, params),
        ],
        params,
    )?;

    // Seven rendered artifacts: six criteria plus the composite.
    let id = params.id;
    let slope_map =
        render_layer(engine, artifacts, &id, &region, slope::TITLE, slope_layer, slope::vis(), vec![]).await?;
    let elevation_map = render_layer(
        engine, artifacts, &id, &region, elevation::TITLE, elevation_layer, elevation::vis(), vec![],
    )
    .await?;
    let wind_speed_map =
        render_layer(engine, artifacts, &id, &region, wind::TITLE, wind_layer, wind::vis(), vec![]).await?;
    let roads_map =
        render_layer(engine, artifacts, &id, &region, roads::TITLE, roads_layer, roads::vis(), vec![]).await?;
    let landcover_map = render_layer(
        engine,
        artifacts,
        &id,
        &region,
        landcover::TITLE,
        landcover_layer,
        landcover::vis(),
        landcover::legend()
            .into_iter()
            .map(|(label, color)| LegendEntry { label, color })
            .collect(),
    )
    .await?;
    let natura_2000_map = render_layer(
        engine, artifacts, &id, &region, natura::TITLE, natura_layer, natura::vis(), vec![],
    )
    .await?;
    let suitability_map = render_layer(
        engine,
        artifacts,
        &id,
        &region,
        SUITABILITY_TITLE,
        combined.clone(),
        VisParams::new(0.0, 100.0, &["red", "yellow", "green"]),
        vec![],
    )
    .await?;

    // Statistics are isolated: a failed reduction leaves them unset without
    // aborting the analysis.
    let stats = match reduce_stats(engine, &combined, &region).await {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!(id = %params.id, error = %e, "statistics reduction failed; reporting maps without statistics");
            None
        }
    };

    // Single commit: every field lands together, then one save.
    params.mean_suitability = stats.map(|s| s.mean);
    params.min_suitability = stats.map(|s| s.min);
    params.max_suitability = stats.map(|s| s.max);
    params.slope_map = Some(slope_map);
    params.elevation_map = Some(elevation_map);
    params.wind_speed_map = Some(wind_speed_map);
    params.roads_map = Some(roads_map);
    params.landcover_map = Some(landcover_map);
    params.natura_2000_map = Some(natura_2000_map);
    params.suitability_map = Some(suitability_map);
    store.save(params)?;

    tracing::info!(id = %params.id, "analysis complete");
    Ok(())
}

async fn render_layer<E: GeoEngine>(
    engine: &E,
    artifacts: &ArtifactWriter,
    analysis_id: &Uuid,
    region: &Region,
    title: &str,
    expression: Expr,
    vis: VisParams,
    legend: Vec<LegendEntry>,
) -> Result<String, AnalysisError> {
    let layer = engine
        .render(&RenderRequest {
            expression,
            region: *region,
            vis: vis.clone(),
        })
        .await?;
    tracing::debug!(title, tile_url = %layer.tile_url, "rendered layer");

    let url = artifacts.write_layer_map(analysis_id, title, &layer.tile_url, region, &vis, legend)?;
    Ok(url)
}

async fn reduce_stats<E: GeoEngine>(
    engine: &E,
    combined: &Expr,
    region: &Region,
) -> Result<SuitabilityStats, EngineError> {
    let results = engine
        .reduce_region(
            combined,
            region,
            &ReduceRequest {
                reducers: vec![Reducer::Mean, Reducer::Min, Reducer::Max],
                scale_m: STATS_SCALE_M,
                max_pixels: STATS_MAX_PIXELS,
            },
        )
        .await?;

    let fetch = |reducer: &str| -> Result<f64, EngineError> {
        results
            .get(&format!("{SUITABILITY_BAND}_{reducer}"))
            .copied()
            .ok_or_else(|| {
                EngineError::Decode(format!("missing {SUITABILITY_BAND}_{reducer} in reduction"))
            })
    };

    Ok(SuitabilityStats {
        mean: suitability::round2(fetch("mean")?),
        min: suitability::round2(fetch("min")?),
        max: suitability::round2(fetch("max")?),
    })
}
