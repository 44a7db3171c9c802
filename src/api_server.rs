// Axum server module
//
// Purpose: HTTP surface over the suitability analysis — parameter form,
// results page (runs the analysis on first view), region preview, JSON
// export, health. Artifacts are served from the data directory as static
// files.

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};

use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use askama::Template;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::analysis::run_analysis;
use crate::artifacts::ArtifactWriter;
use crate::engine::GeoEngine;
use crate::params::{defaults, AnalysisParameters, AnalysisRequest};
use crate::preview::write_preview;
use crate::store::{AnalysisStore, StoreError};
use crate::web::handlers::pages::{IndexTemplate, ResultsTemplate};

// ============================================================================
// Application State
// ============================================================================

pub struct AppState<E> {
    pub engine: Arc<E>,
    pub store: Arc<AnalysisStore>,
    pub artifacts: Arc<ArtifactWriter>,
    pub cache: Cache<String, serde_json::Value>,
}

// Manual impl: `E` itself need not be Clone behind the Arc.
impl<E> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            store: self.store.clone(),
            artifacts: self.artifacts.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<E: GeoEngine> AppState<E> {
    pub fn new(engine: E, data_dir: &std::path::Path) -> anyhow::Result<Self> {
        tracing::info!("Opening analysis store...");
        let store = Arc::new(AnalysisStore::open(data_dir)?);

        let static_root = data_dir.join("static");
        std::fs::create_dir_all(&static_root)?;
        let artifacts = Arc::new(ArtifactWriter::new(static_root));

        tracing::info!("Initializing response cache...");
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(300))
            .build();

        Ok(Self {
            engine: Arc::new(engine),
            store,
            artifacts,
            cache,
        })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router<E: GeoEngine>(state: AppState<E>) -> Router {
    let static_dir = state.artifacts.static_root().clone();

    Router::new()
        // Health check
        .route("/health", get(health_check::<E>))
        // Parameter form and record creation
        .route("/", get(index_page))
        .route("/analyses", post(create_analysis::<E>))
        // Results: triggers the analysis on first view, cached thereafter
        .route("/results/:id", get(results_page::<E>))
        // Region preview and JSON export
        .route("/api/preview", get(preview_region::<E>))
        .route("/api/analyses/:id/export", get(export_analysis::<E>))
        // Rendered artifacts
        .nest_service("/static", ServeDir::new(static_dir))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[derive(serde::Deserialize, Debug)]
struct IndexQuery {
    error: Option<String>,
}

async fn index_page(Query(query): Query<IndexQuery>) -> Result<Html<String>, AppError> {
    let page = IndexTemplate::with_error(query.error)
        .render()
        .map_err(|e| AppError::Internal(format!("template error: {e}")))?;
    Ok(Html(page))
}

async fn health_check<E: GeoEngine>(State(state): State<AppState<E>>) -> impl IntoResponse {
    let engine_status = match state.engine.health().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "engine health probe failed");
            "unreachable"
        }
    };
    Json(serde_json::json!({
        "status": "healthy",
        "engine": engine_status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Create a record from the submitted form and redirect to its results
/// page. Omitted fields fall back to the form defaults.
async fn create_analysis<E: GeoEngine>(
    State(state): State<AppState<E>>,
    Form(request): Form<AnalysisRequest>,
) -> Result<Redirect, AppError> {
    let params = AnalysisParameters::new(request);
    state.store.save(&params)?;
    tracing::info!(id = %params.id, "created analysis record");
    Ok(Redirect::to(&format!("/results/{}", params.id)))
}

/// First view runs the analysis; later views serve the persisted results.
/// On failure the record stays pre-analysis and the user lands back on the
/// form with a flash-style message.
async fn results_page<E: GeoEngine>(
    State(state): State<AppState<E>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut params = state
        .store
        .get(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;

    if !params.is_complete() {
        tracing::info!(id = %id, "first view; running analysis");
        if let Err(e) = run_analysis(
            state.engine.as_ref(),
            &state.store,
            &state.artifacts,
            &mut params,
        )
        .await
        {
            tracing::error!(id = %id, error = %e, "analysis failed");
            let message = urlencoding::encode(&format!("Analysis failed: {e}")).into_owned();
            return Ok(Redirect::to(&format!("/?error={message}")).into_response());
        }
    } else {
        tracing::debug!(id = %id, "serving cached analysis results");
    }

    let page = ResultsTemplate::from_record(&params)
        .render()
        .map_err(|e| AppError::Internal(format!("template error: {e}")))?;
    Ok(Html(page).into_response())
}

#[derive(serde::Deserialize, Debug)]
struct PreviewQuery {
    #[serde(default = "default_latitude")]
    latitude: f64,
    #[serde(default = "default_longitude")]
    longitude: f64,
    #[serde(default = "default_buffer")]
    buffer_radius: u32,
}

fn default_latitude() -> f64 {
    defaults::LATITUDE
}
fn default_longitude() -> f64 {
    defaults::LONGITUDE
}
fn default_buffer() -> u32 {
    defaults::BUFFER_RADIUS_KM
}

/// Standalone interactive preview of the region before a full analysis.
async fn preview_region<E: GeoEngine>(
    State(state): State<AppState<E>>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = format!(
        "preview:{}:{}:{}",
        query.latitude, query.longitude, query.buffer_radius
    );

    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for region preview");
        return Ok(Json(cached));
    }

    let map_url = write_preview(
        state.artifacts.static_root(),
        query.latitude,
        query.longitude,
        query.buffer_radius,
    )
    .map_err(|e| AppError::Internal(format!("preview write failed: {e}")))?;
    tracing::debug!(url = %map_url, "generated region preview");

    let result = serde_json::json!({
        "success": true,
        "map_url": map_url,
    });
    state.cache.insert(cache_key, result.clone()).await;

    Ok(Json(result))
}

/// Structured export of parameters + statistics, independent of artifact
/// storage, served as an attachment.
async fn export_analysis<E: GeoEngine>(
    State(state): State<AppState<E>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let params = state
        .store
        .get(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;

    let export = serde_json::json!({
        "id": params.id,
        "created_at": params.created_at.to_rfc3339(),
        "parameters": {
            "region": {
                "latitude": params.latitude,
                "longitude": params.longitude,
                "buffer_radius_km": params.buffer_radius,
            },
            "weights": {
                "slope": params.weight_slope,
                "elevation": params.weight_elevation,
                "wind": params.weight_wind,
                "roads": params.weight_roads,
                "landcover": params.weight_landcover,
                "natura_2000": params.weight_natura,
            },
            "thresholds": {
                "slope_degrees": params.threshold_slope,
                "elevation_meters": params.threshold_elevation,
                "wind_speed_ms": params.threshold_wind,
                "roads_distance_m": params.threshold_roads,
                "natura_2000_distance_m": params.threshold_natura,
            },
        },
        "results": {
            "mean_suitability": params.mean_suitability,
            "min_suitability": params.min_suitability,
            "max_suitability": params.max_suitability,
        },
    });

    let body = serde_json::to_string_pretty(&export)
        .map_err(|e| AppError::Internal(format!("export serialization failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"windfarm_analysis_{id}.json\""),
            ),
        ],
        body,
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Store(String),
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Store(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
