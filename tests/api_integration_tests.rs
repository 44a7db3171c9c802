// API Integration Tests
//
// Purpose: Exercise every endpoint against the full router with a scripted
// engine standing in for the remote compute backend.
// Run with: cargo test --test api_integration_tests

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{test_state, MockEngine};
use serde_json::Value;
use tower::ServiceExt; // for oneshot
use windsite_scorer::{create_router, AnalysisParameters, AnalysisRequest};

// Helper: Parse JSON response
async fn json_response(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Failed to parse JSON")
}

async fn text_response(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(body.to_vec()).expect("Response was not UTF-8")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// =========================================================================
// Section 1: Health Check
// =========================================================================

#[tokio::test]
async fn test_health_check() {
    let (state, dir) = test_state(MockEngine::default());
    let app = create_router(state);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_response(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["engine"], "connected");
    assert!(body["timestamp"].is_string());

    std::fs::remove_dir_all(dir).ok();
}

// =========================================================================
// Section 2: Record Creation
// =========================================================================

#[tokio::test]
async fn test_form_submission_creates_record_and_redirects() {
    let (state, dir) = test_state(MockEngine::default());
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyses")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("latitude=48.1&longitude=11.5&buffer_radius=30"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/results/"));

    // The record exists, default-populated where the form omitted fields.
    let id = location.rsplit('/').next().unwrap().parse().unwrap();
    let record = state.store.get(&id).unwrap().expect("record persisted");
    assert_eq!(record.latitude, 48.1);
    assert_eq!(record.buffer_radius, 30);
    assert_eq!(record.weight_wind, 0.6);
    assert!(!record.is_complete());

    std::fs::remove_dir_all(dir).ok();
}

// =========================================================================
// Section 3: Results Flow
// =========================================================================

fn seeded_record(state: &windsite_scorer::AppState<MockEngine>) -> AnalysisParameters {
    let params = AnalysisParameters::new(AnalysisRequest::default());
    state.store.save(&params).unwrap();
    params
}

#[tokio::test]
async fn test_first_view_runs_analysis_and_persists_everything() {
    let (state, dir) = test_state(MockEngine::default());
    let app = create_router(state.clone());
    let params = seeded_record(&state);

    let response = app
        .oneshot(get(&format!("/results/{}", params.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = text_response(response).await;
    assert!(page.contains("61.25"), "rounded mean missing from page");
    assert!(page.contains("97.46"), "rounded max missing from page");

    // Seven artifacts rendered: six criteria plus the composite.
    assert_eq!(state.engine.render_count(), 7);

    let record = state.store.get(&params.id).unwrap().unwrap();
    assert!(record.is_complete());
    assert_eq!(record.mean_suitability, Some(61.25));
    assert_eq!(record.min_suitability, Some(12.5));
    assert_eq!(record.max_suitability, Some(97.46));
    for map in [
        &record.suitability_map,
        &record.slope_map,
        &record.elevation_map,
        &record.wind_speed_map,
        &record.roads_map,
        &record.landcover_map,
        &record.natura_2000_map,
    ] {
        let url = map.as_deref().expect("artifact reference set");
        assert!(url.starts_with(&format!("/static/maps/{}/", params.id)));
    }

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_second_view_is_idempotent() {
    let (state, dir) = test_state(MockEngine::default());
    let params = seeded_record(&state);

    let first = create_router(state.clone())
        .oneshot(get(&format!("/results/{}", params.id)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let after_first = state.store.get(&params.id).unwrap().unwrap();

    let second = create_router(state.clone())
        .oneshot(get(&format!("/results/{}", params.id)))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    // No recomputation: still seven renders, record byte-identical.
    assert_eq!(state.engine.render_count(), 7);
    let after_second = state.store.get(&params.id).unwrap().unwrap();
    assert_eq!(after_second.mean_suitability, after_first.mean_suitability);
    assert_eq!(after_second.suitability_map, after_first.suitability_map);

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_unknown_record_is_404() {
    let (state, dir) = test_state(MockEngine::default());
    let app = create_router(state);

    let response = app
        .oneshot(get(&format!("/results/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_all_zero_weights_fails_without_touching_the_engine() {
    let (state, dir) = test_state(MockEngine::default());
    let app = create_router(state.clone());

    let mut params = AnalysisParameters::new(AnalysisRequest::default());
    params.weight_slope = 0.0;
    params.weight_elevation = 0.0;
    params.weight_wind = 0.0;
    params.weight_roads = 0.0;
    params.weight_landcover = 0.0;
    params.weight_natura = 0.0;
    state.store.save(&params).unwrap();

    let response = app
        .oneshot(get(&format!("/results/{}", params.id)))
        .await
        .unwrap();

    // Flash-style failure: back to the form with the message, no NaN score.
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/?error="));
    assert!(location.contains("weights"));

    assert_eq!(state.engine.render_count(), 0);
    let record = state.store.get(&params.id).unwrap().unwrap();
    assert!(!record.is_complete());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_statistics_failure_is_isolated() {
    let engine = MockEngine {
        fail_reduce: true,
        ..MockEngine::default()
    };
    let (state, dir) = test_state(engine);
    let app = create_router(state.clone());
    let params = seeded_record(&state);

    let response = app
        .oneshot(get(&format!("/results/{}", params.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = text_response(response).await;
    assert!(page.contains("statistics are unavailable"));

    // Maps landed; the three statistics stayed unset.
    let record = state.store.get(&params.id).unwrap().unwrap();
    assert!(record.is_complete());
    assert!(record.mean_suitability.is_none());
    assert!(record.min_suitability.is_none());
    assert!(record.max_suitability.is_none());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_missing_sites_dataset_degrades_to_placeholder() {
    let engine = MockEngine {
        sites_available: false,
        ..MockEngine::default()
    };
    let (state, dir) = test_state(engine);
    let app = create_router(state.clone());
    let params = seeded_record(&state);

    let response = app
        .oneshot(get(&format!("/results/{}", params.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The analysis completed, with the natura layer replaced by the
    // constant-at-threshold placeholder.
    let record = state.store.get(&params.id).unwrap().unwrap();
    assert!(record.is_complete());

    let renders = state.engine.render_log.lock().unwrap();
    let placeholder_rendered = renders.iter().any(|r| {
        r.expression.contains(&|e| {
            matches!(e, windsite_scorer::Expr::Constant { value } if *value == 2000.0)
        })
    });
    assert!(placeholder_rendered, "placeholder layer never rendered");

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_render_failure_leaves_record_untouched() {
    let engine = MockEngine {
        fail_render: true,
        ..MockEngine::default()
    };
    let (state, dir) = test_state(engine);
    let app = create_router(state.clone());
    let params = seeded_record(&state);

    let response = app
        .oneshot(get(&format!("/results/{}", params.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // All-or-nothing: the stored record is still pre-analysis.
    let record = state.store.get(&params.id).unwrap().unwrap();
    assert!(!record.is_complete());
    assert!(record.mean_suitability.is_none());
    assert!(record.slope_map.is_none());

    std::fs::remove_dir_all(dir).ok();
}

// =========================================================================
// Section 4: Export
// =========================================================================

#[tokio::test]
async fn test_export_groups_parameters_and_statistics() {
    let (state, dir) = test_state(MockEngine::default());
    let params = seeded_record(&state);

    // Complete the analysis first.
    let response = create_router(state.clone())
        .oneshot(get(&format!("/results/{}", params.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_router(state.clone())
        .oneshot(get(&format!("/api/analyses/{}/export", params.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&format!("windfarm_analysis_{}.json", params.id)));

    let body = json_response(response).await;
    assert_eq!(body["parameters"]["region"]["latitude"], 50.5);
    assert_eq!(body["parameters"]["region"]["buffer_radius_km"], 25);
    assert_eq!(body["parameters"]["weights"]["wind"], 0.6);
    assert_eq!(body["parameters"]["thresholds"]["natura_2000_distance_m"], 2000.0);
    assert_eq!(body["results"]["mean_suitability"], 61.25);
    assert_eq!(body["results"]["min_suitability"], 12.5);
    assert_eq!(body["results"]["max_suitability"], 97.46);

    std::fs::remove_dir_all(dir).ok();
}

// =========================================================================
// Section 5: Preview
// =========================================================================

#[tokio::test]
async fn test_preview_writes_a_standalone_document() {
    let (state, dir) = test_state(MockEngine::default());
    let app = create_router(state.clone());

    let response = app
        .oneshot(get("/api/preview?latitude=48.1&longitude=11.5&buffer_radius=30"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_response(response).await;
    assert_eq!(body["success"], true);
    let url = body["map_url"].as_str().unwrap();
    assert!(url.starts_with("/static/preview_maps/"));

    // The document is on disk and self-contained.
    let path = state
        .artifacts
        .static_root()
        .join(url.trim_start_matches("/static/"));
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("Radius: 30 km"));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_preview_defaults_when_parameters_omitted() {
    let (state, dir) = test_state(MockEngine::default());
    let app = create_router(state);

    let response = app.oneshot(get("/api/preview")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_response(response).await;
    assert_eq!(body["success"], true);
    assert!(body["map_url"].as_str().unwrap().contains("50.5"));

    std::fs::remove_dir_all(dir).ok();
}
