// Shared test fixtures: a scripted engine and app construction helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use windsite_scorer::engine::{
    error, EngineError, GeoEngine, ReduceRequest, RenderRequest, RenderedLayer,
};
use windsite_scorer::{AppState, Expr, Region};

/// Scripted engine standing in for the remote compute backend. Requests are
/// logged so tests can assert on the shipped expression graphs.
pub struct MockEngine {
    pub sites_available: bool,
    pub fail_render: bool,
    pub fail_reduce: bool,
    /// Scripted zonal reduction, keyed `{band}_{reducer}`.
    pub stats: HashMap<String, f64>,
    pub render_log: Mutex<Vec<RenderRequest>>,
    pub reduce_log: Mutex<Vec<Expr>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        let mut stats = HashMap::new();
        stats.insert("suitability_mean".to_string(), 61.2534);
        stats.insert("suitability_min".to_string(), 12.5);
        stats.insert("suitability_max".to_string(), 97.456);
        Self {
            sites_available: true,
            fail_render: false,
            fail_reduce: false,
            stats,
            render_log: Mutex::new(Vec::new()),
            reduce_log: Mutex::new(Vec::new()),
        }
    }
}

impl MockEngine {
    pub fn render_count(&self) -> usize {
        self.render_log.lock().unwrap().len()
    }
}

impl GeoEngine for MockEngine {
    async fn health(&self) -> error::Result<()> {
        Ok(())
    }

    async fn features_available(&self, asset: &str, _region: &Region) -> error::Result<bool> {
        if self.sites_available {
            Ok(true)
        } else {
            Err(EngineError::MissingAsset {
                asset: asset.to_string(),
            })
        }
    }

    async fn reduce_region(
        &self,
        expression: &Expr,
        _region: &Region,
        _request: &ReduceRequest,
    ) -> error::Result<HashMap<String, f64>> {
        if self.fail_reduce {
            return Err(EngineError::Unavailable("reduction quota exhausted".to_string()));
        }
        self.reduce_log.lock().unwrap().push(expression.clone());
        Ok(self.stats.clone())
    }

    async fn render(&self, request: &RenderRequest) -> error::Result<RenderedLayer> {
        if self.fail_render {
            return Err(EngineError::Unavailable("tile service down".to_string()));
        }
        let mut log = self.render_log.lock().unwrap();
        log.push(request.clone());
        Ok(RenderedLayer {
            tile_url: format!("https://tiles.invalid/layer{}/{{z}}/{{x}}/{{y}}", log.len()),
        })
    }
}

/// Fresh data directory under the system temp dir; one per test.
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("windsite_test_{}", uuid::Uuid::new_v4()))
}

/// Application state over a scripted engine. The returned state shares the
/// engine and store with the router built from it.
pub fn test_state(engine: MockEngine) -> (AppState<MockEngine>, PathBuf) {
    let data_dir = temp_data_dir();
    let state = AppState::new(engine, &data_dir).expect("state construction");
    (state, data_dir)
}
