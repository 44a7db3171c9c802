//! HTTP-backed engine client.
//!
//! One authenticated session per process: `connect` exchanges credentials
//! for a session token and health-checks the backend before any analysis
//! runs. There is no module-level side effect; the binary owns the handle
//! and calls `close` on shutdown.

use super::error::{EngineError, Result};
use super::{GeoEngine, ReduceRequest, RenderRequest, RenderedLayer};
use crate::expr::Expr;
use crate::region::Region;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Connection parameters, read from the environment by the binary.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the compute backend, e.g. `https://engine.example.com`.
    pub endpoint: String,
    /// Project the session is billed against.
    pub project: String,
    /// API key exchanged for a session token.
    pub api_key: String,
    pub request_timeout: Duration,
}

impl EngineConfig {
    pub fn new(endpoint: &str, project: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project: project.to_string(),
            api_key: api_key.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Remote engine client holding the process-wide authenticated session.
pub struct HttpEngine {
    client: Client,
    endpoint: String,
    token: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    token: String,
}

#[derive(Deserialize)]
struct FeatureQueryResponse {
    count: u64,
}

#[derive(Deserialize)]
struct ReduceResponse {
    results: HashMap<String, f64>,
}

impl HttpEngine {
    /// Establish the session: exchange credentials for a token, then verify
    /// the backend answers a health probe.
    pub async fn connect(config: &EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let resp = client
            .post(format!("{}/v1/session", config.endpoint))
            .json(&serde_json::json!({
                "project": config.project,
                "api_key": config.api_key,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(EngineError::Session(format!(
                "session handshake failed with HTTP {}",
                resp.status()
            )));
        }

        let session: SessionResponse = resp
            .json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))?;

        let engine = Self {
            client,
            endpoint: config.endpoint.clone(),
            token: session.token,
        };
        engine.health_probe().await?;
        Ok(engine)
    }

    /// Explicit teardown of the session token.
    pub async fn close(&self) -> Result<()> {
        let resp = self
            .client
            .delete(format!("{}/v1/session", self.endpoint))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resp.status().is_success() {
            tracing::warn!("engine session teardown returned HTTP {}", resp.status());
        }
        Ok(())
    }

    async fn health_probe(&self) -> Result<()> {
        let resp = self
            .client
            .get(format!("{}/v1/health", self.endpoint))
            .bearer_auth(&self.token)
            .send()
            .await?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            s => Err(EngineError::Unavailable(format!(
                "health probe returned HTTP {}",
                s
            ))),
        }
    }

    /// Map an error status to the taxonomy the orchestrator branches on.
    async fn classify_failure(resp: reqwest::Response, asset_hint: Option<&str>) -> EngineError {
        let status = resp.status();
        let message = resp
            .text()
            .await
            .unwrap_or_else(|_| "no response body".to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EngineError::Session(message),
            StatusCode::NOT_FOUND => match asset_hint {
                Some(asset) => EngineError::MissingAsset {
                    asset: asset.to_string(),
                },
                None => EngineError::Rejected(message),
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                EngineError::Rejected(message)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                EngineError::Unavailable(format!("quota exhausted: {}", message))
            }
            s if s.is_server_error() => EngineError::Unavailable(message),
            s => EngineError::Rejected(format!("HTTP {}: {}", s, message)),
        }
    }
}

impl GeoEngine for HttpEngine {
    async fn health(&self) -> Result<()> {
        self.health_probe().await
    }

    async fn features_available(&self, asset: &str, region: &Region) -> Result<bool> {
        let resp = self
            .client
            .post(format!("{}/v1/features/query", self.endpoint))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "asset": asset,
                "region": region,
            }))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !resp.status().is_success() {
            return Err(Self::classify_failure(resp, Some(asset)).await);
        }

        let body: FeatureQueryResponse = resp
            .json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        Ok(body.count > 0)
    }

    async fn reduce_region(
        &self,
        expression: &Expr,
        region: &Region,
        request: &ReduceRequest,
    ) -> Result<HashMap<String, f64>> {
        let resp = self
            .client
            .post(format!("{}/v1/reduce", self.endpoint))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "expression": expression,
                "region": region,
                "reducers": request.reducers,
                "scale_m": request.scale_m,
                "max_pixels": request.max_pixels,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::classify_failure(resp, None).await);
        }

        let body: ReduceResponse = resp
            .json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        Ok(body.results)
    }

    async fn render(&self, request: &RenderRequest) -> Result<RenderedLayer> {
        let resp = self
            .client
            .post(format!("{}/v1/render", self.endpoint))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::classify_failure(resp, None).await);
        }

        resp.json::<RenderedLayer>()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))
    }
}
