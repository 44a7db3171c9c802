//! Remote geospatial compute engine interface
//!
//! The engine is an opaque external capability: it accepts declarative
//! expression graphs (see [`crate::expr`]) and returns either rendered map
//! layers or numeric zonal reductions. Nothing in this crate evaluates a
//! graph; the trait below is the only evaluation boundary.

pub mod error;
pub mod http;

pub use error::EngineError;
pub use http::{EngineConfig, HttpEngine};

use crate::expr::Expr;
use crate::region::Region;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;

/// Zonal reducers the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Mean,
    Min,
    Max,
}

/// Parameters for a zonal reduction over a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReduceRequest {
    pub reducers: Vec<Reducer>,
    /// Sampling scale in meters.
    pub scale_m: f64,
    /// Upper bound on sampled pixels before the engine refuses the request.
    pub max_pixels: u64,
}

/// Visualization parameters for a rendered layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    /// Color ramp, low to high. CSS color names or `#rrggbb`.
    pub palette: Vec<String>,
}

impl VisParams {
    pub fn new(min: f64, max: f64, palette: &[&str]) -> Self {
        Self {
            min,
            max,
            palette: palette.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A request for a rendered (tiled) visualization of an expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub expression: Expr,
    pub region: Region,
    pub vis: VisParams,
}

/// A rendered layer: an XYZ tile URL template the map documents embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedLayer {
    pub tile_url: String,
}

/// The opaque remote compute capability.
///
/// Implementations must be cheap to share behind an `Arc`; every method is a
/// round trip to the backend (or, in tests, a scripted response).
pub trait GeoEngine: Send + Sync + 'static {
    /// Liveness probe for the engine session.
    fn health(&self) -> impl Future<Output = error::Result<()>> + Send;

    /// Whether an optional vector asset is accessible for the region.
    /// `Ok(false)` and `Err(MissingAsset)` both mean "substitute a
    /// placeholder"; other errors are reported as-is.
    fn features_available(
        &self,
        asset: &str,
        region: &Region,
    ) -> impl Future<Output = error::Result<bool>> + Send;

    /// Zonal statistics for an expression over a region. Keys follow the
    /// `{band}_{reducer}` convention, e.g. `suitability_mean`.
    fn reduce_region(
        &self,
        expression: &Expr,
        region: &Region,
        request: &ReduceRequest,
    ) -> impl Future<Output = error::Result<HashMap<String, f64>>> + Send;

    /// Render an expression to a tiled layer.
    fn render(
        &self,
        request: &RenderRequest,
    ) -> impl Future<Output = error::Result<RenderedLayer>> + Send;
}
