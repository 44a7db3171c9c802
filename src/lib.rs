//! Wind-farm suitability scoring service
//!
//! A web front end over a remote geospatial compute backend. The local code
//! assembles declarative expression graphs for six siting criteria, asks the
//! backend for rendered map layers and zonal statistics, and persists the
//! normalized 0-100 suitability results:
//! - `expr` / `engine`: lazy computation graphs and the opaque remote
//!   executor they are shipped to
//! - `criteria`: the six weighted, thresholded siting criteria
//! - `suitability`: aggregation and normalization (the one formula this
//!   service owns)
//! - `analysis`: the all-or-nothing orchestrator
//! - `api_server` / `web`: the HTTP surface

pub mod analysis;
pub mod api_server;
pub mod artifacts;
pub mod criteria;
pub mod engine;
pub mod expr;
pub mod params;
pub mod preview;
pub mod region;
pub mod store;
pub mod suitability;
pub mod web;

// Re-export commonly used types
pub use analysis::{run_analysis, AnalysisError};
pub use api_server::{create_router, AppState};
pub use engine::{EngineConfig, EngineError, GeoEngine, HttpEngine};
pub use expr::Expr;
pub use params::{AnalysisParameters, AnalysisRequest};
pub use region::Region;
pub use store::AnalysisStore;
pub use suitability::ScoreError;
