//! Criterion modules for the suitability analysis
//!
//! Each criterion owns its data-source layer graph, its inclusive threshold
//! predicate, and the visualization parameters its rendered map uses. The
//! orchestrator walks them in a fixed order: slope, elevation, wind, roads,
//! land cover, natura.

pub mod elevation;
pub mod landcover;
pub mod natura;
pub mod roads;
pub mod slope;
pub mod wind;
