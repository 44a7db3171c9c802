//! Road-distance criterion: proximity transform over rasterized TIGER
//! roads, saturating at 500 m. Suitable at or above the user threshold
//! (meters, inclusive) — turbines want clearance FROM roads.

use crate::engine::VisParams;
use crate::expr::Expr;
use crate::params::AnalysisParameters;
use crate::region::Region;

pub const TITLE: &str = "Distance to Roads (m)";

const ROADS_ASSET: &str = "TIGER/2016/Roads";

/// Distance transform saturation; beyond this every cell counts as "far".
const MAX_DISTANCE_M: f64 = 500.0;

pub fn layer(region: &Region) -> Expr {
    Expr::features(ROADS_ASSET)
        .rasterize()
        .cost_distance(MAX_DISTANCE_M)
        .clip(region)
}

pub fn contribution(layer: &Expr, params: &AnalysisParameters) -> Expr {
    layer
        .clone()
        .gte(params.threshold_roads)
        .multiply(params.weight_roads)
}

pub fn vis() -> VisParams {
    VisParams::new(0.0, 1000.0, &["green", "yellow", "red"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_is_distance_over_rasterized_roads() {
        let region = Region::from_point_buffer(50.5, 2.0, 25.0);
        let graph = layer(&region);
        assert!(graph.contains(&|e| {
            matches!(e, Expr::CostDistance { max_distance_m, .. } if *max_distance_m == MAX_DISTANCE_M)
        }));
        assert!(graph.contains(&|e| matches!(e, Expr::Rasterize { .. })));
        assert!(graph.contains(&|e| matches!(e, Expr::Features { asset } if asset == ROADS_ASSET)));
    }
}
