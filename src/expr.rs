//! Declarative expression graph for the remote geospatial engine
//!
//! Construction is lazy: building a graph performs no computation and makes
//! no assumption about where evaluation happens. Terminal operations
//! (`reduce_region`, `render`) live on the engine client, which ships the
//! serialized graph to the backend.
//!
//! Element-wise operators applied to a collection apply per element (the
//! engine broadcasts them, like a map over the collection); `Mean` reduces a
//! collection to a single image.

use crate::region::Region;
use serde::{Deserialize, Serialize};

/// One node of the computation graph.
///
/// The wire format is a tagged tree (`{"op": "...", ...}`) the backend
/// interprets; every constructor below returns a new node wrapping its
/// inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expr {
    /// A single raster asset.
    Image { asset: String },
    /// A time-stamped collection of raster assets.
    Collection { asset: String },
    /// A vector (feature) asset.
    Features { asset: String },
    /// Constant-valued image.
    Constant { value: f64 },
    /// Keep one band of the input.
    Select { band: String, input: Box<Expr> },
    /// Keep collection elements within `[start, end)`.
    FilterDate {
        start: String,
        end: String,
        input: Box<Expr>,
    },
    /// Keep features intersecting the region.
    FilterBounds { region: Region, input: Box<Expr> },
    /// First element of a collection.
    First { input: Box<Expr> },
    /// Per-pixel mean across a collection.
    Mean { input: Box<Expr> },
    /// Restrict the input to a region.
    Clip { region: Region, input: Box<Expr> },
    /// Terrain slope in degrees, derived from an elevation input.
    TerrainSlope { input: Box<Expr> },
    /// Element-wise `sqrt(a^2 + b^2)`.
    Hypot { a: Box<Expr>, b: Box<Expr> },
    /// Burn vector features into a raster mask (1 on features, 0 elsewhere).
    Rasterize { input: Box<Expr> },
    /// Distance from each cell to the nearest truthy cell of the mask,
    /// saturating at `max_distance_m`.
    CostDistance {
        mask: Box<Expr>,
        max_distance_m: f64,
    },
    /// 1 where `input >= value`, else 0. Non-strict.
    Gte { value: f64, input: Box<Expr> },
    /// 1 where `input <= value`, else 0. Non-strict.
    Lte { value: f64, input: Box<Expr> },
    /// 1 where `input == value`, else 0.
    Eq { value: f64, input: Box<Expr> },
    /// Element-wise logical or.
    Or { a: Box<Expr>, b: Box<Expr> },
    /// Element-wise sum.
    Add { a: Box<Expr>, b: Box<Expr> },
    /// Scale by a constant factor.
    MultiplyConst { factor: f64, input: Box<Expr> },
    /// Divide by a constant divisor.
    DivideConst { divisor: f64, input: Box<Expr> },
    /// Rename the output band.
    Rename { band: String, input: Box<Expr> },
}

impl Expr {
    pub fn image(asset: &str) -> Self {
        Expr::Image {
            asset: asset.to_string(),
        }
    }

    pub fn collection(asset: &str) -> Self {
        Expr::Collection {
            asset: asset.to_string(),
        }
    }

    pub fn features(asset: &str) -> Self {
        Expr::Features {
            asset: asset.to_string(),
        }
    }

    pub fn constant(value: f64) -> Self {
        Expr::Constant { value }
    }

    pub fn select(self, band: &str) -> Self {
        Expr::Select {
            band: band.to_string(),
            input: Box::new(self),
        }
    }

    pub fn filter_date(self, start: &str, end: &str) -> Self {
        Expr::FilterDate {
            start: start.to_string(),
            end: end.to_string(),
            input: Box::new(self),
        }
    }

    pub fn filter_bounds(self, region: &Region) -> Self {
        Expr::FilterBounds {
            region: *region,
            input: Box::new(self),
        }
    }

    pub fn first(self) -> Self {
        Expr::First {
            input: Box::new(self),
        }
    }

    pub fn mean(self) -> Self {
        Expr::Mean {
            input: Box::new(self),
        }
    }

    pub fn clip(self, region: &Region) -> Self {
        Expr::Clip {
            region: *region,
            input: Box::new(self),
        }
    }

    pub fn terrain_slope(self) -> Self {
        Expr::TerrainSlope {
            input: Box::new(self),
        }
    }

    pub fn hypot(self, other: Expr) -> Self {
        Expr::Hypot {
            a: Box::new(self),
            b: Box::new(other),
        }
    }

    pub fn rasterize(self) -> Self {
        Expr::Rasterize {
            input: Box::new(self),
        }
    }

    pub fn cost_distance(self, max_distance_m: f64) -> Self {
        Expr::CostDistance {
            mask: Box::new(self),
            max_distance_m,
        }
    }

    pub fn gte(self, value: f64) -> Self {
        Expr::Gte {
            value,
            input: Box::new(self),
        }
    }

    pub fn lte(self, value: f64) -> Self {
        Expr::Lte {
            value,
            input: Box::new(self),
        }
    }

    pub fn eq_value(self, value: f64) -> Self {
        Expr::Eq {
            value,
            input: Box::new(self),
        }
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::Or {
            a: Box::new(self),
            b: Box::new(other),
        }
    }

    pub fn add(self, other: Expr) -> Self {
        Expr::Add {
            a: Box::new(self),
            b: Box::new(other),
        }
    }

    pub fn multiply(self, factor: f64) -> Self {
        Expr::MultiplyConst {
            factor,
            input: Box::new(self),
        }
    }

    pub fn divide(self, divisor: f64) -> Self {
        Expr::DivideConst {
            divisor,
            input: Box::new(self),
        }
    }

    pub fn rename(self, band: &str) -> Self {
        Expr::Rename {
            band: band.to_string(),
            input: Box::new(self),
        }
    }

    /// True if any node in the graph satisfies the predicate. Used by tests
    /// to assert graph shape without walking the tree by hand.
    pub fn contains(&self, predicate: &dyn Fn(&Expr) -> bool) -> bool {
        if predicate(self) {
            return true;
        }
        match self {
            Expr::Image { .. }
            | Expr::Collection { .. }
            | Expr::Features { .. }
            | Expr::Constant { .. } => false,
            Expr::Select { input, .. }
            | Expr::FilterDate { input, .. }
            | Expr::FilterBounds { input, .. }
            | Expr::First { input }
            | Expr::Mean { input }
            | Expr::Clip { input, .. }
            | Expr::TerrainSlope { input }
            | Expr::Rasterize { input }
            | Expr::Gte { input, .. }
            | Expr::Lte { input, .. }
            | Expr::Eq { input, .. }
            | Expr::MultiplyConst { input, .. }
            | Expr::DivideConst { input, .. }
            | Expr::Rename { input, .. } => input.contains(predicate),
            Expr::CostDistance { mask, .. } => mask.contains(predicate),
            Expr::Hypot { a, b } | Expr::Or { a, b } | Expr::Add { a, b } => {
                a.contains(predicate) || b.contains(predicate)
            }
        }
    }
}
