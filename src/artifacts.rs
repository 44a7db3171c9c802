//! Rendered map artifacts.
//!
//! The engine returns tile layers; this module wraps them into standalone
//! interactive Leaflet documents written under a per-analysis directory and
//! referenced by relative URL from the record. Artifacts are never garbage
//! collected.

use crate::engine::VisParams;
use crate::region::Region;
use askama::Template;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Zoom used when centering a map document on the region.
const MAP_ZOOM: u8 = 9;

/// A legend row for categorical layers (land cover).
pub struct LegendEntry {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Template)]
#[template(path = "maps/layer_map.html")]
struct LayerMapTemplate {
    title: String,
    tile_url: String,
    center_lat: f64,
    center_lon: f64,
    radius_m: f64,
    zoom: u8,
    colorbar_gradient: String,
    colorbar_min: String,
    colorbar_max: String,
    legend: Vec<LegendEntry>,
}

pub struct ArtifactWriter {
    static_root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(static_root: PathBuf) -> Self {
        Self { static_root }
    }

    pub fn static_root(&self) -> &PathBuf {
        &self.static_root
    }

    /// Write one layer-map document and return its relative URL.
    pub fn write_layer_map(
        &self,
        analysis_id: &Uuid,
        title: &str,
        tile_url: &str,
        region: &Region,
        vis: &VisParams,
        legend: Vec<LegendEntry>,
    ) -> std::io::Result<String> {
        let document = LayerMapTemplate {
            title: title.to_string(),
            tile_url: tile_url.to_string(),
            center_lat: region.latitude,
            center_lon: region.longitude,
            radius_m: region.radius_m,
            zoom: MAP_ZOOM,
            colorbar_gradient: css_gradient(&vis.palette),
            colorbar_min: trim_float(vis.min),
            colorbar_max: trim_float(vis.max),
            legend,
        }
        .render()
        .map_err(|e| std::io::Error::other(format!("template error: {e}")))?;

        let dir = self.static_root.join("maps").join(analysis_id.to_string());
        fs::create_dir_all(&dir)?;

        let file_name = format!(
            "map_{}_{}.html",
            safe_title(title),
            &Uuid::new_v4().simple().to_string()[..8]
        );
        fs::write(dir.join(&file_name), document)?;

        Ok(format!("/static/maps/{analysis_id}/{file_name}"))
    }
}

/// File-name-safe form of a map title.
fn safe_title(title: &str) -> String {
    title
        .replace(' ', "_")
        .replace(['(', ')'], "")
        .replace('%', "pct")
}

/// `linear-gradient` stop list for the colorbar.
fn css_gradient(palette: &[String]) -> String {
    format!("linear-gradient(to right, {})", palette.join(", "))
}

/// Render `500.0` as `500`, keep real fractions.
fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
