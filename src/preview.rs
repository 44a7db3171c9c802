//! Standalone region preview documents.
//!
//! Lets the user eyeball a point/radius on satellite imagery before
//! committing to a full analysis. Purely local: no engine call, just a
//! rendered Leaflet document under `static/preview_maps/`.

use askama::Template;
use std::fs;
use std::path::Path;

#[derive(Template)]
#[template(path = "maps/preview.html")]
struct PreviewTemplate {
    lat: f64,
    lon: f64,
    lat_display: String,
    lon_display: String,
    radius_km: u32,
    radius_m: f64,
}

/// Write the preview document and return its relative URL. The file name is
/// deterministic in the inputs, so repeated previews of the same region
/// overwrite in place.
pub fn write_preview(
    static_root: &Path,
    latitude: f64,
    longitude: f64,
    buffer_km: u32,
) -> std::io::Result<String> {
    let document = PreviewTemplate {
        lat: latitude,
        lon: longitude,
        lat_display: format!("{latitude:.4}"),
        lon_display: format!("{longitude:.4}"),
        radius_km: buffer_km,
        radius_m: f64::from(buffer_km) * 1000.0,
    }
    .render()
    .map_err(|e| std::io::Error::other(format!("template error: {e}")))?;

    let dir = static_root.join("preview_maps");
    fs::create_dir_all(&dir)?;

    let file_name = format!("preview_{latitude}_{longitude}_{buffer_km}.html");
    fs::write(dir.join(&file_name), document)?;

    Ok(format!("/static/preview_maps/{file_name}"))
}
