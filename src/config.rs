use std::path::{Path, PathBuf};

pub const STREETS_FILE: &str = "streets-oldtown.geojson";
pub const TREES_FILE: &str = "trees-oldtown.geojson";

/// Vienna city center, the anchor of the map projection.
const MAP_CENTER: (f64, f64) = (16.373, 48.208);

/// Logical size of the map viewport in drawing units. The widget scales this
/// to the window while preserving the aspect ratio.
const MAP_VIEWPORT: (f32, f32) = (300., 150.);

/// Fixed size of the legend panel.
const LEGEND_SIZE: (f32, f32) = (300., 540.);

/// Static configuration of the viewer. Constructed once at startup and passed
/// down to the components that need it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
  pub streets_path: PathBuf,
  pub trees_path: PathBuf,
  /// (lon, lat) the projection is centered on.
  pub map_center: (f64, f64),
  pub viewport: (f32, f32),
  pub legend_size: (f32, f32),
}

impl ViewerConfig {
  #[must_use]
  pub fn new(data_dir: &Path) -> Self {
    Self {
      streets_path: data_dir.join(STREETS_FILE),
      trees_path: data_dir.join(TREES_FILE),
      map_center: MAP_CENTER,
      viewport: MAP_VIEWPORT,
      legend_size: LEGEND_SIZE,
    }
  }
}
