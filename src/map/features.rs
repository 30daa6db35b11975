use serde::{Deserialize, Serialize};

/// One record of the tree inventory. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeFeature {
  /// Display-only identifier.
  pub id: String,
  pub species: String,
  pub planting_year: i32,
  /// Height in meters.
  pub height_m: f64,
  /// Trunk circumference in centimeters.
  pub trunk_cm: f64,
  pub lon: f64,
  pub lat: f64,
}

/// One street segment: one or more polylines in (lon, lat) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetFeature {
  pub paths: Vec<Vec<(f64, f64)>>,
}
