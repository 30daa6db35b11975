use serde_json::Value;

use crate::map::features::{StreetFeature, TreeFeature};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
  #[error("invalid JSON: {0}")]
  Json(#[from] serde_json::Error),
  #[error("expected a FeatureCollection, got {0}")]
  NotAFeatureCollection(String),
  #[error("feature {index}: {reason}")]
  MalformedFeature { index: usize, reason: String },
}

fn malformed(index: usize, reason: impl Into<String>) -> ParseError {
  ParseError::MalformedFeature {
    index,
    reason: reason.into(),
  }
}

/// Returns the `features` array of a `FeatureCollection` document.
fn features_of(raw: &str) -> Result<Vec<Value>, ParseError> {
  let value: Value = serde_json::from_str(raw)?;
  let obj = value
    .as_object()
    .ok_or_else(|| ParseError::NotAFeatureCollection("a non-object".to_string()))?;
  match obj.get("type").and_then(Value::as_str) {
    Some("FeatureCollection") => {}
    other => {
      return Err(ParseError::NotAFeatureCollection(format!(
        "type {other:?}"
      )));
    }
  }
  Ok(
    obj
      .get("features")
      .and_then(Value::as_array)
      .cloned()
      .unwrap_or_default(),
  )
}

fn coordinate_pair(value: &Value) -> Option<(f64, f64)> {
  let array = value.as_array()?;
  if array.len() < 2 {
    return None;
  }
  Some((array[0].as_f64()?, array[1].as_f64()?))
}

fn coordinate_array(value: &Value) -> Option<Vec<(f64, f64)>> {
  value
    .as_array()?
    .iter()
    .map(coordinate_pair)
    .collect::<Option<Vec<_>>>()
}

/// Parses the street dataset. Any malformed feature fails the whole
/// collection; there is no per-feature isolation.
pub fn parse_streets(raw: &str) -> Result<Vec<StreetFeature>, ParseError> {
  features_of(raw)?
    .iter()
    .enumerate()
    .map(|(index, feature)| parse_street_feature(index, feature))
    .collect()
}

fn parse_street_feature(index: usize, feature: &Value) -> Result<StreetFeature, ParseError> {
  let geometry = feature
    .get("geometry")
    .and_then(Value::as_object)
    .ok_or_else(|| malformed(index, "missing geometry"))?;
  let coordinates = geometry
    .get("coordinates")
    .ok_or_else(|| malformed(index, "missing coordinates"))?;

  let paths = match geometry.get("type").and_then(Value::as_str) {
    Some("LineString") => {
      let path =
        coordinate_array(coordinates).ok_or_else(|| malformed(index, "bad LineString"))?;
      vec![path]
    }
    Some("MultiLineString") => coordinates
      .as_array()
      .and_then(|lines| lines.iter().map(coordinate_array).collect::<Option<Vec<_>>>())
      .ok_or_else(|| malformed(index, "bad MultiLineString"))?,
    other => {
      return Err(malformed(
        index,
        format!("unsupported street geometry {other:?}"),
      ));
    }
  };
  Ok(StreetFeature { paths })
}

/// Parses the tree inventory. Any malformed feature fails the whole
/// collection; there is no per-feature isolation.
pub fn parse_trees(raw: &str) -> Result<Vec<TreeFeature>, ParseError> {
  features_of(raw)?
    .iter()
    .enumerate()
    .map(|(index, feature)| parse_tree_feature(index, feature))
    .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn parse_tree_feature(index: usize, feature: &Value) -> Result<TreeFeature, ParseError> {
  let geometry = feature
    .get("geometry")
    .and_then(Value::as_object)
    .ok_or_else(|| malformed(index, "missing geometry"))?;
  if geometry.get("type").and_then(Value::as_str) != Some("Point") {
    return Err(malformed(index, "tree geometry must be a Point"));
  }
  let (lon, lat) = geometry
    .get("coordinates")
    .and_then(coordinate_pair)
    .ok_or_else(|| malformed(index, "bad Point coordinates"))?;

  let properties = feature
    .get("properties")
    .and_then(Value::as_object)
    .ok_or_else(|| malformed(index, "missing properties"))?;
  let property = |name: &'static str| {
    properties
      .get(name)
      .ok_or_else(|| malformed(index, format!("missing property {name}")))
  };

  let id = match property("TreeID")? {
    Value::String(s) => s.clone(),
    Value::Number(n) => n.to_string(),
    _ => return Err(malformed(index, "TreeID must be a number or string")),
  };
  let species = property("TreeType")?
    .as_str()
    .ok_or_else(|| malformed(index, "TreeType must be a string"))?
    .to_string();
  let planting_year = property("PlantingYear")?
    .as_i64()
    .ok_or_else(|| malformed(index, "PlantingYear must be an integer"))? as i32;
  let height_m = property("TreeHeight")?
    .as_f64()
    .ok_or_else(|| malformed(index, "TreeHeight must be a number"))?;
  let trunk_cm = property("TrunkSize")?
    .as_f64()
    .ok_or_else(|| malformed(index, "TrunkSize must be a number"))?;

  Ok(TreeFeature {
    id,
    species,
    planting_year,
    height_m,
    trunk_cm,
    lon,
    lat,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  fn fixture(name: &str) -> String {
    let path = format!(
      "{}/tests/resources/{name}",
      env!("CARGO_MANIFEST_DIR")
    );
    fs::read_to_string(&path).expect("could not read fixture")
  }

  #[test]
  fn parses_linestring_and_multilinestring_streets() {
    let streets = parse_streets(&fixture("simple_streets.geojson")).expect("streets should parse");
    assert_eq!(streets.len(), 2);
    assert_eq!(streets[0].paths.len(), 1);
    assert_eq!(streets[0].paths[0].len(), 3);
    assert_eq!(streets[1].paths.len(), 2);
    assert_eq!(streets[0].paths[0][0], (16.36, 48.2));
  }

  #[test]
  fn parses_tree_inventory_records() {
    let trees = parse_trees(&fixture("trees.geojson")).expect("trees should parse");
    assert_eq!(trees.len(), 3);

    let oak = &trees[0];
    assert_eq!(oak.id, "1");
    assert_eq!(oak.species, "Oak");
    assert_eq!(oak.planting_year, 1975);
    assert!((oak.height_m - 4.).abs() < f64::EPSILON);
    assert!((oak.trunk_cm - 150.).abs() < f64::EPSILON);
  }

  #[test]
  fn malformed_tree_fails_the_whole_collection() {
    let err = parse_trees(&fixture("malformed_trees.geojson"))
      .expect_err("missing TrunkSize must fail the batch");
    match err {
      ParseError::MalformedFeature { index, reason } => {
        assert_eq!(index, 1);
        assert!(reason.contains("TrunkSize"), "unexpected reason: {reason}");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn street_collection_rejects_point_geometry() {
    let raw = r#"{"type":"FeatureCollection","features":[
      {"type":"Feature","geometry":{"type":"Point","coordinates":[16.37,48.21]},"properties":{}}
    ]}"#;
    assert!(matches!(
      parse_streets(raw),
      Err(ParseError::MalformedFeature { index: 0, .. })
    ));
  }

  #[test]
  fn non_feature_collection_is_rejected() {
    assert!(matches!(
      parse_trees(r#"{"type":"Feature"}"#),
      Err(ParseError::NotAFeatureCollection(_))
    ));
    assert!(matches!(parse_trees("not json"), Err(ParseError::Json(_))));
  }
}
