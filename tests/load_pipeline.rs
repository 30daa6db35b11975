use std::{path::Path, sync::mpsc::channel, time::Duration};

use arbormap::{
  config::ViewerConfig,
  loader::{Dataset, LoadEvent, spawn_loads},
  map::{
    layers::{TreeLayer, TreeScales},
    projection::Projection,
    scales::YEAR_COLOR_MID,
  },
};

fn resource(name: &str) -> String {
  format!(
    "{}/tests/resources/{name}",
    env!("CARGO_MANIFEST_DIR")
  )
}

/// A missing street file must not block the tree dataset: both loads finish
/// independently and the trees stay placeable with an unfitted projection.
#[tokio::test(flavor = "multi_thread")]
async fn street_failure_does_not_block_the_tree_load() {
  let cfg = ViewerConfig {
    streets_path: resource("no-such-streets.geojson").into(),
    trees_path: resource("trees.geojson").into(),
    ..ViewerConfig::new(Path::new("data"))
  };
  let (send, recv) = channel();
  let ctx = egui::Context::default();
  spawn_loads(&cfg, &send, &ctx);

  let mut trees = None;
  let mut failures = Vec::new();
  for _ in 0..2 {
    match recv.recv_timeout(Duration::from_secs(5)).expect("load event") {
      LoadEvent::Trees(t) => trees = Some(t),
      LoadEvent::Failed(dataset, _) => failures.push(dataset),
      LoadEvent::Streets(_) => panic!("the street path does not exist"),
    }
  }

  assert_eq!(failures, vec![Dataset::Streets]);
  assert_eq!(
    Dataset::Streets.failure_message(),
    "There was an issue loading the street dataset. Please check the file path and try again."
  );
  let trees = trees.expect("the tree dataset should have loaded");
  assert_eq!(trees.len(), 3);

  // Trees are still placeable without a street extent to fit against.
  let projection = Projection::new(cfg.map_center, cfg.viewport);
  let layer = TreeLayer::new(trees, &projection, TreeScales::default());
  assert_eq!(layer.len(), 3);
  assert_eq!(layer.visual(0, 0.).stroke, YEAR_COLOR_MID);
}

#[tokio::test(flavor = "multi_thread")]
async fn both_datasets_load_in_either_order() {
  let cfg = ViewerConfig {
    streets_path: resource("simple_streets.geojson").into(),
    trees_path: resource("trees.geojson").into(),
    ..ViewerConfig::new(Path::new("data"))
  };
  let (send, recv) = channel();
  let ctx = egui::Context::default();
  spawn_loads(&cfg, &send, &ctx);

  let mut streets = None;
  let mut trees = None;
  for _ in 0..2 {
    match recv.recv_timeout(Duration::from_secs(5)).expect("load event") {
      LoadEvent::Streets(s) => streets = Some(s),
      LoadEvent::Trees(t) => trees = Some(t),
      LoadEvent::Failed(dataset, e) => panic!("{dataset:?} failed: {e}"),
    }
  }

  assert_eq!(streets.expect("streets").len(), 2);
  assert_eq!(trees.expect("trees").len(), 3);
}
