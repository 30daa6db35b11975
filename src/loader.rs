use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use crate::{
  config::ViewerConfig,
  map::features::{StreetFeature, TreeFeature},
  parser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
  Streets,
  Trees,
}

impl Dataset {
  /// The fixed user-facing message shown when this dataset fails to load.
  #[must_use]
  pub fn failure_message(self) -> &'static str {
    match self {
      Dataset::Streets => {
        "There was an issue loading the street dataset. Please check the file path and try again."
      }
      Dataset::Trees => {
        "There was an issue loading the tree dataset. Please check the file path and try again."
      }
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
  #[error("could not read file: {0}")]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Parse(#[from] parser::ParseError),
}

/// Outcome of one dataset load, delivered to the UI thread.
#[derive(Debug)]
pub enum LoadEvent {
  Streets(Vec<StreetFeature>),
  Trees(Vec<TreeFeature>),
  Failed(Dataset, LoadError),
}

/// Starts one background load per dataset. Each task sends exactly one
/// [`LoadEvent`] and requests a repaint; the two loads are independent and may
/// finish in either order. No retries, no timeout.
pub fn spawn_loads(cfg: &ViewerConfig, sender: &Sender<LoadEvent>, ctx: &egui::Context) {
  spawn_one(cfg.streets_path.clone(), Dataset::Streets, sender, ctx);
  spawn_one(cfg.trees_path.clone(), Dataset::Trees, sender, ctx);
}

fn spawn_one(path: PathBuf, dataset: Dataset, sender: &Sender<LoadEvent>, ctx: &egui::Context) {
  let sender = sender.clone();
  let update = ctx.clone();
  tokio::spawn(async move {
    let event = match load(&path, dataset).await {
      Ok(event) => event,
      Err(e) => {
        log::error!("loading {path:?} failed: {e}");
        LoadEvent::Failed(dataset, e)
      }
    };
    let _ = sender.send(event);
    update.request_repaint();
  });
}

async fn load(path: &Path, dataset: Dataset) -> Result<LoadEvent, LoadError> {
  let raw = tokio::fs::read_to_string(path).await?;
  let event = match dataset {
    Dataset::Streets => LoadEvent::Streets(parser::parse_streets(&raw)?),
    Dataset::Trees => LoadEvent::Trees(parser::parse_trees(&raw)?),
  };
  log::info!("loaded {path:?}");
  Ok(event)
}
