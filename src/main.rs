use std::path::PathBuf;

use arbormap::{app::App, config::ViewerConfig};
use clap::Parser;

/// A map viewer for city street and tree inventory data.
#[derive(Parser)]
#[command(version, about)]
struct Args {
  /// Directory containing the street and tree GeoJSON files.
  #[arg(long, default_value = "data")]
  data_dir: PathBuf,
  /// Initial window width in pixels.
  #[arg(long, default_value_t = 1240.)]
  width: f32,
  /// Initial window height in pixels.
  #[arg(long, default_value_t = 660.)]
  height: f32,
}

fn main() -> eframe::Result {
  env_logger::init();
  let args = Args::parse();

  // The loader tasks run on this runtime while eframe owns the main thread.
  let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
  let _guard = runtime.enter();

  let cfg = ViewerConfig::new(&args.data_dir);
  let options = eframe::NativeOptions {
    viewport: egui::ViewportBuilder::default()
      .with_title("Trees in Vienna")
      .with_inner_size([args.width, args.height]),
    ..Default::default()
  };
  eframe::run_native(
    "arbormap",
    options,
    Box::new(|cc| Ok(Box::new(App::new(cfg, &cc.egui_ctx)))),
  )
}
