use std::{
  collections::VecDeque,
  sync::mpsc::{Receiver, channel},
};

use egui::{CentralPanel, Color32, Context, Response, Sense, SidePanel, TopBottomPanel, Ui, Vec2};

use crate::{
  config::ViewerConfig,
  loader::{self, Dataset, LoadEvent},
  map::{
    camera::{Camera, ViewTransform},
    features::TreeFeature,
    layers::{StreetLayer, TreeLayer, TreeScales},
    legend::Legend,
    projection::Projection,
    tooltip::Tooltip,
  },
};

/// The viewer application: loads both datasets in the background, fits the
/// projection to the street extent and wires the layers, legend, tooltip and
/// camera together.
pub struct App {
  cfg: ViewerConfig,
  recv: Receiver<LoadEvent>,
  camera: Camera,
  projection: Option<Projection>,
  streets: Option<StreetLayer>,
  trees: Option<TreeLayer>,
  /// Trees that arrived before the projection was ready.
  pending_trees: Option<Vec<TreeFeature>>,
  legend: Legend,
  tooltip: Tooltip,
  /// Pending load-failure messages, shown one modal at a time.
  errors: VecDeque<&'static str>,
}

impl App {
  #[must_use]
  pub fn new(cfg: ViewerConfig, ctx: &Context) -> Self {
    let (send, recv) = channel();
    loader::spawn_loads(&cfg, &send, ctx);
    Self {
      cfg,
      recv,
      camera: Camera::default(),
      projection: None,
      streets: None,
      trees: None,
      pending_trees: None,
      legend: Legend::new(),
      tooltip: Tooltip::default(),
      errors: VecDeque::new(),
    }
  }

  fn handle_load_events(&mut self) {
    for event in self.recv.try_iter().collect::<Vec<_>>() {
      match event {
        LoadEvent::Streets(streets) => {
          let mut projection = Projection::new(self.cfg.map_center, self.cfg.viewport);
          projection.fit_size(
            f64::from(self.cfg.viewport.0),
            f64::from(self.cfg.viewport.1),
            &streets,
          );
          self.streets = Some(StreetLayer::new(&streets, &projection));
          self.projection = Some(projection);
          self.place_pending_trees();
        }
        LoadEvent::Trees(trees) => {
          self.legend.set_trunk_extent(&trees);
          self.pending_trees = Some(trees);
          self.place_pending_trees();
        }
        LoadEvent::Failed(dataset, _) => {
          self.errors.push_back(dataset.failure_message());
          if dataset == Dataset::Streets && self.projection.is_none() {
            // No street extent to fit against; place trees with the
            // unfitted projection.
            self.projection = Some(Projection::new(self.cfg.map_center, self.cfg.viewport));
            self.place_pending_trees();
          }
        }
      }
    }
  }

  /// Builds the tree layer once both the trees and the projection exist.
  fn place_pending_trees(&mut self) {
    if let Some(projection) = &self.projection
      && let Some(trees) = self.pending_trees.take()
    {
      self.trees = Some(TreeLayer::new(trees, projection, TreeScales::default()));
    }
  }

  fn show_map(&mut self, ui: &mut Ui) {
    let size = ui.available_size();
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
    let now = ui.input(|i| i.time);
    let logical = Vec2::new(self.cfg.viewport.0, self.cfg.viewport.1);
    let base = Camera::base_fit(rect, logical);

    if response.dragged() {
      self.camera.translate(response.drag_delta() / base.scale);
    }
    self.handle_mouse_wheel(ui, &response, &base);
    if self.camera.tick(now) {
      ui.ctx().request_repaint();
    }

    let view = self.camera.view_transform(rect, logical);
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0., Color32::WHITE);
    if let Some(streets) = &self.streets {
      streets.draw(&painter, &view);
    }
    if let Some(trees) = &mut self.trees {
      trees.interact(&response, &view, &mut self.tooltip, now);
      if trees.draw(&painter, &view, now) {
        ui.ctx().request_repaint();
      }
    }
  }

  fn handle_mouse_wheel(&mut self, ui: &Ui, response: &Response, base: &ViewTransform) {
    if !response.hovered() {
      return;
    }
    let delta = ui.input(|i| {
      i.events.iter().find_map(|e| match e {
        egui::Event::MouseWheel { delta, .. } => Some(*delta),
        _ => None,
      })
    });
    if let (Some(delta), Some(pos)) = (delta, response.hover_pos()) {
      let factor = (delta.y + 1.).clamp(0.8, 1.4).sqrt();
      let anchor = base.unapply(pos).to_vec2();
      self.camera.zoom_by(factor, anchor);
    }
  }

  fn show_toolbar(&mut self, ctx: &Context) {
    TopBottomPanel::top("toolbar").show(ctx, |ui| {
      ui.horizontal(|ui| {
        let center = Vec2::new(self.cfg.viewport.0 / 2., self.cfg.viewport.1 / 2.);
        if ui.button("Zoom in").clicked() {
          self.camera.zoom_in(center);
        }
        if ui.button("Zoom out").clicked() {
          self.camera.zoom_out(center);
        }
        if ui.button("Reset").clicked() {
          self.camera.reset(ctx.input(|i| i.time));
        }
      });
    });
  }

  fn show_error_modal(&mut self, ctx: &Context) {
    let Some(message) = self.errors.front() else {
      return;
    };
    let mut dismissed = false;
    let modal = egui::Modal::new(egui::Id::new("load-error")).show(ctx, |ui| {
      ui.set_max_width(320.);
      ui.heading("Loading failed");
      ui.label(*message);
      ui.separator();
      if ui.button("OK").clicked() {
        dismissed = true;
      }
    });
    if dismissed || modal.should_close() {
      self.errors.pop_front();
    }
  }
}

impl eframe::App for App {
  fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
    self.handle_load_events();

    self.show_toolbar(ctx);
    SidePanel::right("legend")
      .exact_width(self.cfg.legend_size.0)
      .resizable(false)
      .frame(egui::Frame::NONE)
      .show(ctx, |ui| {
        self.legend.ui(ui, Vec2::new(self.cfg.legend_size.0, self.cfg.legend_size.1));
      });
    CentralPanel::default().show(ctx, |ui| self.show_map(ui));

    let now = ctx.input(|i| i.time);
    if self.tooltip.ui(ctx, now) {
      ctx.request_repaint();
    }
    self.show_error_modal(ctx);
  }
}
