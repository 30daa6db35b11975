use egui::{Context, Id, Pos2, Vec2};

use crate::map::features::TreeFeature;

/// Seconds the opacity fade takes.
const FADE_SECS: f64 = 0.15;
/// Opacity of a fully shown tooltip.
const SHOWN_OPACITY: f32 = 0.9;
/// Offset of the panel from the pointer.
const POINTER_OFFSET: Vec2 = Vec2::new(10., -10.);

#[derive(Debug, Clone, PartialEq)]
struct Content {
  id: String,
  species: String,
  planting_year: i32,
  height_m: f64,
  trunk_cm: f64,
}

impl From<&TreeFeature> for Content {
  fn from(tree: &TreeFeature) -> Self {
    Self {
      id: tree.id.clone(),
      species: tree.species.clone(),
      planting_year: tree.planting_year,
      height_m: tree.height_m,
      trunk_cm: tree.trunk_cm,
    }
  }
}

/// The single floating tooltip panel. Only one tree's attributes are shown at
/// a time; showing another tree replaces the content. Opacity stays within
/// `[0, SHOWN_OPACITY]`.
#[derive(Debug, Default)]
pub struct Tooltip {
  content: Option<Content>,
  pos: Pos2,
  from: f32,
  target: f32,
  since: f64,
}

impl Tooltip {
  /// Shows `tree`'s attributes next to the pointer and fades the panel in.
  pub fn show(&mut self, tree: &TreeFeature, pointer: Pos2, now: f64) {
    self.from = self.opacity(now);
    self.content = Some(Content::from(tree));
    self.pos = pointer + POINTER_OFFSET;
    self.target = SHOWN_OPACITY;
    self.since = now;
  }

  /// Fades the panel out; the content stays for the fade.
  pub fn hide(&mut self, now: f64) {
    self.from = self.opacity(now);
    self.target = 0.;
    self.since = now;
  }

  #[must_use]
  #[allow(clippy::cast_possible_truncation)]
  pub fn opacity(&self, now: f64) -> f32 {
    let t = ((now - self.since) / FADE_SECS).clamp(0., 1.) as f32;
    self.from + (self.target - self.from) * t
  }

  /// The id of the tree the tooltip currently presents, if it is shown.
  #[must_use]
  pub fn shown_id(&self) -> Option<&str> {
    if self.target > 0. {
      self.content.as_ref().map(|c| c.id.as_str())
    } else {
      None
    }
  }

  /// Draws the panel. Returns true while the fade animation is running.
  pub fn ui(&self, ctx: &Context, now: f64) -> bool {
    let animating = (self.opacity(now) - self.target).abs() > 1e-3;
    let Some(content) = &self.content else {
      return false;
    };
    let opacity = self.opacity(now);
    if opacity <= 0. {
      return animating;
    }

    egui::Area::new(Id::new("tree-tooltip"))
      .fixed_pos(self.pos)
      .order(egui::Order::Tooltip)
      .interactable(false)
      .show(ctx, |ui| {
        ui.set_opacity(opacity);
        egui::Frame::popup(&ctx.style()).show(ui, |ui| {
          egui::Grid::new("tree-tooltip-grid").show(ui, |ui| {
            ui.strong("Attribute:");
            ui.strong(format!("Individual {}", content.id));
            ui.end_row();
            ui.label("Species:");
            ui.label(&content.species);
            ui.end_row();
            ui.label("Planting Year:");
            ui.label(content.planting_year.to_string());
            ui.end_row();
            ui.label("Tree Height (in m):");
            ui.label(format!("{}", content.height_m));
            ui.end_row();
            ui.label("Trunk Size (in cm):");
            ui.label(format!("{}", content.trunk_cm));
            ui.end_row();
          });
        });
      });
    animating
  }
}
