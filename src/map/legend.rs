use egui::{Align2, Color32, FontId, Painter, Pos2, Sense, Stroke, Ui, Vec2};
use itertools::Itertools as _;

use crate::map::{
  features::TreeFeature,
  scales::{
    HEIGHT_RAMP_COLORS, SqrtScale, YEAR_COLOR_MID, YEAR_COLOR_NEWEST, YEAR_COLOR_OTHER,
    YEAR_COLOR_RECENT,
  },
};

const PADDING_X: f32 = 20.;
const PADDING_Y: f32 = 40.;
/// Radius of the year and height legend symbols.
const SYMBOL_RADIUS: f32 = 6.;
/// Vertical gap between two symbols of a block.
const SYMBOL_GAP: f32 = 15.;
/// Horizontal gap between a symbol and its label.
const LABEL_GAP: f32 = 30.;
/// Extra vertical gap between two blocks.
const BLOCK_GAP: f32 = 40.;
/// Vertical advance per trunk-size row; larger than the other blocks because
/// the circles grow up to the legend scale maximum.
const TRUNK_ROW_ADVANCE: f32 = 45.;

const BACKGROUND: Color32 = Color32::from_rgb(211, 211, 211);

const YEAR_LABELS: [&str; 4] = ["Other (pre-1961)", "1961-1980", "1981-2000", "2001-2021"];
const YEAR_COLORS: [Color32; 4] = [
  YEAR_COLOR_OTHER,
  YEAR_COLOR_MID,
  YEAR_COLOR_RECENT,
  YEAR_COLOR_NEWEST,
];
const HEIGHT_LABELS: [&str; 5] = ["0", "1-2", "3-4", "5-6", "7-8"];
const TRUNK_LABELS: [&str; 4] = ["0", "1-200", "201-400", "401-600"];

/// The static legend panel: three vertically stacked blocks decoding the
/// planting-year stroke colors, the tree-height fill ramp and the trunk-size
/// radii. The trunk block appears once the tree dataset is loaded, since it
/// shows the dataset's actual minimum and maximum trunk sizes.
pub struct Legend {
  radius_scale: SqrtScale,
  trunk_extent: Option<(f64, f64)>,
}

impl Default for Legend {
  fn default() -> Self {
    Self::new()
  }
}

impl Legend {
  #[must_use]
  pub fn new() -> Self {
    Self {
      radius_scale: SqrtScale::legend_radius(),
      trunk_extent: None,
    }
  }

  pub fn set_trunk_extent(&mut self, trees: &[TreeFeature]) {
    self.trunk_extent = trees
      .iter()
      .map(|t| t.trunk_cm)
      .minmax_by(f64::total_cmp)
      .into_option();
  }

  #[must_use]
  pub fn trunk_extent(&self) -> Option<(f64, f64)> {
    self.trunk_extent
  }

  pub fn ui(&self, ui: &mut Ui, size: Vec2) {
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0., BACKGROUND);
    let origin = rect.min;

    title(&painter, origin, PADDING_Y - 7., "Planting Year");
    for (i, (label, color)) in YEAR_LABELS.iter().zip(YEAR_COLORS).enumerate() {
      let cy = block_row_center(PADDING_Y, i);
      painter.circle_stroke(
        origin + Vec2::new(PADDING_X + SYMBOL_RADIUS, cy),
        SYMBOL_RADIUS,
        Stroke::new(3., color),
      );
      entry_label(&painter, origin, cy, label);
    }

    let height_offset = block_offset(PADDING_Y, YEAR_LABELS.len());
    title(&painter, origin, height_offset - 10., "Tree Height (meters)");
    for (i, (label, color)) in HEIGHT_LABELS.iter().zip(HEIGHT_RAMP_COLORS).enumerate() {
      let cy = block_row_center(height_offset, i);
      painter.circle_filled(
        origin + Vec2::new(PADDING_X + SYMBOL_RADIUS, cy),
        SYMBOL_RADIUS,
        color,
      );
      entry_label(&painter, origin, cy, label);
    }

    let Some((smallest, biggest)) = self.trunk_extent else {
      return;
    };
    let trunk_offset = block_offset(height_offset, HEIGHT_LABELS.len());
    title(
      &painter,
      origin,
      trunk_offset - 10.,
      "Trunk Size (centimeters)",
    );
    let values = [smallest, 200., 400., biggest];
    for (i, (label, value)) in TRUNK_LABELS.iter().zip(values).enumerate() {
      #[allow(clippy::cast_precision_loss)]
      let cy = trunk_offset + i as f32 * TRUNK_ROW_ADVANCE;
      #[allow(clippy::cast_possible_truncation)]
      let radius = self.radius_scale.value(value) as f32;
      painter.circle_stroke(
        origin + Vec2::new(PADDING_X + 20., cy),
        radius,
        Stroke::new(1., Color32::BLACK),
      );
      painter.text(
        origin + Vec2::new(PADDING_X + 22. + 25., cy),
        Align2::LEFT_CENTER,
        *label,
        FontId::proportional(14.),
        Color32::BLACK,
      );
    }
  }
}

/// Vertical center of row `i` of a year/height block starting at `offset`.
#[allow(clippy::cast_precision_loss)]
fn block_row_center(offset: f32, i: usize) -> f32 {
  offset + i as f32 * (SYMBOL_RADIUS * 2. + SYMBOL_GAP) + SYMBOL_RADIUS
}

/// Start of the block following one with `entries` rows at `offset`.
#[allow(clippy::cast_precision_loss)]
fn block_offset(offset: f32, entries: usize) -> f32 {
  offset + entries as f32 * (SYMBOL_RADIUS * 2. + SYMBOL_GAP) + BLOCK_GAP
}

fn title(painter: &Painter, origin: Pos2, y: f32, text: &str) {
  painter.text(
    origin + Vec2::new(PADDING_X, y),
    Align2::LEFT_BOTTOM,
    text,
    FontId::proportional(16.),
    Color32::BLACK,
  );
}

fn entry_label(painter: &Painter, origin: Pos2, cy: f32, label: &str) {
  painter.text(
    origin + Vec2::new(PADDING_X + LABEL_GAP + SYMBOL_RADIUS * 2., cy),
    Align2::LEFT_CENTER,
    label,
    FontId::proportional(14.),
    Color32::BLACK,
  );
}
