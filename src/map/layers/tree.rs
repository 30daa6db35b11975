use egui::{Color32, CursorIcon, Painter, Pos2, Response, Stroke};

use crate::map::{
  camera::ViewTransform,
  features::TreeFeature,
  projection::Projection,
  scales::{ColorRamp, DRAW_YEAR_BUCKETS, HOVER_RESET_YEAR_BUCKETS, SqrtScale, YearBuckets,
    lerp_color},
  tooltip::Tooltip,
};

/// Seconds a state-change animation takes.
const TRANSITION_SECS: f64 = 0.5;
/// Stroke width of an idle tree circle, in logical units.
const IDLE_STROKE_WIDTH: f32 = 0.5;
/// Stroke width while hovered.
const HOVER_STROKE_WIDTH: f32 = 0.2;
/// Stroke width after a double click.
const DOUBLE_CLICK_STROKE_WIDTH: f32 = 1.3;
/// Fixed highlight for clicked trees.
const CLICK_COLOR: Color32 = Color32::from_rgb(0, 255, 255);

fn double_click_color() -> Color32 {
  Color32::from_rgba_unmultiplied(0xe1, 0x29, 0xb9, 0xf7)
}

/// The visual encoding scales of the tree layer. Constructed once and shared;
/// the legend uses the same ramp but its own radius scale.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeScales {
  pub radius: SqrtScale,
  pub height_ramp: ColorRamp,
}

impl Default for TreeScales {
  fn default() -> Self {
    Self {
      radius: SqrtScale::map_radius(),
      height_ramp: ColorRamp::height(),
    }
  }
}

/// Interaction states of one tree circle. Clicked and DoubleClicked are
/// sticky: only further pointer events on the same tree leave them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeState {
  #[default]
  Idle,
  Hovered,
  Clicked,
  DoubleClicked,
}

/// The animatable visual channels of a tree circle. Radius and stroke width
/// are in logical viewport units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
  pub fill: Color32,
  pub stroke: Color32,
  pub stroke_width: f32,
  pub radius: f32,
}

impl Visual {
  #[must_use]
  fn lerp(&self, to: &Visual, t: f32) -> Visual {
    Visual {
      fill: lerp_color(self.fill, to.fill, t),
      stroke: lerp_color(self.stroke, to.stroke, t),
      stroke_width: self.stroke_width + (to.stroke_width - self.stroke_width) * t,
      radius: self.radius + (to.radius - self.radius) * t,
    }
  }
}

/// The idle visuals of a tree, recomputed from its data whenever needed.
fn idle_visual(tree: &TreeFeature, scales: &TreeScales, buckets: &YearBuckets) -> Visual {
  #[allow(clippy::cast_possible_truncation)]
  let radius = scales.radius.value(tree.trunk_cm) as f32;
  Visual {
    fill: scales.height_ramp.color(tree.height_m),
    stroke: buckets.color(tree.planting_year),
    stroke_width: IDLE_STROKE_WIDTH,
    radius,
  }
}

struct TreeSprite {
  feature: TreeFeature,
  center: Pos2,
  state: TreeState,
  from: Visual,
  target: Visual,
  since: f64,
}

/// Draws the tree inventory as circles and runs the per-tree interaction
/// state machine. Interaction only changes visuals and draw order; the
/// underlying features are never mutated.
pub struct TreeLayer {
  sprites: Vec<TreeSprite>,
  /// Draw order, back to front. Raising moves a tree to the end, lowering to
  /// the start.
  order: Vec<usize>,
  scales: TreeScales,
  hovered: Option<usize>,
}

impl TreeLayer {
  #[must_use]
  pub fn new(trees: Vec<TreeFeature>, projection: &Projection, scales: TreeScales) -> Self {
    let sprites: Vec<TreeSprite> = trees
      .into_iter()
      .map(|feature| {
        let (x, y) = projection.project(feature.lon, feature.lat);
        let idle = idle_visual(&feature, &scales, &DRAW_YEAR_BUCKETS);
        TreeSprite {
          feature,
          center: Pos2::new(x, y),
          state: TreeState::Idle,
          from: idle,
          target: idle,
          since: f64::NEG_INFINITY,
        }
      })
      .collect();
    let order = (0..sprites.len()).collect();
    Self {
      sprites,
      order,
      scales,
      hovered: None,
    }
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.sprites.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.sprites.is_empty()
  }

  #[must_use]
  pub fn state(&self, idx: usize) -> TreeState {
    self.sprites[idx].state
  }

  /// The interpolated visuals of a tree at `now`.
  #[must_use]
  #[allow(clippy::cast_possible_truncation)]
  pub fn visual(&self, idx: usize, now: f64) -> Visual {
    let sprite = &self.sprites[idx];
    let t = ((now - sprite.since) / TRANSITION_SECS).clamp(0., 1.) as f32;
    sprite.from.lerp(&sprite.target, t)
  }

  fn transition(&mut self, idx: usize, state: TreeState, target: Visual, now: f64) {
    let from = self.visual(idx, now);
    let sprite = &mut self.sprites[idx];
    sprite.state = state;
    sprite.from = from;
    sprite.target = target;
    sprite.since = now;
  }

  fn raise(&mut self, idx: usize) {
    self.order.retain(|&i| i != idx);
    self.order.push(idx);
  }

  fn lower(&mut self, idx: usize) {
    self.order.retain(|&i| i != idx);
    self.order.insert(0, idx);
  }

  pub fn pointer_enter(&mut self, idx: usize, now: f64) {
    if self.sprites[idx].state != TreeState::Idle {
      return;
    }
    self.raise(idx);
    let radius = self.sprites[idx].target.radius;
    self.transition(
      idx,
      TreeState::Hovered,
      Visual {
        fill: Color32::WHITE,
        stroke: Color32::WHITE,
        stroke_width: HOVER_STROKE_WIDTH,
        radius,
      },
      now,
    );
  }

  /// Returns the tree to its idle visuals, recomputed from its own data with
  /// the hover-reset year boundaries.
  pub fn pointer_leave(&mut self, idx: usize, now: f64) {
    if self.sprites[idx].state != TreeState::Hovered {
      return;
    }
    self.lower(idx);
    let idle = idle_visual(
      &self.sprites[idx].feature,
      &self.scales,
      &HOVER_RESET_YEAR_BUCKETS,
    );
    self.transition(idx, TreeState::Idle, idle, now);
  }

  pub fn click(&mut self, idx: usize, now: f64) {
    if self.sprites[idx].state == TreeState::Clicked {
      return;
    }
    self.raise(idx);
    let target = self.sprites[idx].target;
    self.transition(
      idx,
      TreeState::Clicked,
      Visual {
        fill: CLICK_COLOR,
        stroke: CLICK_COLOR,
        ..target
      },
      now,
    );
  }

  pub fn double_click(&mut self, idx: usize, now: f64) {
    if self.sprites[idx].state == TreeState::DoubleClicked {
      return;
    }
    self.raise(idx);
    let target = self.sprites[idx].target;
    self.transition(
      idx,
      TreeState::DoubleClicked,
      Visual {
        fill: double_click_color(),
        stroke: double_click_color(),
        stroke_width: DOUBLE_CLICK_STROKE_WIDTH,
        radius: target.radius,
      },
      now,
    );
  }

  /// The topmost tree under `pointer`, in screen coordinates.
  #[must_use]
  pub fn hit_test(&self, pointer: Pos2, view: &ViewTransform, now: f64) -> Option<usize> {
    self.order.iter().rev().copied().find(|&i| {
      let center = view.apply(self.sprites[i].center);
      let radius = self.visual(i, now).radius * view.scale;
      center.distance(pointer) <= radius
    })
  }

  /// Applies pointer events of the map widget to the trees and the tooltip.
  pub fn interact(
    &mut self,
    response: &Response,
    view: &ViewTransform,
    tooltip: &mut Tooltip,
    now: f64,
  ) {
    let pointer = response.hover_pos();
    let hit = pointer.and_then(|p| self.hit_test(p, view, now));

    if hit != self.hovered {
      if let Some(prev) = self.hovered {
        self.pointer_leave(prev, now);
        tooltip.hide(now);
      }
      if let (Some(idx), Some(p)) = (hit, pointer) {
        self.pointer_enter(idx, now);
        tooltip.show(&self.sprites[idx].feature, p, now);
      }
      self.hovered = hit;
    }

    if let Some(idx) = self.hovered {
      response.ctx.set_cursor_icon(CursorIcon::PointingHand);
      if response.double_clicked() {
        self.double_click(idx, now);
      } else if response.clicked() {
        self.click(idx, now);
      }
    }
  }

  /// Draws all trees in draw order. Returns true while any animation runs.
  pub fn draw(&self, painter: &Painter, view: &ViewTransform, now: f64) -> bool {
    let mut animating = false;
    for &i in &self.order {
      let visual = self.visual(i, now);
      animating |= now - self.sprites[i].since < TRANSITION_SECS;
      painter.circle(
        view.apply(self.sprites[i].center),
        visual.radius * view.scale,
        visual.fill,
        Stroke::new(visual.stroke_width * view.scale, visual.stroke),
      );
    }
    animating
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::map::scales::{YEAR_COLOR_MID, YEAR_COLOR_NEWEST, YEAR_COLOR_RECENT};
  use assert_approx_eq::assert_approx_eq;

  fn projection() -> Projection {
    Projection::new((16.373, 48.208), (300., 150.))
  }

  fn tree(id: &str, year: i32, height: f64, trunk: f64) -> TreeFeature {
    TreeFeature {
      id: id.to_string(),
      species: "Oak".to_string(),
      planting_year: year,
      height_m: height,
      trunk_cm: trunk,
      lon: 16.373,
      lat: 48.208,
    }
  }

  fn layer(trees: Vec<TreeFeature>) -> TreeLayer {
    TreeLayer::new(trees, &projection(), TreeScales::default())
  }

  #[test]
  fn fresh_draw_uses_the_documented_encodings() {
    let layer = layer(vec![tree("1", 1975, 4., 150.)]);
    let visual = layer.visual(0, 0.);

    assert_eq!(visual.stroke, YEAR_COLOR_MID); // #377eb8
    assert_eq!(visual.fill, Color32::from_rgb(0x66, 0xc2, 0xa4));
    assert_approx_eq!(visual.radius, 1.866_025_4, 1e-5);
    assert_approx_eq!(visual.stroke_width, IDLE_STROKE_WIDTH);
  }

  #[test]
  fn hover_animates_to_white_and_back() {
    let mut layer = layer(vec![tree("1", 1975, 4., 150.)]);
    let idle = layer.visual(0, 0.);

    layer.pointer_enter(0, 0.);
    assert_eq!(layer.state(0), TreeState::Hovered);
    let mid = layer.visual(0, 0.25);
    assert_ne!(mid.fill, idle.fill);
    assert_ne!(mid.fill, Color32::WHITE);
    let hovered = layer.visual(0, 1.);
    assert_eq!(hovered.fill, Color32::WHITE);
    assert_approx_eq!(hovered.stroke_width, HOVER_STROKE_WIDTH);

    layer.pointer_leave(0, 1.);
    assert_eq!(layer.state(0), TreeState::Idle);
    let settled = layer.visual(0, 2.);
    assert_eq!(settled, idle);
  }

  /// A tree planted in 2000 comes back from a hover with the other bucket
  /// color: the draw and hover-reset boundaries intentionally differ.
  #[test]
  fn hover_reset_uses_the_shifted_year_boundaries() {
    let mut layer = layer(vec![tree("1", 2000, 4., 150.)]);
    assert_eq!(layer.visual(0, 0.).stroke, YEAR_COLOR_RECENT);

    layer.pointer_enter(0, 0.);
    layer.pointer_leave(0, 1.);
    assert_eq!(layer.visual(0, 2.).stroke, YEAR_COLOR_NEWEST);
  }

  #[test]
  fn click_is_sticky() {
    let mut layer = layer(vec![tree("1", 1975, 4., 150.)]);
    layer.pointer_enter(0, 0.);
    layer.click(0, 0.2);
    assert_eq!(layer.state(0), TreeState::Clicked);
    assert_eq!(layer.visual(0, 1.).fill, CLICK_COLOR);

    // Pointer leave does not reset a clicked tree.
    layer.pointer_leave(0, 1.);
    assert_eq!(layer.state(0), TreeState::Clicked);
    assert_eq!(layer.visual(0, 2.).fill, CLICK_COLOR);
  }

  #[test]
  fn double_click_overrides_click() {
    let mut layer = layer(vec![tree("1", 1975, 4., 150.)]);
    layer.click(0, 0.);
    layer.double_click(0, 0.1);
    assert_eq!(layer.state(0), TreeState::DoubleClicked);
    let visual = layer.visual(0, 1.);
    assert_eq!(visual.fill, double_click_color());
    assert_approx_eq!(visual.stroke_width, DOUBLE_CLICK_STROKE_WIDTH);
  }

  #[test]
  fn hovering_raises_and_unhovering_lowers() {
    // Two trees at the same position; the second is drawn on top.
    let mut layer = layer(vec![
      tree("1", 1975, 4., 150.),
      tree("2", 1990, 6., 150.),
    ]);
    let view = ViewTransform {
      scale: 1.,
      offset: egui::Vec2::ZERO,
    };
    let center = view.apply(Pos2::new(150., 75.));

    assert_eq!(layer.hit_test(center, &view, 0.), Some(1));

    layer.pointer_enter(0, 0.);
    assert_eq!(layer.hit_test(center, &view, 0.), Some(0));

    layer.pointer_leave(0, 1.);
    assert_eq!(layer.hit_test(center, &view, 1.), Some(1));
  }

  #[test]
  fn interaction_does_not_touch_the_feature_data() {
    let feature = tree("1", 1975, 4., 150.);
    let mut layer = layer(vec![feature.clone()]);
    layer.pointer_enter(0, 0.);
    layer.click(0, 0.5);
    layer.double_click(0, 1.);
    assert_eq!(layer.sprites[0].feature, feature);
  }
}
