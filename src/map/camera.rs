use egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 1.;
pub const MAX_ZOOM: f32 = 8.;

/// Seconds the animated reset takes.
const RESET_SECS: f64 = 0.2;

/// A uniform scale plus offset from logical map coordinates to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
  pub scale: f32,
  pub offset: Vec2,
}

impl ViewTransform {
  #[must_use]
  pub fn apply(&self, p: Pos2) -> Pos2 {
    (p.to_vec2() * self.scale + self.offset).to_pos2()
  }

  #[must_use]
  pub fn unapply(&self, p: Pos2) -> Pos2 {
    ((p.to_vec2() - self.offset) / self.scale).to_pos2()
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResetAnim {
  from_zoom: f32,
  from_pan: Vec2,
  start: f64,
}

/// The pan/zoom state applied uniformly to the street and tree layers so they
/// stay spatially aligned. Zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`; the pan
/// is kept in viewport units.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
  zoom: f32,
  pan: Vec2,
  reset_anim: Option<ResetAnim>,
}

impl Default for Camera {
  fn default() -> Self {
    Self {
      zoom: 1.,
      pan: Vec2::ZERO,
      reset_anim: None,
    }
  }
}

impl Camera {
  #[must_use]
  pub fn zoom(&self) -> f32 {
    self.zoom
  }

  #[must_use]
  pub fn pan(&self) -> Vec2 {
    self.pan
  }

  /// Multiplies the zoom by `factor`, clamped, keeping the viewport-space
  /// point `anchor` fixed.
  pub fn zoom_by(&mut self, factor: f32, anchor: Vec2) {
    self.reset_anim = None;
    let target = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    let fixed = (anchor - self.pan) / self.zoom;
    self.pan = anchor - fixed * target;
    self.zoom = target;
  }

  pub fn zoom_in(&mut self, anchor: Vec2) {
    self.zoom_by(2., anchor);
  }

  pub fn zoom_out(&mut self, anchor: Vec2) {
    self.zoom_by(0.5, anchor);
  }

  /// Pans by a delta in viewport units.
  pub fn translate(&mut self, delta: Vec2) {
    self.reset_anim = None;
    self.pan += delta;
  }

  /// Starts the animated return to the identity transform.
  pub fn reset(&mut self, now: f64) {
    self.reset_anim = Some(ResetAnim {
      from_zoom: self.zoom,
      from_pan: self.pan,
      start: now,
    });
  }

  /// Advances the reset animation. Returns true while a repaint is needed.
  #[allow(clippy::cast_possible_truncation)]
  pub fn tick(&mut self, now: f64) -> bool {
    let Some(anim) = self.reset_anim else {
      return false;
    };
    let t = ((now - anim.start) / RESET_SECS).clamp(0., 1.);
    let eased = ease_cubic(t) as f32;
    self.zoom = anim.from_zoom + (1. - anim.from_zoom) * eased;
    self.pan = anim.from_pan * (1. - eased);
    if t >= 1. {
      self.zoom = 1.;
      self.pan = Vec2::ZERO;
      self.reset_anim = None;
      false
    } else {
      true
    }
  }

  /// The aspect-preserving fit of the logical viewport into `rect`, without
  /// the camera applied.
  #[must_use]
  pub fn base_fit(rect: Rect, logical: Vec2) -> ViewTransform {
    let scale = (rect.width() / logical.x).min(rect.height() / logical.y);
    ViewTransform {
      scale,
      offset: rect.center().to_vec2() - logical * (scale * 0.5),
    }
  }

  /// The full logical-to-screen transform: viewport fit composed with the
  /// camera pan and zoom.
  #[must_use]
  pub fn view_transform(&self, rect: Rect, logical: Vec2) -> ViewTransform {
    let base = Self::base_fit(rect, logical);
    ViewTransform {
      scale: base.scale * self.zoom,
      offset: base.offset + self.pan * base.scale,
    }
  }
}

fn ease_cubic(t: f64) -> f64 {
  if t < 0.5 {
    4. * t * t * t
  } else {
    1. - (-2. * t + 2.).powi(3) / 2.
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use assert_approx_eq::assert_approx_eq;

  const CENTER: Vec2 = Vec2::new(150., 75.);

  #[test]
  fn repeated_zoom_in_saturates_at_the_maximum() {
    let mut camera = Camera::default();
    for _ in 0..10 {
      camera.zoom_in(CENTER);
    }
    assert_approx_eq!(camera.zoom(), MAX_ZOOM);
  }

  #[test]
  fn repeated_zoom_out_saturates_at_the_minimum() {
    let mut camera = Camera::default();
    camera.zoom_in(CENTER);
    for _ in 0..10 {
      camera.zoom_out(CENTER);
    }
    assert_approx_eq!(camera.zoom(), MIN_ZOOM);
  }

  #[test]
  fn zoom_keeps_the_anchor_point_fixed() {
    let mut camera = Camera::default();
    camera.translate(Vec2::new(12., -5.));
    let anchor = Vec2::new(40., 90.);
    let before = (anchor - camera.pan()) / camera.zoom();
    camera.zoom_by(2., anchor);
    let after = (anchor - camera.pan()) / camera.zoom();
    assert_approx_eq!(before.x, after.x, 1e-4);
    assert_approx_eq!(before.y, after.y, 1e-4);
  }

  #[test]
  fn reset_restores_the_identity_transform() {
    let mut camera = Camera::default();
    camera.zoom_in(CENTER);
    camera.zoom_in(CENTER);
    camera.translate(Vec2::new(-30., 10.));

    camera.reset(1.);
    assert!(camera.tick(1.1));
    assert!(!camera.tick(1.3));
    assert_approx_eq!(camera.zoom(), 1.);
    assert_approx_eq!(camera.pan().x, 0.);
    assert_approx_eq!(camera.pan().y, 0.);
  }

  #[test]
  fn gestures_interrupt_a_running_reset() {
    let mut camera = Camera::default();
    camera.zoom_in(CENTER);
    camera.reset(0.);
    camera.tick(0.1);
    camera.translate(Vec2::new(1., 1.));
    assert!(!camera.tick(0.15));
  }

  #[test]
  fn view_transform_composes_fit_and_camera() {
    let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(600., 300.));
    let logical = Vec2::new(300., 150.);

    let camera = Camera::default();
    let view = camera.view_transform(rect, logical);
    assert_approx_eq!(view.scale, 2.);
    let center = view.apply(Pos2::new(150., 75.));
    assert_approx_eq!(center.x, 300.);
    assert_approx_eq!(center.y, 150.);

    let mut zoomed = Camera::default();
    zoomed.zoom_in(Vec2::new(150., 75.));
    let view = zoomed.view_transform(rect, logical);
    // The anchor stays put while everything else scales around it.
    let center = view.apply(Pos2::new(150., 75.));
    assert_approx_eq!(center.x, 300.);
    assert_approx_eq!(center.y, 150.);
    assert_approx_eq!(view.scale, 4.);
  }

  #[test]
  fn unapply_inverts_apply() {
    let view = ViewTransform {
      scale: 3.,
      offset: Vec2::new(17., -4.),
    };
    let p = Pos2::new(123., 45.);
    let roundtrip = view.unapply(view.apply(p));
    assert_approx_eq!(roundtrip.x, p.x, 1e-4);
    assert_approx_eq!(roundtrip.y, p.y, 1e-4);
  }
}
