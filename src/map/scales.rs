use egui::Color32;

/// Trunk-size breakpoints in centimeters, shared by the map and legend radius scales.
pub const TRUNK_DOMAIN: [f64; 4] = [0., 200., 400., 600.];
/// Circle radii on the map for the trunk-size breakpoints.
pub const MAP_RADIUS_RANGE: [f64; 4] = [1., 2., 4., 6.];
/// Circle radii in the legend. Larger than the map range so the legend symbols
/// stay legible; intentionally a separate scale.
pub const LEGEND_RADIUS_RANGE: [f64; 4] = [1., 10., 18., 25.];

/// Tree-height breakpoints in meters for the fill ramp.
pub const HEIGHT_RAMP_DOMAIN: [f64; 5] = [0., 2., 4., 6., 8.];
/// Sequential green ramp for tree height.
pub const HEIGHT_RAMP_COLORS: [Color32; 5] = [
  Color32::from_rgb(0xed, 0xf8, 0xfb),
  Color32::from_rgb(0xb2, 0xe2, 0xe2),
  Color32::from_rgb(0x66, 0xc2, 0xa4),
  Color32::from_rgb(0x2c, 0xa2, 0x5f),
  Color32::from_rgb(0x00, 0x6d, 0x2c),
];

pub const YEAR_COLOR_NEWEST: Color32 = Color32::from_rgb(0x98, 0x4e, 0xa3);
pub const YEAR_COLOR_RECENT: Color32 = Color32::from_rgb(0x4d, 0xaf, 0x4a);
pub const YEAR_COLOR_MID: Color32 = Color32::from_rgb(0x37, 0x7e, 0xb8);
pub const YEAR_COLOR_OTHER: Color32 = Color32::from_rgb(0xe4, 0x1a, 0x1c);

/// A piecewise square-root scale over monotone breakpoints: the input is
/// sqrt-transformed, located in a domain segment and interpolated linearly into
/// the matching range segment. Inputs beyond the outer breakpoints extrapolate
/// on the outer segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SqrtScale {
  /// sqrt of the domain breakpoints.
  pos: Vec<f64>,
  range: Vec<f64>,
}

impl SqrtScale {
  /// Panics if domain and range lengths differ or fewer than two breakpoints
  /// are given.
  #[must_use]
  pub fn new(domain: &[f64], range: &[f64]) -> Self {
    assert!(domain.len() == range.len() && domain.len() >= 2);
    Self {
      pos: domain.iter().map(|d| d.max(0.).sqrt()).collect(),
      range: range.to_vec(),
    }
  }

  /// The trunk-size to radius scale used on the map.
  #[must_use]
  pub fn map_radius() -> Self {
    Self::new(&TRUNK_DOMAIN, &MAP_RADIUS_RANGE)
  }

  /// The trunk-size to radius scale used in the legend.
  #[must_use]
  pub fn legend_radius() -> Self {
    Self::new(&TRUNK_DOMAIN, &LEGEND_RADIUS_RANGE)
  }

  #[must_use]
  pub fn value(&self, x: f64) -> f64 {
    let u = x.max(0.).sqrt();
    let i = segment_index(&self.pos, u);
    let t = (u - self.pos[i]) / (self.pos[i + 1] - self.pos[i]);
    self.range[i] + t * (self.range[i + 1] - self.range[i])
  }
}

/// A sqrt-eased color ramp: like [`SqrtScale`] but interpolating colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
  pos: Vec<f64>,
  colors: Vec<Color32>,
}

impl ColorRamp {
  #[must_use]
  pub fn new(domain: &[f64], colors: &[Color32]) -> Self {
    assert!(domain.len() == colors.len() && domain.len() >= 2);
    Self {
      pos: domain.iter().map(|d| d.max(0.).sqrt()).collect(),
      colors: colors.to_vec(),
    }
  }

  /// The tree-height fill ramp.
  #[must_use]
  pub fn height() -> Self {
    Self::new(&HEIGHT_RAMP_DOMAIN, &HEIGHT_RAMP_COLORS)
  }

  #[must_use]
  #[allow(clippy::cast_possible_truncation)]
  pub fn color(&self, x: f64) -> Color32 {
    let u = x.max(0.).sqrt();
    let i = segment_index(&self.pos, u);
    let t = ((u - self.pos[i]) / (self.pos[i + 1] - self.pos[i])).clamp(0., 1.);
    lerp_color(self.colors[i], self.colors[i + 1], t as f32)
  }
}

/// Index of the segment `u` falls into, clamped to the outer segments.
fn segment_index(pos: &[f64], u: f64) -> usize {
  let mut i = pos.len() - 2;
  for j in 0..pos.len() - 1 {
    if u < pos[j + 1] {
      i = j;
      break;
    }
  }
  i
}

/// Per-channel interpolation between two colors.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
  let t = t.clamp(0., 1.);
  let ch = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
  let (a, b) = (a.to_array(), b.to_array());
  Color32::from_rgba_premultiplied(
    ch(a[0], b[0]),
    ch(a[1], b[1]),
    ch(a[2], b[2]),
    ch(a[3], b[3]),
  )
}

/// Planting-year bucket boundaries, all bounds inclusive. Checked newest
/// first; years outside every bucket fall back to [`YEAR_COLOR_OTHER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBuckets {
  pub newest: (i32, i32),
  pub recent: (i32, i32),
  pub mid: (i32, i32),
}

/// Boundaries used when a tree is first drawn.
pub const DRAW_YEAR_BUCKETS: YearBuckets = YearBuckets {
  newest: (2001, 2021),
  recent: (1981, 2000),
  mid: (1961, 1980),
};

/// Boundaries used when a tree returns to its idle state after a hover. These
/// differ from [`DRAW_YEAR_BUCKETS`] by one year at each boundary; both sets
/// are kept as observed in the source material.
pub const HOVER_RESET_YEAR_BUCKETS: YearBuckets = YearBuckets {
  newest: (2000, 2021),
  recent: (1980, 1999),
  mid: (1960, 1979),
};

impl YearBuckets {
  #[must_use]
  pub fn color(&self, year: i32) -> Color32 {
    if self.newest.0 <= year && year <= self.newest.1 {
      YEAR_COLOR_NEWEST
    } else if self.recent.0 <= year && year <= self.recent.1 {
      YEAR_COLOR_RECENT
    } else if self.mid.0 <= year && year <= self.mid.1 {
      YEAR_COLOR_MID
    } else {
      YEAR_COLOR_OTHER
    }
  }
}
