use crate::map::features::StreetFeature;

/// Standard parallels of the conic, in degrees.
const PARALLEL_LOWER: f64 = 29.5;
const PARALLEL_UPPER: f64 = 45.5;

/// Scale used before (or without) a fit to the street extent.
const UNFITTED_SCALE: f64 = 155.424;

/// A spherical Albers equal-area conic projection anchored at a fixed
/// geographic center, with a scale and translation that map geographic
/// coordinates into the logical map viewport.
///
/// Created once, fitted at most once against the street extent, and then
/// shared read-only by every layer that places geometry. Tree coordinates are
/// not fitted independently; trees outside the street extent may land outside
/// the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
  n: f64,
  c: f64,
  rho0: f64,
  /// Center longitude in radians.
  lon0: f64,
  scale: f64,
  translate: (f64, f64),
}

impl Projection {
  /// An unfitted projection centered on `center` (lon, lat), placing the
  /// center in the middle of a `viewport`-sized surface.
  #[must_use]
  pub fn new(center: (f64, f64), viewport: (f32, f32)) -> Self {
    let phi1 = PARALLEL_LOWER.to_radians();
    let phi2 = PARALLEL_UPPER.to_radians();
    let n = (phi1.sin() + phi2.sin()) / 2.;
    let c = phi1.cos().powi(2) + 2. * n * phi1.sin();
    let phi0 = center.1.to_radians();
    Self {
      n,
      c,
      rho0: (c - 2. * n * phi0.sin()).sqrt() / n,
      lon0: center.0.to_radians(),
      scale: UNFITTED_SCALE,
      translate: (f64::from(viewport.0) / 2., f64::from(viewport.1) / 2.),
    }
  }

  /// Unscaled projection of (lon, lat), y growing downwards. The center maps
  /// to (0, 0).
  fn raw(&self, lon: f64, lat: f64) -> (f64, f64) {
    let theta = self.n * (lon.to_radians() - self.lon0);
    let rho = (self.c - 2. * self.n * lat.to_radians().sin()).sqrt() / self.n;
    (rho * theta.sin(), rho * theta.cos() - self.rho0)
  }

  /// Derives scale and translation so the full street extent fits exactly
  /// into `width` x `height`, aspect ratio preserved and centered. Streets
  /// without any geometry leave the projection unfitted.
  pub fn fit_size(&mut self, width: f64, height: f64, streets: &[StreetFeature]) {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for (lon, lat) in streets
      .iter()
      .flat_map(|s| s.paths.iter())
      .flat_map(|p| p.iter().copied())
    {
      let (x, y) = self.raw(lon, lat);
      bounds = Some(bounds.map_or((x, y, x, y), |(x0, y0, x1, y1)| {
        (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
      }));
    }
    let Some((x0, y0, x1, y1)) = bounds else {
      return;
    };

    let k = (width / (x1 - x0)).min(height / (y1 - y0));
    if !k.is_finite() {
      return;
    }
    self.scale = k;
    self.translate = (
      (width - k * (x0 + x1)) / 2.,
      (height - k * (y0 + y1)) / 2.,
    );
  }

  /// Projects (lon, lat) to logical viewport coordinates.
  #[must_use]
  #[allow(clippy::cast_possible_truncation)]
  pub fn project(&self, lon: f64, lat: f64) -> (f32, f32) {
    let (x, y) = self.raw(lon, lat);
    (
      (self.translate.0 + self.scale * x) as f32,
      (self.translate.1 + self.scale * y) as f32,
    )
  }
}
