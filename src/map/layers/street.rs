use egui::{Color32, Painter, Pos2, Shape, epaint::PathStroke};

use crate::map::{camera::ViewTransform, features::StreetFeature, projection::Projection};

/// Stroke width in logical viewport units.
const STREET_WIDTH: f32 = 0.2;

fn street_color() -> Color32 {
  // Slate gray at half opacity.
  Color32::from_rgba_unmultiplied(112, 128, 144, 128)
}

/// Draws the street network as thin polylines. No interactivity; positions
/// are projected once at construction.
pub struct StreetLayer {
  paths: Vec<Vec<Pos2>>,
}

impl StreetLayer {
  #[must_use]
  pub fn new(streets: &[StreetFeature], projection: &Projection) -> Self {
    let paths = streets
      .iter()
      .flat_map(|street| street.paths.iter())
      .map(|path| {
        path
          .iter()
          .map(|&(lon, lat)| {
            let (x, y) = projection.project(lon, lat);
            Pos2::new(x, y)
          })
          .collect::<Vec<_>>()
      })
      .filter(|path: &Vec<Pos2>| path.len() >= 2)
      .collect();
    Self { paths }
  }

  #[must_use]
  pub fn path_count(&self) -> usize {
    self.paths.len()
  }

  pub fn draw(&self, painter: &Painter, view: &ViewTransform) {
    let stroke = PathStroke::new(STREET_WIDTH * view.scale, street_color());
    for path in &self.paths {
      let points = path.iter().map(|&p| view.apply(p)).collect();
      painter.add(Shape::line(points, stroke.clone()));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn degenerate_paths_are_dropped() {
    let projection = Projection::new((16.373, 48.208), (300., 150.));
    let streets = vec![
      StreetFeature {
        paths: vec![vec![(16.37, 48.2), (16.38, 48.21)]],
      },
      StreetFeature {
        paths: vec![vec![(16.37, 48.2)]],
      },
    ];
    let layer = StreetLayer::new(&streets, &projection);
    assert_eq!(layer.path_count(), 1);
  }
}
