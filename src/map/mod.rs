/// Pan/zoom state and the viewport transform.
pub mod camera;
/// The loaded street and tree records.
pub mod features;
/// Street and tree drawing.
pub mod layers;
/// The legend panel.
pub mod legend;
/// Geographic to viewport coordinates.
pub mod projection;
/// Visual encoding scales.
pub mod scales;
/// The floating tree tooltip.
pub mod tooltip;
