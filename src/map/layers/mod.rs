mod street;
mod tree;

pub use street::StreetLayer;
pub use tree::{TreeLayer, TreeScales, TreeState, Visual};
