mod geojson;

pub use geojson::{ParseError, parse_streets, parse_trees};
