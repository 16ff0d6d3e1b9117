mod parse;
mod shape;

pub use parse::{GeometryFormat, parse_geojson, parse_geometry, parse_wkt};
pub use shape::{create_rect, create_rectangle};
