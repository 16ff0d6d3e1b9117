//! # worldmesh-rs
//!
//! World grid square codes (an extension of the JIS X0410 regional mesh to the
//! whole globe). A latitude/longitude pair maps to a nested square at one of six
//! precision levels, from 80 km down to 125 m, identified by a decimal integer.
//!
//! ### 1. Codec functions
//!
//! ```
//! use worldmesh_rs::{MeshLevel, decode_nw, encode};
//!
//! # fn main() -> Result<(), worldmesh_rs::MeshError> {
//! let code = encode(34.9773063, 135.7402153, MeshLevel::Km1)?;
//! assert_eq!(code, 2052353579);
//!
//! let nw = decode_nw(code)?;
//! assert_eq!(nw.longitude, 135.7375);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `MeshCell` - Single Square Operations
//!
//! ```
//! use worldmesh_rs::{MeshCell, MeshLevel};
//!
//! # fn main() -> Result<(), worldmesh_rs::MeshError> {
//! let cell = MeshCell::from_wgs84(&(135.7402153, 34.9773063), MeshLevel::M250)?;
//! println!("{}", cell.code);
//! let polygon = cell.to_polygon();
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `MeshGrid` - Collections of Squares
//!
//! ```
//! use worldmesh_rs::{MeshGrid, MeshLevel};
//! use geo_types::point;
//!
//! # fn main() -> Result<(), worldmesh_rs::MeshError> {
//! let grid = MeshGrid::builder()
//!     .level(MeshLevel::Km1)
//!     .extent(135.73, 34.97, 135.76, 34.99)
//!     .build()?;
//!
//! let pt = point! { x: 135.7402153, y: 34.9773063 };
//! if let Some(cell) = grid.get_cell_at(&pt) {
//!     println!("{}", cell.code);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. `CsvToMesh` - CSV File Conversion
//!
//! ```no_run
//! use worldmesh_rs::{CsvMeshConfig, CsvToMesh, GeometryFormat, MeshLevel};
//!
//! let config = CsvMeshConfig::new("geometry", MeshLevel::Km1)
//!     .exclude(vec!["notes".into()])
//!     .with_mesh_geometry(GeometryFormat::Wkt);
//!
//! "input.csv".to_mesh_csv("output.csv", &config).unwrap();
//! ```
//!

pub mod cell;
pub mod coord;
pub mod error;
pub mod geom;
pub mod grid;
pub mod index;
pub mod io;

pub use cell::MeshCell;
pub use coord::{Coordinate, LatLong, validate_lat_long};
pub use error::MeshError;
pub use geom::{create_rect, create_rectangle, parse_geometry};
pub use grid::{MeshGrid, MeshGridBuilder};
pub use index::{
    AreaOctant, CODE_WIDTHS, MAX_GRID_CELLS, MAX_LEVEL, MeshBounds, MeshLevel,
    NOMINAL_CELL_SIZES, UCODE_AUTHORITY, decode, decode_center, decode_ne, decode_nw, decode_se,
    decode_sw, decode_to_latlong, encode, encode_10km, encode_125m, encode_1km, encode_250m,
    encode_500m, encode_80km, encode_batch, encode_coord, encode_default, encode_level,
    latlong_to_ucode, level_of, truncate_coordinate, ucode_to_code, ucode_to_latlong,
};
pub use io::{
    CoordinateSource, CsvMeshConfig, CsvToMesh, GeometryFormat, MeshCellsToArrow,
    LEVELS_METADATA_KEY, MeshCellsToGeoParquet, csv_to_mesh_csv, write_geoparquet,
};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;
