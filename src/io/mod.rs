pub mod arrow;
pub mod csv;
pub mod parquet;

pub use arrow::MeshCellsToArrow;
pub use csv::{CoordinateSource, CsvMeshConfig, CsvToMesh, GeometryFormat, csv_to_mesh_csv};
pub use parquet::{LEVELS_METADATA_KEY, MeshCellsToGeoParquet, write_geoparquet};
