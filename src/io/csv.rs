use crate::cell::MeshCell;
use crate::error::MeshError;
use crate::geom::parse_geometry;
use crate::index::MeshLevel;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

pub use crate::geom::GeometryFormat;

enum SourceIndices {
    Geometry(usize),
    Coordinates { lon_idx: usize, lat_idx: usize },
}

/// Specifies how to extract location data from CSV rows.
#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate longitude and latitude columns in WGS84 degrees
    CoordinateColumns {
        lon_column: String,
        lat_column: String,
    },
}

/// Configuration for CSV to grid square conversion.
#[derive(Debug, Clone)]
pub struct CsvMeshConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub level: MeshLevel,
    pub code_column: String,
    pub include_mesh_geometry: Option<GeometryFormat>,
}

impl CsvMeshConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use worldmesh_rs::{CsvMeshConfig, MeshLevel};
    ///
    /// let config = CsvMeshConfig::new("geometry", MeshLevel::Km1);
    /// ```
    pub fn new(geometry_column: impl Into<String>, level: MeshLevel) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            level,
            code_column: "mesh_code".to_string(),
            include_mesh_geometry: None,
        }
    }

    /// Create config for a CSV with separate longitude/latitude columns.
    ///
    /// # Example
    /// ```
    /// use worldmesh_rs::{CsvMeshConfig, GeometryFormat, MeshLevel};
    ///
    /// let config = CsvMeshConfig::from_coords("lon", "lat", MeshLevel::M250)
    ///     .with_mesh_geometry(GeometryFormat::Wkt);
    /// ```
    pub fn from_coords(
        lon_column: impl Into<String>,
        lat_column: impl Into<String>,
        level: MeshLevel,
    ) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                lon_column: lon_column.into(),
                lat_column: lat_column.into(),
            },
            exclude_columns: Vec::new(),
            level,
            code_column: "mesh_code".to_string(),
            include_mesh_geometry: None,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    /// Rename the leading code column (defaults to `mesh_code`).
    pub fn code_column(mut self, name: impl Into<String>) -> Self {
        self.code_column = name.into();
        self
    }

    /// Include the grid square polygon in output.
    pub fn with_mesh_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_mesh_geometry = Some(format);
        self
    }
}

pub trait CsvToMesh {
    fn to_mesh_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvMeshConfig,
    ) -> Result<(), MeshError>;
}

impl<P: AsRef<Path>> CsvToMesh for P {
    fn to_mesh_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvMeshConfig,
    ) -> Result<(), MeshError> {
        csv_to_mesh_csv(self, output_path, config)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, MeshError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| MeshError::CsvError(format!("Column '{}' not found", name)))
}

fn parse_degrees(record: &csv::StringRecord, idx: usize) -> Result<f64, MeshError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| MeshError::CsvError(format!("Missing column at index {}", idx)))?
        .trim();
    raw.parse()
        .map_err(|_| MeshError::CsvError(format!("Invalid coordinate: '{}'", raw)))
}

/// Converts a CSV file with geometry or coordinate columns to a CSV file with grid codes.
///
/// Rows are streamed. A row whose geometry yields several cells (lines,
/// multipoints) is written once per cell; a row yielding none is skipped.
///
/// # Example with coordinate columns
///
/// ```no_run
/// use worldmesh_rs::{csv_to_mesh_csv, CsvMeshConfig, MeshLevel};
///
/// let config = CsvMeshConfig::from_coords("longitude", "latitude", MeshLevel::Km1)
///     .exclude(vec!["notes".into()]);
///
/// csv_to_mesh_csv("stations.csv", "output.csv", &config).unwrap();
/// ```
pub fn csv_to_mesh_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvMeshConfig,
) -> Result<(), MeshError> {
    let file = File::open(csv_path).map_err(|e| MeshError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| MeshError::CsvError(e.to_string()))?
        .clone();

    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = column_index(&headers, col)?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns {
            lon_column,
            lat_column,
        } => {
            let lon_idx = column_index(&headers, lon_column)?;
            let lat_idx = column_index(&headers, lat_column)?;
            (
                SourceIndices::Coordinates { lon_idx, lat_idx },
                HashSet::from([lon_idx, lat_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        match headers.iter().position(|h| h == col_name) {
            Some(idx) => {
                exclude_indices.insert(idx);
            }
            None => warn!(column = %col_name, "excluded column not present in input"),
        }
    }
    debug!(
        columns = headers.len(),
        excluded = exclude_indices.len(),
        level = %config.level,
        "resolved csv headers"
    );

    let out_file = File::create(output_path).map_err(|e| MeshError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec![config.code_column.as_str()];
    if config.include_mesh_geometry.is_some() {
        header_row.push("mesh_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| MeshError::CsvError(e.to_string()))?;

    let mut rows_in = 0usize;
    let mut rows_out = 0usize;
    for result in reader.records() {
        let record = result.map_err(|e| MeshError::CsvError(e.to_string()))?;
        rows_in += 1;

        let cells = match &source_indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    MeshError::CsvError(format!("Missing geometry column at index {}", idx))
                })?;
                let geom = parse_geometry(geom_str)?;
                MeshCell::from_geometry(geom, config.level)?
            }
            SourceIndices::Coordinates { lon_idx, lat_idx } => {
                let lon = parse_degrees(&record, *lon_idx)?;
                let lat = parse_degrees(&record, *lat_idx)?;
                vec![MeshCell::from_lat_long(lat, lon, config.level)?]
            }
        };

        if cells.is_empty() {
            debug!(row = rows_in, "geometry produced no cells, skipping");
        }

        for cell in cells {
            let mut row: Vec<String> = vec![cell.code.to_string()];

            if let Some(format) = config.include_mesh_geometry {
                row.push(format.write_polygon(&cell.to_polygon()));
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| MeshError::CsvError(e.to_string()))?;
            rows_out += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| MeshError::CsvError(e.to_string()))?;

    debug!(rows_in, rows_out, "csv conversion finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_input(dir: &Path, name: &str, contents: &str) -> Result<std::path::PathBuf, MeshError> {
        let path = dir.join(name);
        let mut file = File::create(&path).map_err(|e| MeshError::IoError(e.to_string()))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| MeshError::IoError(e.to_string()))?;
        Ok(path)
    }

    fn read_output(path: &Path) -> Result<Vec<Vec<String>>, MeshError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| MeshError::CsvError(e.to_string()))?;
        let mut rows = vec![
            reader
                .headers()
                .map_err(|e| MeshError::CsvError(e.to_string()))?
                .iter()
                .map(String::from)
                .collect(),
        ];
        for record in reader.records() {
            let record = record.map_err(|e| MeshError::CsvError(e.to_string()))?;
            rows.push(record.iter().map(String::from).collect());
        }
        Ok(rows)
    }

    #[test]
    fn test_csv_with_coordinate_columns() -> Result<(), MeshError> {
        let dir = tempdir().map_err(|e| MeshError::IoError(e.to_string()))?;
        let input = write_input(
            dir.path(),
            "points.csv",
            "name,lon,lat,notes\nKyoto,135.7402153,34.9773063,temple\nBuenos Aires,-58.38,-34.6,port\n",
        )?;
        let output = dir.path().join("out.csv");

        let config = CsvMeshConfig::from_coords("lon", "lat", MeshLevel::Km1)
            .exclude(vec!["notes".into()]);
        csv_to_mesh_csv(&input, &output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(rows[0], vec!["mesh_code", "name"]);
        assert_eq!(rows[1], vec!["2052353579", "Kyoto"]);
        assert_eq!(rows.len(), 3);
        assert!(rows[2][0].starts_with('7'));
        Ok(())
    }

    #[test]
    fn test_csv_with_wkt_geometry_and_output_polygon() -> Result<(), MeshError> {
        let dir = tempdir().map_err(|e| MeshError::IoError(e.to_string()))?;
        let input = write_input(
            dir.path(),
            "geoms.csv",
            "id,geom\n1,POINT(135.7402153 34.9773063)\n",
        )?;
        let output = dir.path().join("out.csv");

        let config = CsvMeshConfig::new("geom", MeshLevel::Km80)
            .with_mesh_geometry(GeometryFormat::Wkt)
            .code_column("code");
        input.to_mesh_csv(&output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(rows[0], vec!["code", "mesh_geometry", "id"]);
        assert_eq!(rows[1][0], "205235");
        assert!(rows[1][1].starts_with("POLYGON"));
        assert_eq!(rows[1][2], "1");
        Ok(())
    }

    #[test]
    fn test_csv_with_geojson_line_expands_rows() -> Result<(), MeshError> {
        let dir = tempdir().map_err(|e| MeshError::IoError(e.to_string()))?;
        let input = write_input(
            dir.path(),
            "lines.csv",
            "id,geom\n7,\"{\"\"type\"\":\"\"LineString\"\",\"\"coordinates\"\":[[135.5,34.9],[136.5,34.9]]}\"\n",
        )?;
        let output = dir.path().join("out.csv");

        let config = CsvMeshConfig::new("geom", MeshLevel::Km80)
            .with_mesh_geometry(GeometryFormat::GeoJson);
        csv_to_mesh_csv(&input, &output, &config)?;

        let rows = read_output(&output)?;
        // 135.5 and 136.5 fall in neighbouring 80 km squares
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "205235");
        assert_eq!(rows[2][0], "205236");
        assert!(rows[1][1].contains("Polygon"));
        assert_eq!(rows[2][2], "7");
        Ok(())
    }

    #[test]
    fn test_csv_missing_column() -> Result<(), MeshError> {
        let dir = tempdir().map_err(|e| MeshError::IoError(e.to_string()))?;
        let input = write_input(dir.path(), "bad.csv", "x,y\n1,2\n")?;
        let output = dir.path().join("out.csv");

        let config = CsvMeshConfig::from_coords("lon", "lat", MeshLevel::Km1);
        let result = csv_to_mesh_csv(&input, &output, &config);
        assert!(matches!(result, Err(MeshError::CsvError(_))));
        Ok(())
    }

    #[test]
    fn test_csv_out_of_range_coordinate() -> Result<(), MeshError> {
        let dir = tempdir().map_err(|e| MeshError::IoError(e.to_string()))?;
        let input = write_input(dir.path(), "range.csv", "lon,lat\n10.0,95.0\n")?;
        let output = dir.path().join("out.csv");

        let config = CsvMeshConfig::from_coords("lon", "lat", MeshLevel::Km1);
        let result = csv_to_mesh_csv(&input, &output, &config);
        assert!(matches!(
            result,
            Err(MeshError::CoordinateOutOfRange { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_csv_geometry_off_the_globe() -> Result<(), MeshError> {
        let dir = tempdir().map_err(|e| MeshError::IoError(e.to_string()))?;
        let input = write_input(dir.path(), "swapped.csv", "id,geom\n1,POINT(34.97 135.74)\n")?;
        let output = dir.path().join("out.csv");

        let config = CsvMeshConfig::new("geom", MeshLevel::Km1);
        assert!(matches!(
            csv_to_mesh_csv(&input, &output, &config),
            Err(MeshError::CoordinateOutOfRange { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_csv_invalid_number() -> Result<(), MeshError> {
        let dir = tempdir().map_err(|e| MeshError::IoError(e.to_string()))?;
        let input = write_input(dir.path(), "nan.csv", "lon,lat\nabc,35.0\n")?;
        let output = dir.path().join("out.csv");

        let config = CsvMeshConfig::from_coords("lon", "lat", MeshLevel::Km1);
        assert!(csv_to_mesh_csv(&input, &output, &config).is_err());
        Ok(())
    }
}
