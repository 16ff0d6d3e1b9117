use crate::coord::{Coordinate, LatLong};
use crate::error::MeshError;
use crate::geom::{create_rect, create_rectangle};
use crate::index::{MeshBounds, MeshLevel, decode_with_level, encode_coord};
use crate::io::arrow::MeshCellsToArrow;
use crate::io::parquet::MeshCellsToGeoParquet;
use arrow_array::RecordBatch;
use geo::Centroid;
use geo_types::{Geometry, LineString, Point, Polygon, Rect};
use geoarrow_array::array::{PointArray, PolygonArray};
use std::collections::HashSet;
use std::path::Path;

/// A single grid square of the world grid square system.
///
/// Each `MeshCell` carries its grid code, its precision level and the decoded
/// corners of the square in WGS84 latitude/longitude.
///
/// # Example
///
/// ```
/// use worldmesh_rs::{MeshCell, MeshLevel};
///
/// # fn main() -> Result<(), worldmesh_rs::MeshError> {
/// // Tuples are (longitude, latitude)
/// let cell = MeshCell::from_wgs84(&(135.7402153, 34.9773063), MeshLevel::Km1)?;
/// assert_eq!(cell.code, 2052353579);
///
/// let polygon = cell.to_polygon();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCell {
    /// World grid square code
    pub code: u64,
    /// Precision level, implied by the code's digit width
    pub level: MeshLevel,
    /// Corners and center of the square
    pub bounds: MeshBounds,
}

impl MeshCell {
    /// Create a MeshCell from a grid code.
    ///
    /// # Example
    /// ```
    /// use worldmesh_rs::{MeshCell, MeshLevel};
    ///
    /// # fn main() -> Result<(), worldmesh_rs::MeshError> {
    /// let cell = MeshCell::from_code(20523535)?;
    /// assert_eq!(cell.level, MeshLevel::Km10);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_code(code: u64) -> Result<Self, MeshError> {
        let (level, bounds) = decode_with_level(code)?;
        Ok(Self {
            code,
            level,
            bounds,
        })
    }

    /// Create a MeshCell from WGS84 coordinates (x = longitude, y = latitude).
    ///
    /// # Example
    /// ```
    /// use worldmesh_rs::{MeshCell, MeshLevel};
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), worldmesh_rs::MeshError> {
    /// // From tuple
    /// let cell = MeshCell::from_wgs84(&(139.7671, 35.6812), MeshLevel::M500)?;
    /// // From Point
    /// let same = MeshCell::from_wgs84(&Point::new(139.7671, 35.6812), MeshLevel::M500)?;
    /// assert_eq!(cell.code, same.code);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_wgs84(coord: &impl Coordinate, level: MeshLevel) -> Result<Self, MeshError> {
        Self::from_code(encode_coord(coord, level)?)
    }

    /// Create a MeshCell from latitude and longitude in that order.
    pub fn from_lat_long(latitude: f64, longitude: f64, level: MeshLevel) -> Result<Self, MeshError> {
        Self::from_wgs84(&LatLong::new(latitude, longitude)?, level)
    }

    /// Create MeshCells along a LineString in WGS84 coordinates.
    ///
    /// Samples points along the line at half the cell size and returns every
    /// distinct cell touched, in order of first visit.
    pub fn from_line_string(line: &LineString, level: MeshLevel) -> Result<Vec<Self>, MeshError> {
        let step_size = level.lat_span().min(level.lon_span()) * 0.5;

        let mut seen: HashSet<u64> = HashSet::new();
        let mut cells: Vec<MeshCell> = Vec::new();

        for window in line.0.windows(2) {
            let start = &window[0];
            let end = &window[1];

            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let segment_length = (dx * dx + dy * dy).sqrt();
            let steps = (segment_length / step_size).ceil() as usize;

            for i in 0..=steps {
                let t = if steps == 0 {
                    0.0
                } else {
                    i as f64 / steps as f64
                };
                let code = encode_coord(&(start.x + t * dx, start.y + t * dy), level)?;

                if seen.insert(code) {
                    cells.push(Self::from_code(code)?);
                }
            }
        }

        if cells.is_empty() {
            if let Some(only) = line.0.first() {
                cells.push(Self::from_wgs84(&(only.x, only.y), level)?);
            }
        }

        Ok(cells)
    }

    /// Create MeshCells from an arbitrary `geo_types::Geometry` in WGS84.
    ///
    /// Points and polygon centroids produce a single cell; lines and
    /// collections may produce many.
    pub fn from_geometry(geom: Geometry<f64>, level: MeshLevel) -> Result<Vec<Self>, MeshError> {
        match geom {
            Geometry::Point(pt) => Ok(vec![Self::from_wgs84(&pt, level)?]),
            Geometry::LineString(line) => Self::from_line_string(&line, level),
            Geometry::MultiLineString(mls) => {
                let mut all_cells = Vec::new();
                for line in mls.0 {
                    all_cells.extend(Self::from_line_string(&line, level)?);
                }
                Ok(all_cells)
            }
            Geometry::Polygon(poly) => match poly.centroid() {
                Some(centroid) => Ok(vec![Self::from_wgs84(&centroid, level)?]),
                None => Ok(vec![]),
            },
            Geometry::MultiPolygon(mp) => {
                let mut cells = Vec::new();
                for poly in mp.0 {
                    if let Some(centroid) = poly.centroid() {
                        cells.push(Self::from_wgs84(&centroid, level)?);
                    }
                }
                Ok(cells)
            }
            Geometry::MultiPoint(mp) => mp
                .0
                .iter()
                .map(|pt| Self::from_wgs84(pt, level))
                .collect(),
            Geometry::GeometryCollection(gc) => {
                let mut all_cells = Vec::new();
                for g in gc.0 {
                    all_cells.extend(Self::from_geometry(g, level)?);
                }
                Ok(all_cells)
            }
            _ => Err(MeshError::GeometryParseError(
                "Unsupported geometry type".to_string(),
            )),
        }
    }

    /// Returns the geometric center of the square.
    pub fn center(&self) -> LatLong {
        self.bounds.center
    }

    /// Returns the north-west corner, the conventional representative point.
    pub fn nw(&self) -> LatLong {
        self.bounds.nw
    }

    pub fn center_point(&self) -> Point<f64> {
        self.bounds.center.to_point()
    }

    /// Whether a WGS84 coordinate falls in this square.
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        encode_coord(coord, self.level).is_ok_and(|code| code == self.code)
    }

    /// The enclosing square one level coarser, `None` at 80 km.
    pub fn parent(&self) -> Option<Self> {
        let coarser = self.level.coarser()?;
        let gap = self.level.digit_width() - coarser.digit_width();
        Self::from_code(self.code / 10u64.pow(gap)).ok()
    }

    /// All squares one level finer inside this one, empty at 125 m.
    ///
    /// 80 km squares hold 8x8 children, 10 km squares 10x10 and the half
    /// levels four quadrants each. Children that would fall beyond the poles
    /// or the antimeridian are left out.
    pub fn children(&self) -> Vec<Self> {
        let Some(finer) = self.level.finer() else {
            return Vec::new();
        };
        let suffixes: Vec<u64> = match finer {
            MeshLevel::Km10 => (0..8).flat_map(|q| (0..8).map(move |v| q * 10 + v)).collect(),
            MeshLevel::Km1 => (0..100).collect(),
            _ => (1..=4).collect(),
        };
        let scale = 10u64.pow(finer.digit_width() - self.level.digit_width());

        suffixes
            .into_iter()
            .filter_map(|suffix| Self::from_code(self.code * scale + suffix).ok())
            .collect()
    }

    /// Converts this cell to a closed rectangular polygon (lon/lat axis order).
    pub fn to_polygon(&self) -> Polygon<f64> {
        create_rectangle(
            self.bounds.lat_min(),
            self.bounds.lat_max(),
            self.bounds.lon_min(),
            self.bounds.lon_max(),
        )
    }

    pub fn to_rect(&self) -> Rect<f64> {
        create_rect(
            self.bounds.lat_min(),
            self.bounds.lat_max(),
            self.bounds.lon_min(),
            self.bounds.lon_max(),
        )
    }

    /// Converts this cell's center to an Arrow PointArray.
    pub fn to_arrow_points(&self) -> PointArray {
        std::slice::from_ref(self).to_arrow_points()
    }

    /// Converts this cell to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this cell to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, MeshError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this cell to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MeshError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wgs84_tuple() -> Result<(), MeshError> {
        let cell = MeshCell::from_wgs84(&(135.7402153, 34.9773063), MeshLevel::Km1)?;

        assert_eq!(cell.code, 2052353579);
        assert_eq!(cell.level, MeshLevel::Km1);
        assert_eq!(cell.nw(), LatLong::new(34.9833333, 135.7375)?);
        Ok(())
    }

    #[test]
    fn test_tuple_point_and_lat_long_same_result() -> Result<(), MeshError> {
        let from_tuple = MeshCell::from_wgs84(&(-43.2, -22.9), MeshLevel::M250)?;
        let from_point = MeshCell::from_wgs84(&Point::new(-43.2, -22.9), MeshLevel::M250)?;
        let from_lat_long = MeshCell::from_lat_long(-22.9, -43.2, MeshLevel::M250)?;

        assert_eq!(from_tuple, from_point);
        assert_eq!(from_tuple, from_lat_long);
        Ok(())
    }

    #[test]
    fn test_same_point_same_cell() -> Result<(), MeshError> {
        let cell1 = MeshCell::from_lat_long(51.5007, -0.1246, MeshLevel::Km1)?;
        let cell2 = MeshCell::from_lat_long(51.5007, -0.1246, MeshLevel::Km1)?;
        assert_eq!(cell1.code, cell2.code);

        // The center always maps back to its own cell
        let center = cell1.center();
        let cell3 = MeshCell::from_lat_long(center.latitude, center.longitude, MeshLevel::Km1)?;
        assert_eq!(cell1.code, cell3.code);
        Ok(())
    }

    #[test]
    fn test_from_code_rejects_invalid() {
        assert_eq!(
            MeshCell::from_code(1234567),
            Err(MeshError::InvalidGridCodeWidth(7))
        );
        assert!(MeshCell::from_code(905235).is_err());
    }

    #[test]
    fn test_from_code_matches_codec() -> Result<(), MeshError> {
        for code in [205235, 20523535, 2052353579, 2052353579132, 113410, 401579] {
            let cell = MeshCell::from_code(code)?;
            assert_eq!(cell.level, crate::index::level_of(code)?);
            assert_eq!(cell.bounds, crate::index::decode(code)?);
        }
        assert!(matches!(
            MeshCell::from_code(113510),
            Err(MeshError::InvalidGridCodeDigit { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_contains() -> Result<(), MeshError> {
        let cell = MeshCell::from_code(2052353579)?;
        assert!(cell.contains(&(135.7402153, 34.9773063)));
        assert!(!cell.contains(&(135.76, 34.9773063)));
        assert!(!cell.contains(&(500.0, 34.9773063)));
        Ok(())
    }

    #[test]
    fn test_parent_chain() -> Result<(), MeshError> {
        let cell = MeshCell::from_wgs84(&(135.7402153, 34.9773063), MeshLevel::M125)?;

        let mut codes = vec![cell.code];
        let mut current = cell;
        while let Some(parent) = current.parent() {
            codes.push(parent.code);
            current = parent;
        }

        assert_eq!(current.level, MeshLevel::Km80);
        assert_eq!(codes.len(), 6);
        assert_eq!(codes[3], 2052353579);
        assert_eq!(codes[5], 205235);
        Ok(())
    }

    #[test]
    fn test_children_counts() -> Result<(), MeshError> {
        assert_eq!(MeshCell::from_code(205235)?.children().len(), 64);
        assert_eq!(MeshCell::from_code(20523535)?.children().len(), 100);
        assert_eq!(MeshCell::from_code(2052353579)?.children().len(), 4);
        assert!(MeshCell::from_code(2052353579_123)?.children().is_empty());
        Ok(())
    }

    #[test]
    fn test_children_point_back_to_parent() -> Result<(), MeshError> {
        let cell = MeshCell::from_code(20523535)?;
        for child in cell.children() {
            assert_eq!(child.level, MeshLevel::Km1);
            assert_eq!(child.parent().map(|p| p.code), Some(cell.code));
            assert!(cell.contains(&child.center_point()));
        }
        Ok(())
    }

    #[test]
    fn test_to_polygon() -> Result<(), MeshError> {
        let cell = MeshCell::from_code(2052353579)?;
        let polygon = cell.to_polygon();
        assert_eq!(polygon.exterior().coords().count(), 5);

        let rect = cell.to_rect();
        assert_eq!(rect.min().x, 135.7375);
        assert_eq!(rect.max().y, 34.9833333);
        Ok(())
    }

    #[test]
    fn test_from_geometry_point() -> Result<(), MeshError> {
        let geom = Geometry::Point(Point::new(139.7671, 35.6812));
        let cells = MeshCell::from_geometry(geom, MeshLevel::Km1)?;

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].code, MeshCell::from_lat_long(35.6812, 139.7671, MeshLevel::Km1)?.code);
        Ok(())
    }

    #[test]
    fn test_from_geometry_linestring() -> Result<(), MeshError> {
        // About 3.5 km east-west across Kyoto
        let line = LineString::from(vec![(135.72, 34.98), (135.76, 34.98)]);
        let cells = MeshCell::from_geometry(Geometry::LineString(line), MeshLevel::Km1)?;

        assert!(cells.len() > 1);
        let distinct: HashSet<u64> = cells.iter().map(|c| c.code).collect();
        assert_eq!(distinct.len(), cells.len());
        for cell in &cells {
            assert_eq!(cell.level, MeshLevel::Km1);
        }
        Ok(())
    }

    #[test]
    fn test_degenerate_linestring() -> Result<(), MeshError> {
        let line = LineString::from(vec![(135.72, 34.98)]);
        let cells = MeshCell::from_line_string(&line, MeshLevel::Km1)?;
        assert_eq!(cells.len(), 1);
        Ok(())
    }

    #[test]
    fn test_from_geometry_polygon_uses_centroid() -> Result<(), MeshError> {
        use geo_types::polygon;

        let poly = polygon![
            (x: 135.70, y: 34.95),
            (x: 135.78, y: 34.95),
            (x: 135.78, y: 35.01),
            (x: 135.70, y: 35.01),
            (x: 135.70, y: 34.95),
        ];
        let cells = MeshCell::from_geometry(Geometry::Polygon(poly), MeshLevel::Km1)?;

        // Centroid sits at (135.74, 34.98), well inside a 1 km square
        assert_eq!(cells.len(), 1);
        assert!(cells[0].contains(&(135.74, 34.98)));
        Ok(())
    }

    #[test]
    fn test_from_geometry_multipoint() -> Result<(), MeshError> {
        use geo_types::MultiPoint;

        let mp = MultiPoint::new(vec![Point::new(135.74, 34.97), Point::new(-58.38, -34.6)]);
        let cells = MeshCell::from_geometry(Geometry::MultiPoint(mp), MeshLevel::Km10)?;

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].code / 10_000_000, 7);
        Ok(())
    }

    #[test]
    fn test_from_geometry_collection() -> Result<(), MeshError> {
        use geo_types::GeometryCollection;

        let gc = GeometryCollection::new_from(vec![
            Geometry::Point(Point::new(135.74, 34.97)),
            Geometry::Point(Point::new(139.77, 35.68)),
        ]);
        let cells = MeshCell::from_geometry(Geometry::GeometryCollection(gc), MeshLevel::Km80)?;

        assert_eq!(cells.len(), 2);
        Ok(())
    }

    #[test]
    fn test_from_geometry_out_of_range_point() {
        let geom = Geometry::Point(Point::new(200.0, 10.0));
        assert!(MeshCell::from_geometry(geom, MeshLevel::Km1).is_err());
    }
}
