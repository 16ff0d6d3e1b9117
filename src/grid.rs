use crate::cell::MeshCell;
use crate::coord::{Coordinate, validate_lat_long};
use crate::error::MeshError;
use crate::index::{MAX_GRID_CELLS, MeshLevel, encode, encode_coord};
use geo_types::{Polygon, Rect};
use geojson::{Feature, FeatureCollection, JsonObject, feature::Id};
use serde_json::json;
use std::collections::HashSet;
use tracing::debug;

/// All grid squares of one level covering a WGS84 extent.
///
/// The extent is closed: squares that only touch its edges are included.
#[derive(Debug, Clone)]
pub struct MeshGrid {
    cells: Vec<MeshCell>,
    level: MeshLevel,
}

impl MeshGrid {
    pub fn builder() -> MeshGridBuilder {
        MeshGridBuilder::new()
    }

    /// Enumerates the squares covering `[min_lon, max_lon] x [min_lat, max_lat]`.
    ///
    /// The extent is clamped to the valid domain. Fails with
    /// [`MeshError::GridTooLarge`] above [`MAX_GRID_CELLS`] squares.
    ///
    /// # Example
    /// ```
    /// use worldmesh_rs::{MeshGrid, MeshLevel};
    ///
    /// # fn main() -> Result<(), worldmesh_rs::MeshError> {
    /// let grid = MeshGrid::from_extent(135.73, 34.97, 135.76, 34.99, MeshLevel::Km1)?;
    /// assert_eq!(grid.len(), 9);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_extent(
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
        level: MeshLevel,
    ) -> Result<Self, MeshError> {
        let cells = generate_cells_for_extent(min_lon, min_lat, max_lon, max_lat, level)?;
        Ok(Self { cells, level })
    }

    /// Rect coordinates are (longitude, latitude).
    pub fn from_rect(rect: &Rect<f64>, level: MeshLevel) -> Result<Self, MeshError> {
        Self::from_extent(
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y,
            level,
        )
    }

    pub fn level(&self) -> MeshLevel {
        self.level
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[MeshCell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshCell> {
        self.cells.iter()
    }

    /// The square of this grid containing the coordinate, if any.
    pub fn get_cell_at(&self, coord: &impl Coordinate) -> Option<&MeshCell> {
        let code = encode_coord(coord, self.level).ok()?;
        self.cells.iter().find(|cell| cell.code == code)
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.cells.iter().map(|cell| cell.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&MeshCell>
    where
        F: Fn(&MeshCell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(cell)).collect()
    }

    /// Serializes the grid as a GeoJSON FeatureCollection.
    ///
    /// Each feature carries the code as its id and `code`, `level`, `lat_min`,
    /// `lat_max`, `lon_min`, `lon_max` properties.
    pub fn to_geojson(&self) -> Result<String, MeshError> {
        let features = self
            .cells
            .iter()
            .map(|cell| {
                let mut properties = JsonObject::new();
                properties.insert("code".to_string(), json!(cell.code));
                properties.insert("level".to_string(), json!(cell.level.to_string()));
                properties.insert("lat_min".to_string(), json!(cell.bounds.lat_min()));
                properties.insert("lat_max".to_string(), json!(cell.bounds.lat_max()));
                properties.insert("lon_min".to_string(), json!(cell.bounds.lon_min()));
                properties.insert("lon_max".to_string(), json!(cell.bounds.lon_max()));

                Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::from(&cell.to_polygon())),
                    id: Some(Id::Number(cell.code.into())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        serde_json::to_string(&collection).map_err(|e| MeshError::IoError(e.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MeshGridBuilder {
    level: Option<MeshLevel>,
    min_lon: Option<f64>,
    min_lat: Option<f64>,
    max_lon: Option<f64>,
    max_lat: Option<f64>,
}

impl MeshGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: MeshLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn extent(mut self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        self.min_lon = Some(min_lon);
        self.min_lat = Some(min_lat);
        self.max_lon = Some(max_lon);
        self.max_lat = Some(max_lat);
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.min_lon = Some(rect.min().x);
        self.min_lat = Some(rect.min().y);
        self.max_lon = Some(rect.max().x);
        self.max_lat = Some(rect.max().y);
        self
    }

    /// Builds the grid. Defaults to the 1 km level when none is set.
    pub fn build(self) -> Result<MeshGrid, MeshError> {
        let level = self.level.unwrap_or_default();
        match (self.min_lon, self.min_lat, self.max_lon, self.max_lat) {
            (Some(min_lon), Some(min_lat), Some(max_lon), Some(max_lat)) => {
                MeshGrid::from_extent(min_lon, min_lat, max_lon, max_lat, level)
            }
            _ => Err(MeshError::InvalidExtent("extent must be set".to_string())),
        }
    }
}

/// Sample positions from `min` to `max` at most `span` apart, `max` included.
fn axis_samples(min: f64, max: f64, span: f64) -> Vec<f64> {
    let steps = ((max - min) / span).floor() as usize;
    let mut samples: Vec<f64> = (0..=steps).map(|i| min + i as f64 * span).collect();
    if samples.last().is_some_and(|&last| last < max) {
        samples.push(max);
    }
    samples
}

fn generate_cells_for_extent(
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
    level: MeshLevel,
) -> Result<Vec<MeshCell>, MeshError> {
    validate_lat_long(min_lat.clamp(-90.0, 90.0), min_lon.clamp(-180.0, 180.0))?;
    validate_lat_long(max_lat.clamp(-90.0, 90.0), max_lon.clamp(-180.0, 180.0))?;

    let (south, north) = (
        min_lat.min(max_lat).clamp(-90.0, 90.0),
        min_lat.max(max_lat).clamp(-90.0, 90.0),
    );
    let (west, east) = (
        min_lon.min(max_lon).clamp(-180.0, 180.0),
        min_lon.max(max_lon).clamp(-180.0, 180.0),
    );

    let rows = ((north - south) / level.lat_span()).ceil() as u64 + 1;
    let cols = ((east - west) / level.lon_span()).ceil() as u64 + 1;
    let estimate = rows.saturating_mul(cols);
    if estimate > MAX_GRID_CELLS {
        debug!(estimate, %level, "grid extent rejected");
        return Err(MeshError::GridTooLarge(estimate));
    }

    let lats = axis_samples(south, north, level.lat_span());
    let lons = axis_samples(west, east, level.lon_span());

    let mut seen: HashSet<u64> = HashSet::new();
    let mut cells = Vec::new();
    for &lat in &lats {
        for &lon in &lons {
            let code = encode(lat, lon, level)?;
            if seen.insert(code) {
                cells.push(MeshCell::from_code(code)?);
            }
        }
    }

    debug!(cells = cells.len(), %level, "generated grid");
    Ok(cells)
}
