use crate::cell::MeshCell;
use crate::error::MeshError;
use arrow_array::{Float64Array, RecordBatch, UInt8Array, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Crs, Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn wgs84_metadata() -> Arc<Metadata> {
    let crs = Crs::from_authority_code("EPSG:4326".to_string());
    Arc::new(Metadata::new(crs, None))
}

/// Trait for converting collections of [`MeshCell`]s to Arrow arrays.
///
/// Implemented for `[MeshCell]` and `Vec<MeshCell>`.
pub trait MeshCellsToArrow {
    /// Converts cell centers to an Arrow PointArray.
    fn to_arrow_points(&self) -> PointArray;
    /// Converts cells to an Arrow PolygonArray of rectangles.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts cells to a RecordBatch with code, level, bounds and geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, MeshError>;
}

impl MeshCellsToArrow for [MeshCell] {
    fn to_arrow_points(&self) -> PointArray {
        let point = PointType::new(Dimension::XY, wgs84_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for cell in self {
            builder.push_point(Some(&cell.center_point()));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, wgs84_metadata());
        let polygons: Vec<_> = self.par_iter().map(|c: &MeshCell| c.to_polygon()).collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, MeshError> {
        let polygon_array = self.to_arrow_polygons();
        let codes: UInt64Array = self.iter().map(|c| Some(c.code)).collect();
        let levels: UInt8Array = self.iter().map(|c| Some(c.level.ordinal())).collect();
        let lat_mins: Float64Array = self.iter().map(|c| Some(c.bounds.lat_min())).collect();
        let lat_maxs: Float64Array = self.iter().map(|c| Some(c.bounds.lat_max())).collect();
        let lon_mins: Float64Array = self.iter().map(|c| Some(c.bounds.lon_min())).collect();
        let lon_maxs: Float64Array = self.iter().map(|c| Some(c.bounds.lon_max())).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("code", DataType::UInt64, false),
            Field::new("level", DataType::UInt8, false),
            Field::new("lat_min", DataType::Float64, false),
            Field::new("lat_max", DataType::Float64, false),
            Field::new("lon_min", DataType::Float64, false),
            Field::new("lon_max", DataType::Float64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(codes),
                Arc::new(levels),
                Arc::new(lat_mins),
                Arc::new(lat_maxs),
                Arc::new(lon_mins),
                Arc::new(lon_maxs),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| MeshError::IoError(e.to_string()))
    }
}

impl MeshCellsToArrow for Vec<MeshCell> {
    fn to_arrow_points(&self) -> PointArray {
        self.as_slice().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.as_slice().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, MeshError> {
        self.as_slice().to_record_batch()
    }
}
