use crate::cell::MeshCell;
use crate::error::MeshError;
use crate::index::{MeshLevel, level_of};
use crate::io::arrow::MeshCellsToArrow;
use arrow_array::{Array, RecordBatch, UInt8Array, UInt64Array};
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// File metadata key listing the mesh levels present, as a JSON array of labels.
pub const LEVELS_METADATA_KEY: &str = "worldmesh:levels";

fn io_error(e: impl std::fmt::Display) -> MeshError {
    MeshError::IoError(e.to_string())
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T, MeshError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| io_error(format!("record batch has no {name} column of the mesh schema")))
}

/// Levels present in a mesh batch. Each row's `level` must agree with its `code`.
fn batch_levels(batch: &RecordBatch) -> Result<BTreeSet<MeshLevel>, MeshError> {
    let codes = column::<UInt64Array>(batch, "code")?;
    let levels = column::<UInt8Array>(batch, "level")?;

    let mut present = BTreeSet::new();
    for (code, ordinal) in codes.values().iter().zip(levels.values().iter()) {
        let level = MeshLevel::from_ordinal(*ordinal)?;
        if level_of(*code)? != level {
            return Err(io_error(format!("code {code} is not a level {level} square")));
        }
        present.insert(level);
    }
    Ok(present)
}

/// Writes a mesh RecordBatch (see [`MeshCellsToArrow::to_record_batch`]) to a
/// GeoParquet file with WKB geometry in EPSG:4326.
///
/// The batch must carry `code` (UInt64) and `level` (UInt8) columns. The levels
/// found are recorded under [`LEVELS_METADATA_KEY`].
pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), MeshError> {
    let path = path.as_ref();
    let levels = batch_levels(batch)?;
    let labels: Vec<String> = levels.iter().map(ToString::to_string).collect();
    let levels_json = serde_json::to_string(&labels).map_err(io_error)?;

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();
    let mut encoder =
        GeoParquetRecordBatchEncoder::try_new(&batch.schema(), &options).map_err(io_error)?;

    let file = File::create(path).map_err(io_error)?;
    let mut writer =
        ArrowWriter::try_new(file, encoder.target_schema(), None).map_err(io_error)?;
    writer
        .write(&encoder.encode_record_batch(batch).map_err(io_error)?)
        .map_err(io_error)?;

    writer.append_key_value_metadata(encoder.into_keyvalue().map_err(io_error)?);
    writer.append_key_value_metadata(KeyValue::new(
        LEVELS_METADATA_KEY.to_string(),
        levels_json,
    ));
    writer.finish().map_err(io_error)?;

    debug!(rows = batch.num_rows(), levels = ?labels, path = %path.display(), "wrote geoparquet");
    Ok(())
}

/// Trait for writing collections of [`MeshCell`]s to GeoParquet.
pub trait MeshCellsToGeoParquet: MeshCellsToArrow {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MeshError>;
}

impl MeshCellsToGeoParquet for [MeshCell] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MeshError> {
        let batch = self.to_record_batch()?;
        write_geoparquet(&batch, path)
    }
}

impl MeshCellsToGeoParquet for Vec<MeshCell> {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MeshError> {
        self.as_slice().to_geoparquet(path)
    }
}
