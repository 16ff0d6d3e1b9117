use thiserror::Error;

/// Error type for worldmesh-rs operations.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180] (or NaN).
    #[error("Coordinate out of range: latitude {latitude}, longitude {longitude}")]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },
    /// The grid code's decimal digit count is not one of 6, 8, 10, 11, 12, 13.
    #[error("Invalid grid code width: {0} digits")]
    InvalidGridCodeWidth(u32),
    /// The leading digit of the grid code is not in 1..=8.
    #[error("Invalid area octant: {0}")]
    InvalidAreaOctant(u8),
    /// A digit field of the grid code is outside its radix.
    #[error("Invalid digit at position {position} of grid code {code}")]
    InvalidGridCodeDigit { code: u64, position: usize },
    /// The precision level is outside the valid range (1-6).
    #[error("Invalid level: {0}")]
    InvalidLevel(u8),
    /// The ucode string is malformed or carries a foreign authority prefix.
    #[error("Invalid ucode: {0}")]
    InvalidUcode(String),
    /// A grid extent was missing or malformed.
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),
    /// The requested grid would contain too many cells.
    #[error("Grid too large: {0} cells")]
    GridTooLarge(u64),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParseError(String),
    /// File I/O or serialization error.
    #[error("IO error: {0}")]
    IoError(String),
    /// CSV parsing or reading error.
    #[error("CSV error: {0}")]
    CsvError(String),
}
