use crate::error::MeshError;
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>` and [`LatLong`].
/// x is the longitude and y is the latitude, matching GeoJSON/WKT axis order.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLong {
    /// Creates a validated coordinate.
    ///
    /// # Example
    /// ```
    /// use worldmesh_rs::LatLong;
    ///
    /// assert!(LatLong::new(35.0, 135.0).is_ok());
    /// assert!(LatLong::new(91.0, 135.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MeshError> {
        validate_lat_long(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl Coordinate for LatLong {
    fn x(&self) -> f64 {
        self.longitude
    }
    fn y(&self) -> f64 {
        self.latitude
    }
}

impl From<LatLong> for Point<f64> {
    fn from(value: LatLong) -> Self {
        value.to_point()
    }
}

/// Checks that a latitude/longitude pair lies on the globe. NaN is rejected.
pub fn validate_lat_long(latitude: f64, longitude: f64) -> Result<(), MeshError> {
    if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(MeshError::CoordinateOutOfRange {
            latitude,
            longitude,
        })
    }
}
