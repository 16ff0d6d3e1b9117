use crate::error::MeshError;
use crate::index::constants::LONGITUDE_BAND_OFFSET;
use serde::{Deserialize, Serialize};

/// Hemisphere and longitude band of a coordinate, the leading digit of every grid code.
///
/// Each octant carries three reflection bits:
///
/// | octant | x (south) | y (west) | z (abs(lon) >= 100) |
/// |--------|-----------|----------|---------------------|
/// | 1      | 0         | 0        | 0                   |
/// | 2      | 0         | 0        | 1                   |
/// | 3      | 0         | 1        | 0                   |
/// | 4      | 0         | 1        | 1                   |
/// | 5      | 1         | 0        | 0                   |
/// | 6      | 1         | 0        | 1                   |
/// | 7      | 1         | 1        | 0                   |
/// | 8      | 1         | 1        | 1                   |
///
/// `octant = 4x + 2y + z + 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaOctant {
    NorthEast,
    NorthEastFar,
    NorthWest,
    NorthWestFar,
    SouthEast,
    SouthEastFar,
    SouthWest,
    SouthWestFar,
}

const OCTANTS: [AreaOctant; 8] = [
    AreaOctant::NorthEast,
    AreaOctant::NorthEastFar,
    AreaOctant::NorthWest,
    AreaOctant::NorthWestFar,
    AreaOctant::SouthEast,
    AreaOctant::SouthEastFar,
    AreaOctant::SouthWest,
    AreaOctant::SouthWestFar,
];

/// (x, y, z) per octant, in digit order
const REFLECTIONS: [(u8, u8, u8); 8] = [
    (0, 0, 0),
    (0, 0, 1),
    (0, 1, 0),
    (0, 1, 1),
    (1, 0, 0),
    (1, 0, 1),
    (1, 1, 0),
    (1, 1, 1),
];

impl AreaOctant {
    /// Classifies a coordinate. Zero latitude and longitude count as north and east.
    ///
    /// # Example
    /// ```
    /// use worldmesh_rs::AreaOctant;
    ///
    /// assert_eq!(AreaOctant::of(35.0, 135.0).digit(), 2);
    /// assert_eq!(AreaOctant::of(-34.0, -58.0).digit(), 7);
    /// ```
    pub fn of(latitude: f64, longitude: f64) -> Self {
        let x = usize::from(latitude < 0.0);
        let y = usize::from(longitude < 0.0);
        let z = usize::from(longitude.abs() >= LONGITUDE_BAND_OFFSET);
        OCTANTS[4 * x + 2 * y + z]
    }

    /// Parses the leading digit of a grid code.
    pub fn from_digit(digit: u8) -> Result<Self, MeshError> {
        match digit {
            1..=8 => Ok(OCTANTS[usize::from(digit - 1)]),
            _ => Err(MeshError::InvalidAreaOctant(digit)),
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// The leading digit (1-8).
    pub fn digit(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Southern hemisphere bit.
    pub fn x(self) -> u8 {
        REFLECTIONS[self.index()].0
    }

    /// Western hemisphere bit.
    pub fn y(self) -> u8 {
        REFLECTIONS[self.index()].1
    }

    /// Far longitude band bit (abs(lon) >= 100).
    pub fn z(self) -> u8 {
        REFLECTIONS[self.index()].2
    }

    pub fn is_south(self) -> bool {
        self.x() == 1
    }

    pub fn is_west(self) -> bool {
        self.y() == 1
    }

    pub fn is_far_band(self) -> bool {
        self.z() == 1
    }

    /// Reflects a coordinate into the non-negative quadrant.
    ///
    /// The same call restores the sign of a magnitude computed in that quadrant.
    pub fn normalize(self, latitude: f64, longitude: f64) -> (f64, f64) {
        (
            self.lat_sign() * latitude,
            self.lon_sign() * longitude,
        )
    }

    pub(crate) fn lat_sign(self) -> f64 {
        1.0 - 2.0 * f64::from(self.x())
    }

    pub(crate) fn lon_sign(self) -> f64 {
        1.0 - 2.0 * f64::from(self.y())
    }

    /// Longitude offset removed before packing the degree field.
    pub(crate) fn band_offset(self) -> f64 {
        LONGITUDE_BAND_OFFSET * f64::from(self.z())
    }
}
