use crate::error::MeshError;
use crate::index::constants::{
    CODE_WIDTHS, LAT_STEPS_PER_DEGREE, LON_STEPS_PER_DEGREE, MAX_LEVEL, NOMINAL_CELL_SIZES,
    SPAN_STEPS,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six nested precision levels of the world grid square code.
///
/// Ordinals run from 1 (80 km, coarsest) to 6 (125 m, finest).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MeshLevel {
    /// 40' x 1deg, 6 digits
    Km80 = 1,
    /// 5' x 7.5', 8 digits
    Km10 = 2,
    /// 30" x 45", 10 digits
    #[default]
    Km1 = 3,
    /// 15" x 22.5", 11 digits
    M500 = 4,
    /// 7.5" x 11.25", 12 digits
    M250 = 5,
    /// 3.75" x 5.625", 13 digits
    M125 = 6,
}

impl MeshLevel {
    pub const ALL: [MeshLevel; 6] = [
        MeshLevel::Km80,
        MeshLevel::Km10,
        MeshLevel::Km1,
        MeshLevel::M500,
        MeshLevel::M250,
        MeshLevel::M125,
    ];

    /// Looks a level up by its ordinal (1-6).
    ///
    /// # Example
    /// ```
    /// use worldmesh_rs::MeshLevel;
    ///
    /// # fn main() -> Result<(), worldmesh_rs::MeshError> {
    /// assert_eq!(MeshLevel::from_ordinal(3)?, MeshLevel::Km1);
    /// assert!(MeshLevel::from_ordinal(7).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_ordinal(ordinal: u8) -> Result<Self, MeshError> {
        if (1..=MAX_LEVEL).contains(&ordinal) {
            Ok(Self::ALL[usize::from(ordinal - 1)])
        } else {
            Err(MeshError::InvalidLevel(ordinal))
        }
    }

    /// Looks a level up by grid code digit width.
    pub fn from_width(width: u32) -> Result<Self, MeshError> {
        CODE_WIDTHS
            .iter()
            .position(|&w| w == width)
            .map(|i| Self::ALL[i])
            .ok_or(MeshError::InvalidGridCodeWidth(width))
    }

    /// Determines the level of a grid code from its decimal digit count.
    pub fn of_code(code: u64) -> Result<Self, MeshError> {
        Self::from_width(digit_count(code))
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    fn index(self) -> usize {
        usize::from(self.ordinal() - 1)
    }

    /// Number of decimal digits in a code at this level.
    pub fn digit_width(self) -> u32 {
        CODE_WIDTHS[self.index()]
    }

    /// Nominal cell edge length in meters.
    pub fn nominal_size(self) -> f64 {
        NOMINAL_CELL_SIZES[self.index()]
    }

    pub(crate) fn span_steps(self) -> u64 {
        SPAN_STEPS[self.index()]
    }

    /// Cell height in degrees of latitude.
    pub fn lat_span(self) -> f64 {
        self.span_steps() as f64 / LAT_STEPS_PER_DEGREE
    }

    /// Cell width in degrees of longitude.
    pub fn lon_span(self) -> f64 {
        self.span_steps() as f64 / LON_STEPS_PER_DEGREE
    }

    /// Next finer level, `None` at 125 m.
    pub fn finer(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1).ok()
    }

    /// Next coarser level, `None` at 80 km.
    pub fn coarser(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() - 1).ok()
    }
}

impl TryFrom<u8> for MeshLevel {
    type Error = MeshError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(value)
    }
}

impl fmt::Display for MeshLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MeshLevel::Km80 => "80km",
            MeshLevel::Km10 => "10km",
            MeshLevel::Km1 => "1km",
            MeshLevel::M500 => "500m",
            MeshLevel::M250 => "250m",
            MeshLevel::M125 => "125m",
        };
        f.pad(label)
    }
}

pub(crate) fn digit_count(code: u64) -> u32 {
    code.checked_ilog10().map_or(1, |d| d + 1)
}
