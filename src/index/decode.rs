use crate::coord::LatLong;
use crate::error::MeshError;
use crate::index::fields::MeshIndex;
use crate::index::level::MeshLevel;
use crate::index::octant::AreaOctant;
use crate::index::rounding::truncate_coordinate;
use serde::{Deserialize, Serialize};

/// Corners and center of a decoded grid square.
///
/// Corner coordinates are truncated with [`truncate_coordinate`]; the center
/// is the exact midpoint of the untruncated corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshBounds {
    pub nw: LatLong,
    pub sw: LatLong,
    pub ne: LatLong,
    pub se: LatLong,
    pub center: LatLong,
}

impl MeshBounds {
    pub fn lat_min(&self) -> f64 {
        self.sw.latitude
    }

    pub fn lat_max(&self) -> f64 {
        self.nw.latitude
    }

    pub fn lon_min(&self) -> f64 {
        self.nw.longitude
    }

    pub fn lon_max(&self) -> f64 {
        self.ne.longitude
    }

    /// Whether a point lies inside the bounds, allowing `tolerance` degrees of slack.
    pub fn contains_lat_long(&self, latitude: f64, longitude: f64, tolerance: f64) -> bool {
        latitude >= self.lat_min() - tolerance
            && latitude <= self.lat_max() + tolerance
            && longitude >= self.lon_min() - tolerance
            && longitude <= self.lon_max() + tolerance
    }
}

/// Decodes a grid code into the corners and center of its cell.
///
/// The level is taken from the code's digit width.
///
/// # Example
/// ```
/// use worldmesh_rs::decode;
///
/// # fn main() -> Result<(), worldmesh_rs::MeshError> {
/// let bounds = decode(2052353579)?;
/// assert_eq!(bounds.nw.latitude, 34.9833333);
/// assert_eq!(bounds.nw.longitude, 135.7375);
/// assert_eq!(bounds.se.latitude, 34.975);
/// assert_eq!(bounds.se.longitude, 135.75);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`MeshError::InvalidGridCodeWidth`] - digit count not in {6, 8, 10, 11, 12, 13}
/// - [`MeshError::InvalidAreaOctant`] - leading digit not in 1..=8
/// - [`MeshError::InvalidGridCodeDigit`] - a field outside its radix
pub fn decode(code: u64) -> Result<MeshBounds, MeshError> {
    Ok(decode_with_level(code)?.1)
}

/// Level and bounds from a single validation pass over the code.
pub(crate) fn decode_with_level(code: u64) -> Result<(MeshLevel, MeshBounds), MeshError> {
    let index = MeshIndex::from_code(code)?;
    Ok((index.level, bounds_of(index)))
}

fn bounds_of(index: MeshIndex) -> MeshBounds {
    let (lat_lo, lon_lo) = index.normalized_origin();
    let lat_span = index.level.lat_span();
    let lon_span = index.level.lon_span();

    let (north, west) = northwest_corner(index.octant, lat_lo, lon_lo, lat_span, lon_span);
    let south = north - lat_span;
    let east = west + lon_span;

    let corner = |lat: f64, lon: f64| {
        LatLong::new_unchecked(truncate_coordinate(lat), truncate_coordinate(lon))
    };

    MeshBounds {
        nw: corner(north, west),
        sw: corner(south, west),
        ne: corner(north, east),
        se: corner(south, east),
        center: LatLong::new_unchecked(north - lat_span / 2.0, west + lon_span / 2.0),
    }
}

/// Signed north-west corner from the normalized lower corner.
///
/// In the southern hemisphere the normalized lower edge is the northern one;
/// in the western hemisphere the normalized upper edge is the western one.
fn northwest_corner(
    octant: AreaOctant,
    lat_lo: f64,
    lon_lo: f64,
    lat_span: f64,
    lon_span: f64,
) -> (f64, f64) {
    let north_magnitude = if octant.is_south() {
        lat_lo
    } else {
        lat_lo + lat_span
    };
    let west_magnitude = if octant.is_west() {
        lon_lo + lon_span
    } else {
        lon_lo
    };
    octant.normalize(north_magnitude, west_magnitude)
}

/// North-west corner of the cell, the conventional representative point.
pub fn decode_to_latlong(code: u64) -> Result<LatLong, MeshError> {
    decode_nw(code)
}

pub fn decode_nw(code: u64) -> Result<LatLong, MeshError> {
    Ok(decode(code)?.nw)
}

pub fn decode_sw(code: u64) -> Result<LatLong, MeshError> {
    Ok(decode(code)?.sw)
}

pub fn decode_ne(code: u64) -> Result<LatLong, MeshError> {
    Ok(decode(code)?.ne)
}

pub fn decode_se(code: u64) -> Result<LatLong, MeshError> {
    Ok(decode(code)?.se)
}

/// Geometric center of the cell.
pub fn decode_center(code: u64) -> Result<LatLong, MeshError> {
    Ok(decode(code)?.center)
}

/// Level implied by a code's width, after full validation of the code.
pub fn level_of(code: u64) -> Result<MeshLevel, MeshError> {
    Ok(MeshIndex::from_code(code)?.level)
}
