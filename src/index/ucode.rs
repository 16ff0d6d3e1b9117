use crate::coord::{Coordinate, LatLong, validate_lat_long};
use crate::error::MeshError;
use crate::index::encode::encode;
use crate::index::level::MeshLevel;

/// Upper 64 bits of every place identification ucode (issuing authority).
pub const UCODE_AUTHORITY: u64 = 0x0000_1b00_0000_0003;

/// Tenths of an arc-second per degree
const UCODE_STEPS_PER_DEGREE: f64 = 36_000.0;

const LAT_SIGN_SHIFT: u32 = 61;
const LAT_SHIFT: u32 = 39;
const LAT_BITS: u32 = 22;
const LON_SIGN_SHIFT: u32 = 38;
const LON_SHIFT: u32 = 15;
const LON_BITS: u32 = 23;

/// Generates a 128-bit place identification ucode (ITU-T H.642) for a coordinate.
///
/// The ucode is returned as 32 lowercase hex characters.
///
/// # Binary Format
///
/// | Bits (MSB first) | Field     | Description                                   |
/// |------------------|-----------|-----------------------------------------------|
/// | 0-63             | Authority | Fixed prefix [`UCODE_AUTHORITY`]              |
/// | 64-65            | Class     | Always zero                                   |
/// | 66               | Lat sign  | 1 for southern latitudes                      |
/// | 67-88            | Latitude  | `floor(abs(lat) * 36000)`, 22 bits            |
/// | 89               | Lon sign  | 1 for western longitudes                      |
/// | 90-112           | Longitude | `floor(abs(lon) * 36000)`, 23 bits            |
/// | 113-127          | Reserved  | Altitude and item, always zero                |
///
/// # Example
/// ```
/// use worldmesh_rs::latlong_to_ucode;
///
/// # fn main() -> Result<(), worldmesh_rs::MeshError> {
/// let ucode = latlong_to_ucode(&(135.7402153, 34.9773063))?;
/// assert_eq!(ucode.len(), 32);
/// assert!(ucode.starts_with("00001b0000000003"));
/// # Ok(())
/// # }
/// ```
pub fn latlong_to_ucode(coord: &impl Coordinate) -> Result<String, MeshError> {
    let (latitude, longitude) = (coord.y(), coord.x());
    validate_lat_long(latitude, longitude)?;

    let lat_steps = (latitude.abs() * UCODE_STEPS_PER_DEGREE).floor() as u64;
    let lon_steps = (longitude.abs() * UCODE_STEPS_PER_DEGREE).floor() as u64;

    let lower = (u64::from(latitude < 0.0) << LAT_SIGN_SHIFT)
        | (lat_steps << LAT_SHIFT)
        | (u64::from(longitude < 0.0) << LON_SIGN_SHIFT)
        | (lon_steps << LON_SHIFT);

    let ucode = (u128::from(UCODE_AUTHORITY) << 64) | u128::from(lower);
    Ok(format!("{:032x}", ucode))
}

/// Extracts the coordinate stored in a place identification ucode.
///
/// The coordinate is the ucode's 0.1" cell corner nearest the origin.
///
/// # Errors
///
/// - [`MeshError::InvalidUcode`] - not 32 hex characters, or a foreign authority prefix
pub fn ucode_to_latlong(ucode: &str) -> Result<LatLong, MeshError> {
    if ucode.len() != 32 || !ucode.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MeshError::InvalidUcode(format!(
            "expected 32 hex characters, got {:?}",
            ucode
        )));
    }
    let value = u128::from_str_radix(ucode, 16)
        .map_err(|e| MeshError::InvalidUcode(e.to_string()))?;

    let authority = (value >> 64) as u64;
    if authority != UCODE_AUTHORITY {
        return Err(MeshError::InvalidUcode(format!(
            "not a place identification code: {:016x}",
            authority
        )));
    }

    let lower = value as u64;
    let field = |shift: u32, bits: u32| (lower >> shift) & ((1u64 << bits) - 1);

    let mut latitude = field(LAT_SHIFT, LAT_BITS) as f64 / UCODE_STEPS_PER_DEGREE;
    let mut longitude = field(LON_SHIFT, LON_BITS) as f64 / UCODE_STEPS_PER_DEGREE;
    if field(LAT_SIGN_SHIFT, 1) == 1 {
        latitude = -latitude;
    }
    if field(LON_SIGN_SHIFT, 1) == 1 {
        longitude = -longitude;
    }

    LatLong::new(latitude, longitude)
        .map_err(|_| MeshError::InvalidUcode(format!("coordinate out of range in {}", ucode)))
}

/// Grid code of the coordinate stored in a ucode.
pub fn ucode_to_code(ucode: &str, level: MeshLevel) -> Result<u64, MeshError> {
    let ll = ucode_to_latlong(ucode)?;
    encode(ll.latitude, ll.longitude, level)
}
