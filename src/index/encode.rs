use crate::coord::{Coordinate, validate_lat_long};
use crate::error::MeshError;
use crate::index::fields::MeshIndex;
use crate::index::level::MeshLevel;
use rayon::prelude::*;
use tracing::trace;

/// Computes the world grid square code of a coordinate at the given level.
///
/// The code is `A PPP UU [Q V [R W [S2 [S4 [S8]]]]]` where `A` is the area
/// octant, `PPP` the 40' latitude band, `UU` the 1deg longitude band (after
/// removing the 100deg offset), `QV` the 8x8 10 km subdivision, `RW` the 10x10
/// 1 km subdivision and `S2`/`S4`/`S8` the quadrant (1-4) of each halving.
/// Every field has a fixed width, so the code width alone identifies the level.
///
/// # Example
/// ```
/// use worldmesh_rs::{encode, MeshLevel};
///
/// # fn main() -> Result<(), worldmesh_rs::MeshError> {
/// let code = encode(34.9773063, 135.7402153, MeshLevel::Km1)?;
/// assert_eq!(code, 2052353579);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`MeshError::CoordinateOutOfRange`] - latitude outside [-90, 90] or
///   longitude outside [-180, 180]
pub fn encode(latitude: f64, longitude: f64, level: MeshLevel) -> Result<u64, MeshError> {
    if let Err(e) = validate_lat_long(latitude, longitude) {
        trace!(latitude, longitude, "rejecting coordinate");
        return Err(e);
    }
    Ok(MeshIndex::locate(latitude, longitude, level).to_code())
}

/// Like [`encode`] but takes the level as its ordinal (1-6).
pub fn encode_level(latitude: f64, longitude: f64, level: u8) -> Result<u64, MeshError> {
    encode(latitude, longitude, MeshLevel::from_ordinal(level)?)
}

/// Encodes any [`Coordinate`] (x = longitude, y = latitude).
pub fn encode_coord(coord: &impl Coordinate, level: MeshLevel) -> Result<u64, MeshError> {
    encode(coord.y(), coord.x(), level)
}

/// 1 km code, the most commonly used level.
pub fn encode_default(latitude: f64, longitude: f64) -> Result<u64, MeshError> {
    encode(latitude, longitude, MeshLevel::Km1)
}

/// 80 km code (6 digits).
pub fn encode_80km(latitude: f64, longitude: f64) -> Result<u64, MeshError> {
    encode(latitude, longitude, MeshLevel::Km80)
}

/// 10 km code (8 digits).
pub fn encode_10km(latitude: f64, longitude: f64) -> Result<u64, MeshError> {
    encode(latitude, longitude, MeshLevel::Km10)
}

/// 1 km code (10 digits).
pub fn encode_1km(latitude: f64, longitude: f64) -> Result<u64, MeshError> {
    encode(latitude, longitude, MeshLevel::Km1)
}

/// 500 m code (11 digits).
pub fn encode_500m(latitude: f64, longitude: f64) -> Result<u64, MeshError> {
    encode(latitude, longitude, MeshLevel::M500)
}

/// 250 m code (12 digits).
pub fn encode_250m(latitude: f64, longitude: f64) -> Result<u64, MeshError> {
    encode(latitude, longitude, MeshLevel::M250)
}

/// 125 m code (13 digits).
pub fn encode_125m(latitude: f64, longitude: f64) -> Result<u64, MeshError> {
    encode(latitude, longitude, MeshLevel::M125)
}

/// Encodes many coordinates in parallel. Output order follows input order and
/// the first out-of-range coordinate fails the whole batch.
pub fn encode_batch<C>(coords: &[C], level: MeshLevel) -> Result<Vec<u64>, MeshError>
where
    C: Coordinate + Sync,
{
    coords
        .par_iter()
        .map(|c| encode_coord(c, level))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Point;

    #[test]
    fn test_kyoto_all_levels() -> Result<(), MeshError> {
        let (lat, lon) = (34.9773063, 135.7402153);
        assert_eq!(encode_80km(lat, lon)?, 205235);
        assert_eq!(encode_10km(lat, lon)?, 20523535);
        assert_eq!(encode_1km(lat, lon)?, 2052353579);
        assert_eq!(encode_default(lat, lon)?, 2052353579);

        let m500 = encode_500m(lat, lon)?;
        let m250 = encode_250m(lat, lon)?;
        let m125 = encode_125m(lat, lon)?;
        assert_eq!(m500 / 10, 2052353579);
        assert_eq!(m250 / 10, m500);
        assert_eq!(m125 / 10, m250);
        Ok(())
    }

    #[test]
    fn test_southern_western_octant() -> Result<(), MeshError> {
        let code = encode(-34.0, -58.0, MeshLevel::Km80)?;
        assert_eq!(code / 100_000, 7);
        // |lat| * 1.5 = 51, |lon| = 58
        assert_eq!(code, 705158);
        Ok(())
    }

    #[test]
    fn test_widths_match_level() -> Result<(), MeshError> {
        for level in MeshLevel::ALL {
            let code = encode(0.1, 0.1, level)?;
            assert_eq!(MeshLevel::of_code(code)?, level);
        }
        Ok(())
    }

    #[test]
    fn test_half_levels_use_quadrant_digits() -> Result<(), MeshError> {
        // 1 km cell 2052353579 spans lat [34.975, 34.98333), lon [135.7375, 135.75)
        assert_eq!(encode_500m(34.976, 135.738)?, 20523535791);
        assert_eq!(encode_500m(34.976, 135.749)?, 20523535792);
        assert_eq!(encode_500m(34.983, 135.738)?, 20523535793);
        assert_eq!(encode_500m(34.983, 135.749)?, 20523535794);
        Ok(())
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(matches!(
            encode(90.5, 0.0, MeshLevel::Km1),
            Err(MeshError::CoordinateOutOfRange { .. })
        ));
        assert!(encode(0.0, -180.1, MeshLevel::Km1).is_err());
        assert!(encode(f64::NAN, 0.0, MeshLevel::Km1).is_err());
    }

    #[test]
    fn test_encode_level_ordinal() -> Result<(), MeshError> {
        assert_eq!(encode_level(34.9773063, 135.7402153, 3)?, 2052353579);
        assert_eq!(
            encode_level(34.9773063, 135.7402153, 0),
            Err(MeshError::InvalidLevel(0))
        );
        assert!(encode_level(34.9773063, 135.7402153, 7).is_err());
        Ok(())
    }

    #[test]
    fn test_encode_is_deterministic() -> Result<(), MeshError> {
        let a = encode(-12.5, 170.25, MeshLevel::M125)?;
        let b = encode(-12.5, 170.25, MeshLevel::M125)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_tuple_point_and_batch_agree() -> Result<(), MeshError> {
        let coords = vec![(135.7402153, 34.9773063), (-58.0, -34.0), (2.35, 48.85)];
        let batch = encode_batch(&coords, MeshLevel::Km1)?;

        for (coord, code) in coords.iter().zip(&batch) {
            assert_eq!(encode_coord(coord, MeshLevel::Km1)?, *code);
            let point = Point::new(coord.0, coord.1);
            assert_eq!(encode_coord(&point, MeshLevel::Km1)?, *code);
        }
        Ok(())
    }

    #[test]
    fn test_batch_fails_on_bad_coordinate() {
        let coords = vec![(135.0, 35.0), (135.0, 95.0)];
        assert!(encode_batch(&coords, MeshLevel::Km1).is_err());
    }
}
