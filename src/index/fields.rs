use crate::error::MeshError;
use crate::index::constants::{
    LAT_STEPS_PER_DEGREE, LON_STEPS_PER_DEGREE, MAX_BAND_LON_FIELD, MAX_LAT_FIELD,
};
use crate::index::level::{MeshLevel, digit_count};
use crate::index::octant::AreaOctant;

const MAX_LAT_STEPS: u64 = 90 * LAT_STEPS_PER_DEGREE as u64;
const MAX_LON_STEPS: u64 = 180 * LON_STEPS_PER_DEGREE as u64;

/// Position of each field in the 13-digit layout
///
/// ```text
/// A PPP UU Q V R W S2 S4 S8
/// 0 1-3 45 6 7 8 9 10 11 12
/// ```
const POS_P: usize = 1;
const POS_U: usize = 4;
const POS_Q: usize = 6;
const POS_V: usize = 7;
const POS_R: usize = 8;
const POS_W: usize = 9;
const POS_S: usize = 10;

/// Position of a cell inside its octant, in finest grid units.
///
/// `lat_steps` counts 3.75" from the equator and `lon_steps` counts 5.625"
/// from the start of the octant's longitude band, both in the normalized
/// (non-negative) quadrant. The steps always name the cell's corner nearest
/// the origin, so they are multiples of the level's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MeshIndex {
    pub octant: AreaOctant,
    pub level: MeshLevel,
    pub lat_steps: u64,
    pub lon_steps: u64,
}

impl MeshIndex {
    /// Locates a validated coordinate at the given level.
    ///
    /// The poles and the antimeridian have no cell of their own: they fall in
    /// the last cell below them.
    pub fn locate(latitude: f64, longitude: f64, level: MeshLevel) -> Self {
        let octant = AreaOctant::of(latitude, longitude);
        let (lat, lon) = octant.normalize(latitude, longitude);
        let lon = lon - octant.band_offset();
        let band_steps = octant.band_offset() as u64 * LON_STEPS_PER_DEGREE as u64;

        let span = level.span_steps();
        let lat_steps = ((lat * LAT_STEPS_PER_DEGREE).floor() as u64).min(MAX_LAT_STEPS - 1);
        let lon_steps =
            ((lon * LON_STEPS_PER_DEGREE).floor() as u64).min(MAX_LON_STEPS - 1 - band_steps);

        Self {
            octant,
            level,
            lat_steps: lat_steps - lat_steps % span,
            lon_steps: lon_steps - lon_steps % span,
        }
    }

    /// Packs the index into a fixed-width grid code.
    pub fn to_code(self) -> u64 {
        let lat = self.lat_steps;
        let lon = self.lon_steps;

        let mut code = u64::from(self.octant.digit());
        code = code * 1000 + lat / 640;
        code = code * 100 + lon / 640;
        if self.level >= MeshLevel::Km10 {
            code = code * 10 + (lat % 640) / 80;
            code = code * 10 + (lon % 640) / 80;
        }
        if self.level >= MeshLevel::Km1 {
            code = code * 10 + (lat % 80) / 8;
            code = code * 10 + (lon % 80) / 8;
        }
        // 1=SW 2=SE 3=NW 4=NE, counted in the normalized quadrant
        for (level, half) in [(MeshLevel::M500, 4), (MeshLevel::M250, 2), (MeshLevel::M125, 1)] {
            if self.level >= level {
                let lat_bit = (lat % (2 * half)) / half;
                let lon_bit = (lon % (2 * half)) / half;
                code = code * 10 + 2 * lat_bit + lon_bit + 1;
            }
        }
        code
    }

    /// Splits a grid code into its fields, rejecting widths, octants and digits
    /// that no coordinate can produce.
    pub fn from_code(code: u64) -> Result<Self, MeshError> {
        let level = MeshLevel::of_code(code)?;
        let width = digit_count(code) as usize;

        let mut digits = [0u64; 13];
        let mut rest = code;
        for slot in digits[..width].iter_mut().rev() {
            *slot = rest % 10;
            rest /= 10;
        }

        let octant = AreaOctant::from_digit(digits[0] as u8)?;
        let bad_digit = |position: usize| MeshError::InvalidGridCodeDigit { code, position };

        let p = digits[POS_P] * 100 + digits[POS_P + 1] * 10 + digits[POS_P + 2];
        let u = digits[POS_U] * 10 + digits[POS_U + 1];
        if p > MAX_LAT_FIELD {
            return Err(bad_digit(POS_P));
        }
        if octant.is_far_band() && u > MAX_BAND_LON_FIELD {
            return Err(bad_digit(POS_U));
        }
        let mut lat_steps = p * 640;
        let mut lon_steps = u * 640;

        if level >= MeshLevel::Km10 {
            let (q, v) = (digits[POS_Q], digits[POS_V]);
            if q > 7 {
                return Err(bad_digit(POS_Q));
            }
            if v > 7 {
                return Err(bad_digit(POS_V));
            }
            lat_steps += q * 80;
            lon_steps += v * 80;
        }
        if level >= MeshLevel::Km1 {
            lat_steps += digits[POS_R] * 8;
            lon_steps += digits[POS_W] * 8;
        }
        for (offset, half) in [4u64, 2, 1].into_iter().enumerate() {
            let position = POS_S + offset;
            if position >= width {
                break;
            }
            let quadrant = digits[position];
            if !(1..=4).contains(&quadrant) {
                return Err(bad_digit(position));
            }
            lat_steps += ((quadrant - 1) / 2) * half;
            lon_steps += ((quadrant - 1) % 2) * half;
        }

        if lat_steps >= MAX_LAT_STEPS {
            return Err(bad_digit(POS_P));
        }
        let band_steps = octant.band_offset() as u64 * LON_STEPS_PER_DEGREE as u64;
        if lon_steps + band_steps >= MAX_LON_STEPS {
            return Err(bad_digit(POS_U));
        }

        Ok(Self {
            octant,
            level,
            lat_steps,
            lon_steps,
        })
    }

    /// Lower corner of the cell in the normalized quadrant, in degrees.
    pub fn normalized_origin(self) -> (f64, f64) {
        (
            self.lat_steps as f64 / LAT_STEPS_PER_DEGREE,
            self.lon_steps as f64 / LON_STEPS_PER_DEGREE + self.octant.band_offset(),
        )
    }
}
