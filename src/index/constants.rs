/// Number of precision levels (80 km down to 125 m)
pub const MAX_LEVEL: u8 = 6;

/// Decimal digit width of a grid code at each level (1-6)
pub const CODE_WIDTHS: [u32; 6] = [6, 8, 10, 11, 12, 13];

/// Nominal cell size in meters at each level (1-6)
pub const NOMINAL_CELL_SIZES: [f64; 6] = [80_000.0, 10_000.0, 1_000.0, 500.0, 250.0, 125.0];

/// Finest latitude unit (3.75 arc-seconds) per degree
pub(crate) const LAT_STEPS_PER_DEGREE: f64 = 960.0;

/// Finest longitude unit (5.625 arc-seconds) per degree
pub(crate) const LON_STEPS_PER_DEGREE: f64 = 640.0;

/// Cell span at each level (1-6), counted in finest units.
///
/// The same counts apply to latitude and longitude: 40'/1deg, 5'/7.5',
/// 30"/45", 15"/22.5", 7.5"/11.25", 3.75"/5.625".
pub(crate) const SPAN_STEPS: [u64; 6] = [640, 80, 8, 4, 2, 1];

/// Offset applied to longitudes in the |lon| >= 100 band
pub(crate) const LONGITUDE_BAND_OFFSET: f64 = 100.0;

/// Largest latitude field value (the band just below the pole)
pub(crate) const MAX_LAT_FIELD: u64 = 134;

/// Largest longitude field value in the >= 100 band (179deg to 180deg)
pub(crate) const MAX_BAND_LON_FIELD: u64 = 79;

/// Upper bound on cells produced by a single grid
pub const MAX_GRID_CELLS: u64 = 1_000_000;
