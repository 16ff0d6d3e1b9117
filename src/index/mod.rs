pub mod constants;
mod decode;
mod encode;
mod fields;
mod level;
mod octant;
mod rounding;
mod ucode;

pub use constants::{CODE_WIDTHS, MAX_GRID_CELLS, MAX_LEVEL, NOMINAL_CELL_SIZES};
pub use decode::{
    MeshBounds, decode, decode_center, decode_ne, decode_nw, decode_se, decode_sw,
    decode_to_latlong, level_of,
};
pub(crate) use decode::decode_with_level;
pub use encode::{
    encode, encode_10km, encode_125m, encode_1km, encode_250m, encode_500m, encode_80km,
    encode_batch, encode_coord, encode_default, encode_level,
};
pub use level::MeshLevel;
pub use octant::AreaOctant;
pub use rounding::truncate_coordinate;
pub use ucode::{UCODE_AUTHORITY, latlong_to_ucode, ucode_to_code, ucode_to_latlong};
