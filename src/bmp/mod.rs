//! BMP wire format: header record, grayscale palette, payload codec.
//!
//! Use [`crate::BmpCodec`] or the top-level [`crate::decode_bmp`] /
//! [`crate::encode_bmp`] functions.

pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod header;
pub(crate) mod palette;

pub use decode::BmpPermissiveness;
pub use header::{
    BMP_MAGIC, BmpHeader, DEFAULT_PIXELS_PER_METER, FILE_HEADER_SIZE, HEADER_SIZE,
    INFO_HEADER_SIZE, padded_row_bytes,
};
pub use palette::{GRAYSCALE_PALETTE, PALETTE_BYTES};
