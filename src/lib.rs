//! # zenbmp
//!
//! Minimal decoder and encoder for uncompressed Windows bitmaps.
//!
//! ## Supported Formats
//!
//! - BITMAPINFOHEADER files, uncompressed, bottom-up rows
//! - 8-bit grayscale (written with a 256-entry gray ramp palette)
//! - 24-bit BGR and 32-bit BGRA
//!
//! Pixels live in memory top-down, unpadded, in BMP's native byte order
//! (`Gray8`, `Bgr8`, `Bgra8`). Row padding and the bottom-up row order are
//! handled only at the codec boundary.
//!
//! ## Non-Goals
//!
//! - RLE4/RLE8/bitfield compression, 1/2/4/16-bit depths, top-down files
//! - Color conversion (BGR to RGB, color to gray); callers do that
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::{BmpCodec, ImageView, PixelLayout};
//! use enough::Unstoppable;
//!
//! let mut bmp = BmpCodec::new();
//! bmp.read_file("input.bmp", Unstoppable)?;
//! bmp.write_file("copy.bmp", Unstoppable)?;
//!
//! // Hand the pixels to other code, then encode a grayscale result.
//! let img = bmp.view();
//! let gray: Vec<u8> = img
//!     .pixels()
//!     .chunks_exact(img.channels())
//!     .map(|px| px[1])
//!     .collect();
//! let gray_view = ImageView::new(&gray, img.width(), img.height(), PixelLayout::Gray8)?;
//! BmpCodec::new().encode_view_to_file(gray_view, "gray.bmp", Unstoppable)?;
//! # Ok::<(), zenbmp::BmpError>(())
//! ```

#![forbid(unsafe_code)]

pub mod bmp;

mod codec;
mod error;
mod info;
mod limits;
mod pixel;
mod view;

// Re-exports
pub use bmp::{BmpHeader, BmpPermissiveness};
pub use codec::BmpCodec;
pub use enough::{Stop, Unstoppable};
pub use error::BmpError;
pub use info::ImageInfo;
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::BmpPixel;
pub use pixel::PixelLayout;
pub use view::ImageView;

/// Decode an in-memory BMP file with default limits and standard validation.
///
/// Returns the header as read and the top-down, unpadded pixels.
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<(BmpHeader, Vec<u8>), BmpError> {
    bmp::decode::decode_bytes(data, BmpPermissiveness::Standard, &Limits::default(), &stop)
}

/// Encode `view` as a BMP file without copying its pixels first.
pub fn encode_bmp(view: ImageView<'_>, stop: impl Stop) -> Result<Vec<u8>, BmpError> {
    let header = BmpHeader::default().with_geometry(view.width(), view.height(), view.layout())?;
    bmp::encode::encode_to_vec(&header, view.pixels(), &stop)
}
