//! BMP encoder: uncompressed 8-bit (grayscale palette), 24-bit and 32-bit BMP.

use std::io::Write;

use enough::Stop;
use log::debug;

use super::header::{BmpHeader, padded_row_bytes};
use super::palette::palette_bytes;
use crate::error::BmpError;

/// Write a complete BMP file for `pixels` described by `header`.
///
/// Derived fields (sizes and offsets) are recomputed from the header's
/// geometry; whatever the caller's header held for them is ignored. Returns
/// the header that was actually written.
///
/// A failed write leaves whatever was already written in `out`.
pub(crate) fn write_bmp<W: Write>(
    out: &mut W,
    header: &BmpHeader,
    pixels: &[u8],
    stop: &dyn Stop,
) -> Result<BmpHeader, BmpError> {
    let header = header.with_derived_fields()?;
    let layout = header.layout()?;
    let width = header.width_u32()?;
    let height = header.height_u32()?;
    let too_large = || BmpError::DimensionsTooLarge { width, height };

    let row_bytes = (width as usize)
        .checked_mul(layout.bytes_per_pixel())
        .ok_or_else(too_large)?;
    let expected = row_bytes
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;
    if pixels.len() < expected {
        return Err(BmpError::BufferTooSmall {
            needed: expected,
            actual: pixels.len(),
        });
    }
    let stride = padded_row_bytes(width, header.bits_per_pixel).ok_or_else(too_large)?;

    debug!(
        "encoding {width}x{height} {layout:?} BMP: stride {stride}, {} bytes",
        header.file_size
    );

    stop.check()?;

    out.write_all(&header.to_bytes())
        .map_err(|e| BmpError::io("writing BMP header", e))?;
    if header.palette_bytes() > 0 {
        out.write_all(palette_bytes())
            .map_err(|e| BmpError::io("writing BMP palette", e))?;
    }

    if row_bytes > 0 {
        // Padding bytes past row_bytes stay zero for every row.
        let mut scanline = vec![0u8; stride];
        for (row_idx, src) in pixels[..expected].rchunks_exact(row_bytes).enumerate() {
            if row_idx % 16 == 0 {
                stop.check()?;
            }
            scanline[..row_bytes].copy_from_slice(src);
            out.write_all(&scanline)
                .map_err(|e| BmpError::io(format!("writing pixel row {row_idx}"), e))?;
        }
    }

    Ok(header)
}

/// Encode to an in-memory BMP file.
pub(crate) fn encode_to_vec(
    header: &BmpHeader,
    pixels: &[u8],
    stop: &dyn Stop,
) -> Result<Vec<u8>, BmpError> {
    let derived = header.with_derived_fields()?;
    let mut out = Vec::with_capacity(derived.file_size as usize);
    write_bmp(&mut out, &derived, pixels, stop)?;
    Ok(out)
}
