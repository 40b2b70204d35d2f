//! BMP decoder for uncompressed, bottom-up 8/24/32-bit files.
//!
//! Header validation is shared between the in-memory and stream paths; both
//! produce an unpadded, top-down buffer in the file's native byte order.

use std::io::{Read, Seek, SeekFrom};

use enough::Stop;
use log::trace;

use super::header::{BmpHeader, FILE_HEADER_SIZE, HEADER_SIZE, INFO_HEADER_SIZE, padded_row_bytes};
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::PixelLayout;

// ── Permissiveness ──────────────────────────────────────────────────

/// Controls how strictly the BMP decoder validates input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BmpPermissiveness {
    /// Reject files that deviate from a canonical BITMAPINFOHEADER file even
    /// in non-critical ways. Validates: info header size is exactly 40,
    /// colors-in-palette is 0, file size matches, image data size field is
    /// 0 or exact, resolution is non-negative.
    Strict,

    /// Default behavior. Accept larger info headers and ignore fields that
    /// don't affect pixel decoding (file size, image data size, DPI).
    /// Reject: planes != 1, palettes with more than 256 entries.
    #[default]
    Standard,
}

// ── Compression names (for error messages only) ─────────────────────

fn compression_name(method: u32) -> &'static str {
    match method {
        1 => "RLE8",
        2 => "RLE4",
        3 => "BITFIELDS",
        4 => "JPEG",
        5 => "PNG",
        6 => "ALPHABITFIELDS",
        _ => "unknown",
    }
}

// ── Validated geometry ──────────────────────────────────────────────

/// Everything the payload copy needs, derived once from a validated header.
pub(crate) struct Geometry {
    pub header: BmpHeader,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Bytes of real pixel data per row.
    pub row_bytes: usize,
    /// On-disk bytes per row, including padding.
    pub stride: usize,
    /// `height * stride`.
    pub payload_len: usize,
    /// Size of the decoded, unpadded buffer.
    pub output_len: usize,
}

/// Validate a parsed header and derive the payload geometry.
///
/// `data_len` is the total input size when known; it bounds `offset_data`
/// and the payload before anything is allocated.
pub(crate) fn validate(
    header: BmpHeader,
    permissiveness: BmpPermissiveness,
    limits: &Limits,
    data_len: Option<u64>,
) -> Result<Geometry, BmpError> {
    let is_strict = permissiveness == BmpPermissiveness::Strict;

    if header.compression != 0 {
        return Err(BmpError::Unsupported(format!(
            "compression method {} ({})",
            header.compression,
            compression_name(header.compression)
        )));
    }

    if header.header_size < INFO_HEADER_SIZE {
        return Err(BmpError::Unsupported(format!(
            "info header size {} (need at least {INFO_HEADER_SIZE})",
            header.header_size
        )));
    }
    if is_strict && header.header_size != INFO_HEADER_SIZE {
        return Err(BmpError::Unsupported(format!(
            "info header size {} (strict mode requires {INFO_HEADER_SIZE})",
            header.header_size
        )));
    }

    if header.planes != 1 {
        return Err(BmpError::InvalidHeader(format!(
            "BMP planes field is {}, expected 1",
            header.planes
        )));
    }

    let layout = header.layout()?;

    let width = header.width_u32()?;
    let height = header.height_u32()?;
    if width == 0 {
        return Err(BmpError::InvalidHeader("BMP width is zero".into()));
    }
    if height == 0 {
        return Err(BmpError::Unsupported("BMP height is zero".into()));
    }

    if header.colors_in_palette != 0 {
        if is_strict {
            return Err(BmpError::Unsupported(format!(
                "explicit palette of {} colors",
                header.colors_in_palette
            )));
        }
        if layout == PixelLayout::Gray8 && header.colors_in_palette > 256 {
            return Err(BmpError::InvalidHeader(format!(
                "BMP palette count ({}) exceeds max for 8-bit depth (256)",
                header.colors_in_palette
            )));
        }
    }

    let palette_start = (FILE_HEADER_SIZE as u64) + u64::from(header.header_size);
    if u64::from(header.offset_data) < palette_start {
        return Err(BmpError::InvalidHeader(format!(
            "pixel data offset {} overlaps the {palette_start}-byte header",
            header.offset_data
        )));
    }

    let too_large = || BmpError::DimensionsTooLarge { width, height };
    let stride = padded_row_bytes(width, header.bits_per_pixel).ok_or_else(too_large)?;
    let payload_len = stride
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;
    let row_bytes = (width as usize)
        .checked_mul(layout.bytes_per_pixel())
        .ok_or_else(too_large)?;
    let output_len = row_bytes
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;

    if is_strict {
        if header.image_size != 0 && header.image_size as usize != payload_len {
            return Err(BmpError::InvalidHeader(format!(
                "BMP image data size field ({}) doesn't match expected ({payload_len})",
                header.image_size
            )));
        }
        if header.x_pixels_per_meter < 0 || header.y_pixels_per_meter < 0 {
            return Err(BmpError::InvalidHeader(format!(
                "BMP resolution is negative ({}x{})",
                header.x_pixels_per_meter, header.y_pixels_per_meter
            )));
        }
        if let Some(len) = data_len {
            if u64::from(header.file_size) != len {
                return Err(BmpError::InvalidHeader(format!(
                    "BMP file size field ({}) doesn't match actual size ({len})",
                    header.file_size
                )));
            }
        }
    }

    if let Some(len) = data_len {
        let end = u64::from(header.offset_data)
            .checked_add(payload_len as u64)
            .ok_or_else(too_large)?;
        if end > len {
            return Err(BmpError::UnexpectedEof);
        }
    }

    limits.check(width, height)?;
    limits.check_memory(output_len)?;

    trace!("BMP width: {width}");
    trace!("BMP height: {height}");
    trace!("BMP bit depth: {}", header.bits_per_pixel);
    trace!("BMP pixel data offset: {}", header.offset_data);
    trace!("BMP stride: {stride} (row bytes {row_bytes})");

    Ok(Geometry {
        header,
        width,
        height,
        layout,
        row_bytes,
        stride,
        payload_len,
        output_len,
    })
}

// ── In-memory decode ────────────────────────────────────────────────

/// Decode a complete BMP file held in memory.
pub(crate) fn decode_bytes(
    data: &[u8],
    permissiveness: BmpPermissiveness,
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<(BmpHeader, Vec<u8>), BmpError> {
    let header = BmpHeader::parse(data)?;
    let geo = validate(header, permissiveness, limits, Some(data.len() as u64))?;

    let start = geo.header.offset_data as usize;
    let payload = data
        .get(start..start + geo.payload_len)
        .ok_or(BmpError::UnexpectedEof)?;

    stop.check()?;
    let mut pixels = vec![0u8; geo.output_len];
    // Disk rows are bottom-up: the first stored row is the last output row.
    for (row_idx, (out, src)) in pixels
        .rchunks_exact_mut(geo.row_bytes)
        .zip(payload.chunks_exact(geo.stride))
        .enumerate()
    {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        out.copy_from_slice(&src[..geo.row_bytes]);
    }

    Ok((geo.header, pixels))
}

// ── Stream decode ───────────────────────────────────────────────────

/// Decode a BMP file from a seekable stream positioned at its first byte.
///
/// Offsets in the header are relative to that starting position. The stream
/// length bounds the declared payload before the pixel buffer is allocated.
pub(crate) fn decode_reader<R: Read + Seek>(
    reader: &mut R,
    permissiveness: BmpPermissiveness,
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<(BmpHeader, Vec<u8>), BmpError> {
    let origin = reader
        .stream_position()
        .map_err(|e| BmpError::io("querying stream position", e))?;

    let mut raw = [0u8; HEADER_SIZE];
    reader
        .read_exact(&mut raw[..2])
        .map_err(|e| BmpError::io("reading BMP signature", e))?;
    if raw[..2] != *b"BM" {
        return Err(BmpError::NotBmp);
    }
    reader
        .read_exact(&mut raw[2..])
        .map_err(|e| BmpError::io("reading BMP header", e))?;
    let header = BmpHeader::parse(&raw)?;

    let end = reader
        .seek(SeekFrom::End(0))
        .map_err(|e| BmpError::io("measuring stream length", e))?;
    let data_len = end.saturating_sub(origin);

    let geo = validate(header, permissiveness, limits, Some(data_len))?;

    reader
        .seek(SeekFrom::Start(origin + u64::from(geo.header.offset_data)))
        .map_err(|e| BmpError::io("seeking to pixel data", e))?;

    stop.check()?;
    let mut pixels = vec![0u8; geo.output_len];
    let mut scanline = vec![0u8; geo.stride];
    for (row_idx, out) in pixels.rchunks_exact_mut(geo.row_bytes).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        reader
            .read_exact(&mut scanline)
            .map_err(|e| BmpError::io(format!("reading pixel row {row_idx}"), e))?;
        out.copy_from_slice(&scanline[..geo.row_bytes]);
    }

    Ok((geo.header, pixels))
}
