//! The 54-byte BMP file header + BITMAPINFOHEADER record.
//!
//! Serialized field by field in little-endian order. The in-memory struct
//! layout has nothing to do with the wire layout.

use crate::error::BmpError;
use crate::pixel::PixelLayout;

use super::palette::PALETTE_BYTES;

/// Size of the BITMAPFILEHEADER part.
pub const FILE_HEADER_SIZE: usize = 14;
/// Size of BITMAPINFOHEADER, the only info header this codec writes.
pub const INFO_HEADER_SIZE: u32 = 40;
/// Total fixed header size on disk.
pub const HEADER_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE as usize;
/// `"BM"` read as a little-endian u16.
pub const BMP_MAGIC: u16 = 0x4D42;
/// 72 DPI expressed in pixels per meter.
pub const DEFAULT_PIXELS_PER_METER: i32 = 2835;

/// On-disk stride of one row: `((width * bits_per_pixel + 31) / 32) * 4`.
///
/// Returns `None` on overflow.
pub fn padded_row_bytes(width: u32, bits_per_pixel: u16) -> Option<usize> {
    (width as usize)
        .checked_mul(usize::from(bits_per_pixel))?
        .checked_add(31)
        .map(|bits| bits / 32 * 4)
}

/// BMP file header and info header, as stored on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BmpHeader {
    pub magic: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Byte offset of the pixel payload from the start of the file.
    pub offset_data: u32,
    pub header_size: u32,
    pub width: i32,
    /// Positive means bottom-up rows, negative means top-down.
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_in_palette: u32,
    pub important_colors: u32,
}

impl Default for BmpHeader {
    fn default() -> Self {
        Self {
            magic: BMP_MAGIC,
            file_size: 0,
            reserved1: 0,
            reserved2: 0,
            offset_data: HEADER_SIZE as u32,
            header_size: INFO_HEADER_SIZE,
            width: 0,
            height: 0,
            planes: 1,
            bits_per_pixel: 24,
            compression: 0,
            image_size: 0,
            x_pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            y_pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            colors_in_palette: 0,
            important_colors: 0,
        }
    }
}

impl BmpHeader {
    /// Read the fixed header from the start of `data`.
    ///
    /// Only the signature is checked here; field validation happens in the
    /// decoder, which knows the permissiveness level.
    pub fn parse(data: &[u8]) -> Result<Self, BmpError> {
        let mut c = Cursor::new(data);
        let magic = c.get_u16_le()?;
        if magic != BMP_MAGIC {
            return Err(BmpError::NotBmp);
        }
        Ok(Self {
            magic,
            file_size: c.get_u32_le()?,
            reserved1: c.get_u16_le()?,
            reserved2: c.get_u16_le()?,
            offset_data: c.get_u32_le()?,
            header_size: c.get_u32_le()?,
            width: c.get_i32_le()?,
            height: c.get_i32_le()?,
            planes: c.get_u16_le()?,
            bits_per_pixel: c.get_u16_le()?,
            compression: c.get_u32_le()?,
            image_size: c.get_u32_le()?,
            x_pixels_per_meter: c.get_i32_le()?,
            y_pixels_per_meter: c.get_i32_le()?,
            colors_in_palette: c.get_u32_le()?,
            important_colors: c.get_u32_le()?,
        })
    }

    /// Serialize to the 54-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut pos = 0;
        let mut put = |bytes: &[u8]| {
            out[pos..pos + bytes.len()].copy_from_slice(bytes);
            pos += bytes.len();
        };

        // File header (14 bytes)
        put(&self.magic.to_le_bytes());
        put(&self.file_size.to_le_bytes());
        put(&self.reserved1.to_le_bytes());
        put(&self.reserved2.to_le_bytes());
        put(&self.offset_data.to_le_bytes());

        // BITMAPINFOHEADER (40 bytes)
        put(&self.header_size.to_le_bytes());
        put(&self.width.to_le_bytes());
        put(&self.height.to_le_bytes());
        put(&self.planes.to_le_bytes());
        put(&self.bits_per_pixel.to_le_bytes());
        put(&self.compression.to_le_bytes());
        put(&self.image_size.to_le_bytes());
        put(&self.x_pixels_per_meter.to_le_bytes());
        put(&self.y_pixels_per_meter.to_le_bytes());
        put(&self.colors_in_palette.to_le_bytes());
        put(&self.important_colors.to_le_bytes());
        out
    }

    /// Pixel layout implied by `bits_per_pixel`.
    pub fn layout(&self) -> Result<PixelLayout, BmpError> {
        PixelLayout::from_bits_per_pixel(self.bits_per_pixel)
    }

    /// Palette bytes that follow the header on disk when written by this codec.
    pub fn palette_bytes(&self) -> usize {
        if self.bits_per_pixel == 8 {
            PALETTE_BYTES
        } else {
            0
        }
    }

    /// Width as an unsigned pixel count.
    pub(crate) fn width_u32(&self) -> Result<u32, BmpError> {
        u32::try_from(self.width)
            .map_err(|_| BmpError::InvalidHeader(format!("BMP width is negative ({})", self.width)))
    }

    /// Height as an unsigned row count. Top-down (negative) heights are refused.
    pub(crate) fn height_u32(&self) -> Result<u32, BmpError> {
        u32::try_from(self.height).map_err(|_| {
            BmpError::Unsupported(format!(
                "top-down row order (height {}) is not supported",
                self.height
            ))
        })
    }

    /// Header for an image of the given geometry, keeping this header's
    /// reserved, resolution and important-colors fields.
    pub(crate) fn with_geometry(
        &self,
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Result<Self, BmpError> {
        let too_large = BmpError::DimensionsTooLarge { width, height };
        let mut header = self.clone();
        header.width = i32::try_from(width).map_err(|_| too_large)?;
        header.height = i32::try_from(height).map_err(|_| BmpError::DimensionsTooLarge {
            width,
            height,
        })?;
        header.bits_per_pixel = layout.bits_per_pixel();
        header.with_derived_fields()
    }

    /// Recompute every field that follows from geometry, as written on encode.
    ///
    /// Signature, info header size, planes, compression and both palette
    /// counts are normalized to the single variant this codec emits.
    pub(crate) fn with_derived_fields(&self) -> Result<Self, BmpError> {
        let width = self.width_u32()?;
        let height = self.height_u32()?;
        let too_large = || BmpError::DimensionsTooLarge { width, height };

        let stride = padded_row_bytes(width, self.bits_per_pixel).ok_or_else(too_large)?;
        let image_size = stride
            .checked_mul(height as usize)
            .and_then(|s| u32::try_from(s).ok())
            .ok_or_else(too_large)?;
        let offset_data = (HEADER_SIZE + self.palette_bytes()) as u32;
        let file_size = offset_data.checked_add(image_size).ok_or_else(too_large)?;

        Ok(Self {
            magic: BMP_MAGIC,
            file_size,
            offset_data,
            header_size: INFO_HEADER_SIZE,
            planes: 1,
            compression: 0,
            image_size,
            colors_in_palette: 0,
            important_colors: 0,
            ..self.clone()
        })
    }
}

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BmpError> {
        let end = self.pos.checked_add(N).ok_or(BmpError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(BmpError::UnexpectedEof)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        self.pos = end;
        Ok(buf)
    }

    fn get_u16_le(&mut self) -> Result<u16, BmpError> {
        self.read_fixed_bytes().map(u16::from_le_bytes)
    }

    fn get_u32_le(&mut self) -> Result<u32, BmpError> {
        self.read_fixed_bytes().map(u32::from_le_bytes)
    }

    fn get_i32_le(&mut self) -> Result<i32, BmpError> {
        self.read_fixed_bytes().map(i32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_padded_to_four_bytes() {
        assert_eq!(padded_row_bytes(1, 24), Some(4));
        assert_eq!(padded_row_bytes(4, 24), Some(12));
        assert_eq!(padded_row_bytes(3, 8), Some(4));
        assert_eq!(padded_row_bytes(5, 8), Some(8));
        assert_eq!(padded_row_bytes(3, 32), Some(12));
        assert_eq!(padded_row_bytes(0, 24), Some(0));
    }

    #[test]
    fn header_bytes_parse_back() {
        let header = BmpHeader {
            width: 7,
            height: 3,
            reserved1: 0xBEEF,
            reserved2: 0x1234,
            x_pixels_per_meter: 3780,
            ..BmpHeader::default()
        }
        .with_derived_fields()
        .unwrap();
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(BmpHeader::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn fields_land_at_fixed_offsets() {
        let header = BmpHeader {
            width: 2,
            height: 2,
            ..BmpHeader::default()
        }
        .with_derived_fields()
        .unwrap();
        let b = header.to_bytes();
        let u32_at = |o: usize| u32::from_le_bytes([b[o], b[o + 1], b[o + 2], b[o + 3]]);
        assert_eq!(u32_at(2), 54 + 16);
        assert_eq!(u32_at(10), 54);
        assert_eq!(u32_at(14), 40);
        assert_eq!(u32_at(18), 2);
        assert_eq!(u32_at(22), 2);
        assert_eq!(u16::from_le_bytes([b[26], b[27]]), 1);
        assert_eq!(u16::from_le_bytes([b[28], b[29]]), 24);
        assert_eq!(u32_at(30), 0);
        assert_eq!(u32_at(34), 16);
        assert_eq!(u32_at(38), 2835);
        assert_eq!(u32_at(42), 2835);
        assert_eq!(u32_at(46), 0);
        assert_eq!(u32_at(50), 0);
    }

    #[test]
    fn derived_fields_account_for_palette() {
        let gray = BmpHeader::default()
            .with_geometry(3, 2, PixelLayout::Gray8)
            .unwrap();
        assert_eq!(gray.image_size, 8);
        assert_eq!(gray.offset_data, 54 + 1024);
        assert_eq!(gray.file_size, gray.offset_data + gray.image_size);

        let bgr = BmpHeader::default()
            .with_geometry(3, 2, PixelLayout::Bgr8)
            .unwrap();
        assert_eq!(bgr.image_size, 24);
        assert_eq!(bgr.offset_data, 54);
        assert_eq!(bgr.file_size, bgr.offset_data + bgr.image_size);
    }

    #[test]
    fn short_input_is_eof() {
        assert!(matches!(
            BmpHeader::parse(b"BM\x00"),
            Err(BmpError::UnexpectedEof)
        ));
        assert!(matches!(BmpHeader::parse(b""), Err(BmpError::UnexpectedEof)));
    }

    #[test]
    fn wrong_signature_is_not_bmp() {
        let mut bytes = BmpHeader::default().to_bytes();
        bytes[0] = b'P';
        assert!(matches!(BmpHeader::parse(&bytes), Err(BmpError::NotBmp)));
    }

    #[test]
    fn geometry_past_u32_is_too_large() {
        let result =
            BmpHeader::default().with_geometry(0x7FFF_FFFF, 0x7FFF_FFFF, PixelLayout::Bgra8);
        assert!(matches!(result, Err(BmpError::DimensionsTooLarge { .. })));
    }
}
