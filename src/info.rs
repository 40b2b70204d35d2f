use crate::bmp::BmpPermissiveness;
use crate::bmp::decode::validate;
use crate::bmp::header::BmpHeader;
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::PixelLayout;

/// Image metadata read from the header alone, without touching pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Byte offset of the pixel payload.
    pub data_offset: u32,
    /// On-disk bytes per row, including padding.
    pub stride: usize,
}

impl ImageInfo {
    /// Read image geometry from a BMP header without decoding pixels.
    ///
    /// Applies the same format checks as a standard decode, but no resource
    /// limits and no check that the payload is actually present.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BmpError> {
        let header = BmpHeader::parse(data)?;
        let geo = validate(header, BmpPermissiveness::Standard, &Limits::none(), None)?;
        Ok(Self {
            width: geo.width,
            height: geo.height,
            layout: geo.layout,
            data_offset: geo.header.offset_data,
            stride: geo.stride,
        })
    }
}
