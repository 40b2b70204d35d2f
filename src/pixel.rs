use crate::error::BmpError;

/// Pixel memory layout of an unpadded, top-down buffer.
///
/// These are exactly the layouts BMP stores natively, so no channel
/// swizzling ever happens at the codec boundary.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Single channel, 8-bit grayscale (palette index into the gray ramp).
    Gray8,
    /// 3 channels, 8-bit BGR.
    Bgr8,
    /// 4 channels, 8-bit BGRA.
    Bgra8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        self.channels()
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Bgr8 => 3,
            Self::Bgra8 => 4,
        }
    }

    /// The `bits_per_pixel` header value for this layout.
    pub fn bits_per_pixel(&self) -> u16 {
        self.channels() as u16 * 8
    }

    /// Layout for a channel count (1, 3 or 4).
    pub fn from_channels(channels: usize) -> Result<Self, BmpError> {
        match channels {
            1 => Ok(Self::Gray8),
            3 => Ok(Self::Bgr8),
            4 => Ok(Self::Bgra8),
            c => Err(BmpError::Unsupported(format!(
                "{c} channels (supported: 1, 3, 4)"
            ))),
        }
    }

    /// Layout for a header `bits_per_pixel` value (8, 24 or 32).
    pub fn from_bits_per_pixel(bpp: u16) -> Result<Self, BmpError> {
        match bpp {
            8 => Ok(Self::Gray8),
            24 => Ok(Self::Bgr8),
            32 => Ok(Self::Bgra8),
            d => Err(BmpError::Unsupported(format!(
                "bit depth {d} (supported: 8, 24, 32)"
            ))),
        }
    }
}

/// Typed pixels that map onto a [`PixelLayout`].
#[cfg(feature = "rgb")]
pub trait BmpPixel: Copy + 'static {
    /// The layout whose bytes this pixel type reinterprets.
    fn layout() -> PixelLayout;
}

#[cfg(feature = "rgb")]
impl BmpPixel for rgb::Gray<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Gray8
    }
}

#[cfg(feature = "rgb")]
impl BmpPixel for rgb::alt::BGR<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Bgr8
    }
}

#[cfg(feature = "rgb")]
impl BmpPixel for rgb::alt::BGRA<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Bgra8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_and_depth_agree() {
        for layout in [PixelLayout::Gray8, PixelLayout::Bgr8, PixelLayout::Bgra8] {
            assert_eq!(
                PixelLayout::from_channels(layout.channels()).unwrap(),
                layout
            );
            assert_eq!(
                PixelLayout::from_bits_per_pixel(layout.bits_per_pixel()).unwrap(),
                layout
            );
        }
    }

    #[test]
    fn rejects_other_depths() {
        assert!(matches!(
            PixelLayout::from_bits_per_pixel(16),
            Err(BmpError::Unsupported(_))
        ));
        assert!(matches!(
            PixelLayout::from_channels(2),
            Err(BmpError::Unsupported(_))
        ));
    }
}
