#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::BmpError;
use crate::pixel::PixelLayout;

/// Borrowed, unpadded, top-down pixel buffer plus its geometry.
///
/// The view never owns its pixels; the buffer it borrows must outlive it.
/// A zero-sized view (see [`ImageView::empty`]) stands for "no image".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
}

impl<'a> ImageView<'a> {
    /// Wrap `data` as a `width` x `height` image.
    ///
    /// `data` must hold at least `width * height * channels` bytes; any
    /// excess is not part of the view.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Result<Self, BmpError> {
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(BmpError::DimensionsTooLarge { width, height });
        }
        let needed = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(layout.bytes_per_pixel()))
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;
        if data.len() < needed {
            return Err(BmpError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            data: &data[..needed],
            width,
            height,
            layout,
        })
    }

    /// Like [`ImageView::new`], with the layout given as a channel count
    /// (1 = gray, 3 = BGR, 4 = BGRA).
    pub fn from_channels(
        data: &'a [u8],
        width: u32,
        height: u32,
        channels: usize,
    ) -> Result<Self, BmpError> {
        Self::new(data, width, height, PixelLayout::from_channels(channels)?)
    }

    /// The zero-geometry view of an unpopulated codec.
    pub fn empty() -> Self {
        Self {
            data: &[],
            width: 0,
            height: 0,
            layout: PixelLayout::Bgr8,
        }
    }

    /// Construct without checks. Callers guarantee `data` is exactly sized.
    pub(crate) fn from_parts(
        data: &'a [u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Self {
        Self {
            data,
            width,
            height,
            layout,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &'a [u8] {
        self.data
    }

    /// Whether the view covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View typed pixels as raw bytes.
    #[cfg(feature = "rgb")]
    pub fn from_pixels<P: crate::BmpPixel>(
        pixels: &'a [P],
        width: u32,
        height: u32,
    ) -> Result<Self, BmpError>
    where
        [P]: rgb::ComponentBytes<u8>,
    {
        use rgb::ComponentBytes as _;
        Self::new(pixels.as_bytes(), width, height, P::layout())
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Returns [`BmpError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::BmpPixel>(&self) -> Result<&'a [P], BmpError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.layout != P::layout() {
            return Err(BmpError::LayoutMismatch {
                expected: P::layout(),
                actual: self.layout,
            });
        }
        let data: &'a [u8] = self.data;
        Ok(data.as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    ///
    /// Returns [`BmpError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::BmpPixel>(&self) -> Result<imgref::ImgRef<'a, P>, BmpError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &'a [P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Copy into an owned [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::BmpPixel>(&self) -> Result<imgref::ImgVec<P>, BmpError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}

impl Default for ImageView<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_trims_excess_bytes() {
        let data = [1u8, 2, 3, 4, 5, 6, 7];
        let view = ImageView::new(&data, 2, 1, PixelLayout::Bgr8).unwrap();
        assert_eq!(view.pixels(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(view.channels(), 3);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let data = [0u8; 5];
        let err = ImageView::new(&data, 2, 1, PixelLayout::Bgr8).unwrap_err();
        assert!(matches!(
            err,
            BmpError::BufferTooSmall {
                needed: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn channel_count_maps_to_layout() {
        let data = [0u8; 8];
        let view = ImageView::from_channels(&data, 1, 2, 4).unwrap();
        assert_eq!(view.layout(), PixelLayout::Bgra8);
        assert!(ImageView::from_channels(&data, 1, 2, 2).is_err());
    }

    #[test]
    fn empty_view_has_no_geometry() {
        let view = ImageView::empty();
        assert!(view.is_empty());
        assert_eq!((view.width(), view.height()), (0, 0));
    }
}
