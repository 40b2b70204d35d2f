use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use enough::Stop;

use crate::bmp::BmpPermissiveness;
use crate::bmp::header::BmpHeader;
use crate::bmp::{decode, encode};
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::PixelLayout;
use crate::view::ImageView;

/// A BMP image held in memory: header record plus top-down, unpadded pixels.
///
/// A codec starts empty, is populated by a decode or by
/// [`BmpCodec::store_view`] (directly or through one of the `encode_view*`
/// methods), and can then be viewed or written any number of times. A failed
/// decode leaves the previous contents untouched.
///
/// ```
/// use enough::Unstoppable;
/// use zenbmp::{BmpCodec, ImageView, PixelLayout};
///
/// let pixels = [0u8, 0, 255, 0, 255, 0]; // one red, one green BGR pixel
/// let view = ImageView::new(&pixels, 2, 1, PixelLayout::Bgr8)?;
///
/// let mut codec = BmpCodec::new();
/// let bytes = codec.encode_view_to_vec(view, Unstoppable)?;
///
/// let mut decoded = BmpCodec::new();
/// decoded.decode_bytes(&bytes, Unstoppable)?;
/// assert_eq!(decoded.view().pixels(), &pixels);
/// # Ok::<(), zenbmp::BmpError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct BmpCodec {
    header: BmpHeader,
    pixels: Vec<u8>,
    populated: bool,
    limits: Limits,
    permissiveness: BmpPermissiveness,
}

impl BmpCodec {
    /// An empty codec with default limits and standard permissiveness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resource limits applied to every decode.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set how strictly headers are validated on decode.
    pub fn with_permissiveness(mut self, permissiveness: BmpPermissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    // ── Decode ──────────────────────────────────────────────────────

    /// Decode a complete BMP file held in memory, replacing the contents.
    pub fn decode_bytes(&mut self, data: &[u8], stop: impl Stop) -> Result<(), BmpError> {
        let (header, pixels) =
            decode::decode_bytes(data, self.permissiveness, &self.limits, &stop)?;
        self.replace(header, pixels);
        Ok(())
    }

    /// Decode from a seekable stream positioned at the start of a BMP file.
    pub fn read<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        stop: impl Stop,
    ) -> Result<(), BmpError> {
        let (header, pixels) =
            decode::decode_reader(reader, self.permissiveness, &self.limits, &stop)?;
        self.replace(header, pixels);
        Ok(())
    }

    /// Decode the BMP file at `path`.
    pub fn read_file(&mut self, path: impl AsRef<Path>, stop: impl Stop) -> Result<(), BmpError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| BmpError::io(format!("opening {}", path.display()), e))?;
        self.read(&mut BufReader::new(file), stop).map_err(|e| e.in_file(path))
    }

    // ── Encode ──────────────────────────────────────────────────────

    /// Write the stored image as a BMP file to `writer`.
    ///
    /// An empty codec writes a header-only, zero-sized image.
    pub fn write<W: Write>(&self, writer: &mut W, stop: impl Stop) -> Result<(), BmpError> {
        encode::write_bmp(writer, &self.header, &self.pixels, &stop)?;
        Ok(())
    }

    /// Write the stored image to a new file at `path`, truncating any
    /// existing file. A failure part-way leaves a truncated file behind.
    pub fn write_file(&self, path: impl AsRef<Path>, stop: impl Stop) -> Result<(), BmpError> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| BmpError::io(format!("creating {}", path.display()), e))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, stop).map_err(|e| e.in_file(path))?;
        writer
            .flush()
            .map_err(|e| BmpError::io(format!("flushing {}", path.display()), e))
    }

    /// Encode the stored image into a new byte vector.
    pub fn encode_to_vec(&self, stop: impl Stop) -> Result<Vec<u8>, BmpError> {
        encode::encode_to_vec(&self.header, &self.pixels, &stop)
    }

    /// Replace the contents with a copy of `view`.
    ///
    /// Width, height and bit depth come from the view; reserved and
    /// resolution fields of the current header carry over.
    pub fn store_view(&mut self, view: ImageView<'_>) -> Result<(), BmpError> {
        let header = self
            .header
            .with_geometry(view.width(), view.height(), view.layout())?;
        self.replace(header, view.pixels().to_vec());
        Ok(())
    }

    /// Store `view`, then write it as a BMP file to `writer`.
    pub fn encode_view<W: Write>(
        &mut self,
        view: ImageView<'_>,
        writer: &mut W,
        stop: impl Stop,
    ) -> Result<(), BmpError> {
        self.store_view(view)?;
        self.write(writer, stop)
    }

    /// Store `view`, then write it to a new file at `path`.
    pub fn encode_view_to_file(
        &mut self,
        view: ImageView<'_>,
        path: impl AsRef<Path>,
        stop: impl Stop,
    ) -> Result<(), BmpError> {
        self.store_view(view)?;
        self.write_file(path, stop)
    }

    /// Store `view`, then encode it into a new byte vector.
    pub fn encode_view_to_vec(
        &mut self,
        view: ImageView<'_>,
        stop: impl Stop,
    ) -> Result<Vec<u8>, BmpError> {
        self.store_view(view)?;
        self.encode_to_vec(stop)
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Borrow the stored image. Empty codecs return [`ImageView::empty`].
    pub fn view(&self) -> ImageView<'_> {
        if !self.populated {
            return ImageView::empty();
        }
        match (
            self.header.width_u32(),
            self.header.height_u32(),
            self.header.layout(),
        ) {
            (Ok(w), Ok(h), Ok(layout)) => ImageView::from_parts(&self.pixels, w, h, layout),
            _ => ImageView::empty(),
        }
    }

    /// The stored header. After a decode this is the header as read; after
    /// [`BmpCodec::store_view`] it holds the derived fields that will be written.
    pub fn header(&self) -> &BmpHeader {
        &self.header
    }

    /// Layout of the stored pixels, or `None` when empty.
    pub fn layout(&self) -> Option<PixelLayout> {
        self.populated.then(|| self.header.layout().ok()).flatten()
    }

    /// Whether a decode or store has succeeded.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Take ownership of the pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    fn replace(&mut self, header: BmpHeader, pixels: Vec<u8>) {
        self.header = header;
        self.pixels = pixels;
        self.populated = true;
    }
}
