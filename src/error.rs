use std::path::Path;

use enough::StopReason;

/// Errors from BMP decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    /// The input does not start with the `BM` signature.
    #[error("not a BMP file (missing BM signature)")]
    NotBmp,

    /// A well-formed BMP that uses a variant this codec does not handle
    /// (compression, bit depth, top-down rows, palettes).
    #[error("unsupported BMP variant: {0}")]
    Unsupported(String),

    #[error("invalid BMP header: {0}")]
    InvalidHeader(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelLayout,
        actual: crate::PixelLayout,
    },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl BmpError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BmpError::Io {
            context: context.into(),
            source,
        }
    }

    /// Name `path` in the context of an I/O error raised while working on it.
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            BmpError::Io { context, source } => BmpError::Io {
                context: format!("{context} in {}", path.display()),
                source,
            },
            other => other,
        }
    }

    /// The input was not a BMP, or was a BMP this codec refuses to decode.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            BmpError::NotBmp | BmpError::Unsupported(_) | BmpError::InvalidHeader(_)
        )
    }

    /// Reading or writing the underlying stream failed, or in-memory input
    /// ended early.
    pub fn is_io_error(&self) -> bool {
        matches!(self, BmpError::Io { .. } | BmpError::UnexpectedEof)
    }
}

impl From<StopReason> for BmpError {
    fn from(r: StopReason) -> Self {
        BmpError::Cancelled(r)
    }
}
