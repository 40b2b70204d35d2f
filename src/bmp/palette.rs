//! The grayscale color table written for 8-bit images.

/// Size of the 256-entry BGRA color table on disk.
pub const PALETTE_BYTES: usize = 256 * 4;

/// Entry `i` is `(B, G, R, A) = (i, i, i, 0)`.
pub static GRAYSCALE_PALETTE: [[u8; 4]; 256] = grayscale_ramp();

const fn grayscale_ramp() -> [[u8; 4]; 256] {
    let mut table = [[0u8; 4]; 256];
    let mut i = 0;
    while i < 256 {
        let v = i as u8;
        table[i] = [v, v, v, 0];
        i += 1;
    }
    table
}

/// The palette as the byte run that follows an 8-bit header.
pub(crate) fn palette_bytes() -> &'static [u8] {
    GRAYSCALE_PALETTE.as_flattened()
}
