#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let mut codec = BmpCodec::new();
    if codec.decode_bytes(data, enough::Unstoppable).is_err() {
        return;
    }

    let reencoded = codec
        .encode_to_vec(enough::Unstoppable)
        .expect("re-encoding a decoded image failed");
    let Ok((header2, pixels2)) = decode_bmp(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    let view = codec.view();
    assert_eq!(view.pixels(), &pixels2[..], "roundtrip pixel mismatch");
    assert_eq!(view.width() as i32, header2.width);
    assert_eq!(view.height() as i32, header2.height);
    assert_eq!(header2.file_size as usize, reencoded.len());
});
