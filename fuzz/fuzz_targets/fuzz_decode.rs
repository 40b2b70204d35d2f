#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // In-memory, stream and header-only paths must never panic
    let _ = zenbmp::decode_bmp(data, enough::Unstoppable);
    let _ = zenbmp::ImageInfo::from_bytes(data);

    let mut codec = zenbmp::BmpCodec::new()
        .with_permissiveness(zenbmp::BmpPermissiveness::Strict);
    let _ = codec.read(&mut std::io::Cursor::new(data), enough::Unstoppable);
});
