#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(width: i32, height: i32, bpp: u16, palette: u32, stride: u32) -> Vec<u8> {
    let offset = 54 + palette;
    let image_size = stride * height as u32;
    let mut bmp = vec![0u8; 54];
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&(offset + image_size).to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&offset.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&bpp.to_le_bytes());
    bmp[34..38].copy_from_slice(&image_size.to_le_bytes());
    bmp
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 24-bit: 3 pixel bytes + 1 padding
    let mut bmp24 = header(1, 1, 24, 0, 4);
    bmp24.extend_from_slice(&[0xff, 0x00, 0x00, 0x00]);
    fs::write(format!("{dir}/bmp24_1x1.bmp"), bmp24).unwrap();

    // 2x2 32-bit
    let mut bmp32 = header(2, 2, 32, 0, 8);
    bmp32.extend((0u8..16).collect::<Vec<_>>());
    fs::write(format!("{dir}/bmp32_2x2.bmp"), bmp32).unwrap();

    // 3x2 8-bit with gray palette
    let mut bmp8 = header(3, 2, 8, 1024, 4);
    for i in 0..=255u8 {
        bmp8.extend_from_slice(&[i, i, i, 0]);
    }
    bmp8.extend_from_slice(&[10, 20, 30, 0, 40, 50, 60, 0]);
    fs::write(format!("{dir}/bmp8_3x2.bmp"), bmp8).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/header_only.bin"), header(4, 4, 24, 0, 12)).unwrap();
    let mut rle = header(1, 1, 8, 1024, 4);
    rle[30..34].copy_from_slice(&1u32.to_le_bytes()); // RLE8
    fs::write(format!("{dir}/rle8_header.bin"), rle).unwrap();

    println!("Generated seed corpus in {dir}/");
}
