//! Fixture builders shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

/// Deterministic top-down RGB test pattern.
pub fn pattern_rgb(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            out.push((x * 255 / width.max(1)) as u8);
            out.push((y * 255 / height.max(1)) as u8);
            out.push(((x + y) * 17 % 256) as u8);
        }
    }
    out
}

/// Build a 24-bit BMP from top-down RGB rows, padding rows to 4 bytes
/// when `padded` is set.
pub fn bmp_from_top_down(width: u32, height: u32, rgb: &[u8], padded: bool) -> Vec<u8> {
    let row = width as usize * 3;
    let stride = if padded { (row + 3) & !3 } else { row };
    let mut raster = Vec::with_capacity(stride * height as usize);
    for src in rgb.chunks_exact(row).rev() {
        for px in src.chunks_exact(3) {
            raster.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        raster.resize(raster.len() + stride - row, 0);
    }
    bmp_with_raster(width, height, raster.len() as u32, &raster)
}

/// Build a BMP with an arbitrary declared raster size and raster bytes.
pub fn bmp_with_raster(width: u32, height: u32, declared: u32, raster: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(54 + raster.len());
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(54 + raster.len() as u32).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&declared.to_le_bytes());
    out.extend_from_slice(&[0; 16]);
    out.extend_from_slice(raster);
    out
}

/// Encode top-down pixels as PNG.
pub fn png_bytes(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }
    out
}

/// Encode top-down pixels as baseline JPEG.
pub fn jpeg_bytes(
    width: u32,
    height: u32,
    color: image::ExtendedColorType,
    data: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 95)
        .encode(data, width, height, color)
        .unwrap();
    out
}

/// Baseline 8x8 JPEG with four components (Adobe-style CMYK), every
/// block flat. One-code Huffman tables keep the scan to a single byte.
pub fn cmyk_jpeg_bytes() -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    // quantization table 0, all ones
    out.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    out.extend_from_slice(&[1; 64]);
    // baseline frame: 8 bit, 8x8, 4 components, 1x1 sampling
    out.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x14, 8, 0, 8, 0, 8, 4]);
    for id in 1..=4 {
        out.extend_from_slice(&[id, 0x11, 0]);
    }
    // DC and AC tables 0, each a single 1-bit code for symbol 0
    for class in [0x00, 0x10] {
        out.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, class, 1]);
        out.extend_from_slice(&[0; 15]);
        out.push(0);
    }
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x0E, 4]);
    for id in 1..=4 {
        out.extend_from_slice(&[id, 0x00]);
    }
    out.extend_from_slice(&[0, 63, 0]);
    // four blocks of (DC diff 0, EOB): eight zero bits
    out.push(0x00);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// Write `bytes` to a per-process temp file and return its path.
pub fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("rasterload-{}-{name}", std::process::id()));
    std::fs::write(&path, bytes).unwrap();
    path
}
