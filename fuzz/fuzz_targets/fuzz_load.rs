#![no_main]

use std::io::Cursor;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rasterload::config::{BitmapRowLayout, CodecConfig};
use rasterload::{Limits, LoadRequest};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    packed_rows: Option<bool>,
    data: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let rows = match input.packed_rows {
        Some(true) => BitmapRowLayout::Packed,
        Some(false) => BitmapRowLayout::Padded,
        None => BitmapRowLayout::FromDeclaredSize,
    };
    let config = CodecConfig::default().with_bitmap_rows(rows);
    let limits = Limits {
        max_pixels: Some(4096 * 4096),
        max_memory_bytes: Some(256 * 1024 * 1024),
        ..Default::default()
    };

    if let Ok(image) = LoadRequest::new()
        .with_codec_config(&config)
        .with_limits(&limits)
        .load_from_reader(Cursor::new(input.data))
    {
        assert_eq!(
            image.size(),
            image.layout().row_bytes(image.width()) * image.height() as usize
        );
    }
});
