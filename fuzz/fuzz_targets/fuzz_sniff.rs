#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use rasterload::{ImageFormat, SNIFF_LEN};

fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);
    let sniffed = ImageFormat::sniff(&mut cursor).unwrap();
    assert_eq!(cursor.position(), 0);
    assert_eq!(sniffed, ImageFormat::detect(&data[..data.len().min(SNIFF_LEN)]));
});
