//! Codec adapters for format-specific implementations.
//!
//! Each module turns one container format into the canonical bottom-up
//! [`Image`](crate::Image). PNG and JPEG delegate bitstream decoding to an
//! engine crate; bitmaps are parsed here.

pub(crate) mod bmp;

#[cfg(any(feature = "png", feature = "jpeg"))]
pub(crate) mod checkpoint;

#[cfg(feature = "png")]
pub(crate) mod png;

#[cfg(feature = "jpeg")]
pub(crate) mod jpeg;

/// Destination row table for engines that produce rows top-down.
///
/// Entry `i` is the slice the engine's `i`-th produced row must land in,
/// which is buffer row `height - 1 - i`. Writing through the table yields
/// canonical bottom-up order without a separate flip pass.
#[cfg(any(feature = "png", feature = "jpeg", test))]
pub(crate) fn bottom_up_rows(buf: &mut [u8], row_bytes: usize) -> Vec<&mut [u8]> {
    if row_bytes == 0 {
        return Vec::new();
    }
    buf.chunks_exact_mut(row_bytes).rev().collect()
}

/// Reverse the row order of a top-down frame in place.
#[cfg(any(feature = "jpeg", test))]
pub(crate) fn flip_rows_in_place(buf: &mut [u8], row_bytes: usize) {
    if row_bytes == 0 {
        return;
    }
    let rows = buf.len() / row_bytes;
    for top in 0..rows / 2 {
        let bottom = rows - 1 - top;
        let (head, tail) = buf.split_at_mut(bottom * row_bytes);
        head[top * row_bytes..(top + 1) * row_bytes].swap_with_slice(&mut tail[..row_bytes]);
    }
}
