//! PNG codec adapter using the png crate.
//!
//! The engine is asked to expand palettes, low bit depths and `tRNS` and to
//! strip 16-bit samples, which leaves 8-bit RGB, RGBA, gray or gray+alpha.
//! Rows are decoded straight into the bottom-up row table, and gray
//! variants are widened to RGB/RGBA inside their destination row.
//! Interlaced frames go through one scratch frame first.

use std::io::{BufRead, Seek};

use png::{BitDepth, ColorType, Transformations};

use super::{bottom_up_rows, checkpoint};
use crate::pixel::alloc_pixels;
use crate::{Image, ImageFormat, Limits, LoadError, PixelLayout};

const FORMAT: ImageFormat = ImageFormat::Png;

/// Decode a PNG stream positioned at its signature.
pub(crate) fn decode<R: BufRead + Seek>(
    reader: R,
    limits: Option<&Limits>,
) -> Result<Image, LoadError> {
    checkpoint::run(FORMAT, || decode_inner(reader, limits))
}

fn decode_inner<R: BufRead + Seek>(
    reader: R,
    limits: Option<&Limits>,
) -> Result<Image, LoadError> {
    let mut decoder = match limits.and_then(|l| l.max_memory_bytes) {
        Some(max) => png::Decoder::new_with_limits(
            reader,
            png::Limits {
                bytes: usize::try_from(max).unwrap_or(usize::MAX),
            },
        ),
        None => png::Decoder::new(reader),
    };
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder.read_info().map_err(map_error)?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    log::trace!(
        "png {}x{} {:?}/{:?} trns={} animated={}",
        width,
        height,
        info.color_type,
        info.bit_depth,
        info.trns.is_some(),
        info.animation_control.is_some()
    );
    if info.animation_control.is_some() {
        checkpoint::warning(FORMAT, "animated image, decoding the default frame only");
    }

    let (color_type, depth) = reader.output_color_type();
    if depth != BitDepth::Eight {
        return Err(LoadError::unsupported(
            FORMAT,
            format!("output bit depth {depth:?}"),
        ));
    }
    let (layout, widen_gray) = match color_type {
        ColorType::Rgb => (PixelLayout::Rgb, false),
        ColorType::Rgba => (PixelLayout::Rgba, false),
        ColorType::Grayscale => (PixelLayout::Rgb, true),
        ColorType::GrayscaleAlpha => (PixelLayout::Rgba, true),
        other => {
            return Err(LoadError::unsupported(
                FORMAT,
                format!("color type {other:?} after normalization"),
            ));
        }
    };

    let row_bytes = layout.row_bytes(width);
    let size = row_bytes
        .checked_mul(height as usize)
        .ok_or(LoadError::LimitExceeded {
            format: FORMAT,
            detail: "image size overflows address space",
        })?;
    let interlaced = reader.info().interlaced;
    // Adam7 passes only make sense once the whole frame is assembled.
    let frame_len = if interlaced {
        reader.output_buffer_size().ok_or(LoadError::LimitExceeded {
            format: FORMAT,
            detail: "frame size overflows address space",
        })?
    } else {
        0
    };

    if let Some(lim) = limits {
        lim.validate(FORMAT, width, height, size as u64 + frame_len as u64)?;
    }

    let mut data = alloc_pixels(size)?;
    let rows = bottom_up_rows(&mut data, row_bytes);

    if interlaced {
        let mut frame = alloc_pixels(frame_len)?;
        let output = reader.next_frame(&mut frame).map_err(map_error)?;
        if rows.len() != height as usize || output.line_size == 0 {
            return Err(LoadError::malformed(FORMAT, "frame does not cover the image"));
        }
        let frame = &frame[..output.buffer_size()];
        for (src, dst) in frame.chunks_exact(output.line_size).zip(rows) {
            dst[..output.line_size].copy_from_slice(src);
            if widen_gray {
                widen_gray_in_place(dst, layout, width as usize);
            }
        }
    } else {
        for dst in rows {
            if reader.read_row(dst).map_err(map_error)?.is_none() {
                return Err(LoadError::from_codec(
                    FORMAT,
                    std::io::Error::other("frame ended before the last row"),
                ));
            }
            if widen_gray {
                widen_gray_in_place(dst, layout, width as usize);
            }
        }
    }

    Ok(Image::from_parts(layout, width, height, data))
}

/// Spread gray (or gray+alpha) samples packed at the front of `row` across
/// the full RGB (or RGBA) row. Runs back to front so no sample is
/// overwritten before it is read.
fn widen_gray_in_place(row: &mut [u8], layout: PixelLayout, width: usize) {
    match layout {
        PixelLayout::Rgba => {
            for x in (0..width).rev() {
                let (g, a) = (row[2 * x], row[2 * x + 1]);
                row[4 * x..4 * x + 4].copy_from_slice(&[g, g, g, a]);
            }
        }
        _ => {
            for x in (0..width).rev() {
                let g = row[x];
                row[3 * x..3 * x + 3].fill(g);
            }
        }
    }
}

fn map_error(error: png::DecodingError) -> LoadError {
    match error {
        png::DecodingError::LimitsExceeded => LoadError::LimitExceeded {
            format: FORMAT,
            detail: "png decoder memory limit",
        },
        other => checkpoint::fatal(FORMAT)(other),
    }
}
