//! JPEG codec adapter using zune-jpeg.
//!
//! The engine is asked for RGB output and decodes straight into the
//! canonical buffer, top row first, on the calling thread. Row pairs are
//! then swapped in place to reach bottom-up order. Gray sources are
//! converted to RGB by the engine itself; CMYK and YCCK sources are
//! refused once the headers are read, before any pixel buffer exists.

use std::io::{BufRead, Seek};

use zune_jpeg::JpegDecoder;
use zune_jpeg::errors::DecodeErrors;
use zune_jpeg::zune_core::colorspace::ColorSpace;
use zune_jpeg::zune_core::options::DecoderOptions;

use super::{checkpoint, flip_rows_in_place};
use crate::pixel::alloc_pixels;
use crate::{Image, ImageFormat, Limits, LoadError, PixelLayout};

const FORMAT: ImageFormat = ImageFormat::Jpeg;

/// Decode a JPEG stream positioned at its SOI marker.
pub(crate) fn decode<R: BufRead + Seek>(
    reader: R,
    limits: Option<&Limits>,
) -> Result<Image, LoadError> {
    checkpoint::run(FORMAT, || decode_inner(reader, limits))
}

fn decode_inner<R: BufRead + Seek>(reader: R, limits: Option<&Limits>) -> Result<Image, LoadError> {
    // Dimension policy belongs to `Limits`; the engine only stops at what
    // a frame header can express. Strict mode turns truncated or corrupt
    // entropy data into an error instead of gray fill.
    let options = DecoderOptions::default()
        .jpeg_set_out_colorspace(ColorSpace::RGB)
        .set_strict_mode(true)
        .set_max_width(usize::from(u16::MAX))
        .set_max_height(usize::from(u16::MAX));
    let mut decoder = JpegDecoder::new_with_options(reader, options);

    decoder.decode_headers().map_err(map_error)?;
    let (width, height) = decoder
        .dimensions()
        .ok_or_else(|| LoadError::malformed(FORMAT, "no frame header"))?;
    let input = decoder.input_colorspace();
    let output = decoder.output_colorspace();
    log::trace!("jpeg {width}x{height} {input:?} -> {output:?}");

    if let Some(space @ (ColorSpace::CMYK | ColorSpace::YCCK)) = input {
        return Err(LoadError::unsupported(
            FORMAT,
            format!("{space:?} source has no RGB conversion"),
        ));
    }
    let components = output.map_or(0, |space| space.num_components());
    if components != 3 {
        return Err(LoadError::unsupported(
            FORMAT,
            format!("{components} output components ({output:?})"),
        ));
    }

    let (width, height) = (width as u32, height as u32);
    if width == 0 || height == 0 {
        return Err(LoadError::malformed(FORMAT, "zero width or height"));
    }

    let layout = PixelLayout::Rgb;
    let row_bytes = layout.row_bytes(width);
    let size = row_bytes * height as usize;
    if let Some(lim) = limits {
        lim.validate(FORMAT, width, height, size as u64)?;
    }

    let expected = decoder.output_buffer_size();
    if expected != Some(size) {
        return Err(LoadError::from_codec(
            FORMAT,
            std::io::Error::other(format!(
                "engine wants {expected:?} bytes for a {size}-byte RGB frame"
            )),
        ));
    }

    let mut data = alloc_pixels(size)?;
    decoder.decode_into(&mut data).map_err(map_error)?;
    flip_rows_in_place(&mut data, row_bytes);

    Ok(Image::from_parts(layout, width, height, data))
}

/// Coding processes the engine declares unsupported stay `Unsupported`;
/// everything else is a fatal decode error.
fn map_error(error: DecodeErrors) -> LoadError {
    match error {
        DecodeErrors::Unsupported(scheme) => LoadError::unsupported(FORMAT, format!("{scheme:?}")),
        other => checkpoint::fatal(FORMAT)(other),
    }
}
