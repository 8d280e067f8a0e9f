//! Uncompressed 24-bit BMP adapter.
//!
//! Accepts only the canonical layout: a 14-byte file header, a 40-byte
//! `BITMAPINFOHEADER`, then the raster. Bitmaps already store rows
//! bottom-up, so the only transform is the BGR to RGB channel swap.

use std::io::{self, Read};

use crate::config::BitmapRowLayout;
use crate::limits::BITMAP_MAX_DIMENSION;
use crate::pixel::alloc_pixels;
use crate::{Image, ImageFormat, Limits, LoadError, PixelLayout};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
/// Pixel data must start right after the two headers.
const PIXEL_OFFSET: u32 = (FILE_HEADER_LEN + INFO_HEADER_LEN) as u32;

const BI_RGB: u32 = 0;

const FORMAT: ImageFormat = ImageFormat::Bitmap;

/// Little-endian field reader over a fixed header.
struct HeaderCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn u16(&mut self) -> u16 {
        let v = u16::from_le_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        v
    }

    fn u32(&mut self) -> u32 {
        let b = &self.data[self.pos..self.pos + 4];
        self.pos += 4;
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }
}

/// Fields of the two headers this adapter looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BmpHeader {
    pixel_offset: u32,
    info_len: u32,
    width: u32,
    height: u32,
    planes: u16,
    bits_per_pixel: u16,
    compression: u32,
    raster_len: u32,
}

impl BmpHeader {
    fn parse(raw: &[u8; PIXEL_OFFSET as usize]) -> Self {
        let mut cur = HeaderCursor::new(raw);
        // signature, file size, two reserved words
        cur.skip(2 + 4 + 2 + 2);
        let pixel_offset = cur.u32();

        let info_len = cur.u32();
        let width = cur.u32();
        let height = cur.u32();
        let planes = cur.u16();
        let bits_per_pixel = cur.u16();
        let compression = cur.u32();
        let raster_len = cur.u32();
        // resolution and palette counts are irrelevant for 24-bit RGB

        Self {
            pixel_offset,
            info_len,
            width,
            height,
            planes,
            bits_per_pixel,
            compression,
            raster_len,
        }
    }

    /// Validate the header and decide how rows are laid out on disk.
    ///
    /// Returns the on-disk stride in bytes.
    fn validate(&self, rows: BitmapRowLayout) -> Result<usize, LoadError> {
        if self.width == 0 || self.height == 0 {
            return Err(LoadError::malformed(FORMAT, "zero width or height"));
        }
        if self.width > BITMAP_MAX_DIMENSION || self.height > BITMAP_MAX_DIMENSION {
            return Err(LoadError::unsupported(
                FORMAT,
                format!(
                    "dimensions {}x{} (max {BITMAP_MAX_DIMENSION})",
                    self.width, self.height
                ),
            ));
        }
        if self.planes != 1 {
            return Err(LoadError::unsupported(
                FORMAT,
                format!("plane count {}", self.planes),
            ));
        }
        if self.compression != BI_RGB {
            return Err(LoadError::unsupported(
                FORMAT,
                format!("compression {}", self.compression),
            ));
        }
        if self.bits_per_pixel != 24 {
            return Err(LoadError::unsupported(
                FORMAT,
                format!("bit depth {}", self.bits_per_pixel),
            ));
        }

        let packed = self.width as usize * 3;
        let padded = (packed + 3) & !3;
        let height = self.height as usize;
        let declared = self.raster_len as usize;

        let stride = match rows {
            BitmapRowLayout::Packed if declared == packed * height => packed,
            BitmapRowLayout::Padded if declared == padded * height => padded,
            BitmapRowLayout::FromDeclaredSize if declared == packed * height => packed,
            BitmapRowLayout::FromDeclaredSize if declared == padded * height => padded,
            _ => {
                return Err(LoadError::malformed(
                    FORMAT,
                    format!(
                        "declared raster size {declared} does not match {}x{} at 24 bpp",
                        self.width, self.height
                    ),
                ));
            }
        };

        if self.info_len as usize != INFO_HEADER_LEN {
            return Err(LoadError::unsupported(
                FORMAT,
                format!("info header length {}", self.info_len),
            ));
        }
        if self.pixel_offset != PIXEL_OFFSET {
            return Err(LoadError::unsupported(
                FORMAT,
                format!("pixel data offset {}", self.pixel_offset),
            ));
        }

        Ok(stride)
    }
}

/// Decode an uncompressed 24-bit bitmap from the current position of `reader`.
///
/// The raster follows the headers directly, so the stream is only ever read
/// forward from where the caller left it.
pub(crate) fn decode<R: Read + ?Sized>(
    reader: &mut R,
    rows: BitmapRowLayout,
    limits: Option<&Limits>,
) -> Result<Image, LoadError> {
    let mut raw = [0u8; PIXEL_OFFSET as usize];
    reader.read_exact(&mut raw).map_err(truncated("header"))?;

    let header = BmpHeader::parse(&raw);
    log::trace!("bitmap header: {header:?}");

    let stride = header.validate(rows)?;
    let row_bytes = PixelLayout::Rgb.row_bytes(header.width);
    let size = row_bytes * header.height as usize;

    if let Some(lim) = limits {
        lim.validate(FORMAT, header.width, header.height, size as u64)?;
    }

    let mut data = alloc_pixels(size)?;

    if stride == row_bytes {
        reader.read_exact(&mut data).map_err(truncated("pixel data"))?;
    } else {
        let mut padding = [0u8; 3];
        let pad = stride - row_bytes;
        for row in data.chunks_exact_mut(row_bytes) {
            reader.read_exact(row).map_err(truncated("pixel data"))?;
            reader
                .read_exact(&mut padding[..pad])
                .map_err(truncated("pixel data"))?;
        }
    }

    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }

    Ok(Image::from_parts(
        PixelLayout::Rgb,
        header.width,
        header.height,
        data,
    ))
}

/// Short reads mean the file is smaller than its headers claim.
fn truncated(what: &'static str) -> impl Fn(io::Error) -> LoadError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            LoadError::malformed(FORMAT, format!("truncated {what}"))
        } else {
            LoadError::io(Some(FORMAT), e)
        }
    }
}
