//! Canonical decoded image and pixel layouts.
//!
//! Every adapter produces the same representation: 8 bits per channel,
//! tightly packed rows, and **bottom-up** row order (row 0 is the bottom
//! of the picture), whatever the source format stores natively.

use imgref::ImgRef;
use rgb::{RGB8, RGBA8};

use crate::error::LoadError;

/// Channel layout of [`Image::data`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// Single coverage channel. No current adapter emits it.
    Alpha,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub const fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
            PixelLayout::Alpha => 1,
        }
    }

    /// Bytes per row for `width` pixels.
    pub const fn row_bytes(self, width: u32) -> usize {
        width as usize * self.channels()
    }
}

/// Typed, borrowed view of an image's pixels.
///
/// Rows keep the canonical bottom-up order.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub enum PixelView<'a> {
    Rgb8(ImgRef<'a, RGB8>),
    Rgba8(ImgRef<'a, RGBA8>),
    Alpha8(ImgRef<'a, u8>),
}

/// A decoded image that owns its pixel buffer.
///
/// Only successful loads construct one, so `size() == row_bytes * height`
/// holds for every value.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    layout: PixelLayout,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    pub(crate) fn from_parts(layout: PixelLayout, width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), layout.row_bytes(width) * height as usize);
        Self {
            layout,
            width,
            height,
            data,
        }
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Byte length of the pixel buffer.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn row_bytes(&self) -> usize {
        self.layout.row_bytes(self.width)
    }

    /// Pixel bytes, bottom row first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Row `y` in canonical order (0 = bottom).
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of range for height {}", self.height);
        let stride = self.row_bytes();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Channel bytes of the pixel at column `x`, canonical row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates fall outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width, "column {x} out of range for width {}", self.width);
        let channels = self.layout.channels();
        let start = x as usize * channels;
        &self.row(y)[start..start + channels]
    }

    /// Rows from the top of the picture down, for consumers that want
    /// the conventional order.
    pub fn rows_top_down(&self) -> impl DoubleEndedIterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(self.row_bytes()).rev()
    }

    /// Typed view of the pixels.
    pub fn view(&self) -> PixelView<'_> {
        let w = self.width as usize;
        let h = self.height as usize;
        match self.layout {
            PixelLayout::Rgb => PixelView::Rgb8(ImgRef::new(bytemuck::cast_slice(&self.data), w, h)),
            PixelLayout::Rgba => {
                PixelView::Rgba8(ImgRef::new(bytemuck::cast_slice(&self.data), w, h))
            }
            PixelLayout::Alpha => PixelView::Alpha8(ImgRef::new(&self.data, w, h)),
        }
    }
}

impl core::fmt::Debug for Image {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Image")
            .field("layout", &self.layout)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Allocate a zeroed buffer, reporting refusal instead of aborting.
pub(crate) fn alloc_pixels(len: usize) -> Result<Vec<u8>, LoadError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| LoadError::OutOfMemory { bytes: len })?;
    buf.resize(len, 0);
    Ok(buf)
}
