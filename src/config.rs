//! Format-specific codec configuration.
//!
//! [`CodecConfig`] bundles per-adapter overrides into a single value that
//! can be passed to a [`LoadRequest`](crate::LoadRequest).

/// How the bitmap adapter interprets row alignment.
///
/// Well-formed bitmaps pad each row to a multiple of 4 bytes. Some writers
/// emit tightly packed rows instead and declare the raster size to match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BitmapRowLayout {
    /// Rows are tightly packed; the declared raster size must equal
    /// `width * height * 3`.
    Packed,
    /// Rows are padded to 4 bytes; the declared raster size must equal
    /// `stride * height`. Padding bytes are skipped while reading.
    Padded,
    /// Pick `Packed` if the declared size matches it, else `Padded` if that
    /// matches, else reject the file as malformed.
    #[default]
    FromDeclaredSize,
}

/// Format-specific configuration overrides.
///
/// # Example
///
/// ```
/// use rasterload::config::{BitmapRowLayout, CodecConfig};
///
/// let config = CodecConfig::default().with_bitmap_rows(BitmapRowLayout::Packed);
/// assert_eq!(config.bitmap_rows, BitmapRowLayout::Packed);
/// ```
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct CodecConfig {
    /// Row alignment policy for uncompressed bitmaps.
    pub bitmap_rows: BitmapRowLayout,
}

impl CodecConfig {
    /// Set the bitmap row alignment policy.
    pub fn with_bitmap_rows(mut self, layout: BitmapRowLayout) -> Self {
        self.bitmap_rows = layout;
        self
    }
}
