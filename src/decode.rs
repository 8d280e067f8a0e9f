//! Format dispatch.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use crate::config::CodecConfig;
use crate::{Image, ImageFormat, Limits, LoadError};

/// Image load request builder.
///
/// # Example
///
/// ```no_run
/// use rasterload::{Limits, LoadRequest};
///
/// let limits = Limits {
///     max_pixels: Some(16_000_000),
///     ..Default::default()
/// };
/// let image = LoadRequest::new().with_limits(&limits).load("photo.jpg")?;
/// println!("{}x{} {:?}", image.width(), image.height(), image.layout());
/// # Ok::<(), rasterload::LoadError>(())
/// ```
#[derive(Clone, Copy, Default)]
pub struct LoadRequest<'a> {
    format: Option<ImageFormat>,
    limits: Option<&'a Limits>,
    codec_config: Option<&'a CodecConfig>,
}

impl<'a> LoadRequest<'a> {
    /// Create a new load request.
    ///
    /// Format will be auto-detected from leading bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override format auto-detection.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set resource limits.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set format-specific codec configuration.
    pub fn with_codec_config(mut self, config: &'a CodecConfig) -> Self {
        self.codec_config = Some(config);
        self
    }

    /// Open `path` and decode it.
    ///
    /// The file handle is owned here and dropped exactly once, whichever
    /// way decoding ends.
    pub fn load(self, path: impl AsRef<Path>) -> Result<Image, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading {}", path.display());
        self.load_from_reader(BufReader::new(file))
    }

    /// Decode from an open stream positioned at the start of the image.
    ///
    /// The stream is left open; closing it is the caller's business.
    pub fn load_from_reader<R: BufRead + Seek>(self, mut reader: R) -> Result<Image, LoadError> {
        let format = match self.format {
            Some(f) => f,
            None => ImageFormat::sniff(&mut reader)
                .map_err(|e| LoadError::io(None, e))?
                .ok_or(LoadError::UnrecognizedFormat)?,
        };

        self.decode_format(format, reader)
    }

    /// Dispatch to format-specific decoder.
    fn decode_format<R: BufRead + Seek>(
        self,
        format: ImageFormat,
        mut reader: R,
    ) -> Result<Image, LoadError> {
        log::debug!("decoding as {format:?}");
        match format {
            ImageFormat::Bitmap => {
                let rows = self.codec_config.map(|c| c.bitmap_rows).unwrap_or_default();
                crate::codecs::bmp::decode(&mut reader, rows, self.limits)
            }

            #[cfg(feature = "png")]
            ImageFormat::Png => crate::codecs::png::decode(reader, self.limits),
            #[cfg(not(feature = "png"))]
            ImageFormat::Png => Err(LoadError::DisabledFormat(format)),

            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => crate::codecs::jpeg::decode(reader, self.limits),
            #[cfg(not(feature = "jpeg"))]
            ImageFormat::Jpeg => Err(LoadError::DisabledFormat(format)),
        }
    }
}

/// Load the image at `path` with default settings.
pub fn load(path: impl AsRef<Path>) -> Result<Image, LoadError> {
    LoadRequest::new().load(path)
}

/// Load from an open stream with default settings.
pub fn load_from_reader<R: BufRead + Seek>(reader: R) -> Result<Image, LoadError> {
    LoadRequest::new().load_from_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::bmp::tests::BmpBuilder;
    use crate::config::BitmapRowLayout;
    use crate::ErrorKind;
    use std::io::Cursor;

    #[test]
    fn builder_pattern() {
        let request = LoadRequest::new().with_format(ImageFormat::Jpeg);
        assert_eq!(request.format, Some(ImageFormat::Jpeg));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load("/definitely/not/here.bmp").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn unknown_signature_is_unsupported() {
        let err = load_from_reader(Cursor::new(b"GIF89a\x01\x00".to_vec())).unwrap_err();
        assert!(matches!(err, LoadError::UnrecognizedFormat));
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn empty_stream_is_unsupported() {
        let err = load_from_reader(Cursor::new(Vec::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn dispatches_bitmap() {
        let bytes = BmpBuilder::new(2, 1).build(&[0, 0, 255, 0, 255, 0]);
        let img = load_from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(img.data(), &[255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn codec_config_reaches_bitmap_adapter() {
        let raster = [10, 20, 30, 0, 40, 50, 60, 0];
        let bytes = BmpBuilder::new(1, 2).build(&raster);
        let config = CodecConfig::default().with_bitmap_rows(BitmapRowLayout::Packed);
        let err = LoadRequest::new()
            .with_codec_config(&config)
            .load_from_reader(Cursor::new(bytes))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn forced_format_skips_sniffing() {
        let bytes = BmpBuilder::new(2, 1).build(&[0; 6]);
        let err = LoadRequest::new()
            .with_format(ImageFormat::Jpeg)
            .load_from_reader(Cursor::new(bytes))
            .unwrap_err();
        assert_ne!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.format(), Some(ImageFormat::Jpeg));
    }
}
