//! Image format detection.

use std::io::{self, Read, Seek, SeekFrom};

/// Number of leading bytes examined by [`ImageFormat::sniff`].
pub const SNIFF_LEN: usize = 8;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Supported image formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Uncompressed Windows bitmap (`BM`).
    Bitmap,
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detect format from magic bytes. Returns None if unrecognized.
    ///
    /// Checked in order: `BM`, the 8-byte PNG signature, then `FF D8`.
    /// Short input is matched against whatever bytes are present.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"BM") {
            return Some(ImageFormat::Bitmap);
        }

        if data.starts_with(&PNG_SIGNATURE) {
            return Some(ImageFormat::Png);
        }

        if data.starts_with(&[0xFF, 0xD8]) {
            return Some(ImageFormat::Jpeg);
        }

        None
    }

    /// Detect format from the head of a stream without consuming it.
    ///
    /// Reads up to [`SNIFF_LEN`] bytes, then seeks back to the position the
    /// stream had on entry, so the adapter that follows sees the whole file.
    pub fn sniff<R: Read + Seek + ?Sized>(reader: &mut R) -> io::Result<Option<Self>> {
        let start = reader.stream_position()?;

        let mut head = [0u8; SNIFF_LEN];
        let mut filled = 0;
        while filled < head.len() {
            match reader.read(&mut head[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        reader.seek(SeekFrom::Start(start))?;

        let format = Self::detect(&head[..filled]);
        log::debug!("sniffed {filled} leading bytes: {format:?}");
        Ok(format)
    }

    /// MIME type string.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Bitmap => "image/bmp",
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}
