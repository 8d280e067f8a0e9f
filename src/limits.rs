//! Caller-supplied bounds on what a load may allocate.

use crate::error::LoadError;
use crate::format::ImageFormat;

/// Hard cap on either bitmap dimension, applied before any allocation
/// regardless of caller [`Limits`].
pub const BITMAP_MAX_DIMENSION: u32 = 4096;

/// Per-request bounds, checked against the frame header before the
/// canonical buffer is allocated. `None` means unbounded.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Widest accepted image, in pixels.
    pub max_width: Option<u64>,
    /// Tallest accepted image, in pixels.
    pub max_height: Option<u64>,
    /// Largest accepted `width * height`.
    pub max_pixels: Option<u64>,
    /// Largest accepted decode allocation in bytes. Also handed to the
    /// PNG engine as its own working-memory cap.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject a frame of `width` x `height` needing `bytes` of pixel memory.
    pub(crate) fn validate(
        &self,
        format: ImageFormat,
        width: u32,
        height: u32,
        bytes: u64,
    ) -> Result<(), LoadError> {
        let (width, height) = (u64::from(width), u64::from(height));
        let over = |limit: Option<u64>, value: u64| limit.is_some_and(|max| value > max);

        let detail = if over(self.max_width, width) {
            "width exceeds limit"
        } else if over(self.max_height, height) {
            "height exceeds limit"
        } else if over(self.max_pixels, width.saturating_mul(height)) {
            "pixel count exceeds limit"
        } else if over(self.max_memory_bytes, bytes) {
            "memory allocation exceeds limit"
        } else {
            return Ok(());
        };

        log::debug!("{format:?} {width}x{height} ({bytes} bytes) rejected: {detail}");
        Err(LoadError::LimitExceeded { format, detail })
    }
}
