//! Unified error types for load operations.

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;

use crate::format::ImageFormat;

/// Coarse outcome class of a failed load.
///
/// Every [`LoadError`] maps onto exactly one of these via [`LoadError::kind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source could not be opened.
    NotFound,
    /// Structurally valid input using a variant this crate does not handle.
    Unsupported,
    /// An internal consistency check on the container failed.
    Malformed,
    /// A decoding engine failed after the container passed structural checks.
    DecodeFailure,
}

/// Unified error type for load operations.
///
/// A failed load never carries pixel data: whatever the adapter allocated
/// has already been released by the time this value is returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    NotFound { path: PathBuf, source: io::Error },

    /// Leading bytes match no known signature.
    #[error("unrecognized image format")]
    UnrecognizedFormat,

    /// Format recognized but its adapter was not compiled in.
    #[error("format {0:?} not supported (codec not compiled in)")]
    DisabledFormat(ImageFormat),

    /// Format variant this crate does not decode.
    #[error("{format:?}: unsupported {detail}")]
    Unsupported {
        format: ImageFormat,
        detail: Cow<'static, str>,
    },

    /// Caller-supplied resource limit exceeded.
    #[error("{format:?}: limit exceeded: {detail}")]
    LimitExceeded {
        format: ImageFormat,
        detail: &'static str,
    },

    /// Container failed an internal consistency check.
    #[error("{format:?}: malformed: {detail}")]
    Malformed {
        format: ImageFormat,
        detail: Cow<'static, str>,
    },

    /// Underlying decoding engine error.
    #[error("codec error ({format:?}): {source}")]
    Codec {
        format: ImageFormat,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Decoding engine panicked; caught at the checkpoint.
    #[error("codec panicked ({format:?}): {message}")]
    Panicked { format: ImageFormat, message: String },

    /// Read or seek failure on an already open stream.
    #[error("I/O error: {source}")]
    Io {
        format: Option<ImageFormat>,
        #[source]
        source: io::Error,
    },

    /// Destination buffer could not be allocated.
    #[error("allocation of {bytes} bytes failed")]
    OutOfMemory { bytes: usize },
}

impl LoadError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::NotFound { .. } => ErrorKind::NotFound,
            LoadError::UnrecognizedFormat
            | LoadError::DisabledFormat(_)
            | LoadError::Unsupported { .. }
            | LoadError::LimitExceeded { .. } => ErrorKind::Unsupported,
            LoadError::Malformed { .. } => ErrorKind::Malformed,
            LoadError::Codec { .. }
            | LoadError::Panicked { .. }
            | LoadError::Io { .. }
            | LoadError::OutOfMemory { .. } => ErrorKind::DecodeFailure,
        }
    }

    /// Format the failing adapter was handling, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        match self {
            LoadError::NotFound { .. } | LoadError::UnrecognizedFormat => None,
            LoadError::OutOfMemory { .. } => None,
            LoadError::DisabledFormat(format)
            | LoadError::Unsupported { format, .. }
            | LoadError::LimitExceeded { format, .. }
            | LoadError::Malformed { format, .. }
            | LoadError::Codec { format, .. }
            | LoadError::Panicked { format, .. } => Some(*format),
            LoadError::Io { format, .. } => *format,
        }
    }

    /// Wrap a codec-specific error.
    pub fn from_codec<E>(format: ImageFormat, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LoadError::Codec {
            format,
            source: Box::new(error),
        }
    }

    pub(crate) fn unsupported(format: ImageFormat, detail: impl Into<Cow<'static, str>>) -> Self {
        LoadError::Unsupported {
            format,
            detail: detail.into(),
        }
    }

    pub(crate) fn malformed(format: ImageFormat, detail: impl Into<Cow<'static, str>>) -> Self {
        LoadError::Malformed {
            format,
            detail: detail.into(),
        }
    }

    pub(crate) fn io(format: Option<ImageFormat>, source: io::Error) -> Self {
        LoadError::Io { format, source }
    }
}
