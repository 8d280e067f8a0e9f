//! Recovery boundary around delegate engines.
//!
//! Engines report fatal conditions either by returning an error or, for
//! states they consider unreachable, by panicking deep inside their own
//! call stack. [`run`] is the single place both are turned into a
//! [`LoadError`]. Buffers built inside the closure are ordinary owned
//! values, so unwinding out of the engine releases them.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::{ImageFormat, LoadError};

/// Run `decode` and convert an engine panic into [`LoadError::Panicked`].
pub(crate) fn run<T>(
    format: ImageFormat,
    decode: impl FnOnce() -> Result<T, LoadError>,
) -> Result<T, LoadError> {
    match panic::catch_unwind(AssertUnwindSafe(decode)) {
        Ok(result) => result,
        Err(payload) => Err(LoadError::Panicked {
            format,
            message: panic_message(payload.as_ref()),
        }),
    }
}

/// Error hook: map an engine error to the adapter's failure model.
pub(crate) fn fatal<E>(format: ImageFormat) -> impl FnOnce(E) -> LoadError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |error| LoadError::from_codec(format, error)
}

/// Warning hook. Engines keep going after a warning.
pub(crate) fn warning(format: ImageFormat, message: &str) {
    log::warn!("{format:?} decoder warning: {message}");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
