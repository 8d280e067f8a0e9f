//! # rasterload
//!
//! Load BMP, PNG and JPEG files into one canonical in-memory image, so
//! callers never branch on the source format.
//!
//! Every successful load yields an [`Image`] with 8-bit RGB or RGBA pixels,
//! tightly packed rows, and **bottom-up** row order (row 0 is the bottom of
//! the picture). The format is detected from the file's leading bytes,
//! never from its extension.
//!
//! PNG and JPEG bitstreams are decoded by the `png` and `zune-jpeg`
//! crates behind the `png` and `jpeg` features (both on by default).
//! Uncompressed 24-bit bitmaps are parsed here.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rasterload::{ErrorKind, PixelLayout};
//!
//! match rasterload::load("sprite.png") {
//!     Ok(image) => {
//!         assert_eq!(image.size(), image.layout().row_bytes(image.width()) * image.height() as usize);
//!         let bottom_left = image.pixel(0, 0);
//!         println!("{:?} {:?}", image.layout(), bottom_left);
//!     }
//!     Err(e) if e.kind() == ErrorKind::NotFound => eprintln!("no such file"),
//!     Err(e) => eprintln!("cannot load: {e}"),
//! }
//! # let _ = PixelLayout::Rgb;
//! ```

#![forbid(unsafe_code)]

mod codecs;
pub mod config;
mod decode;
mod error;
mod format;
mod limits;
mod pixel;

pub use decode::{LoadRequest, load, load_from_reader};
pub use error::{ErrorKind, LoadError};
pub use format::{ImageFormat, SNIFF_LEN};
pub use limits::{BITMAP_MAX_DIMENSION, Limits};
pub use pixel::{Image, PixelLayout, PixelView};
