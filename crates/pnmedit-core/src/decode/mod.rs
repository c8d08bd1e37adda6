//! Image decoding for pnmedit.
//!
//! This module provides:
//! - The in-memory pixel buffer and its format tag
//! - Parsing of the four portable-anymap variants (P2, P3, P5, P6)
//!
//! # Examples
//!
//! ```ignore
//! use pnmedit_core::decode::load_pnm;
//!
//! let image = load_pnm("photo.ppm").unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod pnm;
mod types;

pub use pnm::{decode_pnm, load_pnm};
pub(crate) use types::try_alloc_samples;
pub use types::{DecodeError, PixelBuffer, PixelFormat};
