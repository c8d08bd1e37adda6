//! Image encoding for pnmedit.
//!
//! This module provides functionality for:
//! - Encoding a pixel buffer as ASCII (P2/P3) or binary (P5/P6) PNM
//!
//! # Examples
//!
//! ```ignore
//! use pnmedit_core::encode::save_pnm;
//!
//! save_pnm(&image, "out.pgm", true).unwrap();
//! ```

mod pnm;

pub use pnm::{encode_pnm, save_pnm, write_pnm, EncodeError};
