//! Geometric transforms: rotation and cropping.
//!
//! Both operate on the active selection of a [`PixelBuffer`](crate::decode::PixelBuffer):
//!
//! - Crop replaces the image with the selected rectangle.
//! - Rotation turns the whole image when everything is selected, otherwise
//!   the (square) selection in place.
//!
//! # Coordinate System
//!
//! - Angles are in degrees, positive = clockwise, multiples of 90 only
//! - Selection bounds are half-open pixel coordinates
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::apply_crop;
pub use rotation::{apply_rotation, quarter_turns, rotate_square_90};
