//! Rotation by multiples of 90 degrees.
//!
//! Two modes are selected by the active selection:
//! - **Full image** (selection covers the image): the grid is remapped into a
//!   new buffer; 90 and 270 degrees swap width and height.
//! - **Square sub-region**: the selected square is extracted and turned by
//!   repeated elementary 90 degree steps, then written back in place.
//!
//! # Coordinate mapping
//!
//! Positive angles rotate clockwise. For a source pixel at row `i`, column `j`
//! of an `h` x `w` image:
//!
//! ```text
//!  90:  (i, j) -> (j, h - 1 - i)
//! 180:  (i, j) -> (h - 1 - i, w - 1 - j)
//! 270:  (i, j) -> (w - 1 - j, i)
//! ```

use tracing::debug;

use crate::decode::{try_alloc_samples, PixelBuffer};
use crate::{EditError, EditResult};

/// Normalize an angle in degrees to a quarter-turn count in `0..4`.
///
/// Any sign or magnitude is accepted.
///
/// # Errors
///
/// Returns `UnsupportedAngle` if `angle` is not a multiple of 90.
pub fn quarter_turns(angle: i32) -> EditResult<u32> {
    let normalized = angle.rem_euclid(360);
    if normalized % 90 != 0 {
        return Err(EditError::UnsupportedAngle);
    }
    Ok((normalized / 90) as u32)
}

/// Rotate the image (or its square selection) clockwise by `angle` degrees.
///
/// A normalized angle of 0 is a successful no-op.
///
/// # Errors
///
/// * `UnsupportedAngle` - `angle` is not a multiple of 90
/// * `NotSquareSelection` - a partial selection that is not square
/// * `ResourceExhausted` - scratch allocation failed; the image is unchanged
pub fn apply_rotation(image: &mut PixelBuffer, angle: i32) -> EditResult<()> {
    let turns = quarter_turns(angle)?;
    if turns == 0 {
        return Ok(());
    }

    if image.is_fully_selected() {
        rotate_full(image, turns)
    } else {
        if !image.selection.is_square() {
            return Err(EditError::NotSquareSelection);
        }
        rotate_selection(image, turns)
    }
}

/// Remap the whole grid into a freshly allocated buffer, then swap it in.
fn rotate_full(image: &mut PixelBuffer, turns: u32) -> EditResult<()> {
    let (w, h) = (image.width as usize, image.height as usize);
    let ch = image.channels();
    let (new_w, new_h) = if turns % 2 == 1 { (h, w) } else { (w, h) };

    let mut rotated =
        try_alloc_samples(image.pixels.len()).map_err(|_| EditError::ResourceExhausted)?;
    let new_stride = new_w * ch;

    for i in 0..h {
        for j in 0..w {
            let (new_i, new_j) = match turns {
                1 => (j, h - 1 - i),
                2 => (h - 1 - i, w - 1 - j),
                _ => (w - 1 - j, i),
            };
            let src = image.index(i, j);
            let dst = new_i * new_stride + new_j * ch;
            rotated[dst..dst + ch].copy_from_slice(&image.pixels[src..src + ch]);
        }
    }

    image.replace_grid(new_w as u32, new_h as u32, rotated);
    debug!(
        degrees = turns * 90,
        width = image.width,
        height = image.height,
        "rotated full image"
    );
    Ok(())
}

/// Rotate the square selection in place.
fn rotate_selection(image: &mut PixelBuffer, turns: u32) -> EditResult<()> {
    let sel = image.selection;
    let size = sel.width() as usize;
    let ch = image.channels();
    let row_len = size * ch;
    let (x1, y1) = (sel.x1 as usize, sel.y1 as usize);

    let mut square =
        try_alloc_samples(size * row_len).map_err(|_| EditError::ResourceExhausted)?;
    let mut scratch =
        try_alloc_samples(size * row_len).map_err(|_| EditError::ResourceExhausted)?;

    for i in 0..size {
        let src = image.index(y1 + i, x1);
        square[i * row_len..(i + 1) * row_len].copy_from_slice(&image.pixels[src..src + row_len]);
    }

    for _ in 0..turns {
        rotate_square_90(&square, &mut scratch, size, ch);
        std::mem::swap(&mut square, &mut scratch);
    }

    for i in 0..size {
        let dst = image.index(y1 + i, x1);
        image.pixels[dst..dst + row_len].copy_from_slice(&square[i * row_len..(i + 1) * row_len]);
    }

    debug!(
        degrees = turns * 90,
        size,
        x = x1,
        y = y1,
        "rotated square selection"
    );
    Ok(())
}

/// One elementary clockwise quarter turn of a `size` x `size` square:
/// `dst[j][size - 1 - i] = src[i][j]`.
pub fn rotate_square_90(src: &[u8], dst: &mut [u8], size: usize, channels: usize) {
    debug_assert_eq!(src.len(), size * size * channels);
    debug_assert_eq!(dst.len(), src.len());

    let row_len = size * channels;
    for i in 0..size {
        for j in 0..size {
            let s = i * row_len + j * channels;
            let d = j * row_len + (size - 1 - i) * channels;
            dst[d..d + channels].copy_from_slice(&src[s..s + channels]);
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decode::PixelFormat;
    use crate::selection::Selection;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = PixelBuffer> {
        sized_image_strategy(1)
    }

    fn sized_image_strategy(min: u32) -> impl Strategy<Value = PixelBuffer> {
        (min..=9, min..=9, prop::bool::ANY).prop_flat_map(|(width, height, color)| {
            let format = if color {
                PixelFormat::BinaryRgb
            } else {
                PixelFormat::BinaryGray
            };
            let len = (width * height) as usize * format.channels();
            prop::collection::vec(any::<u8>(), len..=len)
                .prop_map(move |pixels| PixelBuffer::new(format, width, height, 255, pixels))
        })
    }

    proptest! {
        /// Property: Four 90 degree turns of the full image are the identity.
        #[test]
        fn prop_full_four_turns_identity(img in image_strategy()) {
            let mut rotated = img.clone();
            for _ in 0..4 {
                apply_rotation(&mut rotated, 90).unwrap();
            }
            prop_assert_eq!(rotated, img);
        }

        /// Property: Rotating by a then by -a restores the image.
        #[test]
        fn prop_rotation_inverse(img in image_strategy(), turns in 1i32..4) {
            let mut rotated = img.clone();
            apply_rotation(&mut rotated, turns * 90).unwrap();
            apply_rotation(&mut rotated, -turns * 90).unwrap();
            prop_assert_eq!(rotated, img);
        }

        /// Property: Sub-square rotation never touches pixels outside the square.
        #[test]
        fn prop_square_rotation_is_local(
            img in sized_image_strategy(4),
            turns in 1i32..4,
            (x, y, size) in (0u32..3, 0u32..3, 1u32..3),
        ) {
            let sel = Selection { x1: x, y1: y, x2: x + size, y2: y + size };

            let mut rotated = img.clone();
            rotated.selection = sel;
            apply_rotation(&mut rotated, turns * 90).unwrap();

            for row in 0..img.height {
                for col in 0..img.width {
                    let inside = (x..x + size).contains(&col) && (y..y + size).contains(&row);
                    if !inside {
                        prop_assert_eq!(
                            rotated.pixel(row as usize, col as usize),
                            img.pixel(row as usize, col as usize)
                        );
                    }
                }
            }
        }
    }
}
