//! Cropping to the active selection.
//!
//! The selected rectangle is copied into a new buffer, which then replaces
//! the image grid. Pixel (`row`, `col`) of the selection lands at
//! (`row - y1`, `col - x1`) in the result.

use tracing::debug;

use crate::decode::{try_alloc_samples, PixelBuffer};
use crate::{EditError, EditResult};

/// Crop the image to its selection.
///
/// After cropping, width and height equal the selection's size and the
/// selection covers the whole new image.
///
/// # Errors
///
/// Returns `ResourceExhausted` if the target buffer cannot be allocated. The
/// original image is not modified in that case.
pub fn apply_crop(image: &mut PixelBuffer) -> EditResult<()> {
    let sel = image.selection;
    let out_width = sel.width() as usize;
    let out_height = sel.height() as usize;
    let row_len = out_width * image.channels();

    let mut output =
        try_alloc_samples(out_height * row_len).map_err(|_| EditError::ResourceExhausted)?;

    // Copy pixel data row by row
    for y in 0..out_height {
        let src = image.index(sel.y1 as usize + y, sel.x1 as usize);
        let dst = y * row_len;
        output[dst..dst + row_len].copy_from_slice(&image.pixels[src..src + row_len]);
    }

    image.replace_grid(out_width as u32, out_height as u32, output);
    debug!(
        x = sel.x1,
        y = sel.y1,
        width = image.width,
        height = image.height,
        "cropped image"
    );
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
