//! 3x3 convolution filters over the active selection.
//!
//! Provides the four fixed kernels used by `APPLY`:
//!
//! - [`Filter::Edge`] - Laplacian edge detection
//! - [`Filter::Sharpen`] - 4-neighbour sharpen
//! - [`Filter::Blur`] - Box blur (all taps 1/9)
//! - [`Filter::GaussianBlur`] - 3x3 binomial approximation of a Gaussian
//!
//! # Boundary policy
//!
//! Pixels in the outermost row/column of the *image* are never written, even
//! when the selection touches that edge. Taps that would fall outside the
//! image are left out of the weighted sum rather than zero-padded or clamped.
//! All taps read from a snapshot of the image taken before the pass.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decode::PixelBuffer;
use crate::{EditError, EditResult};

/// Convolution kernel weights, row-major with the centre at `[1][1]`.
pub type Kernel = [[f64; 3]; 3];

const EDGE: Kernel = [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]];

const SHARPEN: Kernel = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

const BLUR: Kernel = [
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
];

const GAUSSIAN: Kernel = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

/// One of the fixed convolution filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    Edge,
    Sharpen,
    Blur,
    GaussianBlur,
}

impl Filter {
    /// Parse the command-line name (`EDGE`, `SHARPEN`, `BLUR`, `GAUSSIAN_BLUR`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "EDGE" => Some(Filter::Edge),
            "SHARPEN" => Some(Filter::Sharpen),
            "BLUR" => Some(Filter::Blur),
            "GAUSSIAN_BLUR" => Some(Filter::GaussianBlur),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Filter::Edge => "EDGE",
            Filter::Sharpen => "SHARPEN",
            Filter::Blur => "BLUR",
            Filter::GaussianBlur => "GAUSSIAN_BLUR",
        }
    }

    pub fn kernel(self) -> &'static Kernel {
        match self {
            Filter::Edge => &EDGE,
            Filter::Sharpen => &SHARPEN,
            Filter::Blur => &BLUR,
            Filter::GaussianBlur => &GAUSSIAN,
        }
    }
}

/// Apply `filter` to every eligible pixel of the selection, in place.
///
/// # Errors
///
/// * `UnsupportedChannelCount` - the image is not RGB
/// * `ResourceExhausted` - the snapshot could not be allocated
///
/// On error the image is left untouched.
pub fn apply_filter(image: &mut PixelBuffer, filter: Filter) -> EditResult<()> {
    if image.channels() != 3 {
        return Err(EditError::UnsupportedChannelCount { required: 3 });
    }

    let mut snapshot = Vec::new();
    snapshot
        .try_reserve_exact(image.pixels.len())
        .map_err(|_| EditError::ResourceExhausted)?;
    snapshot.extend_from_slice(&image.pixels);

    let (width, height) = (image.width as usize, image.height as usize);
    let sel = image.selection;

    // Keep a one pixel margin wherever the selection reaches the image edge.
    let y_start = (sel.y1 as usize).max(1);
    let y_end = (sel.y2 as usize).min(height - 1);
    let x_start = (sel.x1 as usize).max(1);
    let x_end = (sel.x2 as usize).min(width - 1);

    let kernel = filter.kernel();
    let stride = image.stride();

    for row in y_start..y_end {
        for col in x_start..x_end {
            let sums = convolve_pixel(&snapshot, width, height, stride, row, col, kernel);
            let idx = row * stride + col * 3;
            for (c, sum) in sums.iter().enumerate() {
                image.pixels[idx + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    debug!(
        filter = filter.name(),
        rows = y_end.saturating_sub(y_start),
        cols = x_end.saturating_sub(x_start),
        "applied convolution filter"
    );
    Ok(())
}

/// Weighted RGB sum around (`row`, `col`), skipping taps outside the image.
#[inline]
fn convolve_pixel(
    src: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    row: usize,
    col: usize,
    kernel: &Kernel,
) -> [f64; 3] {
    let mut sums = [0.0f64; 3];
    for (ky, kernel_row) in kernel.iter().enumerate() {
        let Some(r) = (row + ky).checked_sub(1).filter(|r| *r < height) else {
            continue;
        };
        for (kx, weight) in kernel_row.iter().enumerate() {
            let Some(c) = (col + kx).checked_sub(1).filter(|c| *c < width) else {
                continue;
            };
            let idx = r * stride + c * 3;
            for (ch, sum) in sums.iter_mut().enumerate() {
                *sum += weight * src[idx + ch] as f64;
            }
        }
    }
    sums
}
