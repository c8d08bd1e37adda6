//! Histogram display and equalization for grayscale images.
//!
//! Both operations count intensities over the whole image, not just the
//! selection, and both require a single-channel buffer.

use tracing::debug;

use crate::decode::PixelBuffer;
use crate::{EditError, EditResult, Histogram};

/// Marker character used for histogram bars.
pub const STAR: char = '*';

/// Count intensity occurrences of a grayscale image into 256 buckets.
///
/// # Errors
///
/// Returns `UnsupportedChannelCount` for RGB images.
pub fn compute_histogram(image: &PixelBuffer) -> EditResult<Histogram> {
    if image.channels() != 1 {
        return Err(EditError::UnsupportedChannelCount { required: 1 });
    }

    let mut hist = Histogram::new();
    for &v in &image.pixels {
        hist.counts[v as usize] += 1;
    }
    Ok(hist)
}

/// Scale grouped counts linearly against the largest group to `0..=max_stars`.
///
/// Star counts are truncated toward zero. All zeros if every count is zero.
pub fn scale_to_stars(groups: &[u64], max_stars: u32) -> Vec<u32> {
    let max = groups.iter().copied().max().unwrap_or(0);
    groups
        .iter()
        .map(|&count| {
            if max == 0 {
                0
            } else {
                (count as f64 * max_stars as f64 / max as f64) as u32
            }
        })
        .collect()
}

/// Render the `HISTOGRAM <max_stars> <bins>` display, one line per bin.
///
/// Each line is `<stars>\t|\t` followed by `stars` marker characters.
///
/// # Errors
///
/// * `UnsupportedChannelCount` - the image is RGB
/// * `InvalidParameters` - `bins` outside `1..=256` or negative `max_stars`
/// * `ResourceExhausted` - a display line could not be allocated
pub fn render_histogram(image: &PixelBuffer, max_stars: i64, bins: i64) -> EditResult<Vec<String>> {
    let hist = compute_histogram(image)?;

    let bins = usize::try_from(bins)
        .ok()
        .filter(|b| (1..=256).contains(b))
        .ok_or(EditError::InvalidParameters)?;
    let max_stars = u32::try_from(max_stars).map_err(|_| EditError::InvalidParameters)?;

    let stars = scale_to_stars(&hist.group(bins), max_stars);
    debug!(bins, max_stars, "rendered histogram");

    stars.into_iter().map(|n| bar_line(n as usize)).collect()
}

/// One display line: `<stars>\t|\t` then `stars` markers.
///
/// Returns `ResourceExhausted` if the line cannot be allocated.
fn bar_line(stars: usize) -> EditResult<String> {
    let mut line = format!("{stars}\t|\t");
    line.try_reserve_exact(stars)
        .map_err(|_| EditError::ResourceExhausted)?;
    line.extend(std::iter::repeat(STAR).take(stars));
    Ok(line)
}

/// Equalize a grayscale image using its cumulative distribution.
///
/// Every pixel of value `v` becomes `round(S(v) * 255 / (width * height))`,
/// where `S(v)` is the number of pixels with value `<= v`.
///
/// # Errors
///
/// Returns `UnsupportedChannelCount` for RGB images.
pub fn equalize(image: &mut PixelBuffer) -> EditResult<()> {
    let hist = compute_histogram(image)?;
    let lut = equalization_lut(&hist, hist.total() as usize);

    for v in image.pixels.iter_mut() {
        *v = lut[*v as usize];
    }

    debug!(
        width = image.width,
        height = image.height,
        "equalized image"
    );
    Ok(())
}

/// Cumulative-distribution mapping for an image of `area` pixels.
pub fn equalization_lut(hist: &Histogram, area: usize) -> [u8; 256] {
    let scale = 255.0 / area as f64;
    let mut lut = [0u8; 256];
    let mut cumulative = 0u64;

    for (value, &count) in lut.iter_mut().zip(hist.counts.iter()) {
        cumulative += count as u64;
        *value = (scale * cumulative as f64).round().clamp(0.0, 255.0) as u8;
    }
    lut
}


// ============================================================================
// Property-Based Tests
// ============================================================================
