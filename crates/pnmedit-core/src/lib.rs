//! pnmedit Core - Image transform engine
//!
//! This crate provides the core functionality of the pnmedit editor:
//! portable-anymap decoding and encoding, region selection, 3x3 convolution
//! filters, quarter-turn rotation, cropping, and histogram equalization.
//!
//! All operations are synchronous and work on a single in-memory
//! [`PixelBuffer`]; the [`Editor`] session owns that buffer and exposes one
//! method per command verb.

pub mod decode;
pub mod editor;
pub mod encode;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod selection;
pub mod transform;

pub use decode::{PixelBuffer, PixelFormat};
pub use editor::{Editor, Status};
pub use error::{EditError, EditResult};
pub use filter::{apply_filter, Filter};
pub use selection::Selection;
pub use transform::{apply_crop, apply_rotation};

/// Number of distinct 8-bit intensities.
pub const LEVELS: usize = 256;

/// Intensity histogram of a grayscale image.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Occurrences of each intensity (256 bins).
    pub counts: [u32; LEVELS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            counts: [0; LEVELS],
        }
    }
}

impl Histogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pixels counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Fold the 256 bins into `bins` contiguous groups.
    ///
    /// Groups are `256 / bins` intensities wide; the last group also takes
    /// any remainder. `bins` must be in `1..=256`.
    pub fn group(&self, bins: usize) -> Vec<u64> {
        debug_assert!((1..=LEVELS).contains(&bins));
        let width = LEVELS / bins;
        let mut groups = vec![0u64; bins];
        for (value, &count) in self.counts.iter().enumerate() {
            let idx = (value / width).min(bins - 1);
            groups[idx] += count as u64;
        }
        groups
    }
}
