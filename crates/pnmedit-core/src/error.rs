//! Error type for editor operations.
//!
//! The `Display` text of every variant is the one-line status reported to the
//! user when the operation fails.

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Error type for editor operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// An operation other than load was requested with no image in memory.
    #[error("No image loaded")]
    NoImageLoaded,

    /// Selection bounds are empty or fall outside the image.
    #[error("Invalid set of coordinates")]
    InvalidCoordinates,

    /// Sub-region rotation requires a square selection.
    #[error("The selection must be square")]
    NotSquareSelection,

    /// Rotation angle is not a multiple of 90 degrees.
    #[error("Unsupported rotation angle")]
    UnsupportedAngle,

    /// The image does not have the channel count the operation needs.
    #[error("{}", channel_count_message(.required))]
    UnsupportedChannelCount { required: usize },

    /// Histogram bin or star counts out of range.
    #[error("Invalid set of parameters")]
    InvalidParameters,

    /// A replacement or scratch buffer could not be allocated.
    #[error("Memory allocation failed")]
    ResourceExhausted,

    /// The file could not be read or parsed.
    #[error("Failed to load {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// The file could not be written.
    #[error("Failed to save {}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

fn channel_count_message(required: &usize) -> &'static str {
    if *required == 3 {
        "Easy, Charlie Chaplin"
    } else {
        "Black and white image needed"
    }
}

/// Result type for editor operations.
pub type EditResult<T> = Result<T, EditError>;
