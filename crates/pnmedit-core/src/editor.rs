//! Editing session holding at most one image.
//!
//! Every method corresponds to one command verb. A failed operation leaves
//! the session unchanged, except `load`, which always discards the previous
//! image first.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::decode::{load_pnm, PixelBuffer};
use crate::encode::save_pnm;
use crate::filter::{apply_filter, Filter};
use crate::histogram::{equalize, render_histogram};
use crate::selection::Selection;
use crate::transform::{apply_crop, apply_rotation};
use crate::{EditError, EditResult};

/// Outcome of a successful operation; `Display` gives the status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loaded(PathBuf),
    Saved(PathBuf),
    SelectedAll,
    Selected(Selection),
    Cropped,
    Applied(Filter),
    /// Carries the angle as requested, before normalization.
    Rotated(i32),
    Equalized,
    /// One line per histogram bin.
    Histogram(Vec<String>),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Loaded(path) => write!(f, "Loaded {}", path.display()),
            Status::Saved(path) => write!(f, "Saved {}", path.display()),
            Status::SelectedAll => f.write_str("Selected ALL"),
            Status::Selected(s) => write!(f, "Selected {} {} {} {}", s.x1, s.y1, s.x2, s.y2),
            Status::Cropped => f.write_str("Image cropped"),
            Status::Applied(filter) => write!(f, "APPLY {} done", filter.name()),
            Status::Rotated(angle) => write!(f, "Rotated {angle}"),
            Status::Equalized => f.write_str("Equalize done"),
            Status::Histogram(lines) => f.write_str(&lines.join("\n")),
        }
    }
}

/// The single in-memory image and the operations on it.
#[derive(Debug, Default)]
pub struct Editor {
    image: Option<PixelBuffer>,
}

impl Editor {
    /// Create an editor with no image loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor around an already decoded image.
    pub fn with_image(image: PixelBuffer) -> Self {
        Self { image: Some(image) }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    fn image_mut(&mut self) -> EditResult<&mut PixelBuffer> {
        self.image.as_mut().ok_or(EditError::NoImageLoaded)
    }

    /// Discard the current image, returning it if there was one.
    pub fn close(&mut self) -> Option<PixelBuffer> {
        self.image.take()
    }

    /// Load `path`, replacing the current image.
    ///
    /// The previous image is discarded whether or not loading succeeds.
    pub fn load(&mut self, path: impl AsRef<Path>) -> EditResult<Status> {
        let path = path.as_ref();
        self.image = None;

        let image = load_pnm(path).map_err(|source| {
            warn!(path = %path.display(), error = %source, "load failed");
            EditError::Load {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.image = Some(image);
        Ok(Status::Loaded(path.to_path_buf()))
    }

    /// Write the current image to `path`, as decimal text if `ascii`.
    pub fn save(&self, path: impl AsRef<Path>, ascii: bool) -> EditResult<Status> {
        let path = path.as_ref();
        let image = self.image.as_ref().ok_or(EditError::NoImageLoaded)?;

        save_pnm(image, path, ascii).map_err(|source| {
            warn!(path = %path.display(), error = %source, "save failed");
            EditError::Save {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Status::Saved(path.to_path_buf()))
    }

    /// Select a rectangle; corners may be given in any order.
    pub fn select(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) -> EditResult<Status> {
        let image = self.image_mut()?;
        let selection = Selection::normalized(x1, y1, x2, y2, image.width, image.height)?;
        image.selection = selection;
        debug!(?selection, "selection changed");
        Ok(Status::Selected(selection))
    }

    /// Select the whole image.
    pub fn select_all(&mut self) -> EditResult<Status> {
        let image = self.image_mut()?;
        image.selection = Selection::full(image.width, image.height);
        Ok(Status::SelectedAll)
    }

    pub fn crop(&mut self) -> EditResult<Status> {
        apply_crop(self.image_mut()?)?;
        Ok(Status::Cropped)
    }

    pub fn apply(&mut self, filter: Filter) -> EditResult<Status> {
        apply_filter(self.image_mut()?, filter)?;
        Ok(Status::Applied(filter))
    }

    pub fn rotate(&mut self, angle: i32) -> EditResult<Status> {
        apply_rotation(self.image_mut()?, angle)?;
        Ok(Status::Rotated(angle))
    }

    pub fn equalize(&mut self) -> EditResult<Status> {
        equalize(self.image_mut()?)?;
        Ok(Status::Equalized)
    }

    pub fn histogram(&self, max_stars: i64, bins: i64) -> EditResult<Status> {
        let image = self.image.as_ref().ok_or(EditError::NoImageLoaded)?;
        Ok(Status::Histogram(render_histogram(image, max_stars, bins)?))
    }
}
