//! Rectangular selection over a pixel buffer.
//!
//! Coordinates are half-open pixel bounds: `x1..x2` columns and `y1..y2` rows,
//! with `0 <= x1 < x2 <= width` and `0 <= y1 < y2 <= height`.

use serde::{Deserialize, Serialize};

use crate::EditError;

/// Active rectangular region of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Selection {
    /// Selection covering a whole `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: width,
            y2: height,
        }
    }

    /// Build a selection from user coordinates.
    ///
    /// Corners may be given in any order; they are swapped so that
    /// `x1 <= x2` and `y1 <= y2` before validation. An empty or
    /// out-of-bounds rectangle is rejected with `InvalidCoordinates`.
    pub fn normalized(
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        width: u32,
        height: u32,
    ) -> Result<Self, EditError> {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };

        if x1 < 0
            || y1 < 0
            || x2 > i64::from(width)
            || y2 > i64::from(height)
            || x1 >= x2
            || y1 >= y2
        {
            return Err(EditError::InvalidCoordinates);
        }

        // All four values are now within 0..=u32::MAX.
        Ok(Self {
            x1: x1 as u32,
            y1: y1 as u32,
            x2: x2 as u32,
            y2: y2 as u32,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full() {
        let sel = Selection::full(10, 5);
        assert_eq!(sel, Selection { x1: 0, y1: 0, x2: 10, y2: 5 });
        assert_eq!(sel.width(), 10);
        assert_eq!(sel.height(), 5);
        assert!(!sel.is_square());
    }

    #[test]
    fn test_normalized_accepts_valid() {
        let sel = Selection::normalized(2, 2, 5, 5, 10, 10).unwrap();
        assert_eq!(sel, Selection { x1: 2, y1: 2, x2: 5, y2: 5 });
        assert!(sel.is_square());
    }

    #[test]
    fn test_normalized_swaps_corners() {
        let forward = Selection::normalized(2, 2, 5, 5, 10, 10).unwrap();
        let reversed = Selection::normalized(5, 5, 2, 2, 10, 10).unwrap();
        assert_eq!(forward, reversed);

        let mixed = Selection::normalized(5, 2, 2, 5, 10, 10).unwrap();
        assert_eq!(forward, mixed);
    }

    #[test]
    fn test_normalized_full_extent() {
        let sel = Selection::normalized(0, 0, 10, 8, 10, 8).unwrap();
        assert_eq!(sel, Selection::full(10, 8));
    }

    #[test]
    fn test_normalized_rejects_out_of_bounds() {
        assert!(matches!(
            Selection::normalized(-1, 0, 5, 5, 10, 10),
            Err(EditError::InvalidCoordinates)
        ));
        assert!(Selection::normalized(0, 0, 11, 5, 10, 10).is_err());
        assert!(Selection::normalized(0, 0, 5, 11, 10, 10).is_err());
    }

    #[test]
    fn test_normalized_rejects_empty() {
        assert!(Selection::normalized(3, 0, 3, 5, 10, 10).is_err());
        assert!(Selection::normalized(0, 4, 5, 4, 10, 10).is_err());
    }
}
