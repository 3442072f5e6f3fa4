//! Frame-tagged bounding boxes.

/// A detection proposal in original-frame pixel coordinates.
///
/// Corners are `(x1, y1)` inclusive and `(x2, y2)` exclusive. Coordinates are
/// signed because a model may place boxes partly outside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    /// Frame the box was found in.
    pub frame_number: usize,
    /// Left edge, inclusive.
    pub x1: i64,
    /// Top edge, inclusive.
    pub y1: i64,
    /// Right edge, exclusive.
    pub x2: i64,
    /// Bottom edge, exclusive.
    pub y2: i64,
}

impl BBox {
    /// Creates a box tagged with `frame_number`.
    pub fn new(frame_number: usize, x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self {
            frame_number,
            x1,
            y1,
            x2,
            y2,
        }
    }

    /// Returns the box width, zero for inverted boxes.
    pub fn width(&self) -> i64 {
        (self.x2 - self.x1).max(0)
    }

    /// Returns the box height, zero for inverted boxes.
    pub fn height(&self) -> i64 {
        (self.y2 - self.y1).max(0)
    }

    /// Returns the box area in pixels.
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }
}
