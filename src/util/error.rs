//! Error types for vqmatch.

use thiserror::Error;

/// Result alias for vqmatch operations.
pub type VqResult<T> = std::result::Result<T, VqError>;

/// Errors that can occur while selecting, preparing or retrieving.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum VqError {
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A sampling factor is negative, non-finite or out of range.
    #[error("invalid {name}: {value}")]
    InvalidFactor { name: &'static str, value: f64 },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A frame index is outside the frame source.
    #[error("frame {index} out of range (len {len})")]
    FrameOutOfRange { index: usize, len: usize },
    /// A bounding box has no area after clipping to the frame.
    #[error("degenerate box ({x1}, {y1}, {x2}, {y2})")]
    DegenerateBox { x1: i64, y1: i64, x2: i64, y2: i64 },
    /// The detection cache has no entry for a searched frame.
    #[error("no cached detections for frame {index} (cache len {len})")]
    CacheMiss { index: usize, len: usize },
    /// The model returned a different number of outputs than pairs given.
    #[error("model returned {got} outputs for a batch of {expected}")]
    BatchSizeMismatch { expected: usize, got: usize },
    /// The similarity model failed.
    #[error("model failure: {reason}")]
    Model { reason: String },
    /// Image decoding or filesystem access failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
