//! Recency and subsampling policy over the frames preceding a query.
//!
//! The base window is `[0, query_frame)`. Two filters apply in order:
//!
//! 1. Recency keeps the last `round(len * recency_factor)` frames, with `.5`
//!    ties rounded to even. A count of zero, or one at least `len`, keeps the
//!    whole window.
//! 2. Subsampling takes `floor(subsampling_factor * W)` positions from
//!    `linspace(0, W - 1, n)`, each floored. A count of zero keeps the whole
//!    recency window, so a factor of `0.0` disables subsampling rather than
//!    selecting nothing.

use crate::trace::trace_event;
use crate::util::math::{linspace, round_half_even};
use crate::util::{VqError, VqResult};

/// Sampling factors for a search window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowParams {
    /// Fraction of the most recent frames kept before subsampling.
    pub recency_factor: f64,
    /// Fraction of the recency window kept, evenly spaced.
    pub subsampling_factor: f64,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            recency_factor: 1.0,
            subsampling_factor: 1.0,
        }
    }
}

impl WindowParams {
    /// Checks that both factors are usable.
    ///
    /// Recency factors above 1 keep everything and are accepted; subsampling
    /// factors above 1 would repeat frames and are rejected.
    pub fn validate(&self) -> VqResult<()> {
        if !self.recency_factor.is_finite() || self.recency_factor < 0.0 {
            return Err(VqError::InvalidFactor {
                name: "recency_factor",
                value: self.recency_factor,
            });
        }
        if !self.subsampling_factor.is_finite()
            || self.subsampling_factor < 0.0
            || self.subsampling_factor > 1.0
        {
            return Err(VqError::InvalidFactor {
                name: "subsampling_factor",
                value: self.subsampling_factor,
            });
        }
        Ok(())
    }
}

/// Ordered frame indices to search, all smaller than the query frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchWindow {
    frames: Vec<usize>,
}

impl SearchWindow {
    /// Window covering every frame in `[0, num_frames)`.
    pub fn full(num_frames: usize) -> Self {
        Self {
            frames: (0..num_frames).collect(),
        }
    }

    /// Returns the number of frames in the window.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frame is searched.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the frame indices in search order.
    pub fn as_slice(&self) -> &[usize] {
        &self.frames
    }

    /// Iterates over frame indices in search order.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.frames.iter()
    }

    /// Splits the window into consecutive batches of at most `batch_size`.
    pub fn batches(&self, batch_size: usize) -> VqResult<std::slice::Chunks<'_, usize>> {
        if batch_size == 0 {
            return Err(VqError::InvalidInput("batch_size must be > 0"));
        }
        Ok(self.frames.chunks(batch_size))
    }

    /// Consumes the window and returns its frame indices.
    pub fn into_vec(self) -> Vec<usize> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a SearchWindow {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Selects the frames to search before `query_frame`.
pub fn select_window(query_frame: usize, params: WindowParams) -> VqResult<SearchWindow> {
    params.validate()?;

    let recent = recent_range(query_frame, params.recency_factor);
    let frames = subsample(recent, params.subsampling_factor);

    trace_event!(
        "search_window",
        query_frame = query_frame,
        frames = frames.len()
    );
    Ok(SearchWindow { frames })
}

fn recent_range(query_frame: usize, recency_factor: f64) -> std::ops::Range<usize> {
    let keep = round_half_even(query_frame as f64 * recency_factor);
    if keep <= 0.0 || keep >= query_frame as f64 {
        return 0..query_frame;
    }
    (query_frame - keep as usize)..query_frame
}

fn subsample(window: std::ops::Range<usize>, subsampling_factor: f64) -> Vec<usize> {
    let len = window.len();
    let count = (subsampling_factor * len as f64).floor() as usize;
    if count == 0 {
        return window.collect();
    }
    linspace(0.0, (len - 1) as f64, count)
        .into_iter()
        .map(|pos| window.start + pos.floor() as usize)
        .collect()
}
