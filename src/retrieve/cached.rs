//! Retrieval from precomputed detections.

use crate::candidate::bbox::BBox;
use crate::image::FrameSource;
use crate::reference::{prepare_reference, VisualCrop};
use crate::retrieve::{Retrieval, RetrievalConfig};
use crate::search::select_window;
use crate::trace::{trace_event, trace_span};
use crate::util::{VqError, VqResult};

/// Detections for a whole clip, indexed by absolute frame number.
///
/// Deserialization goes through [`DetectionCache::new`], so a cache loaded
/// from disk has the same per-frame alignment as one built in memory.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawDetectionCache")
)]
pub struct DetectionCache {
    bboxes: Vec<Vec<BBox>>,
    scores: Vec<Vec<f32>>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawDetectionCache {
    bboxes: Vec<Vec<BBox>>,
    scores: Vec<Vec<f32>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDetectionCache> for DetectionCache {
    type Error = VqError;

    fn try_from(raw: RawDetectionCache) -> VqResult<Self> {
        Self::new(raw.bboxes, raw.scores)
    }
}

impl DetectionCache {
    /// Builds a cache from per-frame boxes and scores.
    ///
    /// Both lists must cover the same frames, and each frame must have as many
    /// scores as boxes.
    pub fn new(bboxes: Vec<Vec<BBox>>, scores: Vec<Vec<f32>>) -> VqResult<Self> {
        if bboxes.len() != scores.len() {
            return Err(VqError::InvalidInput("bboxes and scores must cover the same frames"));
        }
        if bboxes.iter().zip(&scores).any(|(b, s)| b.len() != s.len()) {
            return Err(VqError::InvalidInput("each frame needs one score per box"));
        }
        Ok(Self { bboxes, scores })
    }

    /// Returns the number of frames covered.
    pub fn len(&self) -> usize {
        self.bboxes.len().min(self.scores.len())
    }

    /// Returns true if no frame is covered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the boxes and scores of `frame_number`.
    pub fn get(&self, frame_number: usize) -> VqResult<(&[BBox], &[f32])> {
        match (self.bboxes.get(frame_number), self.scores.get(frame_number)) {
            (Some(bboxes), Some(scores)) => Ok((bboxes, scores)),
            _ => Err(VqError::CacheMiss {
                index: frame_number,
                len: self.len(),
            }),
        }
    }
}

/// Retrieves proposals for the frames before `query_frame` from `cache`.
///
/// The reference is still prepared so callers can display it next to the
/// results. Raw frames are read only when `cfg.visualize` is set.
pub fn retrieve_cached<S>(
    source: &mut S,
    crop: &VisualCrop,
    query_frame: usize,
    cache: &DetectionCache,
    cfg: &RetrievalConfig,
) -> VqResult<Retrieval>
where
    S: FrameSource + ?Sized,
{
    cfg.window_params().validate()?;
    let _span = trace_span!("retrieve_cached", query_frame = query_frame).entered();

    let reference = prepare_reference(source, crop, &cfg.reference)?;
    let window = select_window(query_frame, cfg.window_params())?;

    let mut bboxes = Vec::with_capacity(window.len());
    let mut scores = Vec::with_capacity(window.len());
    for &frame_number in &window {
        let (frame_bboxes, frame_scores) = cache.get(frame_number)?;
        bboxes.push(frame_bboxes.to_vec());
        scores.push(frame_scores.to_vec());
    }

    let mut frames = Vec::new();
    if cfg.visualize {
        frames.reserve(window.len());
        for &frame_number in &window {
            frames.push(source.frame(frame_number)?);
        }
    }

    trace_event!("cached_lookup", frames = window.len());
    Ok(Retrieval {
        window,
        bboxes,
        scores,
        frames,
        reference,
    })
}
