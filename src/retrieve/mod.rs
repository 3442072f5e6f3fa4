//! Retrieval of the proposals most similar to a visual crop.
//!
//! Two paths share the window policy and the reference preparation:
//!
//! * the live path runs the model over the search window in batches,
//! * the cached path reads detections computed earlier for the whole clip.
//!
//! [`Retriever`] bundles a model with a [`RetrievalConfig`] and exposes both,
//! plus [`Retriever::precompute`] to build the cache the cached path reads.

mod cached;
mod live;

pub use cached::{retrieve_cached, DetectionCache};
pub use live::retrieve;

use crate::candidate::bbox::BBox;
use crate::candidate::topk::{best_proposal, Proposal, TopK};
use crate::image::FrameSource;
use crate::model::SimilarityModel;
use crate::reference::{ReferenceConfig, ReferenceImage, VisualCrop};
use crate::search::{SearchWindow, WindowParams};
use crate::util::{VqError, VqResult};
use image::RgbImage;

/// Configuration for a retrieval call.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalConfig {
    /// Frames sent to the model per call.
    pub batch_size: usize,
    /// Height frames are scaled to before inference.
    pub downscale_height: u32,
    /// Fraction of the most recent frames searched.
    pub recency_factor: f64,
    /// Fraction of the recency window searched, evenly spaced.
    pub subsampling_factor: f64,
    /// Keep the raw searched frames in the result.
    pub visualize: bool,
    /// Resize batch frames in parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// Reference crop parameters of the model.
    pub reference: ReferenceConfig,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            batch_size: 8,
            downscale_height: 700,
            recency_factor: 1.0,
            subsampling_factor: 1.0,
            visualize: false,
            parallel: false,
            reference: ReferenceConfig::default(),
        }
    }
}

impl RetrievalConfig {
    /// Returns the window sampling factors.
    pub fn window_params(&self) -> WindowParams {
        WindowParams {
            recency_factor: self.recency_factor,
            subsampling_factor: self.subsampling_factor,
        }
    }

    /// Rejects settings no retrieval can run with.
    pub fn validate(&self) -> VqResult<()> {
        if self.batch_size == 0 {
            return Err(VqError::InvalidInput("batch_size must be > 0"));
        }
        if self.downscale_height == 0 {
            return Err(VqError::InvalidInput("downscale_height must be > 0"));
        }
        if self.reference.size == 0 {
            return Err(VqError::InvalidInput("reference size must be > 0"));
        }
        self.window_params().validate()
    }
}

/// Proposals retrieved for each frame of a search window.
///
/// `bboxes[i]` and `scores[i]` belong to frame `window.as_slice()[i]` and have
/// the same length. `frames` is empty unless the call asked to visualize.
#[derive(Clone, Debug)]
pub struct Retrieval {
    /// Frames searched, in order.
    pub window: SearchWindow,
    /// Boxes per searched frame, in original-frame coordinates.
    pub bboxes: Vec<Vec<BBox>>,
    /// Model scores per searched frame.
    pub scores: Vec<Vec<f32>>,
    /// Raw searched frames when visualizing.
    pub frames: Vec<RgbImage>,
    /// Reference image used for matching.
    pub reference: ReferenceImage,
}

impl Retrieval {
    /// Returns the number of searched frames.
    pub fn len(&self) -> usize {
        self.bboxes.len()
    }

    /// Returns true if no frame was searched.
    pub fn is_empty(&self) -> bool {
        self.bboxes.is_empty()
    }

    /// Iterates over the scored proposals of the `pos`-th searched frame.
    pub fn proposals(&self, pos: usize) -> impl Iterator<Item = Proposal> + '_ {
        let bboxes = self.bboxes.get(pos).map(Vec::as_slice).unwrap_or_default();
        let scores = self.scores.get(pos).map(Vec::as_slice).unwrap_or_default();
        bboxes
            .iter()
            .zip(scores)
            .map(|(&bbox, &score)| Proposal { bbox, score })
    }

    /// Returns the highest-scoring proposal of every searched frame.
    pub fn best_per_frame(&self) -> Vec<Option<Proposal>> {
        (0..self.len())
            .map(|pos| best_proposal(self.proposals(pos)))
            .collect()
    }

    /// Returns the `k` best proposals over all frames, best first.
    pub fn top_k(&self, k: usize) -> Vec<Proposal> {
        let mut topk = TopK::new(k);
        for pos in 0..self.len() {
            for proposal in self.proposals(pos) {
                topk.push(proposal);
            }
        }
        topk.into_sorted_desc()
    }
}

/// A similarity model with the settings to run retrievals.
pub struct Retriever<M> {
    model: M,
    cfg: RetrievalConfig,
}

impl<M: SimilarityModel> Retriever<M> {
    /// Creates a retriever with the default configuration.
    pub fn new(model: M) -> Self {
        Self {
            model,
            cfg: RetrievalConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: RetrievalConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.cfg
    }

    /// Returns the wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Consumes the retriever and returns the model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Searches the frames before `query_frame` with the model.
    pub fn retrieve<S>(
        &mut self,
        source: &mut S,
        crop: &VisualCrop,
        query_frame: usize,
    ) -> VqResult<Retrieval>
    where
        S: FrameSource + ?Sized,
    {
        retrieve(source, crop, query_frame, &mut self.model, &self.cfg)
    }

    /// Looks up the frames before `query_frame` in `cache`; the model is not used.
    pub fn retrieve_cached<S>(
        &self,
        source: &mut S,
        crop: &VisualCrop,
        query_frame: usize,
        cache: &DetectionCache,
    ) -> VqResult<Retrieval>
    where
        S: FrameSource + ?Sized,
    {
        retrieve_cached(source, crop, query_frame, cache, &self.cfg)
    }

    /// Runs the model over frames `[0, num_frames)` and caches the detections.
    ///
    /// Recency, subsampling and `visualize` are ignored.
    pub fn precompute<S>(
        &mut self,
        source: &mut S,
        crop: &VisualCrop,
        num_frames: usize,
    ) -> VqResult<DetectionCache>
    where
        S: FrameSource + ?Sized,
    {
        live::precompute(source, crop, num_frames, &mut self.model, &self.cfg)
    }
}
