//! Interface to the external detection/similarity model.
//!
//! The model is opaque: given search frames paired with a reference image it
//! returns scored boxes per frame. Everything else in the crate is built
//! around this one batched call.

use crate::util::VqResult;
use image::RgbImage;

/// One model input: a (downscaled) search frame and the reference to find in it.
#[derive(Clone, Copy, Debug)]
pub struct QueryPair<'a> {
    /// Frame to search, as the model should see it.
    pub frame: &'a RgbImage,
    /// Reference image of the visual crop.
    pub reference: &'a RgbImage,
}

/// A scored box in the coordinates of the frame given to the model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
    /// Similarity confidence.
    pub score: f32,
}

/// Detections for one query pair.
pub type Instances = Vec<Detection>;

/// Batched detection/similarity model.
pub trait SimilarityModel {
    /// Scores every pair of the batch.
    ///
    /// Must return exactly one [`Instances`] per pair, in input order.
    fn predict(&mut self, pairs: &[QueryPair<'_>]) -> VqResult<Vec<Instances>>;
}

impl<M: SimilarityModel + ?Sized> SimilarityModel for &mut M {
    fn predict(&mut self, pairs: &[QueryPair<'_>]) -> VqResult<Vec<Instances>> {
        (**self).predict(pairs)
    }
}

impl<M: SimilarityModel + ?Sized> SimilarityModel for Box<M> {
    fn predict(&mut self, pairs: &[QueryPair<'_>]) -> VqResult<Vec<Instances>> {
        (**self).predict(pairs)
    }
}
