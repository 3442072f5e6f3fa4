//! Batched inference over a search window.
//!
//! Frames are read, conformed to the visual crop's annotated size, scaled to
//! `downscale_height` and sent to the model one batch at a time. A batch's
//! model output lives only inside its loop iteration.

use crate::candidate::bbox::BBox;
use crate::image::{conform_size, downscale_to_height, FrameSource};
use crate::model::{Instances, QueryPair, SimilarityModel};
use crate::reference::{prepare_reference, ReferenceImage, VisualCrop};
use crate::retrieve::{DetectionCache, Retrieval, RetrievalConfig};
use crate::search::{select_window, SearchWindow};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::math::unscale_coord;
use crate::util::{VqError, VqResult};
use image::RgbImage;
use std::borrow::Cow;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// A frame ready for inference.
struct ScaledFrame {
    img: RgbImage,
    /// `downscale_height / conformed_height`.
    scale: f64,
    /// The decoded size differed from the annotated size.
    conformed: bool,
}

/// Per-frame results accumulated across batches.
struct BatchResults {
    bboxes: Vec<Vec<BBox>>,
    scores: Vec<Vec<f32>>,
    frames: Vec<RgbImage>,
}

/// Retrieves proposals for the frames before `query_frame` using `model`.
///
/// Any error aborts the call; results of earlier batches are discarded.
pub fn retrieve<S, M>(
    source: &mut S,
    crop: &VisualCrop,
    query_frame: usize,
    model: &mut M,
    cfg: &RetrievalConfig,
) -> VqResult<Retrieval>
where
    S: FrameSource + ?Sized,
    M: SimilarityModel + ?Sized,
{
    cfg.validate()?;
    let _span = trace_span!("retrieve", query_frame = query_frame).entered();

    let reference = prepare_reference(source, crop, &cfg.reference)?;
    let window = select_window(query_frame, cfg.window_params())?;
    let results = run_batches(source, crop, &reference, &window, model, cfg)?;

    Ok(Retrieval {
        window,
        bboxes: results.bboxes,
        scores: results.scores,
        frames: results.frames,
        reference,
    })
}

pub(crate) fn precompute<S, M>(
    source: &mut S,
    crop: &VisualCrop,
    num_frames: usize,
    model: &mut M,
    cfg: &RetrievalConfig,
) -> VqResult<DetectionCache>
where
    S: FrameSource + ?Sized,
    M: SimilarityModel + ?Sized,
{
    cfg.validate()?;
    let _span = trace_span!("precompute", frames = num_frames).entered();

    let cfg = RetrievalConfig {
        visualize: false,
        ..cfg.clone()
    };
    let reference = prepare_reference(source, crop, &cfg.reference)?;
    let window = SearchWindow::full(num_frames);
    let results = run_batches(source, crop, &reference, &window, model, &cfg)?;
    DetectionCache::new(results.bboxes, results.scores)
}

fn run_batches<S, M>(
    source: &mut S,
    crop: &VisualCrop,
    reference: &ReferenceImage,
    window: &SearchWindow,
    model: &mut M,
    cfg: &RetrievalConfig,
) -> VqResult<BatchResults>
where
    S: FrameSource + ?Sized,
    M: SimilarityModel + ?Sized,
{
    let mut results = BatchResults {
        bboxes: Vec::with_capacity(window.len()),
        scores: Vec::with_capacity(window.len()),
        frames: Vec::new(),
    };

    for (batch_idx, batch) in window.batches(cfg.batch_size)?.enumerate() {
        let _span = trace_span!("batch", index = batch_idx, frames = batch.len()).entered();

        let mut raw = Vec::with_capacity(batch.len());
        for &frame_number in batch {
            raw.push(source.frame(frame_number)?);
        }
        let scaled = scale_batch(&raw, crop, cfg)?;
        for (frame, &frame_number) in scaled.iter().zip(batch) {
            if frame.conformed {
                trace_warn!(
                    "frame_size_mismatch",
                    frame = frame_number,
                    width = crop.original_width,
                    height = crop.original_height
                );
            }
        }

        let pairs: Vec<QueryPair<'_>> = scaled
            .iter()
            .map(|frame| QueryPair {
                frame: &frame.img,
                reference: reference.image(),
            })
            .collect();
        let outputs = model.predict(&pairs)?;
        if outputs.len() != batch.len() {
            return Err(VqError::BatchSizeMismatch {
                expected: batch.len(),
                got: outputs.len(),
            });
        }

        let mut detections = 0usize;
        let unpacked = outputs.into_iter().zip(&scaled).zip(batch);
        for ((instances, frame), &frame_number) in unpacked {
            detections += instances.len();
            let (bboxes, scores) = rescale_instances(instances, frame.scale, frame_number);
            results.bboxes.push(bboxes);
            results.scores.push(scores);
        }
        trace_event!("batch_done", index = batch_idx, detections = detections);

        if cfg.visualize {
            results.frames.extend(raw);
        }
    }

    Ok(results)
}

fn scale_batch(
    raw: &[RgbImage],
    crop: &VisualCrop,
    cfg: &RetrievalConfig,
) -> VqResult<Vec<ScaledFrame>> {
    if cfg.parallel {
        return scale_batch_par(raw, crop, cfg.downscale_height);
    }
    raw.iter()
        .map(|img| scale_frame(img, crop, cfg.downscale_height))
        .collect()
}

/// Scales a batch on the rayon pool; results keep batch order.
#[cfg(feature = "rayon")]
fn scale_batch_par(
    raw: &[RgbImage],
    crop: &VisualCrop,
    downscale_height: u32,
) -> VqResult<Vec<ScaledFrame>> {
    raw.par_iter()
        .map(|img| scale_frame(img, crop, downscale_height))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn scale_batch_par(
    raw: &[RgbImage],
    crop: &VisualCrop,
    downscale_height: u32,
) -> VqResult<Vec<ScaledFrame>> {
    raw.iter()
        .map(|img| scale_frame(img, crop, downscale_height))
        .collect()
}

fn scale_frame(
    img: &RgbImage,
    crop: &VisualCrop,
    downscale_height: u32,
) -> VqResult<ScaledFrame> {
    let conformed = conform_size(img, crop.original_width, crop.original_height)?;
    let (scaled, scale) = downscale_to_height(&conformed, downscale_height)?;
    Ok(ScaledFrame {
        img: scaled,
        scale,
        conformed: matches!(conformed, Cow::Owned(_)),
    })
}

fn rescale_instances(
    instances: Instances,
    scale: f64,
    frame_number: usize,
) -> (Vec<BBox>, Vec<f32>) {
    instances
        .into_iter()
        .map(|det| {
            let bbox = BBox::new(
                frame_number,
                unscale_coord(det.x1, scale),
                unscale_coord(det.y1, scale),
                unscale_coord(det.x2, scale),
                unscale_coord(det.y2, scale),
            );
            (bbox, det.score)
        })
        .unzip()
}
