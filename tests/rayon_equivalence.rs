#![cfg(feature = "rayon")]

use image::{Rgb, RgbImage};
use vqmatch::{
    Detection, Instances, MemoryFrames, QueryPair, RetrievalConfig, Retriever, SimilarityModel,
    VisualCrop, VqResult,
};

/// Scores each frame by the mean of its red channel and reports its size.
struct MeanModel;

impl SimilarityModel for MeanModel {
    fn predict(&mut self, pairs: &[QueryPair<'_>]) -> VqResult<Vec<Instances>> {
        Ok(pairs
            .iter()
            .map(|pair| {
                let sum: u64 = pair.frame.pixels().map(|p| u64::from(p[0])).sum();
                let count = u64::from(pair.frame.width()) * u64::from(pair.frame.height());
                vec![Detection {
                    x1: 1.5,
                    y1: 2.5,
                    x2: pair.frame.width() as f32 - 1.5,
                    y2: pair.frame.height() as f32 - 2.5,
                    score: sum as f32 / count as f32,
                }]
            })
            .collect())
    }
}

fn make_frames(count: usize) -> MemoryFrames {
    let frames = (0..count)
        .map(|idx| {
            RgbImage::from_fn(150, 100, |x, y| {
                Rgb([((x * 7 + y * 3 + idx as u32 * 11) & 0xFF) as u8, 0, 0])
            })
        })
        .collect();
    MemoryFrames::new(frames)
}

#[test]
fn parallel_matches_sequential_retrieval() {
    let crop = VisualCrop {
        frame_number: 0,
        original_width: 150,
        original_height: 100,
        x: 30,
        y: 20,
        width: 40,
        height: 30,
    };
    let base_cfg = RetrievalConfig {
        batch_size: 5,
        downscale_height: 60,
        subsampling_factor: 0.8,
        ..RetrievalConfig::default()
    };

    let mut source = make_frames(24);
    let mut seq = Retriever::new(MeanModel).with_config(RetrievalConfig {
        parallel: false,
        ..base_cfg.clone()
    });
    let mut par = Retriever::new(MeanModel).with_config(RetrievalConfig {
        parallel: true,
        ..base_cfg
    });

    let seq_result = seq.retrieve(&mut source, &crop, 23).unwrap();
    let par_result = par.retrieve(&mut source, &crop, 23).unwrap();

    assert_eq!(seq_result.window, par_result.window);
    assert_eq!(seq_result.bboxes, par_result.bboxes);
    assert_eq!(seq_result.scores, par_result.scores);
}
