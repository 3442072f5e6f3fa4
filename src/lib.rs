//! vqmatch retrieves where a visual query object appears in earlier frames
//! of a video.
//!
//! A visual crop (a box in one frame) is turned into a reference image, the
//! frames before the query frame are narrowed to a search window, and an
//! external similarity model scores box proposals in each searched frame.
//! Detections computed earlier for a whole clip can be reused through the
//! cached path instead of running the model again.

mod candidate;
pub mod image;
pub mod lowlevel;
pub mod model;
pub mod reference;
pub mod retrieve;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{FrameSource, MemoryFrames};

pub use candidate::bbox::BBox;
pub use candidate::topk::Proposal;
pub use model::{Detection, Instances, QueryPair, SimilarityModel};
pub use reference::{prepare_reference, ReferenceConfig, ReferenceImage, VisualCrop};
pub use retrieve::{
    retrieve, retrieve_cached, DetectionCache, Retrieval, RetrievalConfig, Retriever,
};
pub use search::{select_window, SearchWindow, WindowParams};
pub use util::{VqError, VqResult};
