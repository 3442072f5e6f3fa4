//! Detection proposals and their ranking.
//!
//! Includes the frame-tagged box type and Top-K selection over proposals.

pub(crate) mod bbox;
pub(crate) mod topk;
