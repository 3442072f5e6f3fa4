//! Top-K tracking for scored proposals.

use crate::candidate::bbox::BBox;
use std::cmp::Ordering;

/// A proposal together with its model score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proposal {
    /// Box in original-frame coordinates.
    pub bbox: BBox,
    /// Model confidence; only comparable within one model.
    pub score: f32,
}

fn proposal_cmp_desc(a: &Proposal, b: &Proposal) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.bbox.frame_number.cmp(&b.bbox.frame_number))
        .then_with(|| a.bbox.y1.cmp(&b.bbox.y1))
        .then_with(|| a.bbox.x1.cmp(&b.bbox.x1))
        .then_with(|| a.bbox.y2.cmp(&b.bbox.y2))
        .then_with(|| a.bbox.x2.cmp(&b.bbox.x2))
}

/// Sorts proposals by descending score with deterministic tie-breaking.
pub(crate) fn sort_proposals_desc(proposals: &mut [Proposal]) {
    proposals.sort_by(proposal_cmp_desc);
}

/// Returns the best proposal of a slice, ties broken like [`sort_proposals_desc`].
pub(crate) fn best_proposal<I>(proposals: I) -> Option<Proposal>
where
    I: IntoIterator<Item = Proposal>,
{
    proposals.into_iter().min_by(proposal_cmp_desc)
}

/// Top-K container with O(k) insertion cost.
pub struct TopK {
    k: usize,
    items: Vec<Proposal>,
}

impl TopK {
    /// Creates a new Top-K collector.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Pushes a proposal, evicting the worst one if at capacity.
    pub fn push(&mut self, proposal: Proposal) {
        if self.k == 0 {
            return;
        }
        if self.items.len() < self.k {
            self.items.push(proposal);
            return;
        }

        let mut worst_idx = 0usize;
        for (idx, item) in self.items.iter().enumerate().skip(1) {
            if proposal_cmp_desc(item, &self.items[worst_idx]) == Ordering::Greater {
                worst_idx = idx;
            }
        }

        if proposal_cmp_desc(&proposal, &self.items[worst_idx]) == Ordering::Less {
            self.items[worst_idx] = proposal;
        }
    }

    /// Returns proposals sorted by descending score.
    pub fn into_sorted_desc(mut self) -> Vec<Proposal> {
        sort_proposals_desc(&mut self.items);
        self.items
    }
}
