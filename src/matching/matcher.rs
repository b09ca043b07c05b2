//! Per-row top-N matching against an inverted index.
//!
//! For a driving row with vector V, every (token, weight) of V pulls
//! the postings of that token and adds `weight_v * weight_o` to the
//! accumulator entry of each posting row. Afterwards the accumulator
//! holds the exact dot product between V and every opposite row
//! sharing at least one token with it; rows sharing none are never
//! scored. That pruning is what keeps the join sub-quadratic.

use smallvec::SmallVec;

use crate::matching::accumulator::ScoreAccumulator;
use crate::matching::topn::{Candidate, TopNSelector};
use crate::vectorize::sparse::InvertedIndex;

/// Scores driving rows against one read-only inverted index.
#[derive(Debug, Clone, Copy)]
pub struct TopNMatcher<'a> {
    index: &'a InvertedIndex,
}

impl<'a> TopNMatcher<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    /// Accumulate partial dot-product sums for one driving row.
    pub fn accumulate(
        &self,
        token_ids: &[u32],
        weights: &[f32],
        acc: &mut ScoreAccumulator,
    ) {
        for (&token, &weight) in token_ids.iter().zip(weights) {
            let (rows, posting_weights) = self.index.postings(token);
            for (&row, &posting_weight) in rows.iter().zip(posting_weights) {
                acc.add(row, weight * posting_weight);
            }
        }
    }

    /// Score one driving row and select its top candidates, sorted in
    /// output order. `acc` and `topn` are caller-owned scratch, reused
    /// across the rows of a block.
    pub fn match_row(
        &self,
        token_ids: &[u32],
        weights: &[f32],
        acc: &mut ScoreAccumulator,
        topn: &mut TopNSelector,
    ) -> SmallVec<[Candidate; 8]> {
        self.accumulate(token_ids, weights, acc);
        acc.drain(|row, sim| topn.offer(Candidate { col: row, sim }));
        topn.take_sorted()
    }
}
