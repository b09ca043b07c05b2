//! Static work partitioning and result assembly.
//!
//! The driving side's row range is split into contiguous blocks, one
//! per worker thread, fixed before any work begins. Workers share the
//! inverted index and the driving matrix read-only and own all of
//! their mutable scratch, so matching runs without locks, and the
//! block layout (not the scheduler) determines output order.

use ahash::AHashMap;
use rayon::prelude::*;

use crate::config::ResolvedDimension;
use crate::error::Result;
use crate::matching::accumulator::ScoreAccumulator;
use crate::matching::matcher::TopNMatcher;
use crate::matching::topn::{Candidate, TopNSelector};
use crate::matching::MatchTriple;
use crate::vectorize::sparse::{InvertedIndex, SparseMatrix};
use crate::vectorize::CorpusIndex;

/// Split `[0, len)` into at most `chunks` contiguous blocks whose
/// sizes differ by at most one. Deterministic in its inputs.
pub fn split_offsets(len: usize, chunks: usize) -> Vec<(usize, usize)> {
    if len == 0 {
        return Vec::new();
    }
    let chunks = chunks.clamp(1, len);
    let base = len / chunks;
    let extra = len % chunks;

    let mut offsets = Vec::with_capacity(chunks);
    let mut start = 0;
    for i in 0..chunks {
        let size = base + usize::from(i < extra);
        offsets.push((start, size));
        start += size;
    }
    offsets
}

/// Build the worker pool. A failure here aborts the whole call.
fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;
    Ok(pool)
}

/// Run the partitioned top-N match over a built corpus index and
/// assemble the final triple stream: rows ascending, similarity
/// descending within a row, ties by ascending col.
pub fn run(
    index: &CorpusIndex,
    dimension: ResolvedDimension,
    top_n: usize,
    threads: usize,
) -> Result<Vec<MatchTriple>> {
    let pool = build_pool(threads)?;

    match dimension {
        ResolvedDimension::Left => {
            let inverted = InvertedIndex::build(&index.right);
            let blocks = split_offsets(index.left.rows(), threads);

            let batches: Vec<Vec<MatchTriple>> = pool.install(|| {
                blocks
                    .par_iter()
                    .map(|&(offset, len)| {
                        match_left_block(&index.left, &inverted, index.right.rows(), offset, len, top_n)
                    })
                    .collect()
            });

            Ok(batches.concat())
        }
        ResolvedDimension::Right => {
            let inverted = InvertedIndex::build(&index.left);
            let blocks = split_offsets(index.right.rows(), threads);

            let batches: Vec<AHashMap<u32, TopNSelector>> = pool.install(|| {
                blocks
                    .par_iter()
                    .map(|&(offset, len)| {
                        match_right_block(&index.right, &inverted, index.left.rows(), offset, len, top_n)
                    })
                    .collect()
            });

            Ok(merge_right_batches(batches, top_n))
        }
    }
}

/// Left driving: one worker block of left rows against the right
/// inverted index. Rows are visited in ascending order, so the block's
/// triples come out already ordered.
fn match_left_block(
    driving: &SparseMatrix,
    inverted: &InvertedIndex,
    opposite_rows: usize,
    offset: usize,
    len: usize,
    top_n: usize,
) -> Vec<MatchTriple> {
    let matcher = TopNMatcher::new(inverted);
    let mut acc = ScoreAccumulator::new(opposite_rows);
    let mut topn = TopNSelector::new(top_n);
    let mut triples = Vec::new();

    for row in offset..offset + len {
        let (token_ids, weights) = driving.row(row);
        for candidate in matcher.match_row(token_ids, weights, &mut acc, &mut topn) {
            triples.push(MatchTriple {
                row: row as u32,
                col: candidate.col,
                sim: candidate.sim,
            });
        }
    }

    triples
}

/// Right driving: one worker block of right rows against the left
/// inverted index. The accumulator is keyed by left row, so each right
/// row's scores feed per-left-row selectors bounded to `top_n`
/// candidates within this block. The output index space stays
/// left-row/right-col.
fn match_right_block(
    driving: &SparseMatrix,
    inverted: &InvertedIndex,
    opposite_rows: usize,
    offset: usize,
    len: usize,
    top_n: usize,
) -> AHashMap<u32, TopNSelector> {
    let matcher = TopNMatcher::new(inverted);
    let mut acc = ScoreAccumulator::new(opposite_rows);
    let mut selectors: AHashMap<u32, TopNSelector> = AHashMap::new();

    for col in offset..offset + len {
        let (token_ids, weights) = driving.row(col);
        matcher.accumulate(token_ids, weights, &mut acc);
        acc.drain(|left_row, sim| {
            selectors
                .entry(left_row)
                .or_insert_with(|| TopNSelector::new(top_n))
                .offer(Candidate {
                    col: col as u32,
                    sim,
                });
        });
    }

    selectors
}

/// Combine the per-block top-N sets of each left row and reselect the
/// final top-N. Candidates from different blocks carry distinct cols,
/// so the total candidate order makes the result independent of the
/// block layout.
fn merge_right_batches(
    batches: Vec<AHashMap<u32, TopNSelector>>,
    top_n: usize,
) -> Vec<MatchTriple> {
    let mut merged: AHashMap<u32, TopNSelector> = AHashMap::new();

    for batch in batches {
        for (row, mut selector) in batch {
            let target = merged
                .entry(row)
                .or_insert_with(|| TopNSelector::new(top_n));
            for candidate in selector.take_sorted() {
                target.offer(candidate);
            }
        }
    }

    let mut per_row: Vec<(u32, TopNSelector)> = merged.into_iter().collect();
    per_row.sort_unstable_by_key(|&(row, _)| row);

    let mut triples = Vec::new();
    for (row, mut selector) in per_row {
        for candidate in selector.take_sorted() {
            triples.push(MatchTriple {
                row,
                col: candidate.col,
                sim: candidate.sim,
            });
        }
    }
    triples
}
