//! Per-worker scoring scratch.
//!
//! A dense score buffer indexed by opposite-row id plus a list of the
//! rows touched while scoring the current driving row. Draining visits
//! and resets only the touched entries, so the per-row cost is bounded
//! by the number of rows that actually share a token with the query,
//! not by the size of the opposite matrix. Each worker owns one
//! accumulator and reuses it for every row in its block.

/// Accumulates partial dot-product sums for one driving row at a time.
#[derive(Debug)]
pub struct ScoreAccumulator {
    scores: Vec<f32>,
    touched: Vec<u32>,
}

impl ScoreAccumulator {
    /// `rows` is the number of rows on the opposite (indexed) side.
    pub fn new(rows: usize) -> Self {
        Self {
            scores: vec![0.0; rows],
            touched: Vec::new(),
        }
    }

    /// Add `weight` to the partial sum for `row`.
    ///
    /// Weights are strictly positive, so a non-zero score is exactly
    /// "touched this query".
    #[inline]
    pub fn add(&mut self, row: u32, weight: f32) {
        let score = &mut self.scores[row as usize];
        if *score == 0.0 {
            self.touched.push(row);
        }
        *score += weight;
    }

    /// Number of rows with a non-zero partial sum for the current
    /// driving row.
    pub fn candidates(&self) -> usize {
        self.touched.len()
    }

    /// Visit every accumulated (row, score) pair, then clear the
    /// scratch for the next driving row. Only touched entries are
    /// reset; nothing is reallocated.
    pub fn drain(&mut self, mut visit: impl FnMut(u32, f32)) {
        for &row in &self.touched {
            let score = &mut self.scores[row as usize];
            visit(row, *score);
            *score = 0.0;
        }
        self.touched.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_per_row() {
        let mut acc = ScoreAccumulator::new(4);
        acc.add(1, 0.5);
        acc.add(3, 1.0);
        acc.add(1, 0.25);
        assert_eq!(acc.candidates(), 2);

        let mut seen = Vec::new();
        acc.drain(|row, score| seen.push((row, score)));
        seen.sort_unstable_by_key(|&(row, _)| row);
        assert_eq!(seen, vec![(1, 0.75), (3, 1.0)]);
    }

    #[test]
    fn test_drain_clears_for_reuse() {
        let mut acc = ScoreAccumulator::new(2);
        acc.add(0, 1.0);
        acc.drain(|_, _| {});
        assert_eq!(acc.candidates(), 0);

        // The previous query must not leak into the next one.
        acc.add(0, 0.5);
        let mut seen = Vec::new();
        acc.drain(|row, score| seen.push((row, score)));
        assert_eq!(seen, vec![(0, 0.5)]);
    }
}
