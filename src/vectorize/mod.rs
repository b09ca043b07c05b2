//! Tokenization and sparse vector construction.
//!
//! Turns the two input text columns into CSR matrices over a shared
//! token dictionary. Everything here is built once per call and is
//! immutable for the rest of the call.

pub mod dictionary;
pub mod sparse;
pub mod tokenize;

use smallvec::SmallVec;

use crate::config::{JoinConfig, Normalization};
use dictionary::TokenDictionary;
use sparse::SparseMatrix;
use tokenize::{extract_ngrams, maybe_word_normalize};

/// The vectorized form of both input collections: a shared dictionary
/// and one sparse matrix per side.
#[derive(Debug)]
pub struct CorpusIndex {
    pub left: SparseMatrix,
    pub right: SparseMatrix,
    tokens: usize,
}

impl CorpusIndex {
    /// Tokenize and vectorize both sides. Left rows intern first, so
    /// ids are assigned in left-then-right first-seen order.
    pub fn build<L, R>(left: &[L], right: &[R], config: &JoinConfig) -> Self
    where
        L: AsRef<str>,
        R: AsRef<str>,
    {
        let mut dict = TokenDictionary::new();
        let mut left_matrix = vectorize_side(left, config, &mut dict);
        let mut right_matrix = vectorize_side(right, config, &mut dict);

        left_matrix.set_cols(dict.len());
        right_matrix.set_cols(dict.len());

        if config.normalization == Normalization::L2 {
            left_matrix.normalize_rows();
            right_matrix.normalize_rows();
        }

        Self {
            left: left_matrix,
            right: right_matrix,
            tokens: dict.len(),
        }
    }

    /// Number of distinct tokens across both sides.
    pub fn tokens(&self) -> usize {
        self.tokens
    }
}

fn vectorize_side<S: AsRef<str>>(
    values: &[S],
    config: &JoinConfig,
    dict: &mut TokenDictionary,
) -> SparseMatrix {
    let mut matrix = SparseMatrix::with_row_capacity(values.len());
    // Scratch for the current row's token ids; cleared per row.
    let mut ids: SmallVec<[u32; 32]> = SmallVec::new();

    for value in values {
        let text = maybe_word_normalize(value.as_ref(), config.apply_word_normalization);

        ids.clear();
        for gram in extract_ngrams(&text) {
            ids.push(dict.intern(gram));
        }
        // Distinct tokens only: a repeated n-gram contributes a single
        // unit-weight entry.
        ids.sort_unstable();
        ids.dedup();

        matrix.push_row(&ids);
    }

    matrix
}
