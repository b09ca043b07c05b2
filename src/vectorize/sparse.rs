//! Sparse matrix and inverted index.
//!
//! One CSR matrix per input side: one row per input string, in input
//! order (row order is the public row/col index space), with one entry
//! per distinct token of the row. The inverted index is the CSC
//! transpose of the non-driving side, giving "which rows contain this
//! token" lookups with postings in ascending row order.

/// Row-major sparse matrix in CSR layout.
///
/// `indices` holds token ids, sorted and distinct within each row;
/// `data` holds the matching weights. Rows that produced no tokens are
/// present but empty (zero vectors).
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<f32>,
    cols: usize,
}

impl SparseMatrix {
    pub fn with_row_capacity(rows: usize) -> Self {
        let mut indptr = Vec::with_capacity(rows + 1);
        indptr.push(0);
        Self {
            indptr,
            indices: Vec::new(),
            data: Vec::new(),
            cols: 0,
        }
    }

    /// Append a row from sorted, distinct token ids, one unit weight
    /// per token.
    pub fn push_row(&mut self, token_ids: &[u32]) {
        debug_assert!(token_ids.windows(2).all(|w| w[0] < w[1]));
        self.indices.extend_from_slice(token_ids);
        self.data
            .extend(std::iter::repeat(1.0f32).take(token_ids.len()));
        self.indptr.push(self.indices.len());
    }

    /// Record the final dictionary size once both sides are built.
    pub fn set_cols(&mut self, cols: usize) {
        self.cols = cols;
    }

    pub fn rows(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Token ids and weights of row `i`.
    pub fn row(&self, i: usize) -> (&[u32], &[f32]) {
        let start = self.indptr[i];
        let end = self.indptr[i + 1];
        (&self.indices[start..end], &self.data[start..end])
    }

    /// Divide every row by its own L2 norm so non-empty rows become
    /// unit vectors. Empty rows are untouched.
    pub fn normalize_rows(&mut self) {
        for i in 0..self.rows() {
            let start = self.indptr[i];
            let end = self.indptr[i + 1];
            let norm = self.data[start..end]
                .iter()
                .map(|w| w * w)
                .sum::<f32>()
                .sqrt();
            if norm > 0.0 {
                for w in &mut self.data[start..end] {
                    *w /= norm;
                }
            }
        }
    }
}

/// Token → (row, weight) postings: the CSC transpose of a
/// [`SparseMatrix`]. Immutable once built; shared read-only across
/// worker threads.
#[derive(Debug)]
pub struct InvertedIndex {
    offsets: Vec<usize>,
    rows: Vec<u32>,
    weights: Vec<f32>,
}

impl InvertedIndex {
    /// Counting transpose. Postings of each token come out in
    /// ascending row order because rows are visited in order.
    pub fn build(matrix: &SparseMatrix) -> Self {
        let tokens = matrix.cols();
        let mut offsets = vec![0usize; tokens + 1];

        for &token in &matrix.indices {
            offsets[token as usize + 1] += 1;
        }
        for t in 0..tokens {
            offsets[t + 1] += offsets[t];
        }

        let nnz = matrix.nnz();
        let mut rows = vec![0u32; nnz];
        let mut weights = vec![0.0f32; nnz];
        let mut cursor = offsets.clone();

        for i in 0..matrix.rows() {
            let (ids, data) = matrix.row(i);
            for (&token, &weight) in ids.iter().zip(data) {
                let dest = cursor[token as usize];
                rows[dest] = i as u32;
                weights[dest] = weight;
                cursor[token as usize] += 1;
            }
        }

        Self {
            offsets,
            rows,
            weights,
        }
    }

    /// Rows containing `token` and their weights. Empty for tokens
    /// absent from the indexed side.
    pub fn postings(&self, token: u32) -> (&[u32], &[f32]) {
        let start = self.offsets[token as usize];
        let end = self.offsets[token as usize + 1];
        (&self.rows[start..end], &self.weights[start..end])
    }
}
