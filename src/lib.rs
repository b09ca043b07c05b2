//! SimJoin - approximate string-similarity joins
//!
//! A Rust library for bulk top-N fuzzy matching between two string
//! collections using character trigram similarity.
//!
//! # Features
//! - Sparse trigram vectors with cosine (`l2`) or shared-token
//!   (`count`) weighting
//! - Inverted-index candidate pruning: only token-co-occurring row
//!   pairs are ever scored
//! - Bounded top-N selection per left row with deterministic
//!   tie-breaking
//! - Static multi-threaded partitioning with results independent of
//!   thread count and partitioned side
//! - Optional polars DataFrame layer (feature `polars`)
//!
//! # Example
//!
//! ```
//! use simjoin::{join_top_n, JoinConfig};
//!
//! let left = ["apple inc", "pear plc"];
//! let right = ["apple incorporated", "orange llc"];
//! let matches = join_top_n(&left, &right, &JoinConfig::default()).unwrap();
//!
//! assert_eq!(matches[0].row, 0);
//! assert_eq!(matches[0].col, 0);
//! ```

pub mod config;
pub mod error;
pub mod matching;
pub mod vectorize;

// Polars DataFrame layer (enabled with the polars feature)
#[cfg(feature = "polars")]
pub mod polars;

pub use config::{JoinConfig, Normalization, ThreadingDimension};
pub use error::{JoinError, Result};
pub use matching::MatchTriple;
pub use vectorize::CorpusIndex;

/// Match every left row against the right collection and return the
/// `top_n` most similar right rows per left row.
///
/// The output is ordered by ascending `row`; within a row similarity
/// is descending, ties broken by ascending `col`. Left rows without a
/// single token in common with any right row (including empty strings)
/// emit no triples. Zero rows on either side yield an empty vec.
///
/// The call is synchronous: it blocks until every worker has finished
/// and the blocks are merged. Configuration problems and thread-pool
/// creation failures surface as [`JoinError`] before any partial
/// output exists.
pub fn join_top_n<L, R>(left: &[L], right: &[R], config: &JoinConfig) -> Result<Vec<MatchTriple>>
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    config.validate()?;

    if left.is_empty() || right.is_empty() {
        return Ok(Vec::new());
    }

    let dimension = config
        .threading_dimension
        .resolve(left.len(), right.len());
    let index = CorpusIndex::build(left, right, config);

    matching::scheduler::run(&index, dimension, config.top_n, config.resolved_threads())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn join(left: &[&str], right: &[&str], config: &JoinConfig) -> Vec<MatchTriple> {
        join_top_n(left, right, config).unwrap()
    }

    fn l2_config(top_n: usize) -> JoinConfig {
        JoinConfig {
            top_n,
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_strings_match_at_one() {
        let matches = join(&["aaa"], &["aaa"], &l2_config(1));
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].row, matches[0].col), (0, 0));
        assert!((matches[0].sim - 1.0).abs() < EPS);
    }

    #[test]
    fn test_partial_overlap_left_longer() {
        // "aaabb" -> {aaa, aab, abb}; "aaa" -> {aaa}: 1 / (sqrt(3) * 1).
        let matches = join(&["aaabb"], &["aaa"], &l2_config(1));
        assert_eq!(matches.len(), 1);
        assert!((matches[0].sim - 1.0 / 3.0_f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_partial_overlap_right_repeats() {
        // "abcabc" collapses to 3 distinct trigrams {abc, bca, cab}.
        let matches = join(&["abc"], &["abcabc"], &l2_config(1));
        assert_eq!(matches.len(), 1);
        assert!((matches[0].sim - 1.0 / 3.0_f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_rows_without_shared_tokens_emit_nothing() {
        let matches = join(&["abc", "def", "aaabxy"], &["abc", "aaa"], &l2_config(1));

        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].row, matches[0].col), (0, 0));
        assert!((matches[0].sim - 1.0).abs() < EPS);
        // "aaabxy" -> {aaa, aab, abx, bxy}: 1 / sqrt(4) against "aaa".
        assert_eq!((matches[1].row, matches[1].col), (2, 1));
        assert!((matches[1].sim - 0.5).abs() < EPS);
    }

    #[test]
    fn test_count_mode_counts_shared_tokens() {
        let config = JoinConfig {
            normalization: Normalization::Count,
            threads: Some(1),
            ..Default::default()
        };
        let matches = join(&["aaa", "aabbb", "abc"], &["aaa", "aab", "def"], &config);

        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].row, matches[0].col), (0, 0));
        assert!((matches[0].sim - 1.0).abs() < EPS);
        assert_eq!((matches[1].row, matches[1].col), (1, 1));
        assert!((matches[1].sim - 1.0).abs() < EPS);
    }

    #[test]
    fn test_output_ordering() {
        let left = ["aaab", "bbbc"];
        let right = ["aaa", "aab", "bbb", "bbc"];
        let matches = join(&left, &right, &l2_config(4));

        // Rows ascending; similarity descending within a row.
        let rows: Vec<u32> = matches.iter().map(|m| m.row).collect();
        let mut sorted_rows = rows.clone();
        sorted_rows.sort_unstable();
        assert_eq!(rows, sorted_rows);

        for pair in matches.windows(2) {
            if pair[0].row == pair[1].row {
                assert!(pair[0].sim >= pair[1].sim);
                if (pair[0].sim - pair[1].sim).abs() < EPS {
                    assert!(pair[0].col < pair[1].col);
                }
            }
        }
    }

    #[test]
    fn test_ties_break_by_ascending_col() {
        let matches = join(&["aaa"], &["aaa", "aaa", "aaa"], &l2_config(2));
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].col, 0);
        assert_eq!(matches[1].col, 1);
    }

    #[test]
    fn test_top_n_bound() {
        let right = ["aaa", "aaab", "aaabb", "xaaa"];
        let matches = join(&["aaa"], &right, &l2_config(2));
        assert_eq!(matches.len(), 2);

        // With a generous limit, all (and only) co-occurring rows appear.
        let matches = join(&["aaa"], &right, &l2_config(10));
        assert_eq!(matches.len(), 4);
    }

    #[test]
    fn test_symmetry_under_role_swap() {
        let a = ["apple inc", "banana"];
        let b = ["apple incorporated", "bandana"];
        let config = l2_config(10);

        let mut forward: Vec<(u32, u32, f32)> = join(&a, &b, &config)
            .into_iter()
            .map(|m| (m.row, m.col, m.sim))
            .collect();
        forward.sort_unstable_by_key(|&(row, col, _)| (row, col));

        let mut swapped: Vec<(u32, u32, f32)> = join(&b, &a, &config)
            .into_iter()
            .map(|m| (m.col, m.row, m.sim))
            .collect();
        swapped.sort_unstable_by_key(|&(row, col, _)| (row, col));

        assert_eq!(forward.len(), swapped.len());
        for (f, s) in forward.iter().zip(&swapped) {
            assert_eq!((f.0, f.1), (s.0, s.1));
            assert!((f.2 - s.2).abs() < EPS);
        }
    }

    #[test]
    fn test_thread_count_invariance() {
        let left = [
            "north street 1",
            "south street 2",
            "east road 3",
            "west lane 4",
        ];
        let right = ["north st 1", "south street 2", "east rd 3"];
        for top_n in [1, 2] {
            let single = join_top_n(
                &left,
                &right,
                &JoinConfig {
                    top_n,
                    threads: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();
            let many = join_top_n(
                &left,
                &right,
                &JoinConfig {
                    top_n,
                    threads: Some(4),
                    ..Default::default()
                },
            )
            .unwrap();
            assert_eq!(single, many);
        }
    }

    #[test]
    fn test_threading_dimension_invariance() {
        let left = ["alpha one", "beta two", "gamma three"];
        let right = ["alpha 1", "beta 2", "gamma 3", "delta 4"];

        let base = join(&left, &right, &l2_config(2));
        for dimension in [ThreadingDimension::Right, ThreadingDimension::Auto] {
            let config = JoinConfig {
                top_n: 2,
                threading_dimension: dimension,
                ..Default::default()
            };
            let other = join(&left, &right, &config);
            assert_eq!(base.len(), other.len());
            for (a, b) in base.iter().zip(&other) {
                assert_eq!((a.row, a.col), (b.row, b.col));
                assert!((a.sim - b.sim).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_word_normalization_end_to_end() {
        let config = JoinConfig {
            apply_word_normalization: true,
            ..Default::default()
        };
        let matches = join(&["A-B-C!"], &["abc"], &config);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].sim - 1.0).abs() < EPS);
    }

    #[test]
    fn test_empty_inputs_yield_empty_output() {
        let none: [&str; 0] = [];
        assert!(join(&none, &["abc"], &l2_config(1)).is_empty());
        assert!(join(&["abc"], &none, &l2_config(1)).is_empty());
        // Empty strings are zero vectors on either side.
        assert!(join(&[""], &["abc"], &l2_config(1)).is_empty());
        assert!(join(&["abc"], &[""], &l2_config(1)).is_empty());
    }

    #[test]
    fn test_invalid_configuration_is_rejected_before_work() {
        let err = join_top_n(&["abc"], &["abc"], &l2_config(0)).unwrap_err();
        assert!(matches!(err, JoinError::InvalidConfiguration(_)));

        let config = JoinConfig {
            threads: Some(0),
            ..Default::default()
        };
        let err = join_top_n(&["abc"], &["abc"], &config).unwrap_err();
        assert!(matches!(err, JoinError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_short_strings_match_whole() {
        // Both sides shorter than the n-gram length tokenize to the
        // whole string.
        let matches = join(&["ab"], &["ab", "ba"], &l2_config(2));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].col, 0);
        assert!((matches[0].sim - 1.0).abs() < EPS);
    }
}
