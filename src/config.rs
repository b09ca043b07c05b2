//! Join configuration.
//!
//! String-valued options coming from a calling layer are resolved into
//! closed enums exactly once, at call entry; the matching loops never
//! re-dispatch on configuration.

use serde::{Deserialize, Serialize};

use crate::error::{JoinError, Result};

/// Weighting applied to the sparse token vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Unit-weight vectors divided by their own L2 norm; the dot
    /// product of two rows is their cosine similarity in [0, 1].
    L2,
    /// Raw unit weights; the dot product of two rows is the number of
    /// distinct tokens they share, exactly representable in f32.
    Count,
}

impl Normalization {
    /// Parse a textual normalization mode, case-insensitively.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "l2" => Ok(Self::L2),
            "count" => Ok(Self::Count),
            _ => Err(JoinError::InvalidConfiguration(format!(
                "unknown normalization: '{value}'. Valid: l2, count"
            ))),
        }
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::L2
    }
}

/// Which side's rows are partitioned across worker threads.
///
/// The inverted index is always built over the opposite side. The
/// output is expressed in left-row/right-col index space regardless of
/// the dimension; the role swap in `Right` mode is internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadingDimension {
    /// Partition left rows; invert the right side.
    Left,
    /// Partition right rows; invert the left side.
    Right,
    /// Drive the larger side so the inverted index is built over the
    /// smaller one: resolves to `Right` iff `len(left) < len(right)`,
    /// otherwise `Left`. Deterministic in the two lengths.
    Auto,
}

impl ThreadingDimension {
    /// Parse a textual threading dimension, case-insensitively.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "auto" => Ok(Self::Auto),
            _ => Err(JoinError::InvalidConfiguration(format!(
                "unknown threading dimension: '{value}'. Valid: left, right, auto"
            ))),
        }
    }

    /// Resolve `Auto` against the corpus sizes. `Left` and `Right`
    /// pass through unchanged.
    pub fn resolve(self, left_len: usize, right_len: usize) -> ResolvedDimension {
        match self {
            Self::Left => ResolvedDimension::Left,
            Self::Right => ResolvedDimension::Right,
            Self::Auto => {
                if left_len < right_len {
                    ResolvedDimension::Right
                } else {
                    ResolvedDimension::Left
                }
            }
        }
    }
}

impl Default for ThreadingDimension {
    fn default() -> Self {
        Self::Left
    }
}

/// A threading dimension with `Auto` already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDimension {
    Left,
    Right,
}

/// Configuration for a single join call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Number of matches to retain per left row. Must be at least 1.
    pub top_n: usize,
    /// Sparse vector weighting.
    pub normalization: Normalization,
    /// Strip non-ASCII-alphanumeric characters and lowercase both
    /// sides before tokenizing.
    pub apply_word_normalization: bool,
    /// Worker thread count. `None` uses the number of physical cores.
    pub threads: Option<usize>,
    /// Which side is partitioned across workers.
    pub threading_dimension: ThreadingDimension,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            top_n: 1,
            normalization: Normalization::default(),
            apply_word_normalization: false,
            threads: None,
            threading_dimension: ThreadingDimension::default(),
        }
    }
}

impl JoinConfig {
    /// Reject invalid parameter values before any work begins.
    pub fn validate(&self) -> Result<()> {
        if self.top_n < 1 {
            return Err(JoinError::InvalidConfiguration(format!(
                "top_n must be at least 1, got {}",
                self.top_n
            )));
        }
        if self.threads == Some(0) {
            return Err(JoinError::InvalidConfiguration(
                "threads must be at least 1, got 0".into(),
            ));
        }
        Ok(())
    }

    /// The worker thread count to use, defaulting to the number of
    /// physical cores (minimum 1).
    pub fn resolved_threads(&self) -> usize {
        self.threads
            .unwrap_or_else(num_cpus::get_physical)
            .max(1)
    }
}
