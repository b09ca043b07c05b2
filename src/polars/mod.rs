//! Polars DataFrame layer.
//!
//! Thin boundary between DataFrames and the core engine: resolve the
//! two text columns, run the top-N match, and return the sparse
//! row/col/sim mapping as a DataFrame. Reattaching the original
//! columns (the outer join against this mapping) is left to the
//! caller.
//!
//! # Example
//!
//! ```ignore
//! use polars::prelude::*;
//! use simjoin::{polars::join_frames, JoinConfig};
//!
//! let left = df!("name" => ["apple inc"])?;
//! let right = df!("company" => ["apple incorporated"])?;
//! let mapping = join_frames(&left, &right, "name", "company", &JoinConfig::default())?;
//! ```

use polars::prelude::*;

use crate::config::JoinConfig;
use crate::join_top_n;

/// Match `left[left_on]` against `right[right_on]` and return a
/// DataFrame with `row` (u32 index into `left`), `col` (u32 index into
/// `right`) and `sim` (f32) columns, at most `top_n` rows per distinct
/// `row`.
///
/// A missing column surfaces polars' own column-not-found error. Null
/// cells vectorize as empty strings, so they match nothing and emit no
/// mapping rows.
pub fn join_frames(
    left: &DataFrame,
    right: &DataFrame,
    left_on: &str,
    right_on: &str,
    config: &JoinConfig,
) -> PolarsResult<DataFrame> {
    let left_ca = left.column(left_on)?.str()?;
    let right_ca = right.column(right_on)?.str()?;

    let left_values: Vec<&str> = left_ca.into_iter().map(|v| v.unwrap_or("")).collect();
    let right_values: Vec<&str> = right_ca.into_iter().map(|v| v.unwrap_or("")).collect();

    let matches = join_top_n(&left_values, &right_values, config)
        .map_err(|err| PolarsError::ComputeError(err.to_string().into()))?;

    let mut rows: Vec<u32> = Vec::with_capacity(matches.len());
    let mut cols: Vec<u32> = Vec::with_capacity(matches.len());
    let mut sims: Vec<f32> = Vec::with_capacity(matches.len());
    for m in &matches {
        rows.push(m.row);
        cols.push(m.col);
        sims.push(m.sim);
    }

    DataFrame::new(vec![
        Series::new("row", rows),
        Series::new("col", cols),
        Series::new("sim", sims),
    ])
}
