//! Rank-order pooling and filtering over 1-D signals and 2-D images.
//!
//! Every output sample is the `rank`-th smallest (1-indexed) value of a
//! kernel-sized window of the padded input. Ties are broken by the window
//! sample's flat position in the padded buffer, so results match a stable
//! sort of each window and are fully deterministic.
//!
//! ## Variants
//! - [`rank_filter`]: unit stride, padding `kernel / 2`, output shape equals
//!   input shape. Median, minimum and maximum filters are thin wrappers
//!   ([`median_filter`], [`min_filter`], [`max_filter`]).
//! - [`rank_pool`]: caller chosen stride and padding; output extent is
//!   `(input + 2 * padding - kernel) / stride + 1` per dimension.
//!
//! Build a [`RankConfig`] (or a [`RankFilter`], which bundles one with the
//! pass methods) once from [`RankParams`]; all structural checks run there.
//! Applying a configuration only fails on input-dependent grounds, such as
//! reflect padding wider than the input.
//!
//! ## Indices
//! With `emit_indices`, [`RankOutput::indices`] holds the flat row-major
//! index of each selected sample in the padded buffer.
//! [`RankOutput::source_coord`] maps such an index back to the input.
//!
//! ## Parallelism
//! The `rayon` feature splits the output into rows and selects them on the
//! rayon thread pool. Results are identical with and without it.

mod config;
mod engine;
mod ops;
mod select;
mod window;

pub use config::{RankConfig, RankConfig1, RankConfig2, RankParams, Variant};
pub use engine::{RankFilter, RankOutput, rank_apply, rank_filter, rank_filter_into, rank_pool};
pub use ops::{Statistic, max_filter, median_filter, min_filter, order_filter};
pub use select::select_rank;
pub use window::WindowGrid;
