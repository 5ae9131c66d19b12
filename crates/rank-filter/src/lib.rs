//! Umbrella crate for the `rank-filter` workspace.
//!
//! Re-exports the signal primitives of `rf-core` and the rank engine of
//! `rf-rank`.
//!
//! ```
//! use rank_filter::{PadMode, Signal, median_filter};
//!
//! let s = Signal::from_vec([5], vec![5.0f32, 1.0, 4.0, 2.0, 8.0]).expect("valid signal");
//! let out = median_filter(&s.as_view(), [3], PadMode::Constant, Some(0.0)).expect("median");
//! assert_eq!(out.data(), &[1.0, 4.0, 2.0, 4.0, 2.0]);
//! ```

pub use rf_core::*;
pub use rf_rank::*;
