//! Foundational primitives for rank-order filtering.
//!
//! ## Signals and Views
//! [`Signal`] is an owned, dense, row-major buffer with a fixed number of
//! dimensions `N` (1 for sampled signals, 2 for images). [`SignalView`] and
//! [`SignalViewMut`] borrow a buffer with element strides, so a caller can
//! filter a region of a larger buffer without copying it first.
//!
//! ## Border Modes
//! Padding supports constant fill, reflect (mirror without repeating the
//! edge sample), replicate (repeat the edge sample) and circular wrap.
//! [`PadMode`] is the caller-facing name of a policy; [`PadMode::resolve`]
//! attaches the constant value and yields a [`BorderMode`].
//!
//! ## Errors
//! [`ConfigError`] covers parameters that are wrong on their own;
//! [`Error`] adds failures that depend on the input being processed.

mod border;
mod error;
mod pad;
mod sample;
mod shape;
mod signal;

pub use border::{BorderMode, PadMode, map_index};
pub use error::{ConfigError, Error};
pub use pad::{pad, padded_shape};
pub use sample::Sample;
pub use shape::{Coords, contiguous_strides, unravel_index, volume};
pub use signal::{Signal, Signal1, Signal2, SignalView, SignalViewMut};
