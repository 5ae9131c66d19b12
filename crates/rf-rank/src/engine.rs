//! Pad, window and select: the shared pass behind pooling and filtering.

use rf_core::{
    BorderMode, ConfigError, Error, Sample, Signal, SignalView, SignalViewMut, map_index, pad,
    unravel_index,
};

use crate::config::{RankConfig, RankParams, Variant};
use crate::select::select_rank;
use crate::window::WindowGrid;

/// Output chunk handed to one worker when the outer dimension is the only
/// dimension.
#[cfg(feature = "rayon")]
const CHUNK_1D: usize = 4096;

/// Result of a pooling or filtering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RankOutput<T, const N: usize> {
    pub values: Signal<T, N>,
    /// Flat row-major index into the padded buffer of every selected sample,
    /// present when the configuration asks for indices.
    pub indices: Option<Signal<usize, N>>,
    input_shape: [usize; N],
    padded_shape: [usize; N],
    padding: [usize; N],
    border: BorderMode<T>,
}

impl<T, const N: usize> RankOutput<T, N> {
    pub fn input_shape(&self) -> [usize; N] {
        self.input_shape
    }

    /// Shape of the padded buffer the emitted indices refer to.
    pub fn padded_shape(&self) -> [usize; N] {
        self.padded_shape
    }

    /// Maps a flat padded index to the input coordinate it was copied from.
    ///
    /// Returns `None` for cells filled by constant padding and for indices
    /// outside the padded buffer.
    pub fn source_coord(&self, padded_index: usize) -> Option<[usize; N]> {
        let coord = unravel_index(padded_index, &self.padded_shape)?;
        let mut src = [0usize; N];
        for d in 0..N {
            let i = coord[d] as isize - self.padding[d] as isize;
            src[d] = map_index(i, self.input_shape[d], &self.border)?;
        }
        Some(src)
    }

    pub fn into_values(self) -> Signal<T, N> {
        self.values
    }
}

/// A validated configuration bundled with the pass it drives.
#[derive(Debug, Clone, PartialEq)]
pub struct RankFilter<T, const N: usize> {
    cfg: RankConfig<T, N>,
}

impl<T: Sample, const N: usize> RankFilter<T, N> {
    pub fn new(params: &RankParams<T>) -> Result<Self, ConfigError> {
        RankConfig::new(params).map(Self::from_config)
    }

    pub fn from_config(cfg: RankConfig<T, N>) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RankConfig<T, N> {
        &self.cfg
    }

    pub fn pool(&self, src: &SignalView<'_, T, N>) -> Result<RankOutput<T, N>, Error> {
        rank_pool(src, &self.cfg)
    }

    pub fn filter(&self, src: &SignalView<'_, T, N>) -> Result<RankOutput<T, N>, Error> {
        rank_filter(src, &self.cfg)
    }

    pub fn filter_into(
        &self,
        src: &SignalView<'_, T, N>,
        out: &mut SignalViewMut<'_, T, N>,
    ) -> Result<(), Error> {
        rank_filter_into(src, &self.cfg, out)
    }

    pub fn apply(&self, src: &SignalView<'_, T, N>) -> Result<RankOutput<T, N>, Error> {
        rank_apply(src, &self.cfg)
    }
}

/// Runs the pooling variant: output extent per dimension is
/// `(input + 2 * padding - kernel) / stride + 1`.
pub fn rank_pool<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    cfg: &RankConfig<T, N>,
) -> Result<RankOutput<T, N>, Error> {
    expect_variant(cfg, Variant::Pool)?;
    run(src, cfg, cfg.emit_indices())
}

/// Runs the filtering variant; the output has exactly the input's shape.
pub fn rank_filter<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    cfg: &RankConfig<T, N>,
) -> Result<RankOutput<T, N>, Error> {
    expect_variant(cfg, Variant::Filter)?;
    if src.is_empty() {
        return Ok(empty_output(src.shape(), cfg));
    }
    run(src, cfg, cfg.emit_indices())
}

/// Runs the filtering variant and writes the values into `out`, which must
/// have the input's shape. Nothing is written when an error is returned.
pub fn rank_filter_into<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    cfg: &RankConfig<T, N>,
    out: &mut SignalViewMut<'_, T, N>,
) -> Result<(), Error> {
    expect_variant(cfg, Variant::Filter)?;
    if out.shape() != src.shape() {
        return Err(Error::invalid_argument(
            "output",
            format!(
                "output shape {:?} does not match input shape {:?}",
                out.shape(),
                src.shape()
            ),
        ));
    }
    if src.is_empty() {
        return Ok(());
    }

    let computed = run(src, cfg, false)?;
    out.fill_from(computed.values.into_vec());
    Ok(())
}

/// Dispatches on the configured variant.
pub fn rank_apply<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    cfg: &RankConfig<T, N>,
) -> Result<RankOutput<T, N>, Error> {
    match cfg.variant() {
        Variant::Filter => rank_filter(src, cfg),
        Variant::Pool => rank_pool(src, cfg),
    }
}

fn expect_variant<T, const N: usize>(cfg: &RankConfig<T, N>, want: Variant) -> Result<(), Error> {
    if cfg.variant() != want {
        return Err(Error::invalid_argument(
            "config",
            format!(
                "{} configuration passed to {}",
                cfg.variant().as_str(),
                want.as_str()
            ),
        ));
    }
    Ok(())
}

fn empty_output<T: Sample, const N: usize>(
    shape: [usize; N],
    cfg: &RankConfig<T, N>,
) -> RankOutput<T, N> {
    let padding = cfg.padding();
    RankOutput {
        values: Signal::new_fill(shape, T::ZERO),
        indices: cfg.emit_indices().then(|| Signal::new_fill(shape, 0)),
        input_shape: shape,
        padded_shape: core::array::from_fn(|d| shape[d] + 2 * padding[d]),
        padding,
        border: *cfg.border(),
    }
}

fn run<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    cfg: &RankConfig<T, N>,
    emit_indices: bool,
) -> Result<RankOutput<T, N>, Error> {
    let padded = pad(src, cfg.padding(), cfg.border())?;
    let grid = WindowGrid::new(padded.shape(), cfg.kernel(), cfg.stride())?;
    let out_shape = grid.output_shape();

    log::trace!(
        "rank {} pass: input={:?} padded={:?} output={:?} rank={}/{}",
        cfg.variant().as_str(),
        src.shape(),
        padded.shape(),
        out_shape,
        cfg.rank(),
        cfg.window_volume()
    );

    let mut selected = vec![(T::ZERO, 0usize); grid.output_len()];
    select_all(&grid, padded.data(), cfg.rank(), &mut selected);

    let (values, indices): (Vec<T>, Vec<usize>) = if emit_indices {
        selected.into_iter().unzip()
    } else {
        (selected.into_iter().map(|(v, _)| v).collect(), Vec::new())
    };

    Ok(RankOutput {
        values: Signal::from_vec(out_shape, values)?,
        indices: if emit_indices {
            Some(Signal::from_vec(out_shape, indices)?)
        } else {
            None
        },
        input_shape: src.shape(),
        padded_shape: padded.shape(),
        padding: cfg.padding(),
        border: *cfg.border(),
    })
}

/// Fills `out[i]` with the selection for row-major output index
/// `first + i`.
fn select_chunk<T: Sample, const N: usize>(
    grid: &WindowGrid<N>,
    padded: &[T],
    rank: usize,
    first: usize,
    out: &mut [(T, usize)],
) {
    let mut window = Vec::with_capacity(grid.window_len());
    for (i, slot) in out.iter_mut().enumerate() {
        grid.gather(padded, grid.origin_flat(first + i), &mut window);
        *slot = select_rank(&mut window, rank);
    }
}

#[cfg(not(feature = "rayon"))]
fn select_all<T: Sample, const N: usize>(
    grid: &WindowGrid<N>,
    padded: &[T],
    rank: usize,
    out: &mut [(T, usize)],
) {
    select_chunk(grid, padded, rank, 0, out);
}

#[cfg(feature = "rayon")]
fn select_all<T: Sample, const N: usize>(
    grid: &WindowGrid<N>,
    padded: &[T],
    rank: usize,
    out: &mut [(T, usize)],
) {
    use rayon::prelude::*;

    let out_shape = grid.output_shape();
    let chunk = if N > 1 {
        out_shape[1..].iter().product::<usize>()
    } else {
        CHUNK_1D
    }
    .max(1);

    out.par_chunks_mut(chunk)
        .enumerate()
        .for_each(|(c, part)| select_chunk(grid, padded, rank, c * chunk, part));
}
