//! One-call filters for the common order statistics.

use rf_core::{Error, PadMode, Sample, Signal, SignalView, volume};

use crate::config::{RankConfig, RankParams};
use crate::engine::rank_filter;

/// Which order statistic of the window to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Min,
    Median,
    Max,
    /// 1-indexed ascending rank.
    Rank(usize),
}

impl Statistic {
    /// Resolves to a concrete rank for a window of `window_volume` samples.
    pub fn rank(self, window_volume: usize) -> usize {
        match self {
            Self::Min => 1,
            Self::Median => window_volume.div_ceil(2),
            Self::Max => window_volume,
            Self::Rank(r) => r,
        }
    }
}

/// Same-shape filter keeping `stat` of every `kernel`-sized neighborhood.
pub fn order_filter<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    kernel: [usize; N],
    stat: Statistic,
    mode: PadMode,
    pad_value: Option<T>,
) -> Result<Signal<T, N>, Error> {
    // Zero or overflowing volumes are reported by the config check below.
    let window_volume = volume(&kernel).unwrap_or(0);
    let params = RankParams::filter(stat.rank(window_volume), &kernel).with_mode(mode, pad_value);
    let cfg = RankConfig::<T, N>::new(&params)?;
    Ok(rank_filter(src, &cfg)?.into_values())
}

pub fn median_filter<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    kernel: [usize; N],
    mode: PadMode,
    pad_value: Option<T>,
) -> Result<Signal<T, N>, Error> {
    order_filter(src, kernel, Statistic::Median, mode, pad_value)
}

/// Grayscale erosion with a rectangular structuring element.
pub fn min_filter<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    kernel: [usize; N],
    mode: PadMode,
    pad_value: Option<T>,
) -> Result<Signal<T, N>, Error> {
    order_filter(src, kernel, Statistic::Min, mode, pad_value)
}

/// Grayscale dilation with a rectangular structuring element.
pub fn max_filter<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    kernel: [usize; N],
    mode: PadMode,
    pad_value: Option<T>,
) -> Result<Signal<T, N>, Error> {
    order_filter(src, kernel, Statistic::Max, mode, pad_value)
}

#[cfg(test)]
mod tests {
    use rf_core::{ConfigError, Error, PadMode, Signal};

    use super::{Statistic, max_filter, median_filter, min_filter, order_filter};

    #[test]
    fn statistic_ranks() {
        assert_eq!(Statistic::Min.rank(9), 1);
        assert_eq!(Statistic::Median.rank(9), 5);
        assert_eq!(Statistic::Median.rank(1), 1);
        assert_eq!(Statistic::Max.rank(9), 9);
        assert_eq!(Statistic::Rank(4).rank(9), 4);
    }

    #[test]
    fn min_median_max_bracket_each_other() {
        let img = Signal::from_vec([3, 4], vec![7u16, 2, 9, 4, 1, 8, 3, 6, 5, 0, 11, 10])
            .expect("valid image");
        let view = img.as_view();

        let lo = min_filter(&view, [3, 3], PadMode::Replicate, None).expect("min");
        let mid = median_filter(&view, [3, 3], PadMode::Replicate, None).expect("median");
        let hi = max_filter(&view, [3, 3], PadMode::Replicate, None).expect("max");

        for i in 0..img.len() {
            let (l, m, h) = (lo.data()[i], mid.data()[i], hi.data()[i]);
            assert!(l <= m && m <= h, "bracket violated at {i}: {l} {m} {h}");
            assert!(l <= img.data()[i] && img.data()[i] <= h);
        }
    }

    #[test]
    fn median_filter_1d() {
        let s = Signal::from_vec([5], vec![5.0f32, 1.0, 4.0, 2.0, 8.0]).expect("valid signal");
        let out = median_filter(&s.as_view(), [3], PadMode::Constant, Some(0.0)).expect("median");
        assert_eq!(out.data(), &[1.0, 4.0, 2.0, 4.0, 2.0]);
    }

    #[test]
    fn config_errors_surface() {
        let s = Signal::from_vec([4], vec![1i32, 2, 3, 4]).expect("valid signal");
        assert_eq!(
            median_filter(&s.as_view(), [2], PadMode::Zeros, None),
            Err(Error::Config(ConfigError::EvenKernel { dim: 0, size: 2 }))
        );
        assert_eq!(
            order_filter(&s.as_view(), [3], Statistic::Rank(4), PadMode::Zeros, None),
            Err(Error::Config(ConfigError::RankOutOfRange { rank: 4, volume: 3 }))
        );
    }
}
