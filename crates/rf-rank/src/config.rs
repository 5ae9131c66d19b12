use core::fmt;

use rf_core::{BorderMode, ConfigError, PadMode, Sample, volume};

/// Which reduction a configuration drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Unit stride, padding `kernel / 2`: output shape equals input shape.
    #[default]
    Filter,
    /// Caller chosen stride and padding: output may shrink.
    Pool,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Pool => "pool",
        }
    }
}

/// Unvalidated rank filter parameters.
///
/// Per-dimension fields (`kernel`, `stride`, `padding`) take either one entry,
/// broadcast to every dimension, or exactly one entry per dimension. An empty
/// `stride` means unit stride and an empty `padding` means no padding; for
/// [`Variant::Filter`] both are derived from the kernel and may only be left
/// empty or set to those derived values.
#[derive(Debug, Clone, PartialEq)]
pub struct RankParams<T> {
    /// 1-indexed ascending order statistic.
    pub rank: usize,
    pub kernel: Vec<usize>,
    pub stride: Vec<usize>,
    pub padding: Vec<usize>,
    pub pad_mode: PadMode,
    /// Required when `pad_mode` is [`PadMode::Constant`], ignored otherwise.
    pub pad_value: Option<T>,
    pub emit_indices: bool,
    pub variant: Variant,
}

impl<T> Default for RankParams<T> {
    fn default() -> Self {
        Self {
            rank: 1,
            kernel: vec![3],
            stride: Vec::new(),
            padding: Vec::new(),
            pad_mode: PadMode::Zeros,
            pad_value: None,
            emit_indices: false,
            variant: Variant::Filter,
        }
    }
}

impl<T> RankParams<T> {
    pub fn filter(rank: usize, kernel: &[usize]) -> Self {
        Self {
            rank,
            kernel: kernel.to_vec(),
            ..Self::default()
        }
    }

    pub fn pool(rank: usize, kernel: &[usize], stride: &[usize], padding: &[usize]) -> Self {
        Self {
            rank,
            kernel: kernel.to_vec(),
            stride: stride.to_vec(),
            padding: padding.to_vec(),
            variant: Variant::Pool,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, pad_mode: PadMode, pad_value: Option<T>) -> Self {
        self.pad_mode = pad_mode;
        self.pad_value = pad_value;
        self
    }

    pub fn with_indices(mut self, emit_indices: bool) -> Self {
        self.emit_indices = emit_indices;
        self
    }
}

/// Validated, immutable rank filter configuration for `N`-dimensional
/// signals.
#[derive(Debug, Clone, PartialEq)]
pub struct RankConfig<T, const N: usize> {
    rank: usize,
    kernel: [usize; N],
    stride: [usize; N],
    padding: [usize; N],
    pad_mode: PadMode,
    border: BorderMode<T>,
    emit_indices: bool,
    variant: Variant,
    window_volume: usize,
}

pub type RankConfig1<T> = RankConfig<T, 1>;
pub type RankConfig2<T> = RankConfig<T, 2>;

impl<T: Sample, const N: usize> RankConfig<T, N> {
    /// Validates `params`. Every structural check happens here so that
    /// applying the configuration can only fail on input-dependent grounds.
    pub fn new(params: &RankParams<T>) -> Result<Self, ConfigError> {
        let kernel = broadcast::<N>("kernel", &params.kernel, None)?;
        for (dim, &k) in kernel.iter().enumerate() {
            if k == 0 {
                return Err(ConfigError::ZeroKernel { dim });
            }
            if k.is_multiple_of(2) {
                return Err(ConfigError::EvenKernel { dim, size: k });
            }
        }

        let window_volume = volume(&kernel).ok_or_else(|| ConfigError::KernelTooLarge {
            kernel: kernel.to_vec(),
        })?;
        if params.rank == 0 || params.rank > window_volume {
            return Err(ConfigError::RankOutOfRange {
                rank: params.rank,
                volume: window_volume,
            });
        }

        let stride = broadcast::<N>("stride", &params.stride, Some(1))?;
        if let Some(dim) = stride.iter().position(|&s| s == 0) {
            return Err(ConfigError::ZeroStride { dim });
        }

        let padding = match params.variant {
            Variant::Pool => broadcast::<N>("padding", &params.padding, Some(0))?,
            Variant::Filter => {
                if let Some(dim) = stride.iter().position(|&s| s != 1) {
                    return Err(ConfigError::FilterStride {
                        dim,
                        stride: stride[dim],
                    });
                }
                let derived = kernel.map(|k| k / 2);
                if !params.padding.is_empty() {
                    let given = broadcast::<N>("padding", &params.padding, None)?;
                    if let Some(dim) = (0..N).find(|&d| given[d] != derived[d]) {
                        return Err(ConfigError::FilterPadding {
                            dim,
                            padding: given[dim],
                            expected: derived[dim],
                        });
                    }
                }
                derived
            }
        };

        let border = params.pad_mode.resolve(params.pad_value)?;

        let cfg = Self {
            rank: params.rank,
            kernel,
            stride,
            padding,
            pad_mode: params.pad_mode,
            border,
            emit_indices: params.emit_indices,
            variant: params.variant,
            window_volume,
        };
        log::debug!("rank config: {cfg}");
        Ok(cfg)
    }
}

impl<T, const N: usize> RankConfig<T, N> {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn kernel(&self) -> [usize; N] {
        self.kernel
    }

    pub fn stride(&self) -> [usize; N] {
        self.stride
    }

    /// Pad amount added on each side of every dimension.
    pub fn padding(&self) -> [usize; N] {
        self.padding
    }

    pub fn pad_mode(&self) -> PadMode {
        self.pad_mode
    }

    pub fn border(&self) -> &BorderMode<T> {
        &self.border
    }

    pub fn emit_indices(&self) -> bool {
        self.emit_indices
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn window_volume(&self) -> usize {
        self.window_volume
    }
}

/// One-line summary, e.g.
/// `filter rank=5/9 kernel=[3, 3] stride=[1, 1] padding=[1, 1] mode=reflect indices=false`.
impl<T: fmt::Debug, const N: usize> fmt::Display for RankConfig<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rank={}/{} kernel={:?} stride={:?} padding={:?} mode=",
            self.variant.as_str(),
            self.rank,
            self.window_volume,
            self.kernel,
            self.stride,
            self.padding
        )?;
        match &self.border {
            BorderMode::Constant(v) if self.pad_mode == PadMode::Constant => {
                write!(f, "constant({v:?})")?
            }
            _ => f.write_str(self.pad_mode.as_str())?,
        }
        write!(f, " indices={}", self.emit_indices)
    }
}

fn broadcast<const N: usize>(
    what: &'static str,
    values: &[usize],
    default: Option<usize>,
) -> Result<[usize; N], ConfigError> {
    match (values.len(), default) {
        (0, Some(d)) => Ok([d; N]),
        (1, _) => Ok([values[0]; N]),
        (len, _) if len == N && N > 0 => {
            let mut out = [0usize; N];
            out.copy_from_slice(values);
            Ok(out)
        }
        (len, _) => Err(ConfigError::Arity {
            what,
            expected: N,
            actual: len,
        }),
    }
}

#[cfg(test)]
mod tests {
    use rf_core::{BorderMode, ConfigError, PadMode};

    use super::{RankConfig, RankParams, Variant};

    #[test]
    fn filter_derives_padding_and_unit_stride() {
        let cfg = RankConfig::<f32, 2>::new(&RankParams::filter(5, &[3, 5])).expect("valid");
        assert_eq!(cfg.kernel(), [3, 5]);
        assert_eq!(cfg.stride(), [1, 1]);
        assert_eq!(cfg.padding(), [1, 2]);
        assert_eq!(cfg.window_volume(), 15);
        assert_eq!(cfg.border(), &BorderMode::Constant(0.0));
        assert_eq!(cfg.variant(), Variant::Filter);

        let explicit = RankParams {
            padding: vec![1, 2],
            ..RankParams::filter(5, &[3, 5])
        };
        assert!(RankConfig::<f32, 2>::new(&explicit).is_ok());
    }

    #[test]
    fn kernel_must_be_odd_and_positive() {
        assert_eq!(
            RankConfig::<u8, 1>::new(&RankParams::filter(1, &[4])),
            Err(ConfigError::EvenKernel { dim: 0, size: 4 })
        );
        assert_eq!(
            RankConfig::<u8, 2>::new(&RankParams::pool(1, &[3, 2], &[1], &[0])),
            Err(ConfigError::EvenKernel { dim: 1, size: 2 })
        );
        assert_eq!(
            RankConfig::<u8, 1>::new(&RankParams::filter(1, &[0])),
            Err(ConfigError::ZeroKernel { dim: 0 })
        );
    }

    #[test]
    fn rank_bounds() {
        assert_eq!(
            RankConfig::<u8, 1>::new(&RankParams::filter(0, &[3])),
            Err(ConfigError::RankOutOfRange { rank: 0, volume: 3 })
        );
        assert_eq!(
            RankConfig::<u8, 2>::new(&RankParams::filter(10, &[3])),
            Err(ConfigError::RankOutOfRange {
                rank: 10,
                volume: 9
            })
        );
        assert!(RankConfig::<u8, 2>::new(&RankParams::filter(9, &[3])).is_ok());
    }

    #[test]
    fn arity_and_stride_checks() {
        assert_eq!(
            RankConfig::<u8, 2>::new(&RankParams::filter(1, &[3, 3, 3])),
            Err(ConfigError::Arity {
                what: "kernel",
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(
            RankConfig::<u8, 1>::new(&RankParams::filter(1, &[])),
            Err(ConfigError::Arity {
                what: "kernel",
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            RankConfig::<u8, 2>::new(&RankParams::pool(1, &[3], &[2, 0], &[])),
            Err(ConfigError::ZeroStride { dim: 1 })
        );
        assert_eq!(
            RankConfig::<u8, 1>::new(&RankParams {
                stride: vec![2],
                ..RankParams::filter(1, &[3])
            }),
            Err(ConfigError::FilterStride { dim: 0, stride: 2 })
        );
        assert_eq!(
            RankConfig::<u8, 1>::new(&RankParams {
                padding: vec![0],
                ..RankParams::filter(1, &[3])
            }),
            Err(ConfigError::FilterPadding {
                dim: 0,
                padding: 0,
                expected: 1
            })
        );
    }

    #[test]
    fn overflowing_kernel_volume() {
        let huge = usize::MAX;
        assert_eq!(
            RankConfig::<u8, 2>::new(&RankParams::filter(1, &[huge])),
            Err(ConfigError::KernelTooLarge {
                kernel: vec![huge, huge]
            })
        );
    }

    #[test]
    fn display_summarizes_config() {
        let cfg = RankConfig::<u8, 2>::new(
            &RankParams::filter(5, &[3]).with_mode(PadMode::Reflect, None),
        )
        .expect("valid");
        assert_eq!(
            cfg.to_string(),
            "filter rank=5/9 kernel=[3, 3] stride=[1, 1] padding=[1, 1] mode=reflect indices=false"
        );

        let cfg = RankConfig::<f32, 1>::new(
            &RankParams::pool(1, &[3], &[2], &[1])
                .with_mode(PadMode::Constant, Some(-1.5))
                .with_indices(true),
        )
        .expect("valid");
        assert_eq!(
            cfg.to_string(),
            "pool rank=1/3 kernel=[3] stride=[2] padding=[1] mode=constant(-1.5) indices=true"
        );
    }

    #[test]
    fn constant_mode_needs_value() {
        let params = RankParams::<f64>::filter(2, &[3]).with_mode(PadMode::Constant, None);
        assert_eq!(
            RankConfig::<f64, 1>::new(&params),
            Err(ConfigError::MissingPadValue)
        );

        let params = params.with_mode(PadMode::Constant, Some(-1.0));
        let cfg = RankConfig::<f64, 1>::new(&params).expect("valid");
        assert_eq!(cfg.border(), &BorderMode::Constant(-1.0));
        assert_eq!(cfg.pad_mode(), PadMode::Constant);
    }

    #[test]
    fn pool_defaults() {
        let cfg = RankConfig::<i32, 2>::new(&RankParams::pool(1, &[3], &[], &[]).with_indices(true))
            .expect("valid");
        assert_eq!(cfg.stride(), [1, 1]);
        assert_eq!(cfg.padding(), [0, 0]);
        assert!(cfg.emit_indices());
        assert_eq!(cfg.variant(), Variant::Pool);
    }
}
