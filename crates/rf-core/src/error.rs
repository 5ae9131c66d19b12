use thiserror::Error;

/// Structurally invalid filter parameters, detected when a configuration is
/// built and never deferred to the first apply call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("kernel extent must be positive in dimension {dim}")]
    ZeroKernel { dim: usize },
    #[error("kernel extent must be odd, got {size} in dimension {dim}")]
    EvenKernel { dim: usize, size: usize },
    #[error("{what} has {actual} entries, expected 1 or {expected}")]
    Arity {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("kernel {kernel:?} has more samples than fit in usize")]
    KernelTooLarge { kernel: Vec<usize> },
    #[error("rank {rank} outside [1, {volume}]")]
    RankOutOfRange { rank: usize, volume: usize },
    #[error("stride must be positive in dimension {dim}")]
    ZeroStride { dim: usize },
    #[error("filtering requires unit stride, got {stride} in dimension {dim}")]
    FilterStride { dim: usize, stride: usize },
    #[error("filtering pads by kernel / 2 = {expected} in dimension {dim}, got {padding}")]
    FilterPadding {
        dim: usize,
        padding: usize,
        expected: usize,
    },
    #[error("padding mode `constant` requires a padding value")]
    MissingPadValue,
    #[error("unknown padding mode `{0}`")]
    UnknownPadMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid argument `{arg}`: {reason}")]
    InvalidArgument { arg: &'static str, reason: String },
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("out of bounds")]
    OutOfBounds,
    #[error("invalid stride")]
    InvalidStride,
}

impl Error {
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
