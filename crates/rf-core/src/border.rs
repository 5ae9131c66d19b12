use core::fmt;
use core::str::FromStr;

use crate::{ConfigError, Sample};

/// Resolved border policy used when a window reaches past the signal edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode<T> {
    /// Out-of-range cells take a fixed value.
    Constant(T),
    /// Mirror around the edge sample without repeating it: `c b | a b c | b a`.
    Reflect,
    /// Repeat the nearest edge sample: `a a | a b c | c c`.
    Replicate,
    /// Wrap around from the opposite edge: `b c | a b c | a b`.
    Circular,
}

impl<T> BorderMode<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::Reflect => "reflect",
            Self::Replicate => "replicate",
            Self::Circular => "circular",
        }
    }
}

/// Maps a possibly out-of-range index onto `[0, len)`.
///
/// Returns `None` for [`BorderMode::Constant`] when `i` is outside the
/// signal, and for every mode when `len == 0`.
pub fn map_index<T>(i: isize, len: usize, mode: &BorderMode<T>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if i >= 0 && (i as usize) < len {
        return Some(i as usize);
    }

    match mode {
        BorderMode::Constant(_) => None,
        BorderMode::Replicate => {
            if i < 0 {
                Some(0)
            } else {
                Some(len - 1)
            }
        }
        BorderMode::Reflect => {
            if len == 1 {
                return Some(0);
            }

            let period = (2 * len - 2) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                Some(r)
            } else {
                Some((2 * len - 2) - r)
            }
        }
        BorderMode::Circular => Some(i.rem_euclid(len as isize) as usize),
    }
}

/// Border policy as named by callers, before a constant value is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadMode {
    /// Constant padding with the sample type's zero.
    #[default]
    Zeros,
    /// Constant padding with a caller supplied value.
    Constant,
    Reflect,
    Replicate,
    Circular,
}

impl PadMode {
    pub const ALL: [PadMode; 5] = [
        PadMode::Zeros,
        PadMode::Constant,
        PadMode::Reflect,
        PadMode::Replicate,
        PadMode::Circular,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zeros => "zeros",
            Self::Constant => "constant",
            Self::Reflect => "reflect",
            Self::Replicate => "replicate",
            Self::Circular => "circular",
        }
    }

    /// Attaches the padding value. `Constant` without a value is an error;
    /// a value given to any other mode is ignored.
    pub fn resolve<T: Sample>(self, value: Option<T>) -> Result<BorderMode<T>, ConfigError> {
        match self {
            Self::Zeros => Ok(BorderMode::Constant(T::ZERO)),
            Self::Constant => value
                .map(BorderMode::Constant)
                .ok_or(ConfigError::MissingPadValue),
            Self::Reflect => Ok(BorderMode::Reflect),
            Self::Replicate => Ok(BorderMode::Replicate),
            Self::Circular => Ok(BorderMode::Circular),
        }
    }
}

impl fmt::Display for PadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PadMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zeros" | "zero" => Ok(Self::Zeros),
            "constant" => Ok(Self::Constant),
            "reflect" => Ok(Self::Reflect),
            "replicate" => Ok(Self::Replicate),
            "circular" => Ok(Self::Circular),
            _ => Err(ConfigError::UnknownPadMode(s.to_string())),
        }
    }
}
