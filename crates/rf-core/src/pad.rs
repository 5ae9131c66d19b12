//! Border padding of N-dimensional signals.

use crate::border::{BorderMode, map_index};
use crate::shape::Coords;
use crate::{Error, Sample, Signal, SignalView};

/// Checks that `src_shape` can be padded by `pad` under `mode` and returns
/// the padded shape.
///
/// Dimensions with a zero pad amount always pass. Reflect padding must stay
/// strictly inside the signal (`pad < extent`), circular padding may wrap at
/// most once (`pad <= extent`), and every non-constant mode needs at least
/// one sample to copy from.
pub fn padded_shape<T, const N: usize>(
    src_shape: [usize; N],
    pad: [usize; N],
    mode: &BorderMode<T>,
) -> Result<[usize; N], Error> {
    let mut out = [0usize; N];
    for d in 0..N {
        let (len, p) = (src_shape[d], pad[d]);
        if p > 0 {
            match mode {
                BorderMode::Constant(_) => {}
                _ if len == 0 => {
                    return Err(Error::invalid_argument(
                        "padding",
                        format!(
                            "{} padding of {p} needs samples, dimension {d} is empty",
                            mode.name()
                        ),
                    ));
                }
                BorderMode::Reflect if p >= len => {
                    return Err(Error::invalid_argument(
                        "padding",
                        format!(
                            "reflect padding {p} must be smaller than extent {len} of dimension {d}"
                        ),
                    ));
                }
                BorderMode::Circular if p > len => {
                    return Err(Error::invalid_argument(
                        "padding",
                        format!(
                            "circular padding {p} exceeds extent {len} of dimension {d}"
                        ),
                    ));
                }
                _ => {}
            }
        }

        out[d] = p
            .checked_mul(2)
            .and_then(|v| v.checked_add(len))
            .ok_or_else(|| Error::invalid_argument("padding", "padded extent overflows"))?;
    }
    Ok(out)
}

/// Returns a new signal grown by `2 * pad[d]` in every dimension, border
/// cells filled according to `mode`.
pub fn pad<T: Sample, const N: usize>(
    src: &SignalView<'_, T, N>,
    pad: [usize; N],
    mode: &BorderMode<T>,
) -> Result<Signal<T, N>, Error> {
    let src_shape = src.shape();
    let out_shape = padded_shape(src_shape, pad, mode)?;

    if pad.iter().all(|&p| p == 0) {
        return Ok(src.to_signal());
    }

    // Per-dimension source lookup; `None` marks a constant cell.
    let maps: [Vec<Option<usize>>; N] = core::array::from_fn(|d| {
        (0..out_shape[d])
            .map(|o| map_index(o as isize - pad[d] as isize, src_shape[d], mode))
            .collect()
    });
    let fill = match mode {
        BorderMode::Constant(v) => *v,
        _ => T::ZERO,
    };

    let mut data = Vec::with_capacity(out_shape.iter().product());
    for coord in Coords::new(out_shape) {
        let mut src_coord = [0usize; N];
        let mut inside = true;
        for d in 0..N {
            match maps[d][coord[d]] {
                Some(s) => src_coord[d] = s,
                None => {
                    inside = false;
                    break;
                }
            }
        }

        let v = if inside {
            *src.get(src_coord).ok_or(Error::OutOfBounds)?
        } else {
            fill
        };
        data.push(v);
    }

    Signal::from_vec(out_shape, data)
}
