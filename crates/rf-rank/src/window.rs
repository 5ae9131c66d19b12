use rf_core::{Coords, Error, contiguous_strides, volume};

/// Geometry of a strided sliding-window pass over a dense padded buffer.
///
/// Output coordinate `o` reads the window whose first sample sits at padded
/// coordinate `o[d] * stride[d]`. Output extent per dimension is
/// `(padded[d] - kernel[d]) / stride[d] + 1`, so every window lies inside the
/// padded buffer by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowGrid<const N: usize> {
    stride: [usize; N],
    out: [usize; N],
    padded_strides: [usize; N],
    // Flat offsets of the kernel taps relative to the window origin, row-major.
    taps: Vec<usize>,
}

impl<const N: usize> WindowGrid<N> {
    pub fn new(padded: [usize; N], kernel: [usize; N], stride: [usize; N]) -> Result<Self, Error> {
        let mut out = [0usize; N];
        for d in 0..N {
            if stride[d] == 0 {
                return Err(Error::invalid_argument("stride", "stride must be positive"));
            }
            if kernel[d] == 0 || kernel[d] > padded[d] {
                return Err(Error::invalid_argument(
                    "kernel",
                    format!(
                        "window extent {} does not fit padded extent {} of dimension {d}",
                        kernel[d], padded[d]
                    ),
                ));
            }
            out[d] = (padded[d] - kernel[d]) / stride[d] + 1;
        }

        let padded_strides = contiguous_strides(&padded);
        let taps = Coords::new(kernel)
            .map(|k| k.iter().zip(&padded_strides).map(|(&c, &s)| c * s).sum::<usize>())
            .collect();

        Ok(Self {
            stride,
            out,
            padded_strides,
            taps,
        })
    }

    pub fn output_shape(&self) -> [usize; N] {
        self.out
    }

    pub fn output_len(&self) -> usize {
        volume(&self.out).unwrap_or(0)
    }

    pub fn window_len(&self) -> usize {
        self.taps.len()
    }

    /// Flat padded index of the window origin for row-major output index
    /// `out_flat`. Caller guarantees `out_flat < self.output_len()`.
    pub fn origin_flat(&self, mut out_flat: usize) -> usize {
        let mut base = 0usize;
        for d in (0..N).rev() {
            let c = out_flat % self.out[d];
            out_flat /= self.out[d];
            base += c * self.stride[d] * self.padded_strides[d];
        }
        base
    }

    /// Replaces `window` with the `(value, flat padded index)` pairs of the
    /// window starting at flat index `origin`, in row-major window order.
    pub fn gather<T: Copy>(&self, padded: &[T], origin: usize, window: &mut Vec<(T, usize)>) {
        window.clear();
        window.extend(self.taps.iter().map(|&t| {
            let i = origin + t;
            (padded[i], i)
        }));
    }
}

#[cfg(test)]
mod tests {
    use rf_core::Coords;

    use super::WindowGrid;

    /// Padded coordinates of every window origin, in row-major output order.
    fn origins<const N: usize>(grid: &WindowGrid<N>, stride: [usize; N]) -> Vec<[usize; N]> {
        Coords::new(grid.output_shape())
            .map(|o| core::array::from_fn(|d| o[d] * stride[d]))
            .collect()
    }

    #[test]
    fn output_extent_follows_stride() {
        let grid = WindowGrid::new([7], [3], [2]).expect("fits");
        assert_eq!(grid.output_shape(), [3]);
        assert_eq!(origins(&grid, [2]), vec![[0], [2], [4]]);
        assert_eq!(
            (0..3).map(|o| grid.origin_flat(o)).collect::<Vec<_>>(),
            vec![0, 2, 4]
        );

        let grid = WindowGrid::new([8], [3], [2]).expect("fits");
        assert_eq!(grid.output_shape(), [3]);

        let grid = WindowGrid::new([5, 6], [3, 3], [1, 2]).expect("fits");
        assert_eq!(grid.output_shape(), [3, 2]);
        assert_eq!(grid.output_len(), 6);
        assert_eq!(grid.window_len(), 9);
    }

    #[test]
    fn window_larger_than_buffer_is_rejected() {
        assert!(WindowGrid::new([2], [3], [1]).is_err());
        assert!(WindowGrid::new([4, 2], [3, 3], [1, 1]).is_err());
    }

    #[test]
    fn gather_reads_row_major_window() {
        // 4x4 buffer holding its own flat indices.
        let data: Vec<u32> = (0..16).collect();
        let grid = WindowGrid::new([4, 4], [3, 3], [1, 1]).expect("fits");
        let mut window = Vec::new();

        grid.gather(&data, 4 + 1, &mut window);
        let idx: Vec<usize> = window.iter().map(|&(_, i)| i).collect();
        assert_eq!(idx, vec![5, 6, 7, 9, 10, 11, 13, 14, 15]);
        assert!(window.iter().all(|&(v, i)| v as usize == i));

        for (o, origin) in origins(&grid, [1, 1]).into_iter().enumerate() {
            assert_eq!(
                grid.origin_flat(o),
                origin[0] * 4 + origin[1],
                "origin mismatch for output {o}"
            );
        }
    }
}
