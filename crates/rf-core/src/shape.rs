/// Number of elements covered by `shape`, or `None` on overflow.
pub fn volume(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &e| acc.checked_mul(e))
}

/// Row-major element strides for a dense buffer of `shape`.
pub fn contiguous_strides<const N: usize>(shape: &[usize; N]) -> [usize; N] {
    let mut strides = [0usize; N];
    let mut acc = 1usize;
    for d in (0..N).rev() {
        strides[d] = acc;
        acc = acc.saturating_mul(shape[d]);
    }
    strides
}

/// Row-major coordinate of flat index `idx`; `None` when `idx` is outside
/// `shape`.
pub fn unravel_index<const N: usize>(mut idx: usize, shape: &[usize; N]) -> Option<[usize; N]> {
    if idx >= volume(shape)? {
        return None;
    }
    let mut coord = [0usize; N];
    for d in (0..N).rev() {
        coord[d] = idx % shape[d];
        idx /= shape[d];
    }
    Some(coord)
}

/// Row-major walk over every coordinate of `shape`.
///
/// Yields nothing when any extent is zero.
#[derive(Debug, Clone)]
pub struct Coords<const N: usize> {
    shape: [usize; N],
    next: Option<[usize; N]>,
}

impl<const N: usize> Coords<N> {
    pub fn new(shape: [usize; N]) -> Self {
        let next = if shape.contains(&0) {
            None
        } else {
            Some([0usize; N])
        };
        Self { shape, next }
    }
}

impl<const N: usize> Iterator for Coords<N> {
    type Item = [usize; N];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut c = current;
        let mut d = N;
        self.next = loop {
            if d == 0 {
                break None;
            }
            d -= 1;
            c[d] += 1;
            if c[d] < self.shape[d] {
                break Some(c);
            }
            c[d] = 0;
        };
        Some(current)
    }
}
