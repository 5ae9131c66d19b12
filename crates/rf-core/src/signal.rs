use crate::Error;
use crate::shape::{Coords, contiguous_strides, volume};

/// Owned, dense, row-major N-dimensional signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal<T, const N: usize> {
    shape: [usize; N],
    data: Vec<T>,
}

pub type Signal1<T> = Signal<T, 1>;
pub type Signal2<T> = Signal<T, 2>;

impl<T, const N: usize> Signal<T, N> {
    pub fn from_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, Error> {
        let expected = volume(&shape).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> [usize; N] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, coord: [usize; N]) -> Option<&T> {
        self.as_view().get(coord)
    }

    pub fn as_view(&self) -> SignalView<'_, T, N> {
        SignalView {
            shape: self.shape,
            strides: contiguous_strides(&self.shape),
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> SignalViewMut<'_, T, N> {
        SignalViewMut {
            shape: self.shape,
            strides: contiguous_strides(&self.shape),
            data: &mut self.data,
        }
    }
}

impl<T: Clone, const N: usize> Signal<T, N> {
    pub fn new_fill(shape: [usize; N], value: T) -> Self {
        let len = volume(&shape).expect("signal size overflow");
        Self {
            shape,
            data: vec![value; len],
        }
    }
}

impl<T> Signal<T, 2> {
    pub fn width(&self) -> usize {
        self.shape[1]
    }

    pub fn height(&self) -> usize {
        self.shape[0]
    }
}

/// Borrowed, possibly strided view over a signal.
///
/// Strides are in elements and must nest row-major: the last stride is at
/// least 1 and every outer stride spans at least one full inner extent.
#[derive(Debug, Clone, Copy)]
pub struct SignalView<'a, T, const N: usize> {
    shape: [usize; N],
    strides: [usize; N],
    data: &'a [T],
}

impl<'a, T, const N: usize> SignalView<'a, T, N> {
    pub fn from_slice(shape: [usize; N], data: &'a [T]) -> Result<Self, Error> {
        Self::from_strided(shape, contiguous_strides(&shape), data)
    }

    pub fn from_strided(
        shape: [usize; N],
        strides: [usize; N],
        data: &'a [T],
    ) -> Result<Self, Error> {
        check_layout(&shape, &strides, data.len())?;
        Ok(Self {
            shape,
            strides,
            data,
        })
    }

    pub fn shape(&self) -> [usize; N] {
        self.shape
    }

    pub fn strides(&self) -> [usize; N] {
        self.strides
    }

    pub fn len(&self) -> usize {
        volume(&self.shape).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    pub fn get(&self, coord: [usize; N]) -> Option<&'a T> {
        let idx = offset(&coord, &self.shape, &self.strides)?;
        self.data.get(idx)
    }

    pub fn subview(
        &self,
        origin: [usize; N],
        shape: [usize; N],
    ) -> Result<SignalView<'a, T, N>, Error> {
        let start = subview_start(&origin, &shape, &self.shape, &self.strides)?;
        let tail = self.data.get(start..).ok_or(Error::OutOfBounds)?;
        SignalView::from_strided(shape, self.strides, tail).map_err(|_| Error::OutOfBounds)
    }

    /// Elements in row-major coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> {
        let data = self.data;
        let strides = self.strides;
        Coords::new(self.shape).map(move |c| &data[raw_offset(&c, &strides)])
    }

    pub fn is_contiguous(&self) -> bool {
        self.strides == contiguous_strides(&self.shape)
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        self.data.get(0..self.len())
    }
}

impl<T: Clone, const N: usize> SignalView<'_, T, N> {
    pub fn to_signal(&self) -> Signal<T, N> {
        Signal {
            shape: self.shape,
            data: self.iter().cloned().collect(),
        }
    }
}

#[derive(Debug)]
pub struct SignalViewMut<'a, T, const N: usize> {
    shape: [usize; N],
    strides: [usize; N],
    data: &'a mut [T],
}

impl<'a, T, const N: usize> SignalViewMut<'a, T, N> {
    pub fn from_slice_mut(shape: [usize; N], data: &'a mut [T]) -> Result<Self, Error> {
        Self::from_strided_mut(shape, contiguous_strides(&shape), data)
    }

    pub fn from_strided_mut(
        shape: [usize; N],
        strides: [usize; N],
        data: &'a mut [T],
    ) -> Result<Self, Error> {
        check_layout(&shape, &strides, data.len())?;
        Ok(Self {
            shape,
            strides,
            data,
        })
    }

    pub fn shape(&self) -> [usize; N] {
        self.shape
    }

    pub fn strides(&self) -> [usize; N] {
        self.strides
    }

    pub fn get(&self, coord: [usize; N]) -> Option<&T> {
        let idx = offset(&coord, &self.shape, &self.strides)?;
        self.data.get(idx)
    }

    pub fn get_mut(&mut self, coord: [usize; N]) -> Option<&mut T> {
        let idx = offset(&coord, &self.shape, &self.strides)?;
        self.data.get_mut(idx)
    }

    pub fn subview_mut(
        &mut self,
        origin: [usize; N],
        shape: [usize; N],
    ) -> Result<SignalViewMut<'_, T, N>, Error> {
        let start = subview_start(&origin, &shape, &self.shape, &self.strides)?;
        let strides = self.strides;
        if start > self.data.len() {
            return Err(Error::OutOfBounds);
        }
        let (_, tail) = self.data.split_at_mut(start);
        SignalViewMut::from_strided_mut(shape, strides, tail).map_err(|_| Error::OutOfBounds)
    }

    pub fn as_view(&self) -> SignalView<'_, T, N> {
        SignalView {
            shape: self.shape,
            strides: self.strides,
            data: self.data,
        }
    }

    /// Writes `values` in row-major coordinate order; extra values are ignored.
    pub fn fill_from<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for (c, v) in Coords::new(self.shape).zip(values) {
            let idx = raw_offset(&c, &self.strides);
            self.data[idx] = v;
        }
    }

    pub fn is_contiguous(&self) -> bool {
        self.strides == contiguous_strides(&self.shape)
    }

    pub fn as_contiguous_slice_mut(&mut self) -> Option<&mut [T]> {
        if !self.is_contiguous() {
            return None;
        }
        let len = volume(&self.shape)?;
        self.data.get_mut(0..len)
    }
}

fn check_layout<const N: usize>(
    shape: &[usize; N],
    strides: &[usize; N],
    data_len: usize,
) -> Result<(), Error> {
    for d in 0..N {
        let inner_span = if d + 1 < N {
            strides[d + 1].saturating_mul(shape[d + 1])
        } else {
            1
        };
        if strides[d] < inner_span {
            return Err(Error::InvalidStride);
        }
    }

    let min_len = min_required_len(shape, strides).ok_or(Error::SizeMismatch {
        expected: usize::MAX,
        actual: data_len,
    })?;

    if data_len < min_len {
        return Err(Error::SizeMismatch {
            expected: min_len,
            actual: data_len,
        });
    }

    Ok(())
}

fn min_required_len<const N: usize>(shape: &[usize; N], strides: &[usize; N]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }

    let mut last = 0usize;
    for d in 0..N {
        last = last.checked_add((shape[d] - 1).checked_mul(strides[d])?)?;
    }
    last.checked_add(1)
}

#[inline]
fn raw_offset<const N: usize>(coord: &[usize; N], strides: &[usize; N]) -> usize {
    coord.iter().zip(strides).map(|(&c, &s)| c * s).sum()
}

fn offset<const N: usize>(
    coord: &[usize; N],
    shape: &[usize; N],
    strides: &[usize; N],
) -> Option<usize> {
    if coord.iter().zip(shape).any(|(&c, &e)| c >= e) {
        return None;
    }
    Some(raw_offset(coord, strides))
}

fn subview_start<const N: usize>(
    origin: &[usize; N],
    sub_shape: &[usize; N],
    shape: &[usize; N],
    strides: &[usize; N],
) -> Result<usize, Error> {
    for d in 0..N {
        if origin[d] > shape[d] || sub_shape[d] > shape[d] - origin[d] {
            return Err(Error::OutOfBounds);
        }
    }

    let mut start = 0usize;
    for d in 0..N {
        start = origin[d]
            .checked_mul(strides[d])
            .and_then(|v| v.checked_add(start))
            .ok_or(Error::OutOfBounds)?;
    }
    Ok(start)
}

#[cfg(test)]
mod tests {
    use super::{Signal, SignalView, SignalViewMut};
    use crate::Error;

    #[test]
    fn view_indexing_with_stride() {
        let data = vec![1u8, 2, 3, 99, 4, 5, 6, 88];
        let view = SignalView::from_strided([2, 3], [4, 1], &data).expect("valid view");

        assert_eq!(view.get([0, 1]), Some(&2));
        assert_eq!(view.get([1, 2]), Some(&6));
        assert_eq!(view.get([1, 3]), None);
        assert_eq!(view.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert!(!view.is_contiguous());
        assert!(view.as_contiguous_slice().is_none());
    }

    #[test]
    fn layout_validation() {
        let data = vec![0u8; 7];
        assert_eq!(
            SignalView::from_strided([2, 3], [2, 1], &data).err(),
            Some(Error::InvalidStride)
        );
        assert_eq!(
            SignalView::from_strided([2, 3], [5, 1], &data).err(),
            Some(Error::SizeMismatch {
                expected: 8,
                actual: 7
            })
        );
        assert!(SignalView::<u8, 1>::from_slice([0], &[]).is_ok());
        assert!(Signal::from_vec([2, 2], vec![1, 2, 3]).is_err());
    }

    #[test]
    fn subview_non_contiguous_parent() {
        let data = vec![
            10u8, 11, 12, 13, 99, // row 0
            20, 21, 22, 23, 98, // row 1
            30, 31, 32, 33, 97, // row 2
        ];
        let parent = SignalView::from_strided([3, 4], [5, 1], &data).expect("valid parent");
        let sub = parent.subview([1, 1], [2, 3]).expect("valid subview");

        assert_eq!(sub.shape(), [2, 3]);
        assert_eq!(sub.strides(), [5, 1]);
        assert_eq!(sub.to_signal().data(), &[21, 22, 23, 31, 32, 33]);
        assert_eq!(parent.subview([2, 2], [2, 1]).err(), Some(Error::OutOfBounds));
    }

    #[test]
    fn subview_mut_writes_through() {
        let mut data = vec![
            1u8, 2, 3, 4, 0, // row 0
            5, 6, 7, 8, 0, // row 1
            9, 10, 11, 12, 0, // row 2
        ];

        let mut parent =
            SignalViewMut::from_strided_mut([3, 4], [5, 1], &mut data).expect("valid parent");
        let mut sub = parent.subview_mut([0, 1], [3, 2]).expect("valid subview");
        *sub.get_mut([2, 0]).expect("in bounds") = 42;
        sub.fill_from([7u8, 7]);

        assert_eq!(sub.get([0, 0]), Some(&7));
        assert_eq!(sub.get([0, 1]), Some(&7));
        assert_eq!(sub.get([2, 0]), Some(&42));
        assert_eq!(data[11], 42);
    }

    #[test]
    fn one_dimensional_signal() {
        let mut s = Signal::from_vec([4], vec![1.0f32, 2.0, 3.0, 4.0]).expect("valid signal");
        assert_eq!(s.get([3]), Some(&4.0));
        s.as_view_mut()
            .as_contiguous_slice_mut()
            .expect("dense")
            .reverse();
        assert_eq!(s.data(), &[4.0, 3.0, 2.0, 1.0]);
    }
}
