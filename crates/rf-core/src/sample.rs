use core::cmp::Ordering;
use core::fmt::Debug;

/// Element type of a signal that rank selection can order.
///
/// `rank_cmp` must be a total order. For floats `-0.0` and `0.0` compare
/// equal, and every NaN, whatever its sign or payload, compares equal to
/// other NaNs and greater than every number.
pub trait Sample: Copy + Debug + PartialEq + Send + Sync + 'static {
    const ZERO: Self;

    fn rank_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_sample_int {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const ZERO: Self = 0;

                #[inline]
                fn rank_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

macro_rules! impl_sample_float {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const ZERO: Self = 0.0;

                #[inline]
                fn rank_cmp(&self, other: &Self) -> Ordering {
                    match (self.is_nan(), other.is_nan()) {
                        (true, true) => Ordering::Equal,
                        (true, false) => Ordering::Greater,
                        (false, true) => Ordering::Less,
                        (false, false) => self.partial_cmp(other).unwrap_or(Ordering::Equal),
                    }
                }
            }
        )*
    };
}

impl_sample_int!(u8, u16, u32, i8, i16, i32, i64);
impl_sample_float!(f32, f64);
