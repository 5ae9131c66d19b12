use core::cmp::Ordering;

use rf_core::Sample;

/// Order of neighborhood entries: ascending value, ties by source index.
///
/// Source indices are unique within a window, so this is a strict total
/// order and the selected entry does not depend on how the selection
/// algorithm permutes the buffer.
#[inline]
fn entry_cmp<T: Sample>(a: &(T, usize), b: &(T, usize)) -> Ordering {
    a.0.rank_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Returns the entry at 1-indexed ascending `rank` of `window`.
///
/// Equal values keep their source-index order, matching a stable sort. Runs
/// in expected linear time; `window` is reordered in place.
///
/// # Panics
/// Panics unless `1 <= rank <= window.len()`.
pub fn select_rank<T: Sample>(window: &mut [(T, usize)], rank: usize) -> (T, usize) {
    assert!(
        rank >= 1 && rank <= window.len(),
        "rank {rank} outside window of {} samples",
        window.len()
    );
    let (_, nth, _) = window.select_nth_unstable_by(rank - 1, entry_cmp);
    *nth
}

#[cfg(test)]
mod tests {
    use super::select_rank;

    fn indexed<T: Copy>(values: &[T]) -> Vec<(T, usize)> {
        values.iter().copied().zip(0..).collect()
    }

    #[test]
    fn selects_order_statistics() {
        let values = [5, 1, 4, 2, 8];
        for (rank, expected) in [(1, 1), (2, 2), (3, 4), (4, 5), (5, 8)] {
            let mut w = indexed(&values);
            assert_eq!(select_rank(&mut w, rank).0, expected);
        }
    }

    #[test]
    fn ties_resolve_to_earlier_source_index() {
        let values = [3u8, 1, 3, 1, 3];
        let mut w = indexed(&values);
        assert_eq!(select_rank(&mut w, 1), (1, 1));
        let mut w = indexed(&values);
        assert_eq!(select_rank(&mut w, 2), (1, 3));
        let mut w = indexed(&values);
        assert_eq!(select_rank(&mut w, 3), (3, 0));
        let mut w = indexed(&values);
        assert_eq!(select_rank(&mut w, 5), (3, 4));
    }

    #[test]
    fn nan_sorts_last() {
        let values = [f32::NAN, 2.0, -1.0];
        let mut w = indexed(&values);
        assert_eq!(select_rank(&mut w, 2), (2.0, 1));
        let mut w = indexed(&values);
        assert!(select_rank(&mut w, 3).0.is_nan());
    }

    #[test]
    fn negative_nan_sorts_last() {
        let values = [1.0f32, -f32::NAN, 2.0];
        let mut w = indexed(&values);
        assert_eq!(select_rank(&mut w, 1), (1.0, 0));
        let mut w = indexed(&values);
        assert_eq!(select_rank(&mut w, 2), (2.0, 2));
        let mut w = indexed(&values);
        let (v, i) = select_rank(&mut w, 3);
        assert!(v.is_nan());
        assert_eq!(i, 1);
    }

    #[test]
    fn signed_zeros_tie_by_position() {
        let values = [0.0f64, -0.0, 1.0];
        let mut w = indexed(&values);
        let (v, i) = select_rank(&mut w, 1);
        assert_eq!(i, 0);
        assert!(v.is_sign_positive());

        let mut w = indexed(&values);
        let (v, i) = select_rank(&mut w, 2);
        assert_eq!(i, 1);
        assert!(v.is_sign_negative());

        let values = [-0.0f32, 0.0];
        let mut w = indexed(&values);
        assert_eq!(select_rank(&mut w, 1).1, 0);
    }

    #[test]
    #[should_panic(expected = "rank 0 outside window")]
    fn rank_zero_panics() {
        let mut w = indexed(&[1.0f64]);
        select_rank(&mut w, 0);
    }
}
