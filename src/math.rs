use itertools::izip;
use multiversion::multiversion;

/// Count the points of a flat, row-major buffer that lie strictly inside the
/// box `(center - half_width, center + half_width)` in every dimension.
#[multiversion(targets("x86_64+avx+avx2", "x86+sse"))]
pub(crate) fn count_in_window(points: &[f64], center: &[f64], half_width: &[f64]) -> usize {
    let dim = center.len();

    assert!(half_width.len() == dim);
    assert!(dim > 0);
    assert!(points.len() % dim == 0);

    if points.is_empty() {
        return 0;
    }

    points
        .chunks_exact(dim)
        .filter(|point| {
            izip!(point.iter(), center, half_width)
                .all(|(&x, &c, &h)| (c - h < x) & (x < c + h))
        })
        .count()
}

/// Probability with which an ant drops a mark at a point with log density
/// `logp`, given the largest log density it has seen so far.
///
/// Points far below the running maximum are marked almost surely, points
/// at the maximum never are. `-inf` against `-inf` gives NaN, which never
/// wins the comparison against a uniform draw.
#[inline]
pub(crate) fn mark_probability(logp: f64, max_logp: f64) -> f64 {
    1. - (logp - max_logp).exp()
}

/// Acceptance rule for a proposed move. `u` is only consulted if the
/// candidate window carries marks.
#[inline]
pub(crate) fn accept_move(old_marks: usize, new_marks: usize, u: impl FnOnce() -> f64) -> bool {
    if new_marks == 0 {
        return true;
    }
    (old_marks as f64 / new_marks as f64) > u()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn naive_count(points: &[Vec<f64>], center: &[f64], half_width: &[f64]) -> usize {
        points
            .iter()
            .filter(|p| {
                (0..center.len()).all(|i| {
                    p[i] > center[i] - half_width[i] && p[i] < center[i] + half_width[i]
                })
            })
            .count()
    }

    proptest! {
        #[test]
        fn check_count_in_window(
            points in prop::collection::vec(prop::collection::vec(-1f64..1f64, 3), 0..50),
            center in prop::collection::vec(-1f64..1f64, 3),
            half_width in prop::collection::vec(0.01f64..1f64, 3),
        ) {
            let flat: Vec<f64> = points.iter().flatten().copied().collect();
            let count = count_in_window(&flat, &center, &half_width);
            prop_assert_eq!(count, naive_count(&points, &center, &half_width));
            prop_assert!(count <= points.len());
        }

        #[test]
        fn check_covering_window(
            points in prop::collection::vec(prop::collection::vec(0f64..1f64, 2), 1..50),
        ) {
            let flat: Vec<f64> = points.iter().flatten().copied().collect();
            let count = count_in_window(&flat, &[0.5, 0.5], &[0.6, 0.6]);
            prop_assert_eq!(count, points.len());
        }

        #[test]
        fn check_mark_probability(logp in -50f64..0f64, max in 0f64..50f64) {
            let p = mark_probability(logp, max);
            prop_assert!((0. ..=1.).contains(&p));
        }
    }

    #[test]
    fn empty_window_count() {
        assert_eq!(count_in_window(&[], &[0., 0.], &[1., 1.]), 0);
    }

    #[test]
    fn boundary_is_excluded() {
        // Points sitting exactly on the window faces are outside.
        let points = [1., 0., 0., 1., 0.5, 0.5];
        assert_eq!(count_in_window(&points, &[0., 0.], &[1., 1.]), 1);
    }

    #[test]
    fn all_dimensions_must_match() {
        let points = [0.1, 5.0, 5.0, 0.1];
        assert_eq!(count_in_window(&points, &[0., 0.], &[1., 1.]), 0);
    }

    #[test]
    fn mark_probability_limits() {
        assert_eq!(mark_probability(2., 2.), 0.);
        assert_eq!(mark_probability(f64::NEG_INFINITY, 0.), 1.);
        assert!(mark_probability(f64::NEG_INFINITY, f64::NEG_INFINITY).is_nan());
    }

    #[test]
    fn accept_without_marks_skips_uniform() {
        assert!(accept_move(3, 0, || panic!("uniform must not be drawn")));
    }

    #[test]
    fn accept_equal_counts() {
        // Ratio is exactly one, never NaN, so any draw from [0, 1) accepts.
        assert!(accept_move(1, 1, || 0.999_999));
        assert!(accept_move(4, 4, || 0.));
        assert!(!accept_move(1, 2, || 0.5));
        assert!(accept_move(1, 2, || 0.49));
        assert!(!accept_move(0, 2, || 0.));
    }
}
