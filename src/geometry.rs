//! Axis-aligned boxes: the sampling domain and the neighbourhood windows
//! used to count marks.

use rand::Rng;

use crate::settings::ConfigError;

/// The domain of the sampler, an open axis-aligned box.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Box<[f64]>,
    upper: Box<[f64]>,
}

impl Bounds {
    /// Build the box from one `(min, max)` pair per dimension.
    ///
    /// Fails if there are no dimensions, or if any pair is non-finite or
    /// has no float strictly between `min` and `max`.
    pub fn new(limits: &[(f64, f64)]) -> Result<Self, ConfigError> {
        if limits.is_empty() {
            return Err(ConfigError::EmptyBounds);
        }
        for (dim, &(min, max)) in limits.iter().enumerate() {
            if !(min.is_finite() & max.is_finite() && next_up(min) < max) {
                return Err(ConfigError::InvalidBounds { dim, min, max });
            }
        }
        let (lower, upper) = limits.iter().copied().unzip::<_, _, Vec<_>, Vec<_>>();
        Ok(Bounds {
            lower: lower.into(),
            upper: upper.into(),
        })
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Whether `point` lies strictly inside the box.
    pub fn contains(&self, point: &[f64]) -> bool {
        assert!(point.len() == self.dim());
        point
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&x, (&lo, &hi))| (lo < x) & (x < hi))
    }

    /// Fill `out` with a point drawn uniformly from the interior of the box.
    pub fn sample_interior<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) {
        assert!(out.len() == self.dim());
        out.iter_mut()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .for_each(|(x, (&lo, &hi))| {
                // `random_range` may return either endpoint on narrow boxes.
                *x = loop {
                    let val = rng.random_range(lo..hi);
                    if (val > lo) & (val < hi) {
                        break val;
                    }
                };
            });
    }
}

/// The smallest float larger than the finite value `x`.
fn next_up(x: f64) -> f64 {
    if x == 0. {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0. {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

impl TryFrom<&[[f64; 2]]> for Bounds {
    type Error = ConfigError;

    fn try_from(value: &[[f64; 2]]) -> Result<Self, Self::Error> {
        let limits: Vec<_> = value.iter().map(|&[min, max]| (min, max)).collect();
        Bounds::new(&limits)
    }
}

/// The neighbourhood `(center_i - half_width_i, center_i + half_width_i)`
/// around a point.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    center: &'a [f64],
    half_width: &'a [f64],
}

impl<'a> Window<'a> {
    pub fn new(center: &'a [f64], half_width: &'a [f64]) -> Self {
        assert!(center.len() == half_width.len());
        Window { center, half_width }
    }

    pub fn center(&self) -> &'a [f64] {
        self.center
    }

    pub fn half_width(&self) -> &'a [f64] {
        self.half_width
    }

    pub fn dim(&self) -> usize {
        self.center.len()
    }

    /// A point is inside if it is strictly inside in every dimension.
    pub fn contains(&self, point: &[f64]) -> bool {
        assert!(point.len() == self.dim());
        point
            .iter()
            .zip(self.center.iter().zip(self.half_width.iter()))
            .all(|(&x, (&c, &h))| (c - h < x) & (x < c + h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_malformed_bounds() {
        assert!(matches!(Bounds::new(&[]), Err(ConfigError::EmptyBounds)));
        assert!(matches!(
            Bounds::new(&[(0., 1.), (1., 1.)]),
            Err(ConfigError::InvalidBounds { dim: 1, .. })
        ));
        assert!(matches!(
            Bounds::new(&[(2., 1.)]),
            Err(ConfigError::InvalidBounds { dim: 0, .. })
        ));
        assert!(Bounds::new(&[(f64::NAN, 1.)]).is_err());
        assert!(Bounds::new(&[(0., f64::INFINITY)]).is_err());

        // Adjacent floats leave no interior.
        assert!(matches!(
            Bounds::new(&[(1., next_up(1.))]),
            Err(ConfigError::InvalidBounds { dim: 0, .. })
        ));
        assert!(Bounds::new(&[(-0., next_up(0.))]).is_err());
        assert!(Bounds::new(&[(1., next_up(next_up(1.)))]).is_ok());
    }

    #[test]
    fn next_float() {
        assert_eq!(next_up(1.), 1. + f64::EPSILON);
        assert_eq!(next_up(-1.), -1. + f64::EPSILON / 2.);
        assert_eq!(next_up(0.), f64::from_bits(1));
        assert_eq!(next_up(-f64::from_bits(1)), -0.);
    }

    #[test]
    fn from_pairs() {
        let bounds = Bounds::try_from([[0., 1.], [-2., 3.]].as_slice()).unwrap();
        assert_eq!(bounds.dim(), 2);
        assert_eq!(bounds.lower(), &[0., -2.]);
        assert_eq!(bounds.upper(), &[1., 3.]);
    }

    #[test]
    fn containment_is_strict() {
        let bounds = Bounds::new(&[(0., 1.), (0., 1.)]).unwrap();
        assert!(bounds.contains(&[0.5, 0.5]));
        assert!(!bounds.contains(&[0., 0.5]));
        assert!(!bounds.contains(&[0.5, 1.]));
        assert!(!bounds.contains(&[1.5, 0.5]));

        let window = Window::new(&[0.5, 0.5], &[0.1, 0.1]);
        assert!(window.contains(&[0.55, 0.45]));
        assert!(!window.contains(&[0.55, 0.7]));
    }

    proptest! {
        #[test]
        fn interior_samples_stay_inside(
            seed in any::<u64>(),
            lo in -10f64..10f64,
            width in 1e-6f64..5f64,
        ) {
            let bounds = Bounds::new(&[(lo, lo + width), (0., 1.)]).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut point = [0f64; 2];
            for _ in 0..20 {
                bounds.sample_interior(&mut rng, &mut point);
                prop_assert!(bounds.contains(&point));
            }
        }

        #[test]
        fn few_ulp_boxes_stay_inside(
            seed in any::<u64>(),
            lo in -10f64..10f64,
            ulps in 2usize..32,
        ) {
            let hi = (0..ulps).fold(lo, |x, _| next_up(x));
            let bounds = Bounds::new(&[(lo, hi)]).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut point = [0f64; 1];
            for _ in 0..50 {
                bounds.sample_interior(&mut rng, &mut point);
                prop_assert!(bounds.contains(&point));
            }
        }
    }
}
