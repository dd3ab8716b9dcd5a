use std::{convert::Infallible, error::Error, fmt::Debug};

/// An unnormalized log probability density on the sampling domain.
///
/// Implementations must be deterministic: evaluating the same position twice
/// has to give the same value for the lifetime of a run. `-inf` is allowed
/// for points with zero density.
///
/// The density is shared between ants, which may be evaluated from several
/// threads, so it is evaluated through a shared reference.
pub trait LogDensity: Send + Sync {
    type Err: Error + Send + Sync + 'static;

    /// Number of dimensions of the domain.
    fn dim(&self) -> usize;

    fn logp(&self, position: &[f64]) -> Result<f64, Self::Err>;
}

/// Wrap a plain closure as a [`LogDensity`] that can not fail.
pub struct FnDensity<F> {
    dim: usize,
    func: F,
}

impl<F> FnDensity<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(dim: usize, func: F) -> Self {
        FnDensity { dim, func }
    }
}

impl<F> Debug for FnDensity<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnDensity").field("dim", &self.dim).finish()
    }
}

impl<F> LogDensity for FnDensity<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    type Err = Infallible;

    fn dim(&self) -> usize {
        self.dim
    }

    fn logp(&self, position: &[f64]) -> Result<f64, Infallible> {
        Ok((self.func)(position))
    }
}

pub mod test_logps {
    use std::convert::Infallible;

    use super::LogDensity;

    /// Constant density, every point is equally likely.
    #[derive(Debug, Clone, Copy)]
    pub struct UniformLogp {
        dim: usize,
    }

    impl UniformLogp {
        pub fn new(dim: usize) -> UniformLogp {
            UniformLogp { dim }
        }
    }

    impl LogDensity for UniformLogp {
        type Err = Infallible;

        fn dim(&self) -> usize {
            self.dim
        }

        fn logp(&self, _position: &[f64]) -> Result<f64, Infallible> {
            Ok(0.)
        }
    }

    /// Isotropic Gaussian bump centred at `mu` in every dimension.
    #[derive(Debug, Clone, Copy)]
    pub struct NormalLogp {
        dim: usize,
        mu: f64,
        sigma: f64,
    }

    impl NormalLogp {
        pub fn new(dim: usize, mu: f64, sigma: f64) -> NormalLogp {
            NormalLogp { dim, mu, sigma }
        }
    }

    impl LogDensity for NormalLogp {
        type Err = Infallible;

        fn dim(&self) -> usize {
            self.dim
        }

        fn logp(&self, position: &[f64]) -> Result<f64, Infallible> {
            assert!(position.len() == self.dim);
            let logp = position
                .iter()
                .map(|&x| {
                    let val = (x - self.mu) / self.sigma;
                    -val * val / 2.
                })
                .sum();
            Ok(logp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{test_logps::*, *};
    use pretty_assertions::assert_eq;

    #[test]
    fn closure_density() {
        let density = FnDensity::new(2, |x: &[f64]| -(x[0] * x[0] + x[1] * x[1]));
        assert_eq!(density.dim(), 2);
        assert_eq!(density.logp(&[1., 2.]).unwrap(), -5.);
    }

    #[test]
    fn normal_peak() {
        let density = NormalLogp::new(3, 0.5, 0.1);
        assert_eq!(density.logp(&[0.5; 3]).unwrap(), 0.);
        assert!(density.logp(&[0.6; 3]).unwrap() < 0.);
        assert_eq!(UniformLogp::new(1).logp(&[3.]).unwrap(), 0.);
    }
}
