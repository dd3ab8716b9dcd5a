use rand::Rng;
use rand_distr::StandardNormal;

/// Zero-mean Gaussian displacements with covariance `diag(scale^2)`.
///
/// The proposal holds no random state. Each call draws from the generator
/// it is handed, so ants with independent generators propose independently.
#[derive(Debug, Clone, PartialEq)]
pub struct StepProposal {
    scale: Box<[f64]>,
}

impl StepProposal {
    pub fn new(scale: Box<[f64]>) -> Self {
        StepProposal { scale }
    }

    pub fn dim(&self) -> usize {
        self.scale.len()
    }

    /// Standard deviation of the displacement along each axis.
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Write a displacement into `out`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) {
        assert!(out.len() == self.dim());
        out.iter_mut()
            .zip(self.scale.iter())
            .for_each(|(x, &s)| {
                let norm: f64 = rng.sample(StandardNormal);
                *x = s * norm;
            });
    }

    /// Write `start` plus a fresh displacement into `out`.
    pub fn propose<R: Rng + ?Sized>(&self, rng: &mut R, start: &[f64], out: &mut [f64]) {
        assert!(start.len() == self.dim());
        self.draw(rng, out);
        out.iter_mut().zip(start).for_each(|(x, &s)| *x += s);
    }
}
