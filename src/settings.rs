use thiserror::Error;
use tracing::warn;

/// Configuration errors, reported when the sampler is constructed.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("The bounds need at least one dimension")]
    EmptyBounds,
    #[error("Invalid bounds in dimension {dim}: need finite min < max, got ({min}, {max})")]
    InvalidBounds { dim: usize, min: f64, max: f64 },
    #[error("{name} must be finite and positive, got {value} in dimension {dim}")]
    NonPositiveScale {
        name: &'static str,
        dim: usize,
        value: f64,
    },
    #[error("{name} has {found} dimensions, but the domain has {expected}")]
    DimensionMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{name} must be larger than zero")]
    ZeroCount { name: &'static str },
}

/// A length scale, either shared by all dimensions or given per dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    Isotropic(f64),
    PerDimension(Box<[f64]>),
}

impl Scale {
    /// Expand the scale to one positive value per dimension.
    pub(crate) fn resolve(
        &self,
        name: &'static str,
        dim: usize,
    ) -> Result<Box<[f64]>, ConfigError> {
        let values: Box<[f64]> = match self {
            Scale::Isotropic(val) => vec![*val; dim].into(),
            Scale::PerDimension(vals) => {
                if vals.len() != dim {
                    return Err(ConfigError::DimensionMismatch {
                        name,
                        expected: dim,
                        found: vals.len(),
                    });
                }
                vals.clone()
            }
        };
        if let Some((dim, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, &val)| !(val.is_finite() & (val > 0.)))
        {
            return Err(ConfigError::NonPositiveScale { name, dim, value });
        }
        Ok(values)
    }
}

impl From<f64> for Scale {
    fn from(value: f64) -> Self {
        Scale::Isotropic(value)
    }
}

impl From<Vec<f64>> for Scale {
    fn from(value: Vec<f64>) -> Self {
        Scale::PerDimension(value.into())
    }
}

/// Settings for the ant sampler
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerSettings {
    /// Standard deviation of the proposed steps.
    pub mean_free_path: Scale,
    /// Half-width of the window in which marks count as nearby.
    pub dx: Scale,
    /// Total number of moves during exploration, shared between all ants.
    pub n_steps_exp: u64,
    /// Number of draws to produce, shared between all ants.
    pub n_draws: u64,
    /// Number of moves between two recorded draws of an ant.
    pub thinning: u64,
    /// Rounds of `thinning` moves each ant makes after being reset and
    /// before draws are recorded.
    pub n_burnin: u64,
    /// Number of ants.
    pub n_ants: usize,
    pub seed: u64,
    /// Give up on a move after this many proposals. `None` retries forever.
    pub max_proposals: Option<u64>,
    /// Move the ants on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            mean_free_path: Scale::Isotropic(0.1),
            dx: Scale::Isotropic(0.05),
            n_steps_exp: 10_000,
            n_draws: 1000,
            thinning: 10,
            n_burnin: 1,
            n_ants: 10,
            seed: 0,
            max_proposals: Some(100_000),
            parallel: false,
        }
    }
}

/// Validated settings with scales expanded to the domain dimension.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedSettings {
    pub(crate) mean_free_path: Box<[f64]>,
    pub(crate) dx: Box<[f64]>,
    pub(crate) exploration_rounds: u64,
    pub(crate) sampling_cycles: u64,
    pub(crate) thinning: u64,
    pub(crate) n_burnin: u64,
    pub(crate) n_ants: usize,
    pub(crate) seed: u64,
    pub(crate) max_proposals: Option<u64>,
    pub(crate) parallel: bool,
}

impl SamplerSettings {
    pub(crate) fn resolve(&self, dim: usize) -> Result<ResolvedSettings, ConfigError> {
        let mean_free_path = self.mean_free_path.resolve("mean_free_path", dim)?;
        let dx = self.dx.resolve("dx", dim)?;

        let counts = [
            ("n_steps_exp", self.n_steps_exp),
            ("n_draws", self.n_draws),
            ("thinning", self.thinning),
            ("n_burnin", self.n_burnin),
            ("n_ants", self.n_ants as u64),
            ("max_proposals", self.max_proposals.unwrap_or(1)),
        ];
        if let Some(&(name, _)) = counts.iter().find(|(_, count)| *count == 0) {
            return Err(ConfigError::ZeroCount { name });
        }

        let n_ants = self.n_ants as u64;
        let exploration_rounds = self.n_steps_exp / n_ants;
        let sampling_cycles = self.n_draws / n_ants;
        if exploration_rounds == 0 {
            warn!(
                n_steps_exp = self.n_steps_exp,
                n_ants, "Fewer exploration steps than ants, exploration will be skipped"
            );
        }
        if sampling_cycles == 0 {
            warn!(
                n_draws = self.n_draws,
                n_ants, "Fewer draws than ants, no draws will be recorded"
            );
        }

        Ok(ResolvedSettings {
            mean_free_path,
            dx,
            exploration_rounds,
            sampling_cycles,
            thinning: self.thinning,
            n_burnin: self.n_burnin,
            n_ants: self.n_ants,
            seed: self.seed,
            max_proposals: self.max_proposals,
            parallel: self.parallel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_resolves() {
        let resolved = SamplerSettings::default().resolve(3).unwrap();
        assert_eq!(&*resolved.mean_free_path, &[0.1; 3]);
        assert_eq!(&*resolved.dx, &[0.05; 3]);
        assert_eq!(resolved.exploration_rounds, 1000);
        assert_eq!(resolved.sampling_cycles, 100);
    }

    #[test]
    fn rounds_divide_between_ants() {
        let settings = SamplerSettings {
            n_steps_exp: 200,
            n_draws: 51,
            n_ants: 2,
            ..Default::default()
        };
        let resolved = settings.resolve(2).unwrap();
        assert_eq!(resolved.exploration_rounds, 100);
        assert_eq!(resolved.sampling_cycles, 25);
    }

    #[test]
    fn rejects_bad_scales() {
        let settings = SamplerSettings {
            mean_free_path: Scale::Isotropic(0.),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve(2).unwrap_err(),
            ConfigError::NonPositiveScale {
                name: "mean_free_path",
                dim: 0,
                value: 0.
            }
        );

        let settings = SamplerSettings {
            dx: vec![0.1, -0.1].into(),
            ..Default::default()
        };
        assert!(matches!(
            settings.resolve(2),
            Err(ConfigError::NonPositiveScale { name: "dx", dim: 1, .. })
        ));

        let settings = SamplerSettings {
            dx: vec![0.1, f64::NAN].into(),
            ..Default::default()
        };
        assert!(settings.resolve(2).is_err());

        let settings = SamplerSettings {
            dx: vec![0.1; 3].into(),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve(2).unwrap_err(),
            ConfigError::DimensionMismatch {
                name: "dx",
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_zero_counts() {
        let settings = SamplerSettings {
            thinning: 0,
            ..Default::default()
        };
        assert_eq!(
            settings.resolve(1).unwrap_err(),
            ConfigError::ZeroCount { name: "thinning" }
        );

        let settings = SamplerSettings {
            n_ants: 0,
            ..Default::default()
        };
        assert_eq!(
            settings.resolve(1).unwrap_err(),
            ConfigError::ZeroCount { name: "n_ants" }
        );

        let settings = SamplerSettings {
            max_proposals: Some(0),
            ..Default::default()
        };
        assert!(settings.resolve(1).is_err());

        let settings = SamplerSettings {
            max_proposals: None,
            ..Default::default()
        };
        assert!(settings.resolve(1).is_ok());
    }
}
