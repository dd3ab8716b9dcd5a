//! Sample from an unnormalized density on a box with a population of
//! random walkers ("ants").
//!
//! Instead of a Metropolis-Hastings acceptance step, the ants first explore
//! the domain and drop marks where the density falls below the best value
//! they have seen. Afterwards moves are accepted based on how many marks
//! surround the current and the proposed position, and the positions of the
//! ants are recorded as draws.
//!
//! ```
//! use antsampler::{sample, FnDensity, SamplerSettings};
//!
//! let density = FnDensity::new(2, |x: &[f64]| -(x[0] * x[0] + x[1] * x[1]) / 2.);
//! let settings = SamplerSettings {
//!     n_steps_exp: 1000,
//!     n_draws: 100,
//!     ..Default::default()
//! };
//! let draws = sample(density, &[(-3., 3.), (-3., 3.)], &settings).unwrap();
//! assert_eq!(draws.shape(), (100, 2));
//! ```

pub(crate) mod agent;
pub(crate) mod density;
pub(crate) mod draws;
pub(crate) mod geometry;
pub(crate) mod marks;
pub(crate) mod math;
pub(crate) mod population;
pub(crate) mod progress;
pub(crate) mod proposal;
pub(crate) mod sampler;
pub(crate) mod settings;

pub use agent::{Agent, MoveContext, MoveInfo};
pub use density::{test_logps, FnDensity, LogDensity};
pub use draws::Draws;
pub use geometry::{Bounds, Window};
pub use marks::MarkSet;
pub use population::{AntHill, RoundStats};
pub use progress::{Phase, Progress, ProgressCallback};
pub use proposal::StepProposal;
pub use sampler::{sample, AntSampler, Result, SamplerError};
pub use settings::{ConfigError, SamplerSettings, Scale};
