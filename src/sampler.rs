use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    density::LogDensity,
    draws::Draws,
    geometry::Bounds,
    marks::MarkSet,
    population::{AntHill, RoundStats},
    progress::{Phase, Progress, ProgressCallback, ProgressReporter},
    proposal::StepProposal,
    settings::{ConfigError, ResolvedSettings, SamplerSettings},
};

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("Invalid sampler configuration")]
    Config(#[from] ConfigError),
    #[error("Ant {ant} did not find an acceptable move in {proposals} proposals")]
    ProposalsExhausted { ant: usize, proposals: u64 },
    #[error("Logp function returned an error")]
    LogpFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, SamplerError>;

/// Upper limit on the rows reserved up front for the draws. Larger runs
/// grow the buffer as they go.
const MAX_RESERVED_DRAWS: usize = 1 << 16;

/// Draw points from a density on a box with a population of marking ants.
///
/// A run has three phases. During exploration the ants wander the domain and
/// drop marks, preferring to walk away from marked regions. The ants are then
/// scattered again and thermalize against the now fixed marks, and finally
/// each ant records its position every `thinning` moves.
pub struct AntSampler<F: LogDensity> {
    density: F,
    settings: ResolvedSettings,
    hill: AntHill,
    marks: MarkSet,
    draws: Draws,
    progress: Option<ProgressCallback>,
}

impl<F: LogDensity> AntSampler<F> {
    /// Validate the configuration and place the ants at random positions.
    pub fn new(density: F, bounds: Bounds, settings: &SamplerSettings) -> Result<Self> {
        let dim = bounds.dim();
        if density.dim() != dim {
            return Err(ConfigError::DimensionMismatch {
                name: "log density",
                expected: dim,
                found: density.dim(),
            }
            .into());
        }
        let settings = settings.resolve(dim)?;

        let proposal = StepProposal::new(settings.mean_free_path.clone());
        let hill = AntHill::new(
            settings.n_ants,
            bounds,
            proposal,
            settings.seed,
            settings.max_proposals,
            settings.parallel,
        );
        let marks = MarkSet::new(settings.dx.clone());
        let expected_draws = usize::try_from(settings.sampling_cycles)
            .unwrap_or(usize::MAX)
            .saturating_mul(settings.n_ants);
        let draws = Draws::with_capacity(dim, expected_draws.min(MAX_RESERVED_DRAWS));

        Ok(AntSampler {
            density,
            settings,
            hill,
            marks,
            draws,
            progress: None,
        })
    }

    /// Report progress to `callback` during [`AntSampler::run`].
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn dim(&self) -> usize {
        self.hill.bounds().dim()
    }

    pub fn density(&self) -> &F {
        &self.density
    }

    pub fn hill(&self) -> &AntHill {
        &self.hill
    }

    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    pub fn draws(&self) -> &Draws {
        &self.draws
    }

    pub fn into_draws(self) -> Draws {
        self.draws
    }

    /// Scatter the ants and forget previous draws. With `clear_marks` the
    /// marks are dropped as well, otherwise the next run starts from the
    /// explored landscape of the previous one.
    pub fn initialise(&mut self, clear_marks: bool) {
        self.hill.reinitialise();
        self.draws.clear();
        if clear_marks {
            self.marks.clear();
        }
    }

    /// Run exploration (if `explore` is set), thermalization and sampling.
    ///
    /// New draws are appended to those of earlier runs unless
    /// [`AntSampler::initialise`] was called in between.
    pub fn run(&mut self, explore: bool) -> Result<&Draws> {
        let mut callback = self.progress.take();
        let result = {
            let mut reporter = ProgressReporter::new(callback.as_mut());
            self.run_phases(explore, &mut reporter)
        };
        self.progress = callback;
        result?;
        Ok(&self.draws)
    }

    fn run_phases(&mut self, explore: bool, reporter: &mut ProgressReporter<'_>) -> Result<()> {
        let mut totals = RoundStats::default();
        if explore {
            self.explore(reporter, &mut totals)?;
        }
        self.thermalize(reporter, &mut totals)?;
        self.sample(reporter, &mut totals)?;
        info!(
            draws = self.draws.len(),
            marks = self.marks.len(),
            proposals = totals.proposals,
            out_of_bounds = totals.out_of_bounds,
            "Finished sampling"
        );
        Ok(())
    }

    fn explore(
        &mut self,
        reporter: &mut ProgressReporter<'_>,
        totals: &mut RoundStats,
    ) -> Result<()> {
        let rounds = self.settings.exploration_rounds;
        info!(
            rounds,
            ants = self.hill.len(),
            marks = self.marks.len(),
            "Starting exploration"
        );
        for round in 0..rounds {
            let stats = self.hill.explore_round(&self.density, &mut self.marks)?;
            *totals = totals.merge(stats);
            debug!(
                round,
                marked = stats.marked,
                marks = self.marks.len(),
                "Exploration round finished"
            );
            let done = round + 1;
            reporter.report(
                || self.snapshot(Phase::Exploration, done, rounds, totals),
                done == rounds,
            );
        }
        info!(marks = self.marks.len(), "Finished exploration");
        Ok(())
    }

    fn thermalize(
        &mut self,
        reporter: &mut ProgressReporter<'_>,
        totals: &mut RoundStats,
    ) -> Result<()> {
        let rounds = self.settings.n_burnin;
        let steps = self.settings.thinning;
        info!(rounds, steps, "Starting thermalization");
        self.hill.reinitialise();
        for round in 0..rounds {
            let stats = self.hill.walk(&self.marks, steps)?;
            *totals = totals.merge(stats);
            debug!(round, proposals = stats.proposals, "Thermalization round finished");
            let done = round + 1;
            reporter.report(
                || self.snapshot(Phase::Thermalization, done, rounds, totals),
                done == rounds,
            );
        }
        Ok(())
    }

    fn sample(
        &mut self,
        reporter: &mut ProgressReporter<'_>,
        totals: &mut RoundStats,
    ) -> Result<()> {
        let cycles = self.settings.sampling_cycles;
        let steps = self.settings.thinning;
        info!(cycles, steps, ants = self.hill.len(), "Starting sampling");
        for cycle in 0..cycles {
            let stats = self.hill.walk(&self.marks, steps)?;
            *totals = totals.merge(stats);
            for position in self.hill.positions() {
                self.draws.push(position);
            }
            debug!(cycle, draws = self.draws.len(), "Sampling cycle finished");
            let done = cycle + 1;
            reporter.report(
                || self.snapshot(Phase::Sampling, done, cycles, totals),
                done == cycles,
            );
        }
        Ok(())
    }

    fn snapshot(
        &self,
        phase: Phase,
        iteration: u64,
        total: u64,
        totals: &RoundStats,
    ) -> Progress {
        Progress {
            phase,
            iteration,
            total_iterations: total,
            num_marks: self.marks.len(),
            num_draws: self.draws.len(),
            total_proposals: totals.proposals,
            total_out_of_bounds: totals.out_of_bounds,
        }
    }
}

/// Explore `bounds` and return the draws of a single run.
pub fn sample<F: LogDensity>(
    density: F,
    bounds: &[(f64, f64)],
    settings: &SamplerSettings,
) -> anyhow::Result<Draws> {
    let bounds = Bounds::new(bounds).context("Invalid sampling domain")?;
    let mut sampler =
        AntSampler::new(density, bounds, settings).context("Could not create ant sampler")?;
    sampler.run(true).context("Sampling failed")?;
    Ok(sampler.into_draws())
}
