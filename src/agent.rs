use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    density::LogDensity,
    geometry::Bounds,
    marks::MarkSet,
    math::{accept_move, mark_probability},
    proposal::StepProposal,
    sampler::{Result, SamplerError},
};

/// Everything an ant needs to know about its surroundings to move.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub bounds: &'a Bounds,
    pub proposal: &'a StepProposal,
    /// Proposals allowed per move, out of bounds ones included.
    pub max_proposals: Option<u64>,
}

/// Bookkeeping about a single accepted move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInfo {
    /// Marks around the position before the move.
    pub old_marks: usize,
    /// Marks around the accepted position.
    pub new_marks: usize,
    /// Number of candidates drawn, including the accepted one.
    pub proposals: u64,
    /// Candidates that fell outside of the bounds.
    pub out_of_bounds: u64,
}

enum MoveState {
    Proposing,
    Evaluating { new_marks: usize },
    Accepted { new_marks: usize },
}

/// A random walker that leaves marks behind and avoids marked regions.
#[derive(Debug, Clone)]
pub struct Agent {
    id: usize,
    position: Box<[f64]>,
    candidate: Box<[f64]>,
    max_logp: f64,
    rng: ChaCha8Rng,
}

impl Agent {
    /// Create an ant at a uniformly random position in `bounds`.
    ///
    /// Each ant draws from its own stream of a generator seeded with `seed`.
    pub fn new(id: usize, bounds: &Bounds, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(id as u64);
        let dim = bounds.dim();
        let mut agent = Agent {
            id,
            position: vec![0f64; dim].into(),
            candidate: vec![0f64; dim].into(),
            max_logp: f64::NEG_INFINITY,
            rng,
        };
        agent.initialise(bounds);
        agent
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    /// The largest log density this ant has evaluated so far.
    pub fn max_logp(&self) -> f64 {
        self.max_logp
    }

    /// Move the ant to a fresh uniform position in `bounds`.
    ///
    /// The running maximum of the log density survives this.
    pub fn initialise(&mut self, bounds: &Bounds) {
        bounds.sample_interior(&mut self.rng, &mut self.position);
    }

    /// Place the ant at a given point. The point must lie inside the domain.
    #[cfg(test)]
    pub(crate) fn set_position(&mut self, bounds: &Bounds, position: &[f64]) {
        assert!(bounds.contains(position), "Position outside of the bounds");
        self.position.copy_from_slice(position);
    }

    /// Evaluate the density at the current position and decide whether
    /// the position should be marked.
    pub fn wants_mark<F: LogDensity>(&mut self, density: &F) -> Result<bool> {
        let logp = density
            .logp(&self.position)
            .map_err(|err| SamplerError::LogpFailure(Box::new(err)))?;
        if logp > self.max_logp {
            self.max_logp = logp;
        }
        let u: f64 = self.rng.random();
        Ok(mark_probability(logp, self.max_logp) > u)
    }

    /// Possibly mark the current position. Returns whether a mark was left.
    pub fn mark<F: LogDensity>(&mut self, density: &F, marks: &mut MarkSet) -> Result<bool> {
        let marked = self.wants_mark(density)?;
        if marked {
            marks.push(&self.position);
        }
        Ok(marked)
    }

    /// Move to a new position.
    ///
    /// Candidates are drawn until one is accepted. Candidates outside of the
    /// bounds are redrawn, candidates in empty regions are always accepted,
    /// otherwise a candidate is accepted with probability
    /// `old_marks / new_marks`. A rejected candidate is not a step, the ant
    /// only ever ends up at an accepted position.
    pub fn step(&mut self, ctx: &MoveContext<'_>, marks: &MarkSet) -> Result<MoveInfo> {
        let mut info = MoveInfo {
            old_marks: marks.count_near(&self.position),
            ..Default::default()
        };
        let mut state = MoveState::Proposing;
        loop {
            state = match state {
                MoveState::Proposing => {
                    if let Some(max) = ctx.max_proposals {
                        if info.proposals >= max {
                            return Err(SamplerError::ProposalsExhausted {
                                ant: self.id,
                                proposals: info.proposals,
                            });
                        }
                    }
                    info.proposals += 1;
                    ctx.proposal
                        .propose(&mut self.rng, &self.position, &mut self.candidate);
                    if ctx.bounds.contains(&self.candidate) {
                        MoveState::Evaluating {
                            new_marks: marks.count_near(&self.candidate),
                        }
                    } else {
                        info.out_of_bounds += 1;
                        MoveState::Proposing
                    }
                }
                MoveState::Evaluating { new_marks } => {
                    let rng = &mut self.rng;
                    if accept_move(info.old_marks, new_marks, || rng.random()) {
                        MoveState::Accepted { new_marks }
                    } else {
                        MoveState::Proposing
                    }
                }
                MoveState::Accepted { new_marks } => {
                    std::mem::swap(&mut self.position, &mut self.candidate);
                    info.new_marks = new_marks;
                    return Ok(info);
                }
            }
        }
    }
}
