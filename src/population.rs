use rayon::prelude::*;

use crate::{
    agent::{Agent, MoveContext, MoveInfo},
    density::LogDensity,
    geometry::Bounds,
    marks::MarkSet,
    proposal::StepProposal,
    sampler::Result,
};

/// Totals over the moves and marks of one or more rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub moves: u64,
    pub proposals: u64,
    pub out_of_bounds: u64,
    pub marked: usize,
}

impl RoundStats {
    fn record(&mut self, info: MoveInfo) {
        self.moves += 1;
        self.proposals += info.proposals;
        self.out_of_bounds += info.out_of_bounds;
    }

    pub(crate) fn merge(mut self, other: RoundStats) -> RoundStats {
        self.moves += other.moves;
        self.proposals += other.proposals;
        self.out_of_bounds += other.out_of_bounds;
        self.marked += other.marked;
        self
    }
}

/// A fixed number of ants sharing the domain and the step proposal.
#[derive(Debug, Clone)]
pub struct AntHill {
    ants: Vec<Agent>,
    bounds: Bounds,
    proposal: StepProposal,
    max_proposals: Option<u64>,
    parallel: bool,
}

impl AntHill {
    /// Create `n_ants` ants, each at a uniform random position.
    pub(crate) fn new(
        n_ants: usize,
        bounds: Bounds,
        proposal: StepProposal,
        seed: u64,
        max_proposals: Option<u64>,
        parallel: bool,
    ) -> Self {
        assert!(bounds.dim() == proposal.dim());
        let ants = (0..n_ants)
            .map(|id| Agent::new(id, &bounds, seed))
            .collect();
        AntHill {
            ants,
            bounds,
            proposal,
            max_proposals,
            parallel,
        }
    }

    pub fn len(&self) -> usize {
        self.ants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ants.is_empty()
    }

    pub fn ants(&self) -> &[Agent] {
        &self.ants
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn proposal(&self) -> &StepProposal {
        &self.proposal
    }

    /// Scatter all ants to fresh uniform positions.
    pub fn reinitialise(&mut self) {
        let bounds = &self.bounds;
        self.ants.iter_mut().for_each(|ant| ant.initialise(bounds));
    }

    /// Every ant moves once and then possibly marks its new position.
    ///
    /// Run sequentially, later ants already see the marks of earlier ants in
    /// the same round. Run in parallel, all ants move against the marks as
    /// they were at the start of the round, and the new marks are added in
    /// ant order afterwards.
    pub fn explore_round<F: LogDensity>(
        &mut self,
        density: &F,
        marks: &mut MarkSet,
    ) -> Result<RoundStats> {
        let ctx = MoveContext {
            bounds: &self.bounds,
            proposal: &self.proposal,
            max_proposals: self.max_proposals,
        };
        let mut stats = RoundStats::default();

        if !self.parallel {
            for ant in self.ants.iter_mut() {
                stats.record(ant.step(&ctx, marks)?);
                if ant.mark(density, marks)? {
                    stats.marked += 1;
                }
            }
            return Ok(stats);
        }

        let snapshot: &MarkSet = marks;
        let outcomes = self
            .ants
            .par_iter_mut()
            .map(|ant| -> Result<(MoveInfo, bool)> {
                let info = ant.step(&ctx, snapshot)?;
                let marked = ant.wants_mark(density)?;
                Ok((info, marked))
            })
            .collect::<Result<Vec<_>>>()?;

        for (ant, (info, marked)) in self.ants.iter().zip(outcomes) {
            stats.record(info);
            if marked {
                marks.push(ant.position());
                stats.marked += 1;
            }
        }
        Ok(stats)
    }

    /// Every ant makes `steps` moves without marking.
    pub fn walk(&mut self, marks: &MarkSet, steps: u64) -> Result<RoundStats> {
        let ctx = MoveContext {
            bounds: &self.bounds,
            proposal: &self.proposal,
            max_proposals: self.max_proposals,
        };
        let walk_one = |ant: &mut Agent| -> Result<RoundStats> {
            let mut stats = RoundStats::default();
            for _ in 0..steps {
                stats.record(ant.step(&ctx, marks)?);
            }
            Ok(stats)
        };

        let per_ant = if self.parallel {
            self.ants
                .par_iter_mut()
                .map(walk_one)
                .collect::<Result<Vec<_>>>()?
        } else {
            self.ants
                .iter_mut()
                .map(walk_one)
                .collect::<Result<Vec<_>>>()?
        };
        Ok(per_ant
            .into_iter()
            .fold(RoundStats::default(), RoundStats::merge))
    }

    pub fn positions(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.ants.iter().map(|ant| ant.position())
    }
}
