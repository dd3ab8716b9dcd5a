use std::{
    fmt::Display,
    time::{Duration, Instant},
};

/// The stages of a sampler run, in the order they are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Ants move and drop marks.
    Exploration,
    /// Ants are reset and move without marking.
    Thermalization,
    /// Ants move without marking and their positions are recorded.
    Sampling,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Exploration => "exploration",
            Phase::Thermalization => "thermalization",
            Phase::Sampling => "sampling",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Progress {
    pub phase: Phase,
    /// Completed rounds of the current phase.
    pub iteration: u64,
    pub total_iterations: u64,
    pub num_marks: usize,
    pub num_draws: usize,
    /// Proposals drawn in the current run, out of bounds ones included.
    pub total_proposals: u64,
    pub total_out_of_bounds: u64,
}

impl Progress {
    pub fn finished(&self) -> bool {
        self.iteration == self.total_iterations
    }
}

/// Periodically called with the time since the run started and the
/// current state of the sampler.
pub struct ProgressCallback {
    pub callback: Box<dyn FnMut(Duration, Progress) + Send>,
    pub rate: Duration,
}

/// Rate limits calls to a [`ProgressCallback`].
pub(crate) struct ProgressReporter<'a> {
    callback: Option<&'a mut ProgressCallback>,
    start: Instant,
    last: Option<Instant>,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(callback: Option<&'a mut ProgressCallback>) -> Self {
        let start = Instant::now();
        ProgressReporter {
            callback,
            start,
            last: None,
        }
    }

    /// Report `progress` if the callback is due, or unconditionally at the
    /// end of a phase.
    pub(crate) fn report(&mut self, progress: impl FnOnce() -> Progress, end_of_phase: bool) {
        let Some(callback) = self.callback.as_mut() else {
            return;
        };
        let now = Instant::now();
        let due = self
            .last
            .map(|last| now.duration_since(last) >= callback.rate)
            .unwrap_or(true);
        if due | end_of_phase {
            (callback.callback)(now.duration_since(self.start), progress());
            self.last = Some(now);
        }
    }
}
