//! Cooperative, time-sliced task driver shared by the search and scan runners.
//!
//! A task is an explicit state machine that advances one bounded slice at a
//! time. The driver keeps calling [`IncrementalTask::advance_one_slice`] until
//! the task finishes or the caller's budget is spent; all progress lives in
//! the task itself, so the next [`IncrementalTask::work`] call resumes exactly
//! where the last one stopped.

use std::time::{Duration, Instant};

/// Budget for one `work` call when the caller has no better number (one UI frame
/// worth of background work).
pub const DEFAULT_WORK_BUDGET: Duration = Duration::from_millis(100);

/// Outcome of a single slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    /// The current phase has more slices to run.
    Continue,
    /// The current phase finished; the task moved on to the next one.
    PhaseComplete,
    /// The task reached its terminal phase.
    AllComplete,
}

/// A resumable multi-phase task.
pub trait IncrementalTask {
    /// Run one atomic slice of the current phase.
    ///
    /// Once the task is complete this must keep returning
    /// [`PhaseStatus::AllComplete`] without side effects.
    fn advance_one_slice(&mut self) -> PhaseStatus;

    /// Run slices until the task completes (`true`) or more than `budget` has
    /// elapsed (`false`). The budget is checked between slices, so a call can
    /// overrun it by at most one slice.
    fn work(&mut self, budget: Duration) -> bool {
        let started = Instant::now();
        loop {
            if self.advance_one_slice() == PhaseStatus::AllComplete {
                return true;
            }
            if started.elapsed() > budget {
                return false;
            }
        }
    }

    /// Drive the task to completion in a single call.
    fn run_to_completion(&mut self) {
        while !self.work(Duration::MAX) {}
    }
}
