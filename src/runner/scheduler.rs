//! The scheduler loop.

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::steps::{Step, StepRunner};

use super::cycle::{advance_once_with, RunProgress};
use super::report::{DeadlockReport, RunOutcome, RunPhase, RunReport};
use super::state::{CompletionPolicy, ExecutionState};

/// Drives steps to completion in dependency order.
pub struct Scheduler {
    runner: Arc<dyn StepRunner>,
    policy: CompletionPolicy,
}

impl Scheduler {
    /// Create a scheduler with the default completion policy.
    pub fn new(runner: Arc<dyn StepRunner>) -> Self {
        Self {
            runner,
            policy: CompletionPolicy::default(),
        }
    }

    /// Set the completion policy for concurrent steps.
    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    /// Run the steps.
    pub fn run(&self, steps: &[Step]) -> Result<RunReport> {
        self.run_with_progress(steps, |_| {})
    }

    /// Run the steps, reporting progress through a callback.
    ///
    /// Background steps are always waited for before this returns, whatever
    /// the outcome.
    pub fn run_with_progress<F>(&self, steps: &[Step], mut on_progress: F) -> Result<RunReport>
    where
        F: FnMut(RunProgress<'_>),
    {
        let start = Instant::now();
        let mut remaining = steps.to_vec();
        let mut state = ExecutionState::new(self.policy);
        on_progress(RunProgress::Phase(RunPhase::Pending));

        tracing::debug!(
            "Running {} steps with policy {}",
            remaining.len(),
            self.policy
        );
        on_progress(RunProgress::Phase(RunPhase::Running));

        let outcome = self.drive(&mut remaining, &mut state, &mut on_progress);

        for result in state.wait_all() {
            on_progress(RunProgress::Finished {
                result: &result,
                background: true,
            });
        }

        let report = state.into_report(outcome?, start.elapsed());
        tracing::debug!("Run finished: {}", report.phase());
        on_progress(RunProgress::Phase(report.phase()));
        Ok(report)
    }

    fn drive<F>(
        &self,
        remaining: &mut Vec<Step>,
        state: &mut ExecutionState,
        on_progress: &mut F,
    ) -> Result<RunOutcome>
    where
        F: FnMut(RunProgress<'_>),
    {
        loop {
            if let Some(failure) = state.failure() {
                return Ok(RunOutcome::Failed(failure.clone()));
            }
            if remaining.is_empty() {
                return Ok(RunOutcome::Completed);
            }

            let progressed = advance_once_with(remaining, state, &self.runner, &mut *on_progress)?;

            for result in state.drain_background() {
                on_progress(RunProgress::Finished {
                    result: &result,
                    background: true,
                });
            }

            remaining.retain(|step| !state.is_dispatched(&step.name));

            if progressed {
                continue;
            }

            if self.policy == CompletionPolicy::OnExit && state.has_in_flight() {
                tracing::debug!("No step eligible; waiting for a concurrent step to exit");
                if let Some(result) = state.wait_next() {
                    on_progress(RunProgress::Finished {
                        result: &result,
                        background: true,
                    });
                }
                continue;
            }

            if let Some(failure) = state.failure() {
                return Ok(RunOutcome::Failed(failure.clone()));
            }

            let report = DeadlockReport::from_remaining(remaining, state.completed());
            tracing::warn!("Run blocked with {} steps remaining", report.blocked.len());
            return Ok(RunOutcome::Blocked(report));
        }
    }
}
