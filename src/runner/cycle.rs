//! One pass of the greedy scheduler.

use std::sync::Arc;

use crate::error::Result;
use crate::steps::{Step, StepResult, StepRunner};

use super::dependency::dependencies_satisfied;
use super::report::RunPhase;
use super::state::{run_guarded, CompletionPolicy, ExecutionState};

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// The run entered a new phase.
    Phase(RunPhase),
    /// A step is about to start.
    Dispatched {
        step: &'a Step,
        ordinal: usize,
        concurrent: bool,
    },
    /// A step reported back. `background` is set for concurrent steps.
    Finished {
        result: &'a StepResult,
        background: bool,
    },
}

/// Dispatch the first eligible step in `remaining`.
///
/// Returns `false`, leaving `state` untouched, when no step qualifies.
pub fn advance_once(
    remaining: &[Step],
    state: &mut ExecutionState,
    runner: &Arc<dyn StepRunner>,
) -> Result<bool> {
    advance_once_with(remaining, state, runner, |_| {})
}

/// [`advance_once`] with a progress callback.
pub fn advance_once_with<F>(
    remaining: &[Step],
    state: &mut ExecutionState,
    runner: &Arc<dyn StepRunner>,
    mut on_progress: F,
) -> Result<bool>
where
    F: FnMut(RunProgress<'_>),
{
    let eligible = remaining.iter().find(|step| {
        !state.is_dispatched(&step.name)
            && !state.is_completed(&step.name)
            && dependencies_satisfied(&step.dependencies, state.completed())
    });

    let Some(step) = eligible else {
        return Ok(false);
    };

    let ordinal = state.mark_dispatched(&step.name);
    tracing::info!(
        "Dispatching step '{}' (#{}, {})",
        step.name,
        ordinal,
        if step.concurrence {
            "concurrent"
        } else {
            "sequential"
        }
    );
    on_progress(RunProgress::Dispatched {
        step,
        ordinal,
        concurrent: step.concurrence,
    });

    if step.concurrence {
        state.spawn_background(step.clone(), Arc::clone(runner))?;
        if state.policy() == CompletionPolicy::OnDispatch {
            state.mark_completed(&step.name);
        }
    } else {
        let result = run_guarded(runner.as_ref(), step);
        tracing::debug!("Step '{}' finished: success={}", step.name, result.success);
        on_progress(RunProgress::Finished {
            result: &result,
            background: false,
        });
        state.record(result);
    }

    Ok(true)
}
