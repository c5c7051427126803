//! Run outcomes.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use crate::steps::{Step, StepResult};

use super::dependency::unmet_dependencies;
use super::state::CompletionPolicy;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Not started.
    Pending,
    /// Dispatching steps.
    Running,
    /// Every step was dispatched and none failed synchronously.
    Completed,
    /// A pass made no progress with steps remaining.
    Blocked,
    /// A step failure ended the run.
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunPhase::Pending => "pending",
            RunPhase::Running => "running",
            RunPhase::Completed => "completed",
            RunPhase::Blocked => "blocked",
            RunPhase::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A step left undispatched by a deadlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedStep {
    pub name: String,
    /// Declared dependencies that never completed, in declaration order.
    pub unmet: Vec<String>,
}

/// Why a run could not make progress.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeadlockReport {
    /// Remaining steps in authoring order.
    pub blocked: Vec<BlockedStep>,
}

impl DeadlockReport {
    /// Build the report for the steps still remaining.
    pub fn from_remaining(remaining: &[Step], completed: &HashSet<String>) -> Self {
        let blocked = remaining
            .iter()
            .map(|step| BlockedStep {
                name: step.name.clone(),
                unmet: unmet_dependencies(&step.dependencies, completed),
            })
            .collect();
        Self { blocked }
    }

    /// Names of the blocked steps.
    pub fn names(&self) -> Vec<&str> {
        self.blocked.iter().map(|b| b.name.as_str()).collect()
    }

    /// Dependencies that are not steps of the run at all.
    pub fn missing(&self, known: &[Step]) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for dep in self.blocked.iter().flat_map(|b| &b.unmet) {
            if !known.iter().any(|s| &s.name == dep) && !missing.contains(dep) {
                missing.push(dep.clone());
            }
        }
        missing
    }
}

impl fmt::Display for DeadlockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.blocked.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} waits on {}", step.name, step.unmet.join(", "))?;
        }
        Ok(())
    }
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed,
    /// The step whose failure stopped the run.
    Failed(StepResult),
    Blocked(DeadlockReport),
}

/// Everything a finished run has to say.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Step names in dispatch order.
    pub dispatch_order: Vec<String>,
    /// Step names in the order they joined the completed set.
    pub completed: Vec<String>,
    /// Results of synchronous steps.
    pub results: Vec<StepResult>,
    /// Concurrent steps that reported failure.
    pub background_failures: Vec<StepResult>,
    pub policy: CompletionPolicy,
    pub duration: Duration,
}

impl RunReport {
    /// Terminal phase of the run.
    pub fn phase(&self) -> RunPhase {
        match self.outcome {
            RunOutcome::Completed => RunPhase::Completed,
            RunOutcome::Failed(_) => RunPhase::Failed,
            RunOutcome::Blocked(_) => RunPhase::Blocked,
        }
    }

    /// Completed with no background failures.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed) && self.background_failures.is_empty()
    }

    pub fn failed_step(&self) -> Option<&StepResult> {
        match &self.outcome {
            RunOutcome::Failed(result) => Some(result),
            _ => None,
        }
    }

    pub fn deadlock(&self) -> Option<&DeadlockReport> {
        match &self.outcome {
            RunOutcome::Blocked(report) => Some(report),
            _ => None,
        }
    }

    /// Position of a step in the dispatch order.
    pub fn dispatch_index(&self, name: &str) -> Option<usize> {
        self.dispatch_order.iter().position(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn deadlock_lists_unmet_dependencies() {
        let remaining = vec![
            Step::new("bbb", "true", "/").depends_on(["aaa", "zzz"]),
            Step::new("ccc", "true", "/").depends_on(["bbb"]),
        ];

        let report = DeadlockReport::from_remaining(&remaining, &completed(&["aaa"]));

        assert_eq!(report.names(), vec!["bbb", "ccc"]);
        assert_eq!(report.blocked[0].unmet, vec!["zzz"]);
        assert_eq!(report.blocked[1].unmet, vec!["bbb"]);
        assert_eq!(report.missing(&remaining), vec!["zzz"]);
        assert_eq!(report.to_string(), "bbb waits on zzz\nccc waits on bbb");
    }

    #[test]
    fn success_requires_clean_background() {
        let mut report = RunReport {
            outcome: RunOutcome::Completed,
            dispatch_order: vec!["aaa".into()],
            completed: vec!["aaa".into()],
            results: vec![],
            background_failures: vec![],
            policy: CompletionPolicy::OnDispatch,
            duration: Duration::ZERO,
        };
        assert!(report.is_success());
        assert_eq!(report.phase(), RunPhase::Completed);
        assert_eq!(report.dispatch_index("aaa"), Some(0));

        report
            .background_failures
            .push(StepResult::failure("aaa", Duration::ZERO, "x".into()));
        assert!(!report.is_success());
    }

    #[test]
    fn phase_names() {
        assert_eq!(RunPhase::Pending.to_string(), "pending");
        assert_eq!(RunPhase::Failed.to_string(), "failed");
    }
}
