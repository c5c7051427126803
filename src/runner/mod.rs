//! Dependency-ordered step execution.
//!
//! - [`Scheduler`] - drives a command's steps to a [`RunReport`]
//! - [`advance_once`] - one greedy pass over the remaining steps
//! - [`ExecutionState`] - per-run working sets and the background channel
//! - [`DependencyGraph`] - static checks, never consulted while running

pub mod cycle;
pub mod dependency;
pub mod graph;
pub mod report;
pub mod scheduler;
pub mod state;

pub use cycle::{advance_once, advance_once_with, RunProgress};
pub use dependency::{dependencies_satisfied, unmet_dependencies};
pub use graph::{DependencyGraph, GraphIssue};
pub use report::{BlockedStep, DeadlockReport, RunOutcome, RunPhase, RunReport};
pub use scheduler::Scheduler;
pub use state::{CompletionPolicy, ExecutionState};
