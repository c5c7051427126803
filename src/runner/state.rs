//! Per-run working sets.

use std::collections::HashSet;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::steps::{Step, StepResult, StepRunner};

use super::report::{RunOutcome, RunReport};

/// When a concurrent step counts as completed for its dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Completed as soon as it is dispatched.
    #[default]
    OnDispatch,
    /// Completed only once its process exits successfully.
    OnExit,
}

impl CompletionPolicy {
    /// One-line explanation shown in the run header.
    pub fn description(&self) -> &'static str {
        match self {
            CompletionPolicy::OnDispatch => "concurrent steps unblock dependents when started",
            CompletionPolicy::OnExit => "concurrent steps unblock dependents when finished",
        }
    }
}

impl fmt::Display for CompletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionPolicy::OnDispatch => write!(f, "on-dispatch"),
            CompletionPolicy::OnExit => write!(f, "on-exit"),
        }
    }
}

impl FromStr for CompletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "on-dispatch" | "dispatch" => Ok(Self::OnDispatch),
            "on-exit" | "exit" => Ok(Self::OnExit),
            _ => Err(format!("unknown completion policy: {}", s)),
        }
    }
}

/// Run a step, turning a panicking runner into a failed result.
pub(crate) fn run_guarded(runner: &dyn StepRunner, step: &Step) -> StepResult {
    let start = Instant::now();
    catch_unwind(AssertUnwindSafe(|| runner.run(step))).unwrap_or_else(|_| {
        StepResult::failure(
            &step.name,
            start.elapsed(),
            "step runner panicked".to_string(),
        )
    })
}

/// Mutable state owned by a single scheduler run.
///
/// `completed` only grows. A name enters `dispatched` exactly once.
#[derive(Debug)]
pub struct ExecutionState {
    policy: CompletionPolicy,
    completed: HashSet<String>,
    completion_order: Vec<String>,
    dispatched: HashSet<String>,
    dispatch_order: Vec<String>,
    results: Vec<StepResult>,
    failure: Option<StepResult>,
    background_failures: Vec<StepResult>,
    in_flight: HashSet<String>,
    sender: Sender<StepResult>,
    receiver: Receiver<StepResult>,
    handles: Vec<JoinHandle<()>>,
}

impl ExecutionState {
    /// Fresh state for one run.
    pub fn new(policy: CompletionPolicy) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            policy,
            completed: HashSet::new(),
            completion_order: Vec::new(),
            dispatched: HashSet::new(),
            dispatch_order: Vec::new(),
            results: Vec::new(),
            failure: None,
            background_failures: Vec::new(),
            in_flight: HashSet::new(),
            sender,
            receiver,
            handles: Vec::new(),
        }
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    pub fn completed(&self) -> &HashSet<String> {
        &self.completed
    }

    pub fn is_completed(&self, name: &str) -> bool {
        self.completed.contains(name)
    }

    pub fn is_dispatched(&self, name: &str) -> bool {
        self.dispatched.contains(name)
    }

    /// Names in the order they were dispatched.
    pub fn dispatch_order(&self) -> &[String] {
        &self.dispatch_order
    }

    /// The synchronous failure (or, under `OnExit`, background failure) that
    /// ends the run.
    pub fn failure(&self) -> Option<&StepResult> {
        self.failure.as_ref()
    }

    pub fn background_failures(&self) -> &[StepResult] {
        &self.background_failures
    }

    /// Whether any concurrent step has not reported back yet.
    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Record a dispatch and return its 1-based ordinal.
    pub fn mark_dispatched(&mut self, name: &str) -> usize {
        if self.dispatched.insert(name.to_string()) {
            self.dispatch_order.push(name.to_string());
        }
        self.dispatch_order.len()
    }

    /// Add a name to the completed set.
    pub fn mark_completed(&mut self, name: &str) {
        if self.completed.insert(name.to_string()) {
            self.completion_order.push(name.to_string());
        }
    }

    /// Record the result of a synchronous step.
    pub fn record(&mut self, result: StepResult) {
        if result.success {
            self.mark_completed(&result.name);
        } else if self.failure.is_none() {
            self.failure = Some(result.clone());
        }
        self.results.push(result);
    }

    /// Run a step on its own thread. Its result arrives through the state's
    /// channel.
    pub fn spawn_background(&mut self, step: Step, runner: Arc<dyn StepRunner>) -> Result<()> {
        let sender = self.sender.clone();
        let name = step.name.clone();

        let handle = thread::Builder::new()
            .name(format!("step-{}", name))
            .spawn(move || {
                let result = run_guarded(runner.as_ref(), &step);
                // The receiver lives as long as the run; a send error means
                // the run itself is gone.
                let _ = sender.send(result);
            })?;

        self.in_flight.insert(name);
        self.handles.push(handle);
        Ok(())
    }

    fn accept(&mut self, result: StepResult) -> StepResult {
        self.in_flight.remove(&result.name);

        if result.success {
            if self.policy == CompletionPolicy::OnExit {
                self.mark_completed(&result.name);
            }
        } else {
            tracing::warn!(
                "Concurrent step '{}' failed: {}",
                result.name,
                result.error.as_deref().unwrap_or("unknown error")
            );
            self.background_failures.push(result.clone());
            if self.policy == CompletionPolicy::OnExit && self.failure.is_none() {
                self.failure = Some(result.clone());
            }
        }

        result
    }

    /// Collect every background result that has already arrived.
    pub fn drain_background(&mut self) -> Vec<StepResult> {
        let mut drained = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(result) => drained.push(self.accept(result)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }

    /// Block until the next background result arrives. `None` when nothing
    /// is in flight.
    pub fn wait_next(&mut self) -> Option<StepResult> {
        if !self.has_in_flight() {
            return None;
        }
        match self.receiver.recv() {
            Ok(result) => Some(self.accept(result)),
            Err(_) => None,
        }
    }

    /// Wait for every background step, then join their threads.
    pub fn wait_all(&mut self) -> Vec<StepResult> {
        let mut finished = Vec::new();
        while let Some(result) = self.wait_next() {
            finished.push(result);
        }
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("A step thread panicked after reporting its result");
            }
        }
        finished
    }

    /// Consume the state into a report.
    pub fn into_report(self, outcome: RunOutcome, duration: Duration) -> RunReport {
        RunReport {
            outcome,
            dispatch_order: self.dispatch_order,
            completed: self.completion_order,
            results: self.results,
            background_failures: self.background_failures,
            policy: self.policy,
            duration,
        }
    }
}
