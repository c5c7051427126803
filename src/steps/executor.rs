//! Step execution engine.
//!
//! The scheduler talks to processes only through [`StepRunner`].
//! [`ProcessRunner`] is the real implementation: it runs the bootstrap
//! actions a step asks for and then its instruction, with the caller's
//! standard streams passed through.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::bootstrap::{checkout_commands, sync_branch, Installer};
use crate::error::CommanderError;
use crate::shell::{execute, CommandOptions};
use crate::steps::definition::Step;

/// How a finished step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Failed,
}

impl StepStatus {
    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Completed => '✓',
            StepStatus::Failed => '✗',
        }
    }
}

/// Result of executing a step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name.
    pub name: String,

    /// Whether the step succeeded.
    pub success: bool,

    /// Execution duration.
    pub duration: Duration,

    /// Exit code of the instruction (if it ran).
    pub exit_code: Option<i32>,

    /// Error message (if failed).
    pub error: Option<String>,

    /// Extra output worth showing (dry-run plans).
    pub output: Option<String>,
}

impl StepResult {
    /// Create a success result.
    pub fn success(
        name: &str,
        duration: Duration,
        exit_code: Option<i32>,
        output: Option<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            duration,
            exit_code,
            error: None,
            output,
        }
    }

    /// Create a failure result.
    pub fn failure(name: &str, duration: Duration, error: String) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            duration,
            exit_code: None,
            error: Some(error),
            output: None,
        }
    }

    /// Attach the instruction's exit code.
    pub fn with_exit_code(mut self, exit_code: Option<i32>) -> Self {
        self.exit_code = exit_code;
        self
    }

    /// Get the status of this result.
    pub fn status(&self) -> StepStatus {
        if self.success {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        }
    }

    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        let status = self.status();

        match status {
            StepStatus::Failed => {
                let error = self.error.as_deref().unwrap_or("unknown error");
                format!("{} {} - {}", status.display_char(), self.name, error)
            }
            _ => format!(
                "{} {} ({})",
                status.display_char(),
                self.name,
                format_duration(self.duration)
            ),
        }
    }
}

/// Format a duration compactly (`350ms`, `4.2s`, `3m 12s`).
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}

/// Executes one step to completion.
///
/// Implementations are shared with background threads for concurrent
/// steps, hence `Send + Sync`.
pub trait StepRunner: Send + Sync {
    /// Run the step and report how it went. Never panics on step failure.
    fn run(&self, step: &Step) -> StepResult;
}

/// Options for [`ProcessRunner`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Report what would run without spawning anything.
    pub dry_run: bool,

    /// Branch used for checkout steps without an explicit entry.
    pub default_branch: String,

    /// Per-step branch names, resolved by the caller before the run.
    pub branches: HashMap<String, String>,

    /// Package managers used by the install bootstrap.
    pub installer: Installer,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            default_branch: "main".to_string(),
            branches: HashMap::new(),
            installer: Installer::default(),
        }
    }
}

/// Runs steps as OS processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    options: ExecutionOptions,
}

impl ProcessRunner {
    /// Create a runner with the given options.
    pub fn new(options: ExecutionOptions) -> Self {
        Self { options }
    }

    /// Get the runner options.
    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    /// Branch a checkout step will move to.
    pub fn branch_for(&self, step: &Step) -> &str {
        self.options
            .branches
            .get(&step.name)
            .map(String::as_str)
            .unwrap_or(&self.options.default_branch)
    }

    /// Every command the step would run, in order.
    pub fn plan(&self, step: &Step) -> Vec<String> {
        let mut plan = Vec::new();
        if step.check_out_branch {
            plan.extend(checkout_commands(self.branch_for(step)));
        }
        if step.install_dependencies {
            let installer = &self.options.installer;
            plan.push(format!(
                "{} (falls back to {})",
                installer.install_line(installer.preferred),
                installer.install_line(installer.fallback)
            ));
        }
        plan.push(step.instruction.clone());
        plan
    }

    fn fail(step: &Step, start: Instant, message: String) -> StepResult {
        tracing::warn!("Step '{}' failed: {}", step.name, message);
        StepResult::failure(&step.name, start.elapsed(), message)
    }
}

impl StepRunner for ProcessRunner {
    fn run(&self, step: &Step) -> StepResult {
        let start = Instant::now();

        if self.options.dry_run {
            let plan = self
                .plan(step)
                .iter()
                .map(|c| format!("Would run: {}", c))
                .collect::<Vec<_>>()
                .join("\n");
            return StepResult::success(&step.name, Duration::ZERO, None, Some(plan));
        }

        if step.instruction.trim().is_empty() {
            return Self::fail(
                step,
                start,
                "step has no instruction to execute".to_string(),
            );
        }

        let cwd = &step.working_directory;
        if !cwd.is_dir() {
            return Self::fail(
                step,
                start,
                format!("working directory {} does not exist", cwd.display()),
            );
        }

        if step.check_out_branch {
            let branch = self.branch_for(step);
            tracing::info!("Checking out '{}' for step '{}'", branch, step.name);
            if let Err(e) = sync_branch(branch, cwd) {
                return Self::fail(step, start, format!("branch checkout failed: {}", e));
            }
        }

        if step.install_dependencies {
            match self.options.installer.install(cwd) {
                Ok(manager) => {
                    tracing::debug!("Dependencies for '{}' installed with {}", step.name, manager)
                }
                Err(e) => {
                    return Self::fail(step, start, format!("dependency install failed: {}", e))
                }
            }
        }

        let options = CommandOptions {
            cwd: Some(cwd.clone()),
            ..Default::default()
        };

        match execute(&step.instruction, &options) {
            Ok(result) if result.success => {
                StepResult::success(&step.name, start.elapsed(), result.exit_code, None)
            }
            Ok(result) => Self::fail(
                step,
                start,
                format!("command failed with exit code {:?}", result.exit_code),
            )
            .with_exit_code(result.exit_code),
            Err(CommanderError::CommandFailed { command, .. }) => {
                Self::fail(step, start, format!("could not start `{}`", command))
            }
            Err(e) => Self::fail(step, start, e.to_string()),
        }
    }
}
