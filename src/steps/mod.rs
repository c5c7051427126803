//! Step definitions and execution.
//!
//! - [`Step`] / [`CommandDefinition`] - the records authoring produces and
//!   the scheduler consumes
//! - [`StepRunner`] - the seam between the scheduler and processes
//! - [`ProcessRunner`] - runs bootstrap actions and the instruction
//! - [`StepResult`] / [`StepStatus`] - execution outcomes
//!
//! # Example
//!
//! ```no_run
//! use commander::steps::{ExecutionOptions, ProcessRunner, Step, StepRunner};
//!
//! let step = Step::new("build", "make", "/srv/app");
//! let runner = ProcessRunner::new(ExecutionOptions {
//!     dry_run: true,
//!     ..Default::default()
//! });
//!
//! let result = runner.run(&step);
//! assert!(result.success);
//! ```

pub mod definition;
pub mod executor;

pub use definition::{
    validate_command_name, validate_step_name, CommandDefinition, Step, MIN_NAME_LEN,
};
pub use executor::{
    format_duration, ExecutionOptions, ProcessRunner, StepResult, StepRunner, StepStatus,
};
