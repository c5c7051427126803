//! Commander - reusable, dependency-ordered shell steps.
//!
//! A *command* is a named list of *steps*. Each step runs a shell
//! instruction in a working directory once the steps it depends on are done,
//! optionally after checking out a branch or installing packages. Commands
//! are authored through prompts, stored as JSON files and run by a greedy
//! scheduler that reports a deadlock instead of looping forever.
//!
//! # Modules
//!
//! - [`authoring`] - Prompt-driven creation and editing of commands
//! - [`bootstrap`] - Branch checkout and package install before a step
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Runtime settings
//! - [`error`] - Error types and result aliases
//! - [`runner`] - Dependency-ordered scheduling of steps
//! - [`shell`] - Shell command execution
//! - [`steps`] - Step records and the process runner
//! - [`store`] - JSON persistence of commands
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use commander::runner::Scheduler;
//! use commander::steps::{ExecutionOptions, ProcessRunner, Step};
//!
//! let steps = vec![
//!     Step::new("ship", "make ship", ".").depends_on(["build"]),
//!     Step::new("build", "make", "."),
//! ];
//! let runner = ProcessRunner::new(ExecutionOptions {
//!     dry_run: true,
//!     ..Default::default()
//! });
//!
//! let report = Scheduler::new(Arc::new(runner)).run(&steps).unwrap();
//! assert!(report.is_success());
//! assert_eq!(report.dispatch_order, vec!["build", "ship"]);
//! ```

pub mod authoring;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod store;
pub mod ui;

pub use error::{CommanderError, Result};
