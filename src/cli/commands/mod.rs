//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`] and share the resolved
//! [`Settings`](crate::config::Settings).

pub mod check;
pub mod completions;
pub mod create;
pub mod dispatcher;
pub mod display;
pub mod list;
pub mod remove;
pub mod run;
pub mod update;

pub use dispatcher::{
    Command, CommandDispatcher, CommandResult, EXIT_DEADLOCK, EXIT_FAILURE, EXIT_NO_COMMANDS,
};
