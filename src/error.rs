//! Error types for Commander operations.
//!
//! This module defines [`CommanderError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `CommanderError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `CommanderError::Other`) for unexpected errors
//! - Run outcomes (failed step, deadlock) are values on the run report, not errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Commander operations.
#[derive(Debug, Error)]
pub enum CommanderError {
    /// No stored command with this name.
    #[error("Command not found: {name}")]
    CommandNotFound { name: String },

    /// A stored command with this name already exists.
    #[error("Command already exists: {name}")]
    CommandExists { name: String },

    /// A command or step name failed validation.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Failed to parse a stored command file.
    #[error("Failed to parse command file {path}: {message}")]
    StoreParseError { path: PathBuf, message: String },

    /// A step references a step that does not exist in the same command.
    #[error("Step '{step}' depends on unknown step '{dependency}'")]
    UnknownDependency { step: String, dependency: String },

    /// Step dependency cycle detected.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// Step execution failed.
    #[error("Step '{step}' failed: {message}")]
    StepExecutionError { step: String, message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A prompt could not be answered (e.g. non-interactive without default).
    #[error("Cannot prompt for '{key}': {message}")]
    PromptUnavailable { key: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Commander operations.
pub type Result<T> = std::result::Result<T, CommanderError>;
