//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Exit code when a step fails.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when there is nothing to work with (no stored commands).
pub const EXIT_NO_COMMANDS: i32 = 2;

/// Exit code when a run can make no further progress.
pub const EXIT_DEADLOCK: i32 = 3;

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    settings: Settings,
}

impl CommandDispatcher {
    /// Create a new dispatcher with resolved settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Get the settings every command starts from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = self.settings.clone();
        match &cli.command {
            Commands::Run(args) => super::run::RunCommand::new(settings, args.clone()).execute(ui),
            Commands::Create(args) => {
                super::create::CreateCommand::new(settings, args.clone()).execute(ui)
            }
            Commands::Update(args) => {
                super::update::UpdateCommand::new(settings, args.clone()).execute(ui)
            }
            Commands::Remove(args) => {
                super::remove::RemoveCommand::new(settings, args.clone()).execute(ui)
            }
            Commands::List => super::list::ListCommand::new(settings).execute(ui),
            Commands::Check(args) => {
                super::check::CheckCommand::new(settings, args.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
