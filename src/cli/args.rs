//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Commander - define reusable, dependency-ordered shell steps and run them.
#[derive(Debug, Parser)]
#[command(name = "commander")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding stored commands (default ~/.commander)
    #[arg(long, global = true, env = "COMMANDER_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a stored command
    #[command(alias = "execute")]
    Run(RunArgs),

    /// Create a command step by step
    Create(NameArgs),

    /// Rename a command or edit its steps
    Update(NameArgs),

    /// Delete a stored command
    Remove(NameArgs),

    /// List stored commands and their steps
    List,

    /// Check step dependencies for unknown names and cycles
    Check(NameArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Command to run (prompted for when missing or unknown)
    pub name: Option<String>,

    /// Let dependents of a concurrent step start only after it finished
    #[arg(long, env = "COMMANDER_WAIT_FOR_CONCURRENT")]
    pub wait_for_concurrent: bool,

    /// Branch checked out by every checkout step (skips the branch prompts)
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Show what would run without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,
}

/// A subcommand taking an optional command name.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct NameArgs {
    /// Command name
    pub name: Option<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
