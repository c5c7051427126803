//! Run command implementation.
//!
//! The `commander run` command executes a stored command's steps in
//! dependency order.

use std::collections::HashMap;
use std::sync::Arc;

use crate::authoring::select_command;
use crate::cli::args::RunArgs;
use crate::config::Settings;
use crate::error::{CommanderError, Result};
use crate::runner::{CompletionPolicy, Scheduler};
use crate::steps::{CommandDefinition, ProcessRunner};
use crate::store::CommandStore;
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_NO_COMMANDS};
use super::display::{exit_code, show_progress, show_report};

/// Prompt keys for branch names are this prefix plus the step name.
pub const BRANCH_KEY_PREFIX: &str = "branch_";

/// The run command implementation.
pub struct RunCommand {
    settings: Settings,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(settings: Settings, args: RunArgs) -> Self {
        Self { settings, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Settings with this invocation's flags applied.
    fn effective_settings(&self) -> Settings {
        let mut settings = self.settings.clone();
        if self.args.wait_for_concurrent {
            settings.policy = CompletionPolicy::OnExit;
        }
        settings.dry_run = settings.dry_run || self.args.dry_run;
        settings
    }

    /// The command to run: the named one, or one the user picks.
    fn choose(
        &self,
        ui: &mut dyn UserInterface,
        store: &CommandStore,
    ) -> Result<Option<CommandDefinition>> {
        let requested = self
            .args
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        if let Some(name) = requested {
            if store.exists(name) {
                return store.get(name).map(Some);
            }
            if !ui.is_interactive() {
                return Err(CommanderError::CommandNotFound {
                    name: name.to_string(),
                });
            }
            ui.warning(&format!("Command '{}' does not exist", name));
        }

        match select_command(ui, store, "Which command do you want to run?")? {
            Some(name) => store.get(&name).map(Some),
            None => Ok(None),
        }
    }

    /// Branch for every checkout step, asked once per step before the run.
    fn resolve_branches(
        &self,
        ui: &mut dyn UserInterface,
        command: &CommandDefinition,
        default_branch: &str,
    ) -> Result<HashMap<String, String>> {
        let mut branches = HashMap::new();

        for step in command.steps.iter().filter(|s| s.check_out_branch) {
            let branch = match &self.args.branch {
                Some(branch) => branch.clone(),
                None => {
                    let key = format!("{}{}", BRANCH_KEY_PREFIX, step.name);
                    let answer = ui
                        .prompt(
                            &Prompt::input(
                                &key,
                                format!("[{}] Branch to check out", step.name),
                            )
                            .with_default(default_branch),
                        )?
                        .as_string();
                    let answer = answer.trim();
                    if answer.is_empty() {
                        default_branch.to_string()
                    } else {
                        answer.to_string()
                    }
                }
            };
            tracing::debug!("Step '{}' will check out '{}'", step.name, branch);
            branches.insert(step.name.clone(), branch);
        }

        Ok(branches)
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = self.effective_settings();
        let store = CommandStore::new(&settings.home);

        if store.names()?.is_empty() {
            ui.error("No commands found. Create one with 'commander create'.");
            return Ok(CommandResult::failure(EXIT_NO_COMMANDS));
        }

        let command = match self.choose(ui, &store)? {
            Some(command) => command,
            None => {
                ui.error("No commands found. Create one with 'commander create'.");
                return Ok(CommandResult::failure(EXIT_NO_COMMANDS));
            }
        };

        let branches = self.resolve_branches(ui, &command, &settings.default_branch)?;

        ui.show_header(&format!("Running {}", command.name));
        ui.show_hint(&format!(
            "Completion policy {}: {}",
            settings.policy,
            settings.policy.description()
        ));
        if settings.dry_run {
            ui.message("Dry run: nothing will be executed");
        }

        let runner = ProcessRunner::new(settings.execution_options(branches));
        let scheduler = Scheduler::new(Arc::new(runner)).with_policy(settings.policy);

        let report = scheduler.run_with_progress(&command.steps, |event| show_progress(ui, event))?;
        show_report(ui, &command, &report);

        match exit_code(&report) {
            0 => Ok(CommandResult::success()),
            code => Ok(CommandResult::failure(code)),
        }
    }
}
