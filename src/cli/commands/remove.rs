//! Remove command implementation.

use crate::authoring::select_command;
use crate::cli::args::NameArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::store::CommandStore;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_NO_COMMANDS};

/// The remove command implementation.
pub struct RemoveCommand {
    settings: Settings,
    args: NameArgs,
}

impl RemoveCommand {
    /// Create a new remove command.
    pub fn new(settings: Settings, args: NameArgs) -> Self {
        Self { settings, args }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = CommandStore::new(&self.settings.home);

        let name = match self.args.name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => name.to_string(),
            None => match select_command(ui, &store, "Select a command to delete")? {
                Some(name) => name,
                None => {
                    ui.error("No commands found.");
                    return Ok(CommandResult::failure(EXIT_NO_COMMANDS));
                }
            },
        };

        let mut spinner = ui.start_spinner(&format!("Removing {}", name));
        match store.remove(&name) {
            Ok(()) => spinner.finish_success("Command removed"),
            Err(e) => {
                spinner.finish_error("Removing failed");
                return Err(e);
            }
        }

        tracing::info!("Removed command '{}'", name);
        ui.success(&format!("Command {} removed", name));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authoring::command::SELECT_COMMAND_KEY;
    use crate::error::CommanderError;
    use crate::steps::CommandDefinition;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn settings(temp: &TempDir) -> Settings {
        Settings::default().with_home(Some(temp.path().to_path_buf()))
    }

    #[test]
    fn removes_named_command() {
        let temp = TempDir::new().unwrap();
        let store = CommandStore::new(temp.path());
        store.create(&CommandDefinition::new("deploy")).unwrap();
        let mut ui = MockUI::new();

        let result = RemoveCommand::new(
            settings(&temp),
            NameArgs {
                name: Some("deploy".into()),
            },
        )
        .execute(&mut ui)
        .unwrap();

        assert!(result.success);
        assert!(!store.exists("deploy"));
    }

    #[test]
    fn prompts_when_name_missing() {
        let temp = TempDir::new().unwrap();
        let store = CommandStore::new(temp.path());
        store.create(&CommandDefinition::new("alpha")).unwrap();
        store.create(&CommandDefinition::new("beta")).unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response(SELECT_COMMAND_KEY, "beta");

        RemoveCommand::new(settings(&temp), NameArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(store.names().unwrap(), vec!["alpha"]);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let err = RemoveCommand::new(
            settings(&temp),
            NameArgs {
                name: Some("ghost".into()),
            },
        )
        .execute(&mut ui)
        .unwrap_err();

        assert!(matches!(err, CommanderError::CommandNotFound { .. }));
    }
}
