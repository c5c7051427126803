//! Update command implementation.

use crate::authoring::{select_command, update_command, AuthoringContext};
use crate::cli::args::NameArgs;
use crate::config::Settings;
use crate::error::{CommanderError, Result};
use crate::store::CommandStore;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_NO_COMMANDS};

/// The update command implementation.
pub struct UpdateCommand {
    settings: Settings,
    args: NameArgs,
    context: Option<AuthoringContext>,
}

impl UpdateCommand {
    /// Create a new update command.
    pub fn new(settings: Settings, args: NameArgs) -> Self {
        Self {
            settings,
            args,
            context: None,
        }
    }

    /// Use explicit directories instead of the process's own.
    pub fn with_context(mut self, context: AuthoringContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl Command for UpdateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = CommandStore::new(&self.settings.home);

        let name = match self.args.name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) if store.exists(name) => name.to_string(),
            Some(name) => {
                return Err(CommanderError::CommandNotFound {
                    name: name.to_string(),
                })
            }
            None => match select_command(ui, &store, "Which command do you want to update?")? {
                Some(name) => name,
                None => {
                    ui.error("No commands found. Create one with 'commander create'.");
                    return Ok(CommandResult::failure(EXIT_NO_COMMANDS));
                }
            },
        };

        let context = match &self.context {
            Some(context) => context.clone(),
            None => AuthoringContext::from_process()?,
        };

        let command = store.get(&name)?;
        let updated = update_command(ui, &store, command, &context)?;

        ui.success(&format!("Done updating {}", updated.name));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authoring::command::{COMMAND_NAME_KEY, UPDATE_ACTION_KEY};
    use crate::steps::CommandDefinition;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Settings, AuthoringContext) {
        let temp = TempDir::new().unwrap();
        let settings = Settings::default().with_home(Some(temp.path().join("store")));
        let context = AuthoringContext {
            current_dir: temp.path().to_path_buf(),
            browse_root: temp.path().to_path_buf(),
        };
        (temp, settings, context)
    }

    #[test]
    fn renames_named_command() {
        let (_temp, settings, context) = setup();
        let store = CommandStore::new(&settings.home);
        store.create(&CommandDefinition::new("deploy")).unwrap();
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(UPDATE_ACTION_KEY, vec!["name", "exit"]);
        ui.set_prompt_response(COMMAND_NAME_KEY, "release");

        let result = UpdateCommand::new(
            settings,
            NameArgs {
                name: Some("deploy".into()),
            },
        )
        .with_context(context)
        .execute(&mut ui)
        .unwrap();

        assert!(result.success);
        assert!(store.exists("release"));
        assert!(!store.exists("deploy"));
        assert!(ui.has_success("Done updating release"));
    }

    #[test]
    fn unknown_name_is_an_error() {
        let (_temp, settings, context) = setup();
        let mut ui = MockUI::new();

        let err = UpdateCommand::new(
            settings,
            NameArgs {
                name: Some("ghost".into()),
            },
        )
        .with_context(context)
        .execute(&mut ui)
        .unwrap_err();

        assert!(matches!(err, CommanderError::CommandNotFound { .. }));
    }

    #[test]
    fn empty_store_exits_with_two() {
        let (_temp, settings, context) = setup();
        let mut ui = MockUI::new();

        let result = UpdateCommand::new(settings, NameArgs::default())
            .with_context(context)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 2);
    }
}
