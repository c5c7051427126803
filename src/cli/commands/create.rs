//! Create command implementation.
//!
//! The `commander create` command builds a command from prompts and writes
//! it to the store.

use crate::authoring::{create_command, AuthoringContext};
use crate::cli::args::NameArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::store::CommandStore;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The create command implementation.
pub struct CreateCommand {
    settings: Settings,
    args: NameArgs,
    context: Option<AuthoringContext>,
}

impl CreateCommand {
    /// Create a new create command.
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

impl Command for CreateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = CommandStore::new(&self.settings.home);
        let context = match &self.context {
            Some(context) => context.clone(),
            None => AuthoringContext::from_process()?,
        };

        if !store.root().is_dir() {
            ui.message(&format!("Creating {}", store.root().display()));
            store.ensure_root()?;
        }

        let command = create_command(ui, &store, self.args.name.as_deref(), &context)?;

        let mut spinner = ui.start_spinner("Writing command file");
        let path = match store.create(&command) {
            Ok(path) => {
                spinner.finish_success("Command file written");
                path
            }
            Err(e) => {
                spinner.finish_error("Writing failed");
                return Err(e);
            }
        };

        tracing::info!(
            "Created command '{}' with {} steps",
            command.name,
            command.steps.len()
        );
        ui.success(&format!("Command {} created", command.name));
        ui.show_hint(&path.display().to_string());

        Ok(CommandResult::success())
    }
}
