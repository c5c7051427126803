//! List command implementation.
//!
//! The `commander list` command prints every stored command with its steps
//! as a dependency tree.

use crate::config::Settings;
use crate::error::Result;
use crate::store::CommandStore;
use crate::ui::{CommanderTheme, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::display::step_tree;

/// The list command implementation.
pub struct ListCommand {
    settings: Settings,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = CommandStore::new(&self.settings.home);
        let commands = store.list()?;

        if commands.is_empty() {
            ui.message("No commands found");
            return Ok(CommandResult::success());
        }

        let theme = CommanderTheme::new();
        for (i, command) in commands.iter().enumerate() {
            if i > 0 {
                ui.message("");
            }
            ui.message(&format!(
                "{} {}",
                theme.highlight.apply_to(&command.name),
                theme.dim.apply_to(format!("({} steps)", command.steps.len()))
            ));
            for line in step_tree(command) {
                ui.message(&format!("  {}", line));
            }
        }

        Ok(CommandResult::success())
    }
}
