//! Check command implementation.
//!
//! The `commander check` command finds dependency problems that would make
//! a run deadlock: unknown step names, self-dependencies and cycles.

use crate::config::Settings;
use crate::error::Result;
use crate::runner::DependencyGraph;
use crate::steps::CommandDefinition;
use crate::store::CommandStore;
use crate::ui::UserInterface;

use crate::cli::args::NameArgs;

use super::dispatcher::{Command, CommandResult, EXIT_FAILURE, EXIT_NO_COMMANDS};

/// The check command implementation.
pub struct CheckCommand {
    settings: Settings,
    args: NameArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(settings: Settings, args: NameArgs) -> Self {
        Self { settings, args }
    }

    fn targets(&self, store: &CommandStore) -> Result<Vec<CommandDefinition>> {
        match self.args.name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => Ok(vec![store.get(name)?]),
            None => store.list(),
        }
    }
}

/// Report problems for one command. Returns how many were found.
fn check_one(ui: &mut dyn UserInterface, command: &CommandDefinition) -> usize {
    let issues = DependencyGraph::from_steps(&command.steps).issues();

    if issues.is_empty() {
        ui.success(&format!("{}: ok", command.name));
        return 0;
    }

    ui.error(&format!("{}: {} problem(s)", command.name, issues.len()));
    for issue in &issues {
        ui.message(&format!("  {}", issue));
    }
    issues.len()
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = CommandStore::new(&self.settings.home);
        let commands = self.targets(&store)?;

        if commands.is_empty() {
            ui.error("No commands found.");
            return Ok(CommandResult::failure(EXIT_NO_COMMANDS));
        }

        let problems: usize = commands.iter().map(|c| check_one(ui, c)).sum();

        if problems == 0 {
            Ok(CommandResult::success())
        } else {
            ui.show_hint("Runs with these problems stop with a deadlock report.");
            Ok(CommandResult::failure(EXIT_FAILURE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::Step;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> (CommandStore, Settings) {
        (
            CommandStore::new(temp.path()),
            Settings::default().with_home(Some(temp.path().to_path_buf())),
        )
    }

    #[test]
    fn clean_command_passes() {
        let temp = TempDir::new().unwrap();
        let (store, settings) = store_in(&temp);
        store
            .create(&CommandDefinition::with_steps(
                "deploy",
                vec![
                    Step::new("build", "make", "/"),
                    Step::new("ship", "make ship", "/").depends_on(["build"]),
                ],
            ))
            .unwrap();
        let mut ui = MockUI::new();

        let result = CheckCommand::new(settings, NameArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_success("deploy: ok"));
    }

    #[test]
    fn reports_unknown_and_cycles() {
        let temp = TempDir::new().unwrap();
        let (store, settings) = store_in(&temp);
        store
            .create(&CommandDefinition::with_steps(
                "tangled",
                vec![
                    Step::new("first", "true", "/").depends_on(["second"]),
                    Step::new("second", "true", "/").depends_on(["first"]),
                    Step::new("third", "true", "/").depends_on(["ghost"]),
                ],
            ))
            .unwrap();
        let mut ui = MockUI::new();

        let result = CheckCommand::new(
            settings,
            NameArgs {
                name: Some("tangled".into()),
            },
        )
        .execute(&mut ui)
        .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("tangled: 2 problem(s)"));
        assert!(ui.has_message("unknown step 'ghost'"));
        assert!(ui.has_message("dependency cycle"));
    }

    #[test]
    fn empty_store_exits_with_two() {
        let temp = TempDir::new().unwrap();
        let (_, settings) = store_in(&temp);
        let mut ui = MockUI::new();

        let result = CheckCommand::new(settings, NameArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 2);
    }
}
