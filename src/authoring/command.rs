//! Command creation and editing flows.

use crate::error::{CommanderError, Result};
use crate::steps::{validate_command_name, CommandDefinition};
use crate::store::CommandStore;
use crate::ui::{Prompt, PromptOption, UserInterface};

use super::step::{ask_valid, prompt_step, AuthoringContext};

pub const COMMAND_NAME_KEY: &str = "command_name";
pub const ADD_ANOTHER_STEP_KEY: &str = "add_another_step";
pub const UPDATE_ACTION_KEY: &str = "update_action";
pub const UPDATE_STEP_KEY: &str = "update_step";
pub const SELECT_COMMAND_KEY: &str = "command";

/// Menu value for appending a step while editing.
pub const ADD_NEW_STEP: &str = "__add_new_step";

/// Check a name for a new command: valid and not taken (unless it is
/// `current`, the command being renamed).
pub fn check_new_command_name(
    store: &CommandStore,
    name: &str,
    current: Option<&str>,
) -> Result<()> {
    validate_command_name(name)?;
    if Some(name) != current && store.exists(name) {
        return Err(CommanderError::CommandExists {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Ask for a command name that is valid and not already stored.
pub fn prompt_command_name(
    ui: &mut dyn UserInterface,
    store: &CommandStore,
    current: Option<&str>,
) -> Result<String> {
    let mut prompt = Prompt::input(COMMAND_NAME_KEY, "Write the command name");
    if let Some(name) = current {
        prompt = prompt.with_default(name);
    }
    ask_valid(ui, &prompt, |value| {
        check_new_command_name(store, value, current)
    })
}

/// Ask the user to pick a stored command. `None` when there are none.
pub fn select_command(
    ui: &mut dyn UserInterface,
    store: &CommandStore,
    question: &str,
) -> Result<Option<String>> {
    let names = store.names()?;
    if names.is_empty() {
        return Ok(None);
    }

    let options = names.iter().cloned().map(PromptOption::plain).collect();
    let choice = ui
        .prompt(&Prompt::select(SELECT_COMMAND_KEY, question, options).with_default(names[0].clone()))?
        .as_string();

    if names.contains(&choice) {
        Ok(Some(choice))
    } else {
        Err(CommanderError::CommandNotFound { name: choice })
    }
}

/// Build a new command from prompts. Nothing is written.
///
/// A name given up front is checked; otherwise the user is asked for one.
/// Steps are added until the user declines another.
pub fn create_command(
    ui: &mut dyn UserInterface,
    store: &CommandStore,
    name: Option<&str>,
    ctx: &AuthoringContext,
) -> Result<CommandDefinition> {
    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => {
            check_new_command_name(store, name, None)?;
            name.to_string()
        }
        None => prompt_command_name(ui, store, None)?,
    };

    let mut command = CommandDefinition::new(name);

    loop {
        let step = prompt_step(ui, None, &command.steps, ctx)?;
        command.add_step(step)?;

        let another = ui
            .prompt(
                &Prompt::confirm(ADD_ANOTHER_STEP_KEY, "Do you want to add another step?")
                    .with_default("false"),
            )?
            .as_bool();
        if !another {
            break;
        }
    }

    Ok(command)
}

/// What the update menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    Rename,
    EditSteps,
    Exit,
}

impl UpdateAction {
    fn options() -> Vec<PromptOption> {
        vec![
            PromptOption::new("Name", "name"),
            PromptOption::new("Steps", "steps"),
            PromptOption::new("Exit", "exit"),
        ]
    }

    /// Anything unrecognized exits.
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "name" => Self::Rename,
            "steps" => Self::EditSteps,
            _ => Self::Exit,
        }
    }
}

/// Interactive edit loop. Every change is written to the store at once.
pub fn update_command(
    ui: &mut dyn UserInterface,
    store: &CommandStore,
    mut command: CommandDefinition,
    ctx: &AuthoringContext,
) -> Result<CommandDefinition> {
    loop {
        let action = ui
            .prompt(
                &Prompt::select(
                    UPDATE_ACTION_KEY,
                    "What do you want to update?",
                    UpdateAction::options(),
                )
                .with_default("exit"),
            )?
            .as_string();

        match UpdateAction::parse(&action) {
            UpdateAction::Exit => break,
            UpdateAction::Rename => {
                let new_name = prompt_command_name(ui, store, Some(&command.name))?;
                if new_name == command.name {
                    continue;
                }
                let mut spinner = ui.start_spinner("Updating command name");
                match store.rename(&command.name, &new_name) {
                    Ok(renamed) => {
                        spinner.finish_success(&format!("Renamed to {}", new_name));
                        command = renamed;
                    }
                    Err(e) => {
                        spinner.finish_error("Rename failed");
                        return Err(e);
                    }
                }
            }
            UpdateAction::EditSteps => {
                if !edit_steps(ui, &mut command, ctx)? {
                    continue;
                }
                let mut spinner = ui.start_spinner("Updating step");
                match store.save(&command) {
                    Ok(_) => spinner.finish_success("Step saved"),
                    Err(e) => {
                        spinner.finish_error("Saving failed");
                        return Err(e);
                    }
                }
            }
        }
    }

    Ok(command)
}

/// Pick a step to edit, or add one. Returns whether the command changed.
fn edit_steps(
    ui: &mut dyn UserInterface,
    command: &mut CommandDefinition,
    ctx: &AuthoringContext,
) -> Result<bool> {
    let mut options: Vec<PromptOption> = command
        .steps
        .iter()
        .map(|s| PromptOption::plain(s.name.clone()))
        .collect();
    options.push(PromptOption::new("Add new step", ADD_NEW_STEP));

    let choice = ui
        .prompt(&Prompt::select(
            UPDATE_STEP_KEY,
            "Which step do you want to update?",
            options,
        ))?
        .as_string();

    if choice == ADD_NEW_STEP {
        let step = prompt_step(ui, None, &command.steps, ctx)?;
        command.add_step(step)?;
        return Ok(true);
    }

    let Some(index) = command.steps.iter().position(|s| s.name == choice) else {
        ui.warning(&format!("No step named '{}'", choice));
        return Ok(false);
    };

    let original = command.steps[index].clone();
    let others: Vec<_> = command
        .steps
        .iter()
        .filter(|s| s.name != original.name)
        .cloned()
        .collect();
    let updated = prompt_step(ui, Some(&original), &others, ctx)?;
    let renamed_to = (updated.name != original.name).then(|| updated.name.clone());

    command.replace_step(index, updated)?;
    if let Some(new_name) = renamed_to {
        command.rename_dependency(&original.name, &new_name);
    }
    Ok(true)
}
