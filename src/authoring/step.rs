//! Step prompts.

use std::path::PathBuf;

use crate::error::{CommanderError, Result};
use crate::steps::{validate_step_name, Step};
use crate::ui::{Prompt, PromptOption, UserInterface};

use super::browse::find_path;

/// How many times an invalid answer is re-asked before giving up.
pub const MAX_ATTEMPTS: usize = 5;

pub const STEP_NAME_KEY: &str = "step_name";
pub const STEP_INSTRUCTION_KEY: &str = "step_instruction";
pub const STEP_DEPENDENCIES_KEY: &str = "step_dependencies";
pub const STEP_CONCURRENT_KEY: &str = "step_concurrent";
pub const STEP_CURRENT_PATH_KEY: &str = "step_in_current_path";
pub const STEP_CHECKOUT_KEY: &str = "step_checkout";
pub const STEP_INSTALL_KEY: &str = "step_install";

/// Where authoring starts looking for working directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoringContext {
    /// Offered as "the current path".
    pub current_dir: PathBuf,
    /// Where the directory browser starts.
    pub browse_root: PathBuf,
}

impl AuthoringContext {
    /// Context for this process: its working directory and the user's home.
    pub fn from_process() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        let browse_root = dirs::home_dir().unwrap_or_else(|| current_dir.clone());
        Ok(Self {
            current_dir,
            browse_root,
        })
    }
}

/// Ask until `validate` accepts the answer, at most [`MAX_ATTEMPTS`] times.
pub(crate) fn ask_valid<F>(
    ui: &mut dyn UserInterface,
    prompt: &Prompt,
    mut validate: F,
) -> Result<String>
where
    F: FnMut(&str) -> Result<()>,
{
    let mut last_error = None;
    for _ in 0..MAX_ATTEMPTS {
        let answer = ui.prompt(prompt)?.as_string().trim().to_string();
        match validate(&answer) {
            Ok(()) => return Ok(answer),
            Err(e) => {
                ui.warning(&e.to_string());
                if !ui.is_interactive() {
                    return Err(e);
                }
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| CommanderError::PromptUnavailable {
        key: prompt.key.clone(),
        message: "no valid answer".to_string(),
    }))
}

/// Prompt for a step, starting from `existing` when editing.
///
/// `siblings` are the command's other steps: their names are reserved and
/// they are the only dependency choices.
pub fn prompt_step(
    ui: &mut dyn UserInterface,
    existing: Option<&Step>,
    siblings: &[Step],
    ctx: &AuthoringContext,
) -> Result<Step> {
    let mut name_prompt = Prompt::input(STEP_NAME_KEY, "Write the step name");
    if let Some(step) = existing {
        name_prompt = name_prompt.with_default(step.name.clone());
    }
    let name = ask_valid(ui, &name_prompt, |value| validate_step_name(value, siblings))?;

    let mut instruction_prompt =
        Prompt::input(STEP_INSTRUCTION_KEY, format!("[{}] Command to execute", name));
    if let Some(step) = existing {
        instruction_prompt = instruction_prompt.with_default(step.instruction.clone());
    }
    let instruction = ask_valid(ui, &instruction_prompt, |value| {
        if value.is_empty() {
            Err(CommanderError::InvalidName {
                name: name.clone(),
                reason: "the step needs a command to execute".to_string(),
            })
        } else {
            Ok(())
        }
    })?;

    let dependencies = if siblings.is_empty() {
        Vec::new()
    } else {
        let options = siblings
            .iter()
            .map(|s| PromptOption::plain(s.name.clone()))
            .collect();
        let mut prompt = Prompt::multi_select(
            STEP_DEPENDENCIES_KEY,
            format!("[{}] Steps that must run before this one", name),
            options,
        );
        if let Some(step) = existing.filter(|s| !s.dependencies.is_empty()) {
            prompt = prompt.with_default(step.dependencies.join(","));
        }

        let chosen = ui.prompt(&prompt)?.into_strings();
        let mut dependencies = Vec::new();
        for dep in chosen {
            if !siblings.iter().any(|s| s.name == dep) {
                ui.warning(&format!("Ignoring unknown step '{}'", dep));
            } else if dep == name {
                ui.warning(&format!("A step cannot depend on itself ('{}')", dep));
            } else if !dependencies.contains(&dep) {
                dependencies.push(dep);
            }
        }
        dependencies
    };

    let concurrence = ui
        .prompt(
            &Prompt::confirm(
                STEP_CONCURRENT_KEY,
                format!("[{}] Run without waiting for it to finish?", name),
            )
            .with_default(existing.map(|s| s.concurrence).unwrap_or(false).to_string()),
        )?
        .as_bool();

    let in_current_path = existing
        .map(|s| s.working_directory == ctx.current_dir)
        .unwrap_or(true);
    let use_current = ui
        .prompt(
            &Prompt::confirm(
                STEP_CURRENT_PATH_KEY,
                format!(
                    "[{}] Run in the current path ({})?",
                    name,
                    ctx.current_dir.display()
                ),
            )
            .with_default(in_current_path.to_string()),
        )?
        .as_bool();

    let working_directory = if use_current {
        ctx.current_dir.clone()
    } else {
        find_path(ui, &ctx.browse_root)?
    };

    let check_out_branch = if working_directory.join(".git").exists() {
        ui.prompt(
            &Prompt::confirm(
                STEP_CHECKOUT_KEY,
                format!("[{}] Check out a branch before running?", name),
            )
            .with_default(existing.map(|s| s.check_out_branch).unwrap_or(false).to_string()),
        )?
        .as_bool()
    } else {
        false
    };

    let install_dependencies = if working_directory.join("package.json").exists() {
        ui.prompt(
            &Prompt::confirm(
                STEP_INSTALL_KEY,
                format!("[{}] Install packages before running?", name),
            )
            .with_default(
                existing
                    .map(|s| s.install_dependencies)
                    .unwrap_or(false)
                    .to_string(),
            ),
        )?
        .as_bool()
    } else {
        false
    };

    Ok(Step {
        name,
        instruction,
        dependencies,
        concurrence,
        working_directory,
        install_dependencies,
        check_out_branch,
    })
}
