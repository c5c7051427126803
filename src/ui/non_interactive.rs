//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{CommanderError, Result};

use super::{typed_answer, OutputMode, Prompt, PromptResult, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "COMMANDER_PROMPT_";

/// Environment variable answering the prompt with `key`.
pub fn prompt_env_key(key: &str) -> String {
    let normalized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", PROMPT_ENV_PREFIX, normalized)
}

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `COMMANDER_PROMPT_<KEY>` variables, then from
/// the prompt's default; anything else is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        if let Some(value) = self.env_overrides.get(&prompt_env_key(&prompt.key)) {
            return Ok(typed_answer(&prompt.prompt_type, value));
        }

        if let Some(default) = &prompt.default {
            return Ok(typed_answer(&prompt.prompt_type, default));
        }

        Err(CommanderError::PromptUnavailable {
            key: prompt.key.clone(),
            message: format!(
                "no default in non-interactive mode (set {})",
                prompt_env_key(&prompt.key)
            ),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints its final state as a plain line.
struct LineSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("  ✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui_with(pairs: &[(&str, &str)]) -> NonInteractiveUI {
        let overrides = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NonInteractiveUI::with_overrides(OutputMode::Silent, overrides)
    }

    #[test]
    fn env_key_is_normalized() {
        assert_eq!(prompt_env_key("branch_deploy"), "COMMANDER_PROMPT_BRANCH_DEPLOY");
        assert_eq!(prompt_env_key("branch.my-step"), "COMMANDER_PROMPT_BRANCH_MY_STEP");
    }

    #[test]
    fn override_answers_prompt() {
        let mut ui = ui_with(&[("COMMANDER_PROMPT_BRANCH_DEPLOY", "release")]);
        let prompt = Prompt::input("branch_deploy", "Branch").with_default("main");

        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "release");
    }

    #[test]
    fn default_used_without_override() {
        let mut ui = ui_with(&[]);
        let prompt = Prompt::confirm("go", "Go?").with_default("true");

        assert_eq!(ui.prompt(&prompt).unwrap(), PromptResult::Bool(true));
    }

    #[test]
    fn missing_default_is_an_error() {
        let mut ui = ui_with(&[]);
        let err = ui.prompt(&Prompt::input("name", "Name")).unwrap_err();

        assert!(err.to_string().contains("COMMANDER_PROMPT_NAME"));
        assert!(!ui.is_interactive());
    }
}
