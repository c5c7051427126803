//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait so commands never talk to the terminal directly
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use commander::ui::{create_ui, OutputMode, UserInterface};
//!
//! // Non-interactive mode never blocks on input
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("deploy");
//! ui.success("Run complete");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, CommanderTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a dimmed hint.
    fn show_hint(&mut self, hint: &str) {
        self.message(hint);
    }

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for env overrides and mocks).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    /// Free-form text prompt.
    pub fn input(key: &str, question: impl Into<String>) -> Self {
        Self::new(key, question, PromptType::Input)
    }

    /// Yes/no prompt.
    pub fn confirm(key: &str, question: impl Into<String>) -> Self {
        Self::new(key, question, PromptType::Confirm)
    }

    /// Pick one option.
    pub fn select(key: &str, question: impl Into<String>, options: Vec<PromptOption>) -> Self {
        Self::new(key, question, PromptType::Select { options })
    }

    /// Pick any number of options.
    pub fn multi_select(
        key: &str,
        question: impl Into<String>,
        options: Vec<PromptOption>,
    ) -> Self {
        Self::new(key, question, PromptType::MultiSelect { options })
    }

    fn new(key: &str, question: impl Into<String>, prompt_type: PromptType) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            prompt_type,
            default: None,
        }
    }

    /// Set the default answer.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
    /// Select multiple from a list of options.
    MultiSelect { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

impl PromptOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// An option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or select.
    String(String),
    /// Multiple string results from multi-select.
    Strings(Vec<String>),
}

impl PromptResult {
    /// Get as a single string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::Strings(v) => v.join(","),
        }
    }

    /// Get as bool. Strings answer `true` for "true", "yes", "y" or "1".
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => parse_bool(s),
            Self::Strings(_) => false,
        }
    }

    /// Get as a list. Single strings are split on commas.
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Self::Strings(v) => v,
            Self::String(s) => split_list(&s),
            Self::Bool(b) => vec![b.to_string()],
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Turn a raw answer into the result type the prompt expects.
pub(crate) fn typed_answer(prompt_type: &PromptType, raw: &str) -> PromptResult {
    match prompt_type {
        PromptType::Confirm => PromptResult::Bool(parse_bool(raw)),
        PromptType::MultiSelect { .. } => PromptResult::Strings(split_list(raw)),
        PromptType::Input | PromptType::Select { .. } => PromptResult::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_result_as_string() {
        assert_eq!(PromptResult::Bool(true).as_string(), "true");
        assert_eq!(PromptResult::String("hello".into()).as_string(), "hello");
        assert_eq!(
            PromptResult::Strings(vec!["a".into(), "b".into()]).as_string(),
            "a,b"
        );
    }

    #[test]
    fn prompt_result_as_bool() {
        assert!(PromptResult::Bool(true).as_bool());
        assert!(PromptResult::String("Yes".into()).as_bool());
        assert!(!PromptResult::String("nope".into()).as_bool());
    }

    #[test]
    fn into_strings_splits_single_answer() {
        assert_eq!(
            PromptResult::String("a, b,,c".into()).into_strings(),
            vec!["a", "b", "c"]
        );
        assert!(PromptResult::Strings(vec![]).into_strings().is_empty());
    }

    #[test]
    fn typed_answer_follows_prompt_type() {
        assert_eq!(
            typed_answer(&PromptType::Confirm, "y"),
            PromptResult::Bool(true)
        );
        assert_eq!(
            typed_answer(&PromptType::MultiSelect { options: vec![] }, "x,y"),
            PromptResult::Strings(vec!["x".into(), "y".into()])
        );
        assert_eq!(
            typed_answer(&PromptType::Input, "text"),
            PromptResult::String("text".into())
        );
    }

    #[test]
    fn prompt_builders() {
        let prompt = Prompt::select(
            "pick",
            "Pick one",
            vec![PromptOption::plain("a"), PromptOption::new("Bee", "b")],
        )
        .with_default("b");

        assert_eq!(prompt.key, "pick");
        assert_eq!(prompt.default.as_deref(), Some("b"));
        match prompt.prompt_type {
            PromptType::Select { options } => assert_eq!(options[1].value, "b"),
            _ => panic!("Expected Select variant"),
        }
    }
}
