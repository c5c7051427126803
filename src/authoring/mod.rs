//! Prompt-driven authoring of commands and steps.
//!
//! Every flow talks to the user through [`UserInterface`](crate::ui::UserInterface),
//! so the same code runs against a terminal, environment-variable answers,
//! or a [`MockUI`](crate::ui::MockUI) in tests.

pub mod browse;
pub mod command;
pub mod step;

pub use browse::{find_path, subdirectories};
pub use command::{
    check_new_command_name, create_command, prompt_command_name, select_command, update_command,
    UpdateAction,
};
pub use step::{prompt_step, AuthoringContext, MAX_ATTEMPTS};
