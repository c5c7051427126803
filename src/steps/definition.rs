//! Step and command definitions.
//!
//! These are the records produced by authoring, persisted by the store and
//! consumed (read-only) by the scheduler. Field names on disk keep the
//! historical JSON keys (`path`, `runNpmInstall`, `checkOutBranch`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CommanderError, Result};

/// Minimum length for command and step names.
pub const MIN_NAME_LEN: usize = 3;

/// A single named unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique name within the owning command.
    pub name: String,

    /// Shell command line to execute.
    pub instruction: String,

    /// Names of steps that must complete before this one may start.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Dispatch without waiting for the process to exit.
    #[serde(default)]
    pub concurrence: bool,

    /// Directory the process is launched in.
    #[serde(rename = "path")]
    pub working_directory: PathBuf,

    /// Install packages (yarn, falling back to npm) before the instruction.
    #[serde(rename = "runNpmInstall", default)]
    pub install_dependencies: bool,

    /// Fetch, pull and check out a branch before the instruction.
    #[serde(rename = "checkOutBranch", default)]
    pub check_out_branch: bool,
}

impl Step {
    /// Create a synchronous step with no dependencies or bootstrap actions.
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        working_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            dependencies: Vec::new(),
            concurrence: false,
            working_directory: working_directory.into(),
            install_dependencies: false,
            check_out_branch: false,
        }
    }

    /// Set the dependency list.
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the step as concurrent.
    pub fn concurrent(mut self) -> Self {
        self.concurrence = true;
        self
    }

    /// Enable the package-install bootstrap action.
    pub fn with_install(mut self) -> Self {
        self.install_dependencies = true;
        self
    }

    /// Enable the branch-checkout bootstrap action.
    pub fn with_checkout(mut self) -> Self {
        self.check_out_branch = true;
        self
    }

    /// Whether any bootstrap action runs before the instruction.
    pub fn has_bootstrap(&self) -> bool {
        self.install_dependencies || self.check_out_branch
    }
}

/// A named, ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Unique name across all stored commands.
    pub name: String,

    /// Steps in authoring order.
    #[serde(default, alias = "commands")]
    pub steps: Vec<Step>,
}

impl CommandDefinition {
    /// Create an empty command.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Create a command from a list of steps.
    pub fn with_steps(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Look up a step by name.
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Step names in authoring order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    /// Append a step, rejecting duplicate names.
    pub fn add_step(&mut self, step: Step) -> Result<()> {
        validate_step_name(&step.name, &self.steps)?;
        self.steps.push(step);
        Ok(())
    }

    /// Replace the step at `index`, rejecting a name that collides with
    /// any other step.
    pub fn replace_step(&mut self, index: usize, step: Step) -> Result<()> {
        let others: Vec<Step> = self
            .steps
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, s)| s.clone())
            .collect();
        validate_step_name(&step.name, &others)?;

        match self.steps.get_mut(index) {
            Some(slot) => {
                *slot = step;
                Ok(())
            }
            None => Err(CommanderError::StepExecutionError {
                step: step.name,
                message: format!("no step at position {}", index),
            }),
        }
    }

    /// Point every dependency on `from` at `to` instead.
    pub fn rename_dependency(&mut self, from: &str, to: &str) {
        for step in &mut self.steps {
            for dep in &mut step.dependencies {
                if dep == from {
                    *dep = to.to_string();
                }
            }
        }
    }
}

/// Validate a command name.
///
/// Names become file names in the store, so separators and relative
/// components are rejected alongside the length rule.
pub fn validate_command_name(name: &str) -> Result<()> {
    check_length(name)?;

    let is_plain = Path::new(name)
        .file_name()
        .map(|f| f == name)
        .unwrap_or(false);
    if !is_plain || name.contains(['/', '\\']) {
        return Err(CommanderError::InvalidName {
            name: name.to_string(),
            reason: "must not contain path separators".to_string(),
        });
    }
    if name.starts_with('.') {
        return Err(CommanderError::InvalidName {
            name: name.to_string(),
            reason: "must not start with '.'".to_string(),
        });
    }

    Ok(())
}

/// Validate a step name against its siblings.
pub fn validate_step_name(name: &str, siblings: &[Step]) -> Result<()> {
    check_length(name)?;

    if siblings.iter().any(|s| s.name == name) {
        return Err(CommanderError::InvalidName {
            name: name.to_string(),
            reason: "that step already exists".to_string(),
        });
    }

    Ok(())
}

fn check_length(name: &str) -> Result<()> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(CommanderError::InvalidName {
            name: name.to_string(),
            reason: format!("must be at least {} characters long", MIN_NAME_LEN),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_builder_sets_fields() {
        let step = Step::new("build", "make", "/tmp")
            .depends_on(["fetch"])
            .concurrent()
            .with_install()
            .with_checkout();

        assert_eq!(step.dependencies, vec!["fetch"]);
        assert!(step.concurrence);
        assert!(step.install_dependencies);
        assert!(step.check_out_branch);
        assert!(step.has_bootstrap());
    }

    #[test]
    fn step_serializes_with_historical_keys() {
        let step = Step::new("build", "make", "/srv/app").with_install();
        let json = serde_json::to_value(&step).unwrap();

        assert_eq!(json["path"], "/srv/app");
        assert_eq!(json["runNpmInstall"], true);
        assert_eq!(json["checkOutBranch"], false);
        assert!(json.get("working_directory").is_none());
    }

    #[test]
    fn step_deserializes_with_defaults() {
        let json = r#"{"name": "lint", "instruction": "npm run lint", "path": "/srv/app"}"#;
        let step: Step = serde_json::from_str(json).unwrap();

        assert!(step.dependencies.is_empty());
        assert!(!step.concurrence);
        assert!(!step.install_dependencies);
        assert!(!step.check_out_branch);
    }

    #[test]
    fn command_accepts_legacy_commands_key() {
        let json = r#"{
            "name": "legacy",
            "commands": [
                {"name": "one", "instruction": "true", "path": "/"}
            ]
        }"#;
        let command: CommandDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(command.steps.len(), 1);
        assert_eq!(command.step_names(), vec!["one"]);
    }

    #[test]
    fn add_step_rejects_duplicates() {
        let mut command = CommandDefinition::new("deploy");
        command.add_step(Step::new("build", "make", "/")).unwrap();

        let err = command
            .add_step(Step::new("build", "make again", "/"))
            .unwrap_err();
        assert!(matches!(err, CommanderError::InvalidName { .. }));
        assert_eq!(command.steps.len(), 1);
    }

    #[test]
    fn replace_step_allows_keeping_own_name() {
        let mut command = CommandDefinition::with_steps(
            "deploy",
            vec![Step::new("build", "make", "/"), Step::new("test", "make test", "/")],
        );

        command
            .replace_step(0, Step::new("build", "make all", "/"))
            .unwrap();
        assert_eq!(command.step("build").unwrap().instruction, "make all");

        let err = command
            .replace_step(0, Step::new("test", "make", "/"))
            .unwrap_err();
        assert!(matches!(err, CommanderError::InvalidName { .. }));
    }

    #[test]
    fn command_name_rules() {
        assert!(validate_command_name("deploy").is_ok());
        assert!(validate_command_name("ab").is_err());
        assert!(validate_command_name("../escape").is_err());
        assert!(validate_command_name("a/b/c").is_err());
        assert!(validate_command_name("..").is_err());
        assert!(validate_command_name(".hidden").is_err());
    }

    #[test]
    fn rename_dependency_rewrites_references() {
        let mut command = CommandDefinition::with_steps(
            "deploy",
            vec![
                Step::new("build", "make", "/"),
                Step::new("test", "make test", "/").depends_on(["build", "lint"]),
            ],
        );

        command.rename_dependency("build", "compile");

        assert_eq!(command.steps[1].dependencies, vec!["compile", "lint"]);
    }

    #[test]
    fn step_name_rules() {
        let siblings = vec![Step::new("build", "make", "/")];
        assert!(validate_step_name("test", &siblings).is_ok());
        assert!(validate_step_name("te", &siblings).is_err());
        assert!(validate_step_name("build", &siblings).is_err());
    }
}
