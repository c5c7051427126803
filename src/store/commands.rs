//! JSON persistence of command definitions.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CommanderError, Result};
use crate::steps::{validate_command_name, CommandDefinition};

/// Stores one pretty-printed JSON file per command in a base directory.
///
/// The file name is the command name, with no extension.
#[derive(Debug, Clone)]
pub struct CommandStore {
    root: PathBuf,
}

impl CommandStore {
    /// Open a store rooted at `root`. Nothing is created until a write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The base directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a command's file.
    ///
    /// Fails for names that could not have been saved, so no lookup ever
    /// resolves outside the base directory.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_command_name(name)?;
        Ok(self.root.join(name))
    }

    /// Create the base directory if it is missing.
    pub fn ensure_root(&self) -> Result<()> {
        if !self.root.is_dir() {
            tracing::debug!("Creating command store at {}", self.root.display());
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }

    /// Whether a command with this name is stored.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Names of the stored commands, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || name.ends_with(".tmp") {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Every readable command, sorted by name. Files that fail to parse are
    /// skipped with a warning.
    pub fn list(&self) -> Result<Vec<CommandDefinition>> {
        let mut commands = Vec::new();
        for name in self.names()? {
            match self.get(&name) {
                Ok(command) => commands.push(command),
                Err(e) => tracing::warn!("Skipping {}: {}", self.root.join(&name).display(), e),
            }
        }
        Ok(commands)
    }

    /// Load one command.
    pub fn get(&self, name: &str) -> Result<CommandDefinition> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(CommanderError::CommandNotFound {
                name: name.to_string(),
            });
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| CommanderError::StoreParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Write a command, replacing any file with the same name.
    pub fn save(&self, command: &CommandDefinition) -> Result<PathBuf> {
        let path = self.path_for(&command.name)?;
        self.ensure_root()?;

        let content = serde_json::to_string_pretty(command).map_err(anyhow::Error::from)?;

        // Write to a sibling temp file first so a crash never leaves a
        // half-written command behind.
        let temp_path = self.root.join(format!(".{}.tmp", command.name));
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved command '{}' to {}", command.name, path.display());
        Ok(path)
    }

    /// Write a new command, refusing to overwrite an existing one.
    pub fn create(&self, command: &CommandDefinition) -> Result<PathBuf> {
        if self.exists(&command.name) {
            return Err(CommanderError::CommandExists {
                name: command.name.clone(),
            });
        }
        self.save(command)
    }

    /// Delete a command's file.
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(CommanderError::CommandNotFound {
                name: name.to_string(),
            });
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Rename a command, moving its file. The stored name is updated too.
    pub fn rename(&self, from: &str, to: &str) -> Result<CommandDefinition> {
        if from == to {
            return self.get(from);
        }
        validate_command_name(to)?;
        if self.exists(to) {
            return Err(CommanderError::CommandExists {
                name: to.to_string(),
            });
        }

        let from_path = self.path_for(from)?;
        let mut command = self.get(from)?;
        command.name = to.to_string();
        self.save(&command)?;
        fs::remove_file(from_path)?;
        Ok(command)
    }
}
