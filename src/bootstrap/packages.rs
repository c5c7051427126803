//! Dependency installation bootstrap.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{CommanderError, Result};
use crate::shell::{execute, execute_check, CommandOptions};

/// JavaScript package managers that can install a project's dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Yarn,
    Npm,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Command that installs a project's dependencies.
    pub fn install_command(&self) -> String {
        format!("{} install", self.program())
    }

}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yarn" => Ok(Self::Yarn),
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "bun" => Ok(Self::Bun),
            _ => Err(format!("unknown package manager: {}", s)),
        }
    }
}

/// Installs dependencies with a preferred manager, falling back to a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installer {
    /// Tried first, if it is installed.
    pub preferred: PackageManager,
    /// Used when the preferred manager is missing or its install fails.
    pub fallback: PackageManager,
    /// Directory holding the manager executables. `None` resolves them
    /// through the shell's PATH.
    pub tool_dir: Option<PathBuf>,
}

impl Default for Installer {
    fn default() -> Self {
        Self {
            preferred: PackageManager::Yarn,
            fallback: PackageManager::Npm,
            tool_dir: None,
        }
    }
}

impl Installer {
    /// Create an installer with explicit managers.
    pub fn new(preferred: PackageManager, fallback: PackageManager) -> Self {
        Self {
            preferred,
            fallback,
            tool_dir: None,
        }
    }

    /// Run the managers from `dir` instead of looking them up on PATH.
    pub fn with_tool_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tool_dir = Some(dir.into());
        self
    }

    /// Install dependencies in `cwd`, returning the manager that succeeded.
    pub fn install(&self, cwd: &Path) -> Result<PackageManager> {
        if self.preferred != self.fallback {
            if self.is_available(self.preferred, cwd) {
                if self.run_install(self.preferred, cwd)? {
                    return Ok(self.preferred);
                }
                tracing::warn!(
                    "{} failed in {}, falling back to {}",
                    self.preferred.install_command(),
                    cwd.display(),
                    self.fallback
                );
            } else {
                tracing::debug!(
                    "{} not available, falling back to {}",
                    self.preferred,
                    self.fallback
                );
            }
        }

        if self.run_install(self.fallback, cwd)? {
            Ok(self.fallback)
        } else {
            Err(CommanderError::CommandFailed {
                command: self.fallback.install_command(),
                code: None,
            })
        }
    }

    fn program(&self, manager: PackageManager) -> String {
        match &self.tool_dir {
            Some(dir) => {
                let path = dir.join(manager.program()).display().to_string();
                format!("'{}'", path.replace('\'', r"'\''"))
            }
            None => manager.program().to_string(),
        }
    }

    /// Shell line that installs with `manager`.
    pub fn install_line(&self, manager: PackageManager) -> String {
        format!("{} install", self.program(manager))
    }

    fn is_available(&self, manager: PackageManager, cwd: &Path) -> bool {
        execute_check(&format!("{} --version", self.program(manager)), Some(cwd))
    }

    fn run_install(&self, manager: PackageManager, cwd: &Path) -> Result<bool> {
        let options = CommandOptions {
            cwd: Some(cwd.to_path_buf()),
            ..Default::default()
        };

        match execute(&self.install_line(manager), &options) {
            Ok(result) => Ok(result.success),
            // Spawn failures in an existing directory mean the shell itself is
            // unusable; report them instead of treating them as a missing tool.
            Err(e) if cwd.is_dir() => Err(e),
            Err(_) => Ok(false),
        }
    }
}
