//! Platform-specific shell detection.

use std::path::{Path, PathBuf};

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    Sh,
    PowerShell,
    Cmd,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            "sh" | "dash" => ShellType::Sh,
            "powershell" | "pwsh" => ShellType::PowerShell,
            "cmd" => ShellType::Cmd,
            _ => ShellType::Unknown,
        }
    }

    /// Flag that makes the shell run a single command string.
    ///
    /// Instructions are written in the syntax of the user's `$SHELL`, not
    /// `/bin/sh`. Bash, zsh and fish get a login flag, so every step sources
    /// the user's login profile (and anything it prints) before it runs; this
    /// is what puts version-managed `yarn`/`npm` (nvm, volta, mise) on PATH.
    /// Job control is left off: concurrent steps share the terminal.
    pub fn command_flag(&self) -> &'static str {
        match self {
            ShellType::Bash | ShellType::Zsh | ShellType::Fish => "-lc",
            ShellType::Sh | ShellType::Unknown => "-c",
            ShellType::PowerShell => "-Command",
            ShellType::Cmd => "/C",
        }
    }
}

/// Resolve the shell executable used to run step instructions.
pub fn shell_executable() -> PathBuf {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cmd.exe"))
    } else {
        std::env::var("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/bin/sh"))
    }
}

/// Variables set by common CI providers.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    is_ci_with(|key| std::env::var_os(key).is_some())
}

/// [`is_ci`] against an arbitrary variable lookup.
pub fn is_ci_with<F>(is_set: F) -> bool
where
    F: Fn(&str) -> bool,
{
    CI_VARS.iter().any(|key| is_set(*key))
}
