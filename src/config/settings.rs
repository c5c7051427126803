//! Runtime settings.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::bootstrap::{Installer, PackageManager};
use crate::runner::CompletionPolicy;
use crate::steps::ExecutionOptions;

/// Directory under the user's home that holds stored commands.
pub const BASE_FOLDER_NAME: &str = ".commander";

/// Branch used for checkout steps when none is given.
pub const DEFAULT_BRANCH: &str = "main";

/// Environment variable overriding the base directory.
pub const HOME_ENV: &str = "COMMANDER_HOME";

/// Environment variable overriding the default branch.
pub const DEFAULT_BRANCH_ENV: &str = "COMMANDER_DEFAULT_BRANCH";

/// Environment variable naming the package manager tried first.
pub const PACKAGE_MANAGER_ENV: &str = "COMMANDER_PACKAGE_MANAGER";

/// Environment variable naming the fallback package manager.
pub const FALLBACK_PACKAGE_MANAGER_ENV: &str = "COMMANDER_FALLBACK_PACKAGE_MANAGER";

/// Environment variable naming a directory that holds the package managers.
pub const PACKAGE_MANAGER_DIR_ENV: &str = "COMMANDER_PACKAGE_MANAGER_DIR";

/// Default base directory: `~/.commander`.
pub fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(BASE_FOLDER_NAME)
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding one JSON file per command.
    pub home: PathBuf,

    /// Branch for checkout steps without an answer.
    pub default_branch: String,

    /// When concurrent steps unblock their dependents.
    pub policy: CompletionPolicy,

    /// Package managers used by install steps.
    pub installer: Installer,

    /// Report what would run without running it.
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home: default_home(),
            default_branch: DEFAULT_BRANCH.to_string(),
            policy: CompletionPolicy::default(),
            installer: Installer::default(),
            dry_run: false,
        }
    }
}

impl Settings {
    /// Defaults overlaid with `COMMANDER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Unparsable values are
    /// ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(home) = lookup(HOME_ENV).filter(|v| !v.trim().is_empty()) {
            settings.home = PathBuf::from(home);
        }
        if let Some(branch) = lookup(DEFAULT_BRANCH_ENV).filter(|v| !v.trim().is_empty()) {
            settings.default_branch = branch.trim().to_string();
        }
        if let Some(manager) = parse_manager(&lookup, PACKAGE_MANAGER_ENV) {
            settings.installer.preferred = manager;
        }
        if let Some(manager) = parse_manager(&lookup, FALLBACK_PACKAGE_MANAGER_ENV) {
            settings.installer.fallback = manager;
        }
        if let Some(dir) = lookup(PACKAGE_MANAGER_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            settings.installer.tool_dir = Some(PathBuf::from(dir.trim()));
        }

        settings
    }

    /// Use a different base directory.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        if let Some(home) = home {
            self.home = home;
        }
        self
    }

    /// Options for the process runner, given branches resolved per step.
    pub fn execution_options(&self, branches: HashMap<String, String>) -> ExecutionOptions {
        ExecutionOptions {
            dry_run: self.dry_run,
            default_branch: self.default_branch.clone(),
            branches,
            installer: self.installer.clone(),
        }
    }
}

fn parse_manager<F>(lookup: &F, key: &str) -> Option<PackageManager>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key)?;
    match value.parse() {
        Ok(manager) => Some(manager),
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert!(settings.home.ends_with(BASE_FOLDER_NAME));
        assert_eq!(settings.default_branch, "main");
        assert_eq!(settings.policy, CompletionPolicy::OnDispatch);
        assert_eq!(settings.installer, Installer::default());
        assert!(!settings.dry_run);
    }

    #[test]
    fn environment_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (HOME_ENV, "/tmp/cmds"),
            (DEFAULT_BRANCH_ENV, "develop"),
            (PACKAGE_MANAGER_ENV, "pnpm"),
        ]));

        assert_eq!(settings.home, PathBuf::from("/tmp/cmds"));
        assert_eq!(settings.default_branch, "develop");
        assert_eq!(settings.installer.preferred, PackageManager::Pnpm);
        assert_eq!(settings.installer.fallback, PackageManager::Npm);
        assert_eq!(settings.installer.tool_dir, None);
    }

    #[test]
    fn manager_dir_from_environment() {
        let settings = Settings::from_lookup(lookup(&[(PACKAGE_MANAGER_DIR_ENV, "/opt/node/bin")]));
        assert_eq!(
            settings.installer.tool_dir,
            Some(PathBuf::from("/opt/node/bin"))
        );
        assert_eq!(
            settings.execution_options(HashMap::new()).installer.tool_dir,
            Some(PathBuf::from("/opt/node/bin"))
        );
    }

    #[test]
    fn bad_manager_is_ignored() {
        let settings = Settings::from_lookup(lookup(&[(FALLBACK_PACKAGE_MANAGER_ENV, "pip")]));
        assert_eq!(settings.installer.fallback, PackageManager::Npm);
    }

    #[test]
    fn explicit_home_wins() {
        let settings = Settings::default().with_home(Some(PathBuf::from("/srv/cmds")));
        assert_eq!(settings.home, PathBuf::from("/srv/cmds"));

        let unchanged = Settings::default().with_home(None);
        assert_eq!(unchanged.home, default_home());
    }

    #[test]
    fn execution_options_carry_settings() {
        let settings = Settings {
            dry_run: true,
            default_branch: "trunk".into(),
            ..Default::default()
        };
        let mut branches = HashMap::new();
        branches.insert("deploy".to_string(), "release".to_string());

        let options = settings.execution_options(branches);

        assert!(options.dry_run);
        assert_eq!(options.default_branch, "trunk");
        assert_eq!(options.branches["deploy"], "release");
    }
}
