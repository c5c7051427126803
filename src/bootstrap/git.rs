//! Branch checkout bootstrap.

use std::path::Path;

use crate::error::{CommanderError, Result};
use crate::shell::{execute, CommandOptions};

/// Commands run, in order, to bring a repository onto `branch`.
pub fn checkout_commands(branch: &str) -> Vec<String> {
    vec![
        "git fetch --all".to_string(),
        "git pull".to_string(),
        format!("git checkout {}", quote(branch)),
    ]
}

/// Refresh remotes, pull and check out `branch` in `cwd`.
///
/// Output goes straight to the user's terminal. The first failing command
/// aborts the sequence.
pub fn sync_branch(branch: &str, cwd: &Path) -> Result<()> {
    let branch = branch.trim();
    if branch.is_empty() || branch.starts_with('-') {
        return Err(CommanderError::InvalidName {
            name: branch.to_string(),
            reason: "not a usable branch name".to_string(),
        });
    }

    let options = CommandOptions {
        cwd: Some(cwd.to_path_buf()),
        ..Default::default()
    };

    for command in checkout_commands(branch) {
        tracing::debug!("Checkout bootstrap: {}", command);
        let result = execute(&command, &options)?;
        if !result.success {
            return Err(CommanderError::CommandFailed {
                command,
                code: result.exit_code,
            });
        }
    }

    Ok(())
}

/// Single-quote a value for POSIX shells.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn checkout_sequence_order() {
        let commands = checkout_commands("main");
        assert_eq!(
            commands,
            vec!["git fetch --all", "git pull", "git checkout 'main'"]
        );
    }

    #[test]
    fn branch_names_are_quoted() {
        let commands = checkout_commands("feat/it's; rm -rf x");
        assert_eq!(commands[2], r"git checkout 'feat/it'\''s; rm -rf x'");
    }

    #[test]
    fn rejects_option_like_branch() {
        let temp = TempDir::new().unwrap();
        let err = sync_branch("--force", temp.path()).unwrap_err();
        assert!(matches!(err, CommanderError::InvalidName { .. }));
    }

    #[test]
    fn rejects_empty_branch() {
        let temp = TempDir::new().unwrap();
        assert!(sync_branch("   ", temp.path()).is_err());
    }

    #[test]
    fn fails_outside_a_repository() {
        let temp = TempDir::new().unwrap();
        let err = sync_branch("main", temp.path()).unwrap_err();
        assert!(matches!(err, CommanderError::CommandFailed { .. }));
    }
}
