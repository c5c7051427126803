//! Prompt-driven directory browser.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ui::{Prompt, PromptOption, UserInterface};

/// Prompt key for the directory choice.
pub const BROWSE_DIRECTORY_KEY: &str = "browse_directory";

/// Prompt key for the "keep browsing" confirmation.
pub const BROWSE_CONTINUE_KEY: &str = "browse_continue";

/// Visible subdirectories of `dir`, sorted by name.
pub fn subdirectories(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Walk the tree from `start` until the user stops, returning the directory
/// they ended in.
///
/// Each round offers `..`, `.` and the subdirectories of the current
/// directory. A choice that is not a directory sends the user back to
/// `start`.
pub fn find_path(ui: &mut dyn UserInterface, start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let directories = match subdirectories(&current) {
            Ok(dirs) => dirs,
            Err(e) => {
                ui.warning(&format!("Cannot read {}: {}", current.display(), e));
                current = start.to_path_buf();
                subdirectories(&current)?
            }
        };

        let mut options = vec![
            PromptOption::new(".. (parent directory)", ".."),
            PromptOption::new(". (this directory)", "."),
        ];
        options.extend(directories.into_iter().map(PromptOption::plain));

        let choice = ui
            .prompt(
                &Prompt::select(
                    BROWSE_DIRECTORY_KEY,
                    format!("Select a directory ({})", current.display()),
                    options,
                )
                .with_default("."),
            )?
            .as_string();

        let next = match choice.as_str() {
            ".." => current.parent().map(Path::to_path_buf).unwrap_or(current.clone()),
            "." | "" => current.clone(),
            name => current.join(name),
        };

        if !next.is_dir() {
            ui.warning("Selected path is not a directory");
            current = start.to_path_buf();
            continue;
        }
        current = next;

        let keep_browsing = ui
            .prompt(
                &Prompt::confirm(
                    BROWSE_CONTINUE_KEY,
                    format!("Keep browsing from {}?", current.display()),
                )
                .with_default("false"),
            )?
            .as_bool();

        if !keep_browsing {
            break;
        }
    }

    tracing::debug!("Browser settled on {}", current.display());
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("projects/api")).unwrap();
        fs::create_dir_all(temp.path().join("notes")).unwrap();
        fs::write(temp.path().join("file.txt"), "x").unwrap();
        temp
    }

    #[test]
    fn lists_only_directories_sorted() {
        let temp = tree();
        assert_eq!(subdirectories(temp.path()).unwrap(), vec!["notes", "projects"]);
    }

    #[test]
    fn descends_until_user_stops() {
        let temp = tree();
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(BROWSE_DIRECTORY_KEY, vec!["projects", "api"]);
        ui.queue_prompt_responses(BROWSE_CONTINUE_KEY, vec!["true", "false"]);

        let path = find_path(&mut ui, temp.path()).unwrap();

        assert_eq!(path, temp.path().join("projects").join("api"));
    }

    #[test]
    fn dot_stays_put() {
        let temp = tree();
        let mut ui = MockUI::new();
        ui.set_prompt_response(BROWSE_DIRECTORY_KEY, ".");
        ui.set_prompt_response(BROWSE_CONTINUE_KEY, "false");

        assert_eq!(find_path(&mut ui, temp.path()).unwrap(), temp.path());
    }

    #[test]
    fn parent_moves_up() {
        let temp = tree();
        let start = temp.path().join("projects");
        let mut ui = MockUI::new();
        ui.set_prompt_response(BROWSE_DIRECTORY_KEY, "..");
        ui.set_prompt_response(BROWSE_CONTINUE_KEY, "no");

        assert_eq!(find_path(&mut ui, &start).unwrap(), temp.path());
    }

    #[test]
    fn non_directory_resets_to_start() {
        let temp = tree();
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(BROWSE_DIRECTORY_KEY, vec!["file.txt", "notes"]);
        ui.set_prompt_response(BROWSE_CONTINUE_KEY, "false");

        let path = find_path(&mut ui, temp.path()).unwrap();

        assert_eq!(path, temp.path().join("notes"));
        assert!(ui.has_warning("not a directory"));
    }
}
