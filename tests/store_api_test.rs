//! Integration tests for the command store public API.

use commander::steps::{CommandDefinition, Step};
use commander::store::CommandStore;
use commander::CommanderError;
use std::fs;
use tempfile::TempDir;

#[test]
fn create_list_rename_remove() {
    let temp = TempDir::new().unwrap();
    let store = CommandStore::new(temp.path().join(".commander"));

    let command = CommandDefinition::with_steps(
        "deploy",
        vec![
            Step::new("build", "make", "/srv"),
            Step::new("ship", "make ship", "/srv").depends_on(["build"]),
        ],
    );
    let path = store.create(&command).unwrap();
    assert_eq!(path, temp.path().join(".commander").join("deploy"));

    let listed = store.list().unwrap();
    assert_eq!(listed, vec![command.clone()]);

    let renamed = store.rename("deploy", "release").unwrap();
    assert_eq!(renamed.name, "release");
    assert_eq!(store.names().unwrap(), vec!["release"]);

    store.remove("release").unwrap();
    assert!(store.names().unwrap().is_empty());
}

#[test]
fn files_use_original_json_layout() {
    let temp = TempDir::new().unwrap();
    let store = CommandStore::new(temp.path());
    store
        .create(&CommandDefinition::with_steps(
            "deploy",
            vec![Step::new("build", "make", "/srv").with_checkout()],
        ))
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("deploy")).unwrap()).unwrap();
    let step = &raw["steps"][0];
    assert_eq!(step["path"], "/srv");
    assert_eq!(step["checkOutBranch"], true);
    assert_eq!(step["runNpmInstall"], false);
}

#[test]
fn unreadable_file_is_skipped_by_list() {
    let temp = TempDir::new().unwrap();
    let store = CommandStore::new(temp.path());
    store.create(&CommandDefinition::new("good")).unwrap();
    fs::write(temp.path().join("bad"), "not json").unwrap();

    let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["good"]);

    let err = store.get("bad").unwrap_err();
    assert!(matches!(err, CommanderError::StoreParseError { .. }));
}
