//! Runtime configuration.
//!
//! Settings come from defaults, `COMMANDER_*` environment variables and
//! command-line flags, in increasing priority. Stored commands live in
//! [`default_home`] unless `--home` or `COMMANDER_HOME` says otherwise.

pub mod settings;

pub use settings::{
    default_home, Settings, BASE_FOLDER_NAME, DEFAULT_BRANCH, DEFAULT_BRANCH_ENV,
    FALLBACK_PACKAGE_MANAGER_ENV, HOME_ENV, PACKAGE_MANAGER_ENV,
};
