//! Actions that prepare a step's working directory before its instruction.
//!
//! - [`git`] - fetch, pull and check out a branch
//! - [`packages`] - install dependencies with a preferred package manager,
//!   falling back to a default one

pub mod git;
pub mod packages;

pub use git::{checkout_commands, sync_branch};
pub use packages::{Installer, PackageManager};
