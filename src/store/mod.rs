//! Persistent command storage.

pub mod commands;

pub use commands::CommandStore;
