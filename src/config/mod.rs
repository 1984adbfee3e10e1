// src/config/mod.rs

//! Configuration loading and validation for build-tool.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, falling back to defaults (`loader.rs`).
//! - Validate suffix, globs and browser targets (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    BuildSection, ConfigFile, ConfigSection, RawConfigFile, TaskConfig, DEFAULT_SCRIPT_WATCH,
    DEFAULT_STYLE_WATCH, MINIFIED_SCRIPT_EXCLUDE,
};
