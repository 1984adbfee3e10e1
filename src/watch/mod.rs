// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling `watch` / `exclude` glob patterns per task.
//! - Walking the project to find a task's source files.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Content hashing so that touching a file without changing it does not
//!   rebuild.
//!
//! It does **not** run builds; it only turns filesystem changes into
//! task-level triggers for the engine.

pub mod cache;
pub mod event_handler;
pub mod hash;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use event_handler::WatchContext;
pub use patterns::{
    build_profiles_from_config, build_task_watch_profile, collect_matching_files,
    TaskWatchProfile,
};
pub use watcher::{spawn_watcher, WatcherHandle};
