//! Depsweep - find dependency-cache directories and reclaim their disk space
//!
//! This crate provides the core of the depsweep tool: a path tree with tri-state
//! selection, the flattened view used for navigation, and the background scanner and
//! deleter that feed it.

pub mod cli;
pub mod config;
pub mod deleter;
pub mod domain;
pub mod error;
pub mod event;
pub mod logging;
pub mod scanner;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use deleter::{BatchReport, DeleteOutcome, DeleteTarget};
pub use domain::tree::{NodeId, PathTree, TreeNode};
pub use domain::{AppState, Statistics, StatusMessage};
pub use error::{Result, SweepError};
pub use event::AppEvent;
pub use scanner::{spawn_scan, ScanHandle, ScanOptions};
