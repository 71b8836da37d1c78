//! Messages delivered to the UI loop by background work

use crate::deleter::DeleteOutcome;
use std::path::PathBuf;

/// Events are consumed one at a time, in arrival order, by the loop that owns the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A target directory was found and fully measured
    Found { path: PathBuf, size: u64 },
    /// The walk finished; sent exactly once per scan
    ScanDone,
    /// Every removal in a deletion batch has finished
    DeletionComplete(Vec<DeleteOutcome>),
}
