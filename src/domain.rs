pub mod flatten;
pub mod tree;

use crate::deleter::{self, BatchReport, DeleteTarget};
use crate::event::AppEvent;
use crate::tui::format_file_size;
use std::path::PathBuf;
use tracing::warn;
use tree::{NodeId, PathTree};

/// Aggregate numbers shown under the tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Rows in the flattened list
    pub visible: usize,
    /// Visible targets a deletion would remove
    pub selected_count: usize,
    pub selected_size: u64,
    /// Every live target in the tree
    pub total_size: u64,
    /// Bytes removed so far in this session
    pub freed_size: u64,
}

/// Message shown in the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

/// The single-owner model mutated by the UI loop.
///
/// Background work never touches this directly; it sends [`AppEvent`]s which are applied
/// here one at a time.
#[derive(Debug)]
pub struct AppState {
    pub tree: PathTree,
    pub visible: Vec<NodeId>,
    pub cursor: usize,
    pub target_name: String,
    pub scanning: bool,
    pub deleting: bool,
    pub freed: u64,
    pub status: Option<StatusMessage>,
}

impl AppState {
    pub fn new(root: impl Into<PathBuf>, target_name: impl Into<String>) -> Self {
        Self {
            tree: PathTree::new(root),
            visible: Vec::new(),
            cursor: 0,
            target_name: target_name.into(),
            scanning: true,
            deleting: false,
            freed: 0,
            status: None,
        }
    }

    /// Applies an event from the scanner or deleter
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Found { path, size } => match self.tree.insert_path(&path, size) {
                Ok(_) => self.rebuild(),
                Err(e) => warn!("dropping discovery: {}", e),
            },
            AppEvent::ScanDone => {
                self.scanning = false;
                self.rebuild();
            }
            AppEvent::DeletionComplete(outcomes) => {
                let report = deleter::apply_outcomes(&mut self.tree, &outcomes);
                self.deleting = false;
                self.freed += report.freed;
                self.status = Some(status_for(&report));
                self.rebuild();
            }
        }
    }

    /// Re-flattens the tree and keeps the cursor in range
    pub fn rebuild(&mut self) {
        self.visible = flatten::rebuild(&mut self.tree);
        self.cursor = flatten::clamp_cursor(self.cursor, self.visible.len());
    }

    pub fn current(&self) -> Option<NodeId> {
        self.visible.get(self.cursor).copied()
    }

    /// Moves the cursor down one row
    pub fn next(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor up one row
    pub fn previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn toggle_select_current(&mut self) {
        if let Some(id) = self.current() {
            self.tree.toggle_select(id);
        }
    }

    pub fn toggle_expand_current(&mut self) {
        if let Some(id) = self.current() {
            if self.tree.toggle_expanded(id) {
                self.rebuild();
            }
        }
    }

    pub fn toggle_select_all(&mut self) {
        self.tree.toggle_select_all(&self.visible);
    }

    /// Targets the next deletion would remove
    pub fn pending_deletion(&self) -> Vec<DeleteTarget> {
        deleter::collect_targets(&self.tree, &self.visible)
    }

    /// Starts a deletion if none is running and something is selected.
    ///
    /// Returns the batch for the caller to hand to the deleter.
    pub fn begin_deletion(&mut self) -> Option<Vec<DeleteTarget>> {
        if self.deleting {
            return None;
        }
        let targets = self.pending_deletion();
        if targets.is_empty() {
            return None;
        }
        self.deleting = true;
        self.status = Some(StatusMessage::Info(format!(
            "Deleting {} director{}...",
            targets.len(),
            if targets.len() == 1 { "y" } else { "ies" }
        )));
        Some(targets)
    }

    pub fn statistics(&self) -> Statistics {
        let (selected_count, selected_size) = self
            .visible
            .iter()
            .map(|&id| self.tree.node(id))
            .filter(|node| node.is_deletable())
            .fold((0, 0), |(count, size), node| (count + 1, size + node.size));

        Statistics {
            visible: self.visible.len(),
            selected_count,
            selected_size,
            total_size: self.tree.live_target_size(),
            freed_size: self.freed,
        }
    }
}

fn status_for(report: &BatchReport) -> StatusMessage {
    if let Some(first) = report.failures.first() {
        let more = report.failures.len() - 1;
        let suffix = if more > 0 {
            format!(" (+{} more)", more)
        } else {
            String::new()
        };
        return StatusMessage::Error(format!(
            "Removed {}, failed {}: {}{}",
            report.removed,
            report.failures.len(),
            first,
            suffix
        ));
    }
    if report.skipped > 0 {
        return StatusMessage::Info(format!(
            "[DRY RUN] Would free {} from {} directories",
            format_file_size(report.would_free),
            report.skipped
        ));
    }
    StatusMessage::Info(format!(
        "Freed {} from {} directories",
        format_file_size(report.freed),
        report.removed
    ))
}
