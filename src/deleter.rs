// Concurrent removal of selected target directories
use crate::domain::tree::{NodeId, PathTree};
use crate::event::AppEvent;
use std::fs;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// A directory queued for removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: NodeId,
    pub path: PathBuf,
    pub size: u64,
}

/// Result of one removal in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Directory is gone from disk
    Removed { id: NodeId, size: u64 },
    /// Removal failed; the directory may be partially removed
    Failed { id: NodeId, path: PathBuf, message: String },
    /// Dry run: nothing was touched
    Skipped { id: NodeId, size: u64 },
}

/// Summary of a finished batch, after it has been applied to the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub removed: usize,
    pub freed: u64,
    pub skipped: usize,
    pub would_free: u64,
    /// One `path: message` line per failed removal
    pub failures: Vec<String>,
}

/// Picks the visible nodes a deletion should remove.
///
/// Only selected, live target directories with a positive size qualify; intermediate
/// path segments are never removed even when selected.
pub fn collect_targets(tree: &PathTree, visible: &[NodeId]) -> Vec<DeleteTarget> {
    visible
        .iter()
        .map(|&id| (id, tree.node(id)))
        .filter(|(_, node)| node.is_deletable())
        .map(|(id, node)| DeleteTarget {
            id,
            path: node.path.clone(),
            size: node.size,
        })
        .collect()
}

/// Removes every target concurrently and waits for all of them.
///
/// Outcomes are returned in the same order as `targets`.
pub async fn delete_batch(targets: Vec<DeleteTarget>, dry_run: bool) -> Vec<DeleteOutcome> {
    if dry_run {
        return targets
            .into_iter()
            .map(|t| {
                info!(path = %t.path.display(), "dry run, not removing");
                DeleteOutcome::Skipped {
                    id: t.id,
                    size: t.size,
                }
            })
            .collect();
    }

    let handles: Vec<(DeleteTarget, JoinHandle<std::io::Result<()>>)> = targets
        .into_iter()
        .map(|target| {
            let path = target.path.clone();
            let handle = tokio::task::spawn_blocking(move || fs::remove_dir_all(&path));
            (target, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (target, handle) in handles {
        let result = match handle.await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(e) => Err(format!("removal task failed: {}", e)),
        };

        match result {
            Ok(()) => {
                info!(path = %target.path.display(), size = target.size, "removed");
                outcomes.push(DeleteOutcome::Removed {
                    id: target.id,
                    size: target.size,
                });
            }
            Err(message) => {
                warn!(path = %target.path.display(), "removal failed: {}", message);
                outcomes.push(DeleteOutcome::Failed {
                    id: target.id,
                    path: target.path,
                    message,
                });
            }
        }
    }
    outcomes
}

/// Runs a batch in the background and reports it as a single event.
pub fn spawn_batch(
    targets: Vec<DeleteTarget>,
    dry_run: bool,
    events: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    info!(count = targets.len(), dry_run, "deletion batch started");
    tokio::spawn(async move {
        let outcomes = delete_batch(targets, dry_run).await;
        let _ = events.send(AppEvent::DeletionComplete(outcomes));
    })
}

/// Writes batch outcomes back into the tree.
///
/// Removed nodes become deleted and unselected. Failed nodes stay selected and carry the
/// error so the user can retry.
pub fn apply_outcomes(tree: &mut PathTree, outcomes: &[DeleteOutcome]) -> BatchReport {
    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            DeleteOutcome::Removed { id, size } => {
                tree.mark_deleted(*id);
                report.removed += 1;
                report.freed += size;
            }
            DeleteOutcome::Failed { id, path, message } => {
                tree.mark_failed(*id, message.clone());
                report
                    .failures
                    .push(format!("{}: {}", path.display(), message));
            }
            DeleteOutcome::Skipped { size, .. } => {
                report.skipped += 1;
                report.would_free += size;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_file(path: &Path, bytes: usize) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; bytes]).unwrap();
    }

    /// Tree over a temp dir with `a/node_modules` (100) and `a/b/node_modules` (50).
    fn fixture() -> (TempDir, PathTree, Vec<NodeId>) {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("a/node_modules/x.js"), 100);
        write_file(&dir.path().join("a/b/node_modules/y.js"), 50);

        let mut tree = PathTree::new(dir.path());
        tree.insert_path(&dir.path().join("a/node_modules"), 100).unwrap();
        tree.insert_path(&dir.path().join("a/b/node_modules"), 50).unwrap();
        let visible = crate::domain::flatten::rebuild(&mut tree);
        (dir, tree, visible)
    }

    mod collect_tests {
        use super::*;

        #[test]
        fn test_collect_only_selected_targets() {
            let (dir, mut tree, visible) = fixture();
            let a = tree.find(&dir.path().join("a")).unwrap();
            tree.toggle_select(a);

            let targets = collect_targets(&tree, &visible);
            let paths: Vec<PathBuf> = targets.iter().map(|t| t.path.clone()).collect();
            assert_eq!(
                paths,
                vec![
                    dir.path().join("a/node_modules"),
                    dir.path().join("a/b/node_modules"),
                ]
            );
        }

        #[test]
        fn test_collect_skips_deleted_and_unselected() {
            let (dir, mut tree, visible) = fixture();
            let nm = tree.find(&dir.path().join("a/node_modules")).unwrap();
            tree.toggle_select(nm);
            tree.mark_deleted(nm);

            assert!(collect_targets(&tree, &visible).is_empty());
        }

        #[test]
        fn test_collect_skips_zero_size_targets() {
            let mut tree = PathTree::new("/work");
            tree.insert_path(Path::new("/work/empty/node_modules"), 0).unwrap();
            let visible = crate::domain::flatten::rebuild(&mut tree);
            tree.toggle_select_all(&visible);

            assert!(collect_targets(&tree, &visible).is_empty());
        }
    }

    mod batch_tests {
        use super::*;

        #[tokio::test]
        async fn test_delete_batch_removes_only_targets() {
            let (dir, mut tree, visible) = fixture();
            let a = tree.find(&dir.path().join("a")).unwrap();
            tree.toggle_select(a);

            let targets = collect_targets(&tree, &visible);
            let outcomes = delete_batch(targets, false).await;
            let report = apply_outcomes(&mut tree, &outcomes);

            assert_eq!(report.removed, 2);
            assert_eq!(report.freed, 150);
            assert!(report.failures.is_empty());

            assert!(!dir.path().join("a/node_modules").exists());
            assert!(!dir.path().join("a/b/node_modules").exists());
            assert!(dir.path().join("a/b").exists());

            let nm = tree.find(&dir.path().join("a/node_modules")).unwrap();
            assert!(tree.node(nm).deleted);
            assert!(!tree.node(nm).selected);
            assert!(!tree.node(a).deleted);
            assert!(!tree.node(a).selected);
        }

        #[tokio::test]
        async fn test_failed_removal_keeps_node_selected() {
            let (dir, mut tree, _) = fixture();
            let nm = tree.find(&dir.path().join("a/node_modules")).unwrap();
            tree.toggle_select(nm);

            let outcomes = delete_batch(
                vec![DeleteTarget {
                    id: nm,
                    path: dir.path().join("does-not-exist"),
                    size: 100,
                }],
                false,
            )
            .await;
            let report = apply_outcomes(&mut tree, &outcomes);

            assert_eq!(report.removed, 0);
            assert_eq!(report.failures.len(), 1);
            let node = tree.node(nm);
            assert!(!node.deleted);
            assert!(node.selected);
            assert!(node.last_error.is_some());
        }

        #[tokio::test]
        async fn test_dry_run_touches_nothing() {
            let (dir, mut tree, visible) = fixture();
            let a = tree.find(&dir.path().join("a")).unwrap();
            tree.toggle_select(a);

            let outcomes = delete_batch(collect_targets(&tree, &visible), true).await;
            let report = apply_outcomes(&mut tree, &outcomes);

            assert_eq!(report.skipped, 2);
            assert_eq!(report.would_free, 150);
            assert!(dir.path().join("a/node_modules").exists());
            assert!(tree.iter().all(|(_, node)| !node.deleted));
        }

        #[tokio::test]
        async fn test_spawn_batch_sends_single_completion() {
            let (dir, mut tree, visible) = fixture();
            let a = tree.find(&dir.path().join("a")).unwrap();
            tree.toggle_select(a);

            let (tx, mut rx) = mpsc::unbounded_channel();
            spawn_batch(collect_targets(&tree, &visible), false, tx)
                .await
                .unwrap();

            match rx.recv().await {
                Some(AppEvent::DeletionComplete(outcomes)) => assert_eq!(outcomes.len(), 2),
                other => panic!("Expected DeletionComplete, got {:?}", other),
            }
            assert!(rx.recv().await.is_none());
        }
    }
}
