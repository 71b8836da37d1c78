// Background discovery of target directories
use crate::event::AppEvent;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, trace};
use walkdir::WalkDir;

/// Options for a scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory the walk starts from
    pub root: PathBuf,
    /// Exact directory name to look for
    pub target: String,
    /// Targets smaller than this many bytes are not reported
    pub min_size: Option<u64>,
}

/// Handle to a running scan
pub struct ScanHandle {
    cancel: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ScanHandle {
    /// Asks the walk and any pending measurements to stop early
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Waits for the scan task to exit
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("scan task failed: {}", e);
        }
    }
}

/// Starts a scan on the current tokio runtime.
///
/// The walk runs on the blocking pool and each match is measured as its own blocking
/// task. `Found` events are sent as measurements complete, followed by a single
/// `ScanDone`.
pub fn spawn_scan(options: ScanOptions, events: mpsc::UnboundedSender<AppEvent>) -> ScanHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let task = tokio::spawn(run_scan(options, events, Arc::clone(&cancel)));
    ScanHandle { cancel, task }
}

async fn run_scan(
    options: ScanOptions,
    events: mpsc::UnboundedSender<AppEvent>,
    cancel: Arc<AtomicBool>,
) {
    info!(root = %options.root.display(), target = %options.target, "scan started");

    let (found_tx, mut found_rx) = mpsc::unbounded_channel::<PathBuf>();
    let walker = {
        let root = options.root.clone();
        let target = options.target.clone();
        let cancel = Arc::clone(&cancel);
        tokio::task::spawn_blocking(move || {
            walk_targets(&root, &target, &cancel, |path| found_tx.send(path).is_ok())
        })
    };

    let mut sizing: JoinSet<(PathBuf, u64)> = JoinSet::new();
    let mut walking = true;
    let mut reported = 0usize;

    loop {
        tokio::select! {
            found = found_rx.recv(), if walking => match found {
                Some(path) => {
                    sizing.spawn_blocking(move || {
                        let size = dir_size(&path);
                        (path, size)
                    });
                }
                None => walking = false,
            },
            Some(measured) = sizing.join_next(), if !sizing.is_empty() => {
                let (path, size) = match measured {
                    Ok(measured) => measured,
                    Err(e) => {
                        error!("size computation failed: {}", e);
                        continue;
                    }
                };
                if cancel.load(Ordering::Relaxed) {
                    continue;
                }
                if options.min_size.is_some_and(|min| size < min) {
                    debug!(path = %path.display(), size, "target below minimum size, skipped");
                    continue;
                }
                debug!(path = %path.display(), size, "target found");
                if events.send(AppEvent::Found { path, size }).is_err() {
                    cancel.store(true, Ordering::Relaxed);
                    continue;
                }
                reported += 1;
            }
            else => break,
        }
    }

    match walker.await {
        Ok(matched) => info!(matched, reported, "scan finished"),
        Err(e) => error!("directory walk failed: {}", e),
    }

    let _ = events.send(AppEvent::ScanDone);
}

/// Walks `root` and hands every directory named `target` to `emit`.
///
/// Matches are not descended into. The root itself is never a match. Unreadable entries
/// are skipped. Returns the number of matches handed out; stops early when `cancel` is
/// set or `emit` returns false.
pub fn walk_targets<F>(root: &Path, target: &str, cancel: &AtomicBool, mut emit: F) -> usize
where
    F: FnMut(PathBuf) -> bool,
{
    let target = OsStr::new(target);
    let mut matched = 0;
    let mut entries = WalkDir::new(root).min_depth(1).follow_links(false).into_iter();

    while let Some(entry) = entries.next() {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                trace!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_dir() && entry.file_name() == target {
            entries.skip_current_dir();
            matched += 1;
            if !emit(entry.into_path()) {
                break;
            }
        }
    }

    matched
}

/// Total bytes of all regular files below `path`. Entries that cannot be read count as 0.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}
