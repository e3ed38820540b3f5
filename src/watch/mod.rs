use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Events emitted by the file watcher
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// One or more paths changed; the dashboard should refresh
    Changed(Vec<PathBuf>),
}

/// A debounced, recursive watcher over a git working tree
pub struct FileWatcher {
    _watcher: notify_debouncer_mini::Debouncer<RecommendedWatcher>,
}

impl FileWatcher {
    /// Start watching `root`. Batches of changes are sent on `tx` once
    /// `debounce_ms` has passed without further events.
    pub fn new(root: &Path, debounce_ms: u64, tx: mpsc::Sender<WatchEvent>) -> Result<Self> {
        let mut debouncer = new_debouncer(
            Duration::from_millis(debounce_ms),
            move |result: std::result::Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    let paths: Vec<PathBuf> = events
                        .into_iter()
                        .filter(|e| e.kind == DebouncedEventKind::Any)
                        .map(|e| e.path)
                        .filter(|p| is_relevant(p))
                        .collect();
                    if !paths.is_empty() && tx.send(WatchEvent::Changed(paths)).is_err() {
                        tracing::debug!("event loop gone, dropping watch event");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "file watcher error"),
            },
        )
        .context("Failed to create file watcher")?;

        debouncer
            .watcher()
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;

        tracing::info!(root = %root.display(), debounce_ms, "watching for changes");
        Ok(FileWatcher {
            _watcher: debouncer,
        })
    }
}

/// Working tree paths always count. Inside `.git/` only the index, HEAD and
/// refs do; objects, logs and lock files are noise.
pub fn is_relevant(path: &Path) -> bool {
    let components: Vec<Component> = path.components().collect();
    let Some(git_pos) = components
        .iter()
        .position(|c| c.as_os_str() == ".git")
    else {
        return true;
    };

    match components.get(git_pos + 1).map(|c| c.as_os_str()) {
        Some(name) if name == "refs" => true,
        Some(name) if name == "index" || name == "HEAD" => components.len() == git_pos + 2,
        _ => false,
    }
}
