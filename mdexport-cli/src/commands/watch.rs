//! Development-mode watcher: re-export source documents as they change.

use anyhow::Result;
use mdexport_core::config::WatchConfig;
use mdexport_core::watch::{is_watched_path, Debouncer};
use mdexport_core::MarkdownExporter;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tokio::time;

/// Give up waiting for a file to settle after this long and export anyway
const MAX_STABILITY_WAIT: Duration = Duration::from_secs(5);

/// Watch every existing version source directory until Ctrl+C.
///
/// notify reports no events for files that already exist, so only changes
/// made after startup are exported.
pub async fn watch_and_export(
    exporter: Arc<MarkdownExporter>,
    out_root: PathBuf,
    settings: WatchConfig,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    ) {
        Ok(watcher) => watcher,
        Err(err) => {
            tracing::warn!("File watcher unavailable, file watching disabled: {}", err);
            return Ok(());
        }
    };

    let dirs = exporter
        .versions()
        .iter()
        .map(|v| v.source_dir.as_path())
        .filter(|dir| dir.is_dir());
    let watched = watch_dirs(&mut watcher, dirs);
    if watched == 0 {
        tracing::warn!("No version directories could be watched, file watching disabled");
        return Ok(());
    }

    tracing::info!("File watcher started for dev mode ({} directories)", watched);
    println!("Watching for changes (Ctrl+C to stop)...");

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<PathBuf>();
    let mut debouncer = Debouncer::new(settings.debounce());
    loop {
        let deadline = debouncer.next_deadline();
        tokio::select! {
            event = rx.recv() => match event {
                Some(Ok(ev)) if triggers_export(&ev.kind) => {
                    for path in ev.paths {
                        let relevant = exporter
                            .versions()
                            .version_for_path(&path)
                            .is_some_and(|v| is_watched_path(&v.source_dir, &path));
                        if relevant {
                            tracing::debug!("{:?} {:?}", ev.kind, path);
                            debouncer.touch(path, std::time::Instant::now());
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => tracing::warn!("Watcher error: {}", err),
                None => break,
            },
            _ = sleep_until(deadline) => {
                for path in debouncer.take_due(std::time::Instant::now()) {
                    spawn_export(
                        Arc::clone(&exporter),
                        path,
                        out_root.clone(),
                        settings,
                        done_tx.clone(),
                    );
                }
            }
            Some(path) = done_rx.recv() => debouncer.finish(&path),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping file watcher");
                break;
            }
        }
    }

    Ok(())
}

/// Register each directory recursively and return how many succeeded.
///
/// inotify watch limits surface here rather than in `RecommendedWatcher::new`,
/// so a failure only disables watching for that directory.
fn watch_dirs<'a, W: Watcher>(
    watcher: &mut W,
    dirs: impl IntoIterator<Item = &'a Path>,
) -> usize {
    let mut watched = 0;
    for dir in dirs {
        match watcher.watch(dir, RecursiveMode::Recursive) {
            Ok(()) => watched += 1,
            Err(err) => tracing::warn!(
                "Cannot watch {:?}, file watching disabled for it: {}",
                dir,
                err
            ),
        }
    }
    watched
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn spawn_export(
    exporter: Arc<MarkdownExporter>,
    path: PathBuf,
    out_root: PathBuf,
    settings: WatchConfig,
    done: mpsc::UnboundedSender<PathBuf>,
) {
    tokio::spawn(async move {
        wait_for_stable_file(&path, settings.stability(), settings.poll()).await;

        let res = tokio::task::spawn_blocking({
            let exporter = Arc::clone(&exporter);
            let path = path.clone();
            move || exporter.export_file(&path, &out_root)
        })
        .await;

        match res {
            Ok(Ok(true)) => {
                let rel = path.strip_prefix(exporter.site_dir()).unwrap_or(&path);
                tracing::info!("Updated: {}", rel.display());
            }
            Ok(Ok(false)) => tracing::debug!("Ignored change to {:?}", path),
            Ok(Err(e)) => tracing::error!("Error processing {:?}: {}", path, e),
            Err(e) => tracing::error!("Export task panicked: {}", e),
        }
        let _ = done.send(path);
    });
}

/// Wait until the file's size and mtime stop changing for `threshold`
async fn wait_for_stable_file(path: &Path, threshold: Duration, poll: Duration) {
    let started = time::Instant::now();
    let mut last = file_signature(path);
    let mut stable_since = time::Instant::now();

    while started.elapsed() < MAX_STABILITY_WAIT {
        time::sleep(poll).await;
        let current = file_signature(path);
        if current != last {
            last = current;
            stable_since = time::Instant::now();
        } else if stable_since.elapsed() >= threshold {
            return;
        }
    }
    tracing::debug!("{:?} still changing, exporting anyway", path);
}

fn file_signature(path: &Path) -> Option<(u64, Option<SystemTime>)> {
    std::fs::metadata(path)
        .ok()
        .map(|meta| (meta.len(), meta.modified().ok()))
}

/// Additions and content changes re-export; removals and access do not
fn triggers_export(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};

    #[test]
    fn test_triggers_export() {
        assert!(triggers_export(&EventKind::Create(CreateKind::File)));
        assert!(triggers_export(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        ))));
        assert!(!triggers_export(&EventKind::Remove(RemoveKind::File)));
        assert!(!triggers_export(&EventKind::Access(AccessKind::Any)));
    }

    #[test]
    fn test_watch_failure_skips_directory() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        let missing = dir.path().join("versioned_docs/version-v1");

        let mut watcher = RecommendedWatcher::new(
            |_res: notify::Result<notify::Event>| {},
            notify::Config::default(),
        )
        .unwrap();
        let watched = watch_dirs(&mut watcher, [missing.as_path(), docs.as_path()]);
        assert_eq!(watched, 1);
    }

    #[tokio::test]
    async fn test_stable_file_returns_quickly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "content").unwrap();

        let started = time::Instant::now();
        wait_for_stable_file(&path, Duration::from_millis(20), Duration::from_millis(5)).await;
        assert!(started.elapsed() < MAX_STABILITY_WAIT);
    }
}
