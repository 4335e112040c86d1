//! Building blocks for the development-mode file watcher.
//!
//! The event loop itself lives in the CLI; these types hold the parts that
//! decide what to react to and when.

use crate::walker::{has_document_extension, RESERVED_PREFIX};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Directory names whose contents never trigger an export
pub const IGNORED_DIRS: [&str; 1] = ["node_modules"];

/// Decide whether a changed path under `source_dir` is a source document
/// worth re-exporting.
///
/// Only components below `source_dir` are checked, so a reserved prefix on
/// an ancestor of the site does not hide every event.
pub fn is_watched_path(source_dir: &Path, path: &Path) -> bool {
    if !has_document_extension(path) {
        return false;
    }
    let Ok(rel) = path.strip_prefix(source_dir) else {
        return false;
    };
    !rel.components().any(|c| match c {
        Component::Normal(part) => part
            .to_str()
            .map(|s| s.starts_with(RESERVED_PREFIX) || IGNORED_DIRS.contains(&s))
            .unwrap_or(false),
        _ => false,
    })
}

/// Coalesces bursts of events per path.
///
/// Every event pushes the path's deadline to `now + window`; a path becomes
/// due once its deadline passes without further events. A due path stays
/// in flight until [`Debouncer::finish`]; if it comes due again meanwhile it
/// is re-armed instead of returned, so one path never has two exports
/// running at once.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: HashMap<PathBuf, Instant>,
    in_flight: HashSet<PathBuf>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn touch(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path, now + self.window);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Remove and return the due paths that are not already being exported,
    /// sorted. Returned paths are marked in flight.
    pub fn take_due(&mut self, now: Instant) -> Vec<PathBuf> {
        let mut due: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(path, _)| path.clone())
            .collect();
        due.sort();

        let mut ready = Vec::with_capacity(due.len());
        for path in due {
            if self.in_flight.contains(&path) {
                self.pending.insert(path, now + self.window);
            } else {
                self.pending.remove(&path);
                self.in_flight.insert(path.clone());
                ready.push(path);
            }
        }
        ready
    }

    /// Mark an export started by [`Debouncer::take_due`] as done
    pub fn finish(&mut self, path: &Path) {
        self.in_flight.remove(path);
    }

    pub fn is_in_flight(&self, path: &Path) -> bool {
        self.in_flight.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Ensures at most one watcher runs per process
#[derive(Debug, Default)]
pub struct WatcherRegistry {
    active: AtomicBool,
}

/// Held while a watcher runs; releases the registry slot on drop
#[derive(Debug)]
pub struct WatcherGuard<'a> {
    registry: &'a WatcherRegistry,
}

impl WatcherRegistry {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    /// Claim the watcher slot, or `None` if a watcher is already running
    pub fn try_acquire(&self) -> Option<WatcherGuard<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| WatcherGuard { registry: self })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for WatcherGuard<'_> {
    fn drop(&mut self) {
        self.registry.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watched_paths() {
        let docs = Path::new("/site/docs");
        assert!(is_watched_path(docs, Path::new("/site/docs/guide/setup.mdx")));
        assert!(is_watched_path(
            Path::new("/site/versioned_docs/version-v1"),
            Path::new("/site/versioned_docs/version-v1/intro.md")
        ));
        assert!(!is_watched_path(docs, Path::new("/site/docs/_constants.mdx")));
        assert!(!is_watched_path(docs, Path::new("/site/docs/_shared/snippet.md")));
        assert!(!is_watched_path(docs, Path::new("/site/docs/node_modules/pkg/README.md")));
        assert!(!is_watched_path(docs, Path::new("/site/docs/img/arch.png")));
        assert!(!is_watched_path(docs, Path::new("/elsewhere/intro.md")));
    }

    #[test]
    fn test_reserved_ancestor_does_not_hide_documents() {
        let docs = Path::new("/home/dev/_work/site/docs");
        assert!(is_watched_path(
            docs,
            Path::new("/home/dev/_work/site/docs/guide/setup.mdx")
        ));
        assert!(!is_watched_path(
            docs,
            Path::new("/home/dev/_work/site/docs/_constants.mdx")
        ));

        let docs = Path::new("/srv/node_modules/site/docs");
        assert!(is_watched_path(docs, Path::new("/srv/node_modules/site/docs/intro.md")));
    }

    #[test]
    fn test_debouncer_coalesces_bursts() {
        let start = Instant::now();
        let window = Duration::from_millis(300);
        let mut debouncer = Debouncer::new(window);
        let path = PathBuf::from("/site/docs/a.md");

        debouncer.touch(path.clone(), start);
        debouncer.touch(path.clone(), start + Duration::from_millis(100));
        debouncer.touch(path.clone(), start + Duration::from_millis(200));

        assert!(debouncer.take_due(start + Duration::from_millis(400)).is_empty());
        assert_eq!(debouncer.next_deadline(), Some(start + Duration::from_millis(500)));
        assert_eq!(debouncer.take_due(start + Duration::from_millis(500)), vec![path]);
        assert!(debouncer.is_empty());
        assert_eq!(debouncer.next_deadline(), None);
    }

    #[test]
    fn test_debouncer_tracks_paths_independently() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let a = PathBuf::from("/site/docs/a.md");
        let b = PathBuf::from("/site/docs/b.md");

        debouncer.touch(b.clone(), start);
        debouncer.touch(a.clone(), start + Duration::from_millis(250));

        assert_eq!(debouncer.take_due(start + Duration::from_millis(300)), vec![b]);
        assert_eq!(debouncer.take_due(start + Duration::from_millis(550)), vec![a]);
    }

    #[test]
    fn test_debouncer_defers_paths_being_exported() {
        let start = Instant::now();
        let window = Duration::from_millis(300);
        let mut debouncer = Debouncer::new(window);
        let path = PathBuf::from("/site/docs/a.md");

        debouncer.touch(path.clone(), start);
        let first = start + window;
        assert_eq!(debouncer.take_due(first), vec![path.clone()]);
        assert!(debouncer.is_in_flight(&path));

        // Saved again while the first export is still running
        debouncer.touch(path.clone(), first + Duration::from_millis(10));
        let second = first + Duration::from_millis(310);
        assert!(debouncer.take_due(second).is_empty());
        assert_eq!(debouncer.next_deadline(), Some(second + window));

        debouncer.finish(&path);
        assert!(!debouncer.is_in_flight(&path));
        assert_eq!(debouncer.take_due(second + window), vec![path]);
    }

    #[test]
    fn test_registry_allows_one_watcher() {
        let registry = WatcherRegistry::new();
        let guard = registry.try_acquire();
        assert!(guard.is_some());
        assert!(registry.is_active());
        assert!(registry.try_acquire().is_none());

        drop(guard);
        assert!(!registry.is_active());
        assert!(registry.try_acquire().is_some());
    }
}
