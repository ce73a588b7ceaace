//! Polling watch loop.
//!
//! The loop samples modification times of every input file once per interval.
//! A change is only acted on after the file set has stayed identical for one
//! further interval, so an editor writing several files at once triggers a
//! single rebuild. Rebuilds run on the polling thread itself: one at a time,
//! each numbered with an increasing generation.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime};

use layout_css::DirSource;

/// Modification time per watched path; `None` for unreadable or missing files.
pub type Snapshot = BTreeMap<PathBuf, Option<SystemTime>>;

pub fn snapshot(source: &DirSource) -> Snapshot {
    source
        .watched_paths()
        .into_iter()
        .map(|path| {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
            (path, modified)
        })
        .collect()
}

/// Debounces snapshots into settled changes.
#[derive(Debug)]
pub struct ChangeTracker {
    built: Snapshot,
    pending: Option<Snapshot>,
}

impl ChangeTracker {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            built: initial,
            pending: None,
        }
    }

    /// Feeds one poll. Returns `true` when a change has settled and a rebuild
    /// should run.
    pub fn poll(&mut self, current: Snapshot) -> bool {
        if current == self.built {
            self.pending = None;
            return false;
        }

        match self.pending.take() {
            Some(pending) if pending == current => {
                self.built = current;
                true
            }
            _ => {
                self.pending = Some(current);
                false
            }
        }
    }
}

/// Polls forever, calling `rebuild` with the generation number after each
/// settled change.
pub fn run<F>(source: &DirSource, interval: Duration, mut rebuild: F) -> !
where
    F: FnMut(u64),
{
    let mut tracker = ChangeTracker::new(snapshot(source));
    let mut generation = 0;

    loop {
        thread::sleep(interval);
        if tracker.poll(snapshot(source)) {
            generation += 1;
            rebuild(generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn snap(entries: &[(&str, u64)]) -> Snapshot {
        entries
            .iter()
            .map(|(path, secs)| {
                (
                    PathBuf::from(path),
                    Some(UNIX_EPOCH + Duration::from_secs(*secs)),
                )
            })
            .collect()
    }

    #[test]
    fn test_unchanged_never_rebuilds() {
        let mut tracker = ChangeTracker::new(snap(&[("a.json", 1)]));
        for _ in 0..3 {
            assert!(!tracker.poll(snap(&[("a.json", 1)])));
        }
    }

    #[test]
    fn test_change_rebuilds_once_after_settling() {
        let mut tracker = ChangeTracker::new(snap(&[("a.json", 1)]));

        assert!(!tracker.poll(snap(&[("a.json", 2)])));
        assert!(tracker.poll(snap(&[("a.json", 2)])));
        assert!(!tracker.poll(snap(&[("a.json", 2)])));
    }

    #[test]
    fn test_burst_of_writes_waits_for_quiet() {
        let mut tracker = ChangeTracker::new(snap(&[("a.json", 1)]));

        assert!(!tracker.poll(snap(&[("a.json", 2)])));
        assert!(!tracker.poll(snap(&[("a.json", 3)])));
        assert!(!tracker.poll(snap(&[("a.json", 3), ("b.json", 3)])));
        assert!(tracker.poll(snap(&[("a.json", 3), ("b.json", 3)])));
    }

    #[test]
    fn test_reverted_change_is_ignored() {
        let mut tracker = ChangeTracker::new(snap(&[("a.json", 1)]));

        assert!(!tracker.poll(snap(&[("a.json", 2)])));
        assert!(!tracker.poll(snap(&[("a.json", 1)])));
        assert!(!tracker.poll(snap(&[("a.json", 1)])));
    }

    #[test]
    fn test_snapshot_reads_project_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("layout.config.json");
        fs::write(&config, "{}").unwrap();

        let snapshot = snapshot(&DirSource::new(&config));
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[&config].is_some());
    }
}
