// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::PublishError;

/// Exclusive lock over one feed location.
///
/// Backed by an advisory lock on a `<feed>.lock` file next to the feed, so
/// it serializes writers across threads and processes alike. Dropping the
/// guard releases the lock.
#[derive(Debug)]
pub struct FeedLock {
    _file: File,
    path: PathBuf,
}

impl FeedLock {
    /// Block until the lock for `feed_path` is held. The feed's parent
    /// directory must exist.
    pub fn acquire(feed_path: &Path) -> Result<Self, PublishError> {
        let path = lock_path(feed_path);

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| PublishError::LockFailed {
                path: path.clone(),
                source: e,
            })?;

        file.lock().map_err(|e| PublishError::LockFailed {
            path: path.clone(),
            source: e,
        })?;

        debug!("Acquired feed lock {}", path.display());

        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FeedLock {
    fn drop(&mut self) {
        debug!("Released feed lock {}", self.path.display());
    }
}

/// Sibling path with `suffix` appended to the full file name
pub(crate) fn sibling_path(feed_path: &Path, suffix: &str) -> PathBuf {
    let mut name = feed_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    feed_path.with_file_name(name)
}

fn lock_path(feed_path: &Path) -> PathBuf {
    sibling_path(feed_path, ".lock")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn lock_file_sits_next_to_feed() {
        let dir = tempdir().unwrap();
        let feed = dir.path().join("feed.xml");

        let lock = FeedLock::acquire(&feed).unwrap();

        assert_eq!(lock.path(), dir.path().join("feed.xml.lock"));
        assert!(lock.path().exists());
    }

    #[test]
    fn lock_can_be_reacquired_after_drop() {
        let dir = tempdir().unwrap();
        let feed = dir.path().join("feed.xml");

        drop(FeedLock::acquire(&feed).unwrap());
        assert!(FeedLock::acquire(&feed).is_ok());
    }

    #[test]
    fn lock_excludes_other_holders() {
        let dir = tempdir().unwrap();
        let feed = dir.path().join("feed.xml");
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let feed = feed.clone();
                let inside = inside.clone();
                let max_inside = max_inside.clone();
                scope.spawn(move || {
                    for _ in 0..10 {
                        let _lock = FeedLock::acquire(&feed).unwrap();
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        std::thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_parent_directory_fails() {
        let dir = tempdir().unwrap();
        let feed = dir.path().join("missing").join("feed.xml");

        let err = FeedLock::acquire(&feed).unwrap_err();
        assert!(matches!(err, PublishError::LockFailed { .. }));
    }

    #[test]
    fn sibling_path_appends_suffix() {
        assert_eq!(
            sibling_path(Path::new("/srv/feed.xml"), ".partial"),
            PathBuf::from("/srv/feed.xml.partial")
        );
    }
}
