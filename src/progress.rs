// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted while initializing a feed or publishing an episode
#[derive(Debug, Clone)]
pub enum PublishEvent {
    /// A new, empty feed document was written
    FeedCreated { path: PathBuf },

    /// The feed document already existed and was left alone
    FeedAlreadyPresent { path: PathBuf },

    /// The audio file was inspected
    AudioProbed {
        path: PathBuf,
        size: u64,
        duration_secs: f64,
    },

    /// An episode was appended and the feed saved
    EpisodeAppended {
        episode_index: u32,
        episode_title: String,
        enclosure_url: String,
    },
}

/// Trait for reporting progress events during publishing.
///
/// Implementations can use this to print status lines, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: PublishEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: PublishEvent) {}
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Collects every event for later inspection
    #[derive(Default)]
    pub(crate) struct RecordingReporter {
        pub(crate) events: Mutex<Vec<PublishEvent>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, event: PublishEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn noop_reporter_handles_all_events() {
        let reporter = NoopReporter::shared();

        reporter.report(PublishEvent::FeedCreated {
            path: PathBuf::from("feed.xml"),
        });
        reporter.report(PublishEvent::FeedAlreadyPresent {
            path: PathBuf::from("feed.xml"),
        });
        reporter.report(PublishEvent::AudioProbed {
            path: PathBuf::from("ep1.mp3"),
            size: 2_004_321,
            duration_secs: 125.4,
        });
        reporter.report(PublishEvent::EpisodeAppended {
            episode_index: 1,
            episode_title: "Episode One".to_string(),
            enclosure_url: "https://example.com/ep1.mp3".to_string(),
        });
    }

    #[test]
    fn recording_reporter_keeps_order() {
        let reporter = RecordingReporter::default();

        reporter.report(PublishEvent::FeedCreated {
            path: PathBuf::from("feed.xml"),
        });
        reporter.report(PublishEvent::FeedAlreadyPresent {
            path: PathBuf::from("feed.xml"),
        });

        let events = reporter.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], PublishEvent::FeedCreated { .. }));
        assert!(matches!(events[1], PublishEvent::FeedAlreadyPresent { .. }));
    }
}
