// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod audio;
pub mod config;
pub mod episode;
pub mod error;
pub mod feed;
pub mod progress;
pub mod publish;
pub mod template;

// Re-export main types for convenience
pub use audio::{AudioInfo, AudioProbe, SymphoniaProbe};
pub use config::{ChannelConfig, EpisodeOptions, Templates, read_config};
pub use episode::{AudioArtifact, EpisodeRecord};
pub use error::{
    AudioProbeError, ConfigError, DocumentError, FeedError, PublishError, TemplateError,
};
pub use feed::{Entry, FeedDocument, FeedLock, Podcast, next_index, parse_feed, parse_feed_file};
pub use progress::{NoopReporter, ProgressReporter, PublishEvent, SharedProgressReporter};
pub use publish::{AppendedEpisode, Publisher};
