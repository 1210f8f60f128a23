// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use quick_xml::escape::escape;

use crate::audio::{AudioInfo, format_duration};
use crate::config::{ChannelConfig, EpisodeOptions};
use crate::template::Fields;

/// A produced audio file waiting to be published
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub title: String,
    pub description: String,
    pub audio_path: PathBuf,
}

impl AudioArtifact {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        audio_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            audio_path: audio_path.into(),
        }
    }
}

/// Everything rendered into one feed item
#[derive(Debug, Clone)]
pub struct EpisodeRecord {
    pub title: String,
    pub author: String,
    pub subtitle: String,
    pub description: String,
    pub enclosure_url: String,
    pub size: u64,
    pub duration_secs: f64,
    pub season: u32,
    pub episode_index: u32,
    pub publish_date: Option<DateTime<FixedOffset>>,
}

impl EpisodeRecord {
    /// Combine an artifact with its probed audio info and its position in
    /// the feed
    pub fn new(
        artifact: &AudioArtifact,
        audio: AudioInfo,
        episode_index: u32,
        config: &ChannelConfig,
        options: &EpisodeOptions,
    ) -> Self {
        Self {
            title: artifact.title.clone(),
            author: config.author.clone(),
            subtitle: String::new(),
            description: artifact.description.clone(),
            enclosure_url: enclosure_url(&config.base_url, &artifact.audio_path),
            size: audio.size,
            duration_secs: audio.duration_secs,
            season: options.season,
            episode_index,
            publish_date: options.publish_date,
        }
    }

    /// Field mapping for the episode template
    pub fn fields(&self) -> Fields {
        let pub_date = self
            .publish_date
            .map(|date| {
                format!(
                    "\n            <pubDate>{}</pubDate>",
                    escape(&date.to_rfc2822())
                )
            })
            .unwrap_or_default();

        Fields::from([
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("subtitle", self.subtitle.clone()),
            ("description", self.description.clone()),
            ("enclosure_url", self.enclosure_url.clone()),
            ("size", self.size.to_string()),
            ("duration", format_duration(self.duration_secs)),
            ("season", self.season.to_string()),
            ("episode", self.episode_index.to_string()),
            ("pub_date", pub_date),
        ])
    }
}

/// Public URL of an audio file: the base URL followed by the path as given
pub fn enclosure_url(base_url: &str, audio_path: &Path) -> String {
    format!("{}{}", base_url, audio_path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::make_config;

    fn make_record(options: &EpisodeOptions) -> EpisodeRecord {
        let config = make_config(Path::new("feed.xml"));
        let artifact = AudioArtifact::new("Episode One", "A first look", "ep1.mp3");
        let audio = AudioInfo {
            size: 2_004_321,
            duration_secs: 125.4,
        };
        EpisodeRecord::new(&artifact, audio, 1, &config, options)
    }

    #[test]
    fn record_combines_artifact_audio_and_config() {
        let record = make_record(&EpisodeOptions::default());

        assert_eq!(record.title, "Episode One");
        assert_eq!(record.author, "Example Author");
        assert_eq!(record.subtitle, "");
        assert_eq!(
            record.enclosure_url,
            "https://example.github.io/papers/ep1.mp3"
        );
        assert_eq!(record.size, 2_004_321);
        assert_eq!(record.season, 1);
        assert_eq!(record.episode_index, 1);
        assert!(record.publish_date.is_none());
    }

    #[test]
    fn fields_format_numbers_for_the_feed() {
        let fields = make_record(&EpisodeOptions::default()).fields();

        assert_eq!(fields["duration"], "125.4");
        assert_eq!(fields["size"], "2004321");
        assert_eq!(fields["episode"], "1");
        assert_eq!(fields["season"], "1");
        assert_eq!(fields["pub_date"], "");
    }

    #[test]
    fn publish_date_renders_as_rfc2822_element() {
        let options = EpisodeOptions {
            season: 2,
            publish_date: DateTime::parse_from_rfc3339("2024-01-15T12:00:00+00:00").ok(),
        };
        let fields = make_record(&options).fields();

        assert_eq!(fields["season"], "2");
        assert_eq!(
            fields["pub_date"].trim(),
            "<pubDate>Mon, 15 Jan 2024 12:00:00 +0000</pubDate>"
        );
    }

    #[test]
    fn enclosure_url_is_plain_concatenation() {
        assert_eq!(
            enclosure_url("https://host/pod/", Path::new("audio/ep2.mp3")),
            "https://host/pod/audio/ep2.mp3"
        );
    }
}
