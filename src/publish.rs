// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use quick_xml::escape::escape;

use crate::audio::{AudioProbe, SymphoniaProbe};
use crate::config::{ChannelConfig, EpisodeOptions, Templates};
use crate::episode::{AudioArtifact, EpisodeRecord};
use crate::error::{PublishError, TemplateError};
use crate::feed::{Entry, FeedDocument, FeedLock, sibling_path};
use crate::progress::{NoopReporter, PublishEvent, SharedProgressReporter};
use crate::template::{Fields, Template};

/// Result of a successful append
#[derive(Debug, Clone, PartialEq)]
pub struct AppendedEpisode {
    pub episode_index: u32,
    pub title: String,
    pub enclosure_url: String,
    pub size: u64,
    pub duration_secs: f64,
}

/// Owns one feed: its channel settings, templates and audio probe.
///
/// `ensure_feed` creates the feed document once; `append_episode` adds one
/// item per produced audio file. Both hold the feed's lock for their whole
/// read-modify-write cycle.
pub struct Publisher<P: AudioProbe = SymphoniaProbe> {
    config: ChannelConfig,
    channel_template: Template,
    episode_template: Template,
    probe: P,
    reporter: SharedProgressReporter,
}

impl Publisher<SymphoniaProbe> {
    /// Create a publisher using the templates named in the config (or the
    /// built-in ones) and the symphonia audio probe
    pub fn new(config: ChannelConfig) -> Result<Self, PublishError> {
        let templates = Templates::from_config(&config)?;
        Self::with_parts(config, templates, SymphoniaProbe::new())
    }
}

impl<P: AudioProbe> Publisher<P> {
    /// Create a publisher from explicit parts.
    ///
    /// The channel template is rendered once here so a broken template or
    /// config fails before anything touches the disk.
    pub fn with_parts(
        config: ChannelConfig,
        templates: Templates,
        probe: P,
    ) -> Result<Self, PublishError> {
        config.validate()?;

        let publisher = Self {
            channel_template: Template::parse("channel", &templates.channel)?,
            episode_template: Template::parse("episode", &templates.episode)?,
            config,
            probe,
            reporter: NoopReporter::shared(),
        };

        let preview = publisher.render_channel()?;
        FeedDocument::parse(preview)
            .map_err(|e| PublishError::from_document(publisher.config.xml_path.clone(), e))?;

        Ok(publisher)
    }

    /// Send progress events to `reporter`
    pub fn with_reporter(mut self, reporter: SharedProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Location of the feed document
    pub fn feed_path(&self) -> &Path {
        &self.config.xml_path
    }

    /// Make sure a feed document exists, creating an empty one if needed.
    ///
    /// Returns `true` when the feed was created by this call. An existing
    /// feed is never modified.
    pub fn ensure_feed(&self) -> Result<bool, PublishError> {
        let path = self.feed_path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PublishError::CreateDirectoryFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let _lock = FeedLock::acquire(path)?;

        if path.exists() {
            debug!("Feed {} already exists", path.display());
            self.reporter.report(PublishEvent::FeedAlreadyPresent {
                path: path.to_path_buf(),
            });
            return Ok(false);
        }

        let xml = self.render_channel()?;
        write_feed(path, &xml)?;

        info!("Created feed {}", path.display());
        self.reporter.report(PublishEvent::FeedCreated {
            path: path.to_path_buf(),
        });

        Ok(true)
    }

    /// Publish one audio artifact as the next episode of the feed
    pub fn append_episode(
        &self,
        artifact: &AudioArtifact,
        options: &EpisodeOptions,
    ) -> Result<AppendedEpisode, PublishError> {
        let audio = self.probe.probe(&artifact.audio_path)?;
        self.reporter.report(PublishEvent::AudioProbed {
            path: artifact.audio_path.clone(),
            size: audio.size,
            duration_secs: audio.duration_secs,
        });

        let path = self.feed_path();
        if !path.exists() {
            return Err(PublishError::FeedNotFound {
                path: path.to_path_buf(),
            });
        }

        let _lock = FeedLock::acquire(path)?;

        let mut document = read_feed(path)?;
        let episode_index = document
            .next_index()
            .map_err(|e| PublishError::from_document(path.to_path_buf(), e))?;
        debug!(
            "Feed {} holds {} items, next episode is {}",
            path.display(),
            document.entries().len(),
            episode_index
        );

        let record = EpisodeRecord::new(artifact, audio, episode_index, &self.config, options);
        let fragment = self.episode_template.render(&record.fields())?;
        debug!(
            "Rendered {} template for episode {}",
            self.episode_template.name(),
            episode_index
        );
        let entry = Entry::parse(&fragment).map_err(PublishError::InvalidEntry)?;

        document.append(entry);
        write_feed(path, document.as_str())?;

        info!(
            "Appended episode {} '{}' to {}",
            episode_index,
            record.title,
            path.display()
        );
        self.reporter.report(PublishEvent::EpisodeAppended {
            episode_index,
            episode_title: record.title.clone(),
            enclosure_url: record.enclosure_url.clone(),
        });

        Ok(AppendedEpisode {
            episode_index,
            title: record.title,
            enclosure_url: record.enclosure_url,
            size: record.size,
            duration_secs: record.duration_secs,
        })
    }

    /// Render a channel document without any episodes
    fn render_channel(&self) -> Result<String, TemplateError> {
        let config = &self.config;

        let categories: String = config
            .categories
            .iter()
            .map(|category| {
                format!(
                    "\n        <itunes:category text=\"{}\"/>",
                    escape(category)
                )
            })
            .collect();

        let fields = Fields::from([
            ("title", config.title.clone()),
            ("base_url", config.base_url.clone()),
            ("feed_url", config.resolved_feed_url()),
            ("language", config.language.clone()),
            ("copyright", config.copyright.clone()),
            ("subtitle", config.subtitle.clone()),
            ("author", config.author.clone()),
            ("description", config.description.clone()),
            ("keywords", config.keywords.join(", ")),
            ("email", config.email.clone()),
            ("cover_path", config.cover_path.clone()),
            ("categories", categories),
            ("episodes", String::new()),
        ]);

        self.channel_template.render(&fields)
    }
}

fn read_feed(path: &Path) -> Result<FeedDocument, PublishError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PublishError::FeedNotFound {
            path: path.to_path_buf(),
        },
        _ => PublishError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    FeedDocument::parse(text).map_err(|e| PublishError::from_document(path.to_path_buf(), e))
}

/// Replace the feed document. Writes a `.partial` sibling first and renames
/// it into place, so readers never see a half-written feed.
fn write_feed(path: &Path, contents: &str) -> Result<(), PublishError> {
    let partial = sibling_path(path, ".partial");

    std::fs::write(&partial, contents).map_err(|e| PublishError::WriteFailed {
        path: partial.clone(),
        source: e,
    })?;

    std::fs::rename(&partial, path).map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        PublishError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })
}
