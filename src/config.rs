// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::template::{CHANNEL_TEMPLATE, EPISODE_TEMPLATE};

/// Channel-level settings, fixed for the lifetime of a feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Where the feed document lives on disk
    pub xml_path: PathBuf,
    /// Public prefix; enclosure URLs are this plus the audio path
    pub base_url: String,
    pub title: String,
    pub language: String,
    pub copyright: String,
    #[serde(default)]
    pub subtitle: String,
    pub author: String,
    pub description: String,
    pub email: String,
    pub cover_path: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Public URL of the feed itself, for the atom self link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_template: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_template: Option<PathBuf>,
}

impl ChannelConfig {
    /// Check values that would otherwise only fail once a listener's
    /// client tries to resolve them
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Public URL of the feed document, defaulting to the base URL plus
    /// the feed's file name
    pub fn resolved_feed_url(&self) -> String {
        if let Some(ref url) = self.feed_url {
            return url.clone();
        }

        let file_name = self
            .xml_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        format!("{}{}", self.base_url, file_name)
    }
}

/// Read and validate a channel configuration from a JSON file
pub fn read_config(path: &Path) -> Result<ChannelConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: ChannelConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::JsonParseFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    config.validate()?;
    Ok(config)
}

/// Template sources for the channel document and for a single episode
#[derive(Debug, Clone)]
pub struct Templates {
    pub channel: String,
    pub episode: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            channel: CHANNEL_TEMPLATE.to_string(),
            episode: EPISODE_TEMPLATE.to_string(),
        }
    }
}

impl Templates {
    /// Load override templates named in the config, falling back to the
    /// built-in ones
    pub fn from_config(config: &ChannelConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            channel: read_template_or(config.channel_template.as_deref(), defaults.channel)?,
            episode: read_template_or(config.episode_template.as_deref(), defaults.episode)?,
        })
    }
}

fn read_template_or(path: Option<&Path>, fallback: String) -> Result<String, ConfigError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| ConfigError::TemplateReadFailed {
            path: path.to_path_buf(),
            source: e,
        }),
        None => Ok(fallback),
    }
}

/// Per-episode settings that have no source in the audio artifact
#[derive(Debug, Clone)]
pub struct EpisodeOptions {
    pub season: u32,
    /// Omitted from the item when `None`
    pub publish_date: Option<DateTime<FixedOffset>>,
}

impl Default for EpisodeOptions {
    fn default() -> Self {
        Self {
            season: 1,
            publish_date: None,
        }
    }
}
