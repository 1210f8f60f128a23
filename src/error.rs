// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the feed back through an RSS parser
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read feed file {path}: {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse RSS feed: {0}")]
    ParseFailed(#[from] rss::Error),
}

/// Errors that can occur when probing an audio file for size and duration
#[derive(Error, Debug)]
pub enum AudioProbeError {
    #[error("Failed to open audio file {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio file {path} could not be decoded: {reason}")]
    Undecodable { path: PathBuf, reason: String },

    #[error("Audio file {path} contains no audio track")]
    NoAudioTrack { path: PathBuf },

    #[error("Could not determine the duration of {path}")]
    UnknownDuration { path: PathBuf },
}

/// Errors that can occur when indexing a feed document or an entry fragment
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("No channel element found in feed")]
    ChannelNotFound,

    #[error("Channel element is never closed")]
    UnclosedChannel,

    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Fragment does not contain an item element")]
    NoEntry,

    #[error("Fragment holds content besides a single item element")]
    UnexpectedContent,

    #[error("Episode index '{value}' is out of range")]
    IndexOutOfRange { value: String },

    #[error("Feed already holds the highest possible episode index")]
    IndexExhausted,
}

/// Errors that can occur while rendering a template
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unterminated placeholder starting at byte {offset}")]
    Unterminated { offset: usize },

    #[error("Template references unknown field '{name}'")]
    UnknownField { name: String },
}

/// Errors that can occur when loading the channel configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON in {path}: {source}")]
    JsonParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to read template file {path}: {source}")]
    TemplateReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level errors for feed initialization and episode publishing
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Audio probe failed: {0}")]
    AudioProbe(#[from] AudioProbeError),

    #[error("Feed document not found at {path} (was the feed initialized?)")]
    FeedNotFound { path: PathBuf },

    #[error("Feed document {path} has no channel element")]
    ChannelNotFound { path: PathBuf },

    #[error("Feed document {path} is malformed: {source}")]
    MalformedFeed {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("Rendered episode is not a single item element: {0}")]
    InvalidEntry(#[source] DocumentError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read feed {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write feed {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock feed {path}: {source}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PublishError {
    /// Attach the feed location to a document error, keeping a missing
    /// channel distinct from other structural problems
    pub fn from_document(path: PathBuf, error: DocumentError) -> Self {
        match error {
            DocumentError::ChannelNotFound => PublishError::ChannelNotFound { path },
            source => PublishError::MalformedFeed { path, source },
        }
    }
}
