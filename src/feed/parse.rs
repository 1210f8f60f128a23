// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::error::FeedError;

/// A published feed as seen by a podcast client
#[derive(Debug, Clone)]
pub struct Podcast {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub episodes: Vec<Episode>,
}

/// A published episode as seen by a podcast client
#[derive(Debug, Clone)]
pub struct Episode {
    pub title: String,
    pub description: Option<String>,
    pub pub_date: Option<String>,
    pub guid: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub duration: Option<String>,
    pub episode_number: Option<u32>,
    pub season_number: Option<u32>,
}

/// The audio file attached to an episode
#[derive(Debug, Clone)]
pub struct Enclosure {
    pub url: String,
    pub length: Option<u64>,
    pub mime_type: Option<String>,
}

/// Parse RSS feed XML bytes into a Podcast struct
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Podcast, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    let episodes = channel.items().iter().map(parse_episode).collect();

    let image_url = channel
        .itunes_ext()
        .and_then(|ext| ext.image().map(String::from))
        .or_else(|| channel.image().map(|img| img.url().to_string()));

    let author = channel
        .itunes_ext()
        .and_then(|ext| ext.author().map(String::from))
        .or_else(|| channel.managing_editor().map(String::from));

    Ok(Podcast {
        title: channel.title().to_string(),
        description: Some(channel.description().to_string()).filter(|s| !s.is_empty()),
        link: Some(channel.link().to_string()).filter(|s| !s.is_empty()),
        author,
        image_url,
        episodes,
    })
}

/// Read and parse a feed document from disk
pub fn parse_feed_file(path: &Path) -> Result<Podcast, FeedError> {
    let bytes = std::fs::read(path).map_err(|e| FeedError::FileReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_feed(&bytes)
}

fn parse_episode(item: &rss::Item) -> Episode {
    let itunes = item.itunes_ext();

    Episode {
        title: item
            .title()
            .map(String::from)
            .unwrap_or_else(|| "Untitled Episode".to_string()),
        description: item.description().map(String::from),
        pub_date: item.pub_date().map(String::from),
        guid: item.guid().map(|g| g.value().to_string()),
        enclosure: item.enclosure().map(|enclosure| Enclosure {
            url: enclosure.url().to_string(),
            length: enclosure.length().parse().ok(),
            mime_type: Some(enclosure.mime_type().to_string()).filter(|s| !s.is_empty()),
        }),
        duration: itunes.and_then(|ext| ext.duration().map(String::from)),
        episode_number: itunes.and_then(|ext| ext.episode().and_then(|e| e.trim().parse().ok())),
        season_number: itunes.and_then(|ext| ext.season().and_then(|s| s.trim().parse().ok())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Paper Reviews</title>
    <description>Summaries of recent papers</description>
    <link>https://example.github.io/papers/</link>
    <itunes:author>Example Author</itunes:author>
    <itunes:image href="https://example.github.io/papers/cover.png"/>
    <item>
      <title>Episode One</title>
      <description>First episode</description>
      <guid isPermaLink="false">https://example.github.io/papers/ep1.mp3</guid>
      <enclosure url="https://example.github.io/papers/ep1.mp3" length="2004321" type="audio/mpeg"/>
      <itunes:duration>125.4</itunes:duration>
      <itunes:episode>1</itunes:episode>
      <itunes:season>1</itunes:season>
    </item>
    <item>
      <title>Bonus</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parse_feed_extracts_podcast_metadata() {
        let podcast = parse_feed(SAMPLE_FEED.as_bytes()).unwrap();

        assert_eq!(podcast.title, "Paper Reviews");
        assert_eq!(
            podcast.description,
            Some("Summaries of recent papers".to_string())
        );
        assert_eq!(podcast.author, Some("Example Author".to_string()));
        assert_eq!(
            podcast.image_url,
            Some("https://example.github.io/papers/cover.png".to_string())
        );
    }

    #[test]
    fn parse_feed_extracts_episodes() {
        let podcast = parse_feed(SAMPLE_FEED.as_bytes()).unwrap();
        assert_eq!(podcast.episodes.len(), 2);

        let ep1 = &podcast.episodes[0];
        assert_eq!(ep1.title, "Episode One");
        assert_eq!(ep1.duration, Some("125.4".to_string()));
        assert_eq!(ep1.episode_number, Some(1));
        assert_eq!(ep1.season_number, Some(1));

        let enclosure = ep1.enclosure.as_ref().unwrap();
        assert_eq!(enclosure.url, "https://example.github.io/papers/ep1.mp3");
        assert_eq!(enclosure.length, Some(2004321));
        assert_eq!(enclosure.mime_type, Some("audio/mpeg".to_string()));
    }

    #[test]
    fn parse_feed_keeps_items_without_enclosure() {
        let podcast = parse_feed(SAMPLE_FEED.as_bytes()).unwrap();

        let bonus = &podcast.episodes[1];
        assert_eq!(bonus.title, "Bonus");
        assert!(bonus.enclosure.is_none());
        assert!(bonus.episode_number.is_none());
    }

    #[test]
    fn parse_feed_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_feed_file(&dir.path().join("feed.xml"));
        assert!(matches!(result, Err(FeedError::FileReadFailed { .. })));
    }
}
