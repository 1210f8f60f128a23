// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Built-in channel template. `{{{episodes}}}` receives the rendered
/// items (empty for a new feed).
pub const CHANNEL_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:atom="http://www.w3.org/2005/Atom" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd" xmlns:googleplay="http://www.google.com/schemas/play-podcasts/1.0" xmlns:media="http://www.rssboard.org/media-rss" version="2.0">
    <channel>
        <title>{{title}}</title>
        <link>{{base_url}}</link>
        <language>{{language}}</language>
        <atom:link href="{{feed_url}}" rel="self" type="application/rss+xml"/>
        <copyright>{{copyright}}</copyright>
        <itunes:subtitle>{{subtitle}}</itunes:subtitle>
        <itunes:author>{{author}}</itunes:author>
        <itunes:summary>{{description}}</itunes:summary>
        <itunes:keywords>{{keywords}}</itunes:keywords>
        <description>{{description}}</description>
        <itunes:owner><itunes:name>{{author}}</itunes:name><itunes:email>{{email}}</itunes:email></itunes:owner>
        <itunes:image href="{{cover_path}}"/>{{{categories}}}{{{episodes}}}
    </channel>
</rss>
"#;

/// Built-in episode template. Renders exactly one `<item>`.
pub const EPISODE_TEMPLATE: &str = r#"<item>
            <title>{{title}}</title>
            <itunes:title>{{title}}</itunes:title>
            <itunes:author>{{author}}</itunes:author>
            <itunes:subtitle>{{subtitle}}</itunes:subtitle>
            <itunes:summary>{{description}}</itunes:summary>
            <description>{{description}}</description>
            <enclosure url="{{enclosure_url}}" length="{{size}}" type="audio/mpeg"/>
            <itunes:duration>{{duration}}</itunes:duration>
            <itunes:season>{{season}}</itunes:season>
            <itunes:episode>{{episode}}</itunes:episode>
            <itunes:episodeType>full</itunes:episodeType>
            <guid isPermaLink="false">{{enclosure_url}}</guid>{{{pub_date}}}
            <itunes:explicit>false</itunes:explicit>
        </item>"#;
