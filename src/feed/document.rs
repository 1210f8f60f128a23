// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::num::IntErrorKind;
use std::ops::Range;

use log::warn;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::DocumentError;

use super::numbering::next_index;

const CHANNEL_TAG: &[u8] = b"channel";
const ITEM_TAG: &[u8] = b"item";
const EPISODE_TAG: &[u8] = b"itunes:episode";

/// Indentation used in front of appended items
const ENTRY_INDENT: &str = "        ";

/// A single `<item>` element, kept as raw XML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    xml: String,
    index: Option<u32>,
}

impl Entry {
    /// Parse an XML fragment holding exactly one `<item>` element.
    ///
    /// Whitespace, comments and processing instructions may surround the
    /// item. Any other element or text next to it is rejected.
    pub fn parse(fragment: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(fragment);

        let mut depth = 0usize;
        let mut item_depth: Option<usize> = None;
        let mut item_start = 0usize;
        let mut span: Option<Range<usize>> = None;
        let mut in_episode = false;
        let mut episode_text = String::new();
        let mut index = None;
        let mut stray = false;

        loop {
            let event = reader.read_event().map_err(|e| DocumentError::Xml {
                position: reader.error_position() as u64,
                source: e,
            })?;
            let pos = reader.buffer_position() as usize;

            match event {
                Event::Start(e) => {
                    let name = e.name();
                    if depth == 0 {
                        if span.is_none() && name.as_ref() == ITEM_TAG {
                            item_depth = Some(1);
                            item_start = tag_start(fragment, pos, "<item");
                        } else {
                            stray = true;
                        }
                    } else if item_depth.is_some() && name.as_ref() == EPISODE_TAG {
                        in_episode = true;
                        episode_text.clear();
                    }
                    depth += 1;
                }
                Event::Empty(e) if depth == 0 => {
                    if span.is_none() && e.name().as_ref() == ITEM_TAG {
                        span = Some(tag_start(fragment, pos, "<item")..pos);
                    } else {
                        stray = true;
                    }
                }
                Event::Text(e) if in_episode => {
                    let text = e.unescape().map_err(|err| DocumentError::Xml {
                        position: pos as u64,
                        source: err,
                    })?;
                    episode_text.push_str(&text);
                }
                Event::CData(e) if in_episode => {
                    episode_text.push_str(&String::from_utf8_lossy(&e));
                }
                Event::Text(e) if depth == 0 => {
                    if e.iter().any(|b| !b.is_ascii_whitespace()) {
                        stray = true;
                    }
                }
                Event::CData(_) if depth == 0 => stray = true,
                Event::End(e) => {
                    let name = e.name();
                    if in_episode && name.as_ref() == EPISODE_TAG {
                        in_episode = false;
                        index = parse_index(episode_text.trim())?;
                    } else if item_depth == Some(depth) && name.as_ref() == ITEM_TAG {
                        item_depth = None;
                        span = Some(item_start..pos);
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let span = span.ok_or(DocumentError::NoEntry)?;
        if stray {
            return Err(DocumentError::UnexpectedContent);
        }

        Ok(Self {
            xml: fragment[span].to_string(),
            index,
        })
    }

    /// Raw XML of the item element
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Value of the item's `itunes:episode` element, if it is an integer
    pub fn index(&self) -> Option<u32> {
        self.index
    }
}

/// A feed document: the channel header plus the items appended to it.
///
/// The original text is kept verbatim. Appending an entry inserts its XML
/// in front of the closing `</channel>` tag and touches nothing else.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    text: String,
    entries: Vec<Entry>,
    insert_at: usize,
    self_closing: Option<usize>,
}

impl FeedDocument {
    /// Index a feed document. Items are the direct children of the first
    /// `<channel>` element.
    pub fn parse(text: String) -> Result<Self, DocumentError> {
        let (spans, end) = scan_channel(&text)?;

        let entries = spans
            .into_iter()
            .map(|span| Entry::parse(&text[span]))
            .collect::<Result<Vec<_>, _>>()?;

        let (insert_at, self_closing) = match end {
            ChannelEnd::Close(close) => (text[..close].trim_end().len(), None),
            ChannelEnd::SelfClosing(slash) => (slash, Some(slash)),
        };

        Ok(Self {
            text,
            entries,
            insert_at,
            self_closing,
        })
    }

    /// Entries in document order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Episode indices of all entries that carry a valid one
    pub fn list_indices(&self) -> Vec<u32> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                if entry.index().is_none() {
                    warn!(
                        "Item {} has no numeric itunes:episode, ignoring it for numbering",
                        position + 1
                    );
                }
                entry.index()
            })
            .collect()
    }

    /// Index the next appended entry should carry
    pub fn next_index(&self) -> Result<u32, DocumentError> {
        next_index(self.list_indices()).ok_or(DocumentError::IndexExhausted)
    }

    /// Add an entry as the last child of the channel. A self-closing
    /// `<channel/>` is expanded into an open and close tag first.
    pub fn append(&mut self, entry: Entry) {
        if let Some(slash) = self.self_closing.take() {
            self.text.replace_range(slash..slash + 2, ">\n    </channel>");
            self.insert_at = slash + 1;
        }

        let block = format!("\n{}{}", ENTRY_INDENT, entry.xml());
        self.text.insert_str(self.insert_at, &block);
        self.insert_at += block.len();
        self.entries.push(entry);
    }

    /// Serialized document
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Where the first channel ends
enum ChannelEnd {
    /// Byte offset of `</channel>`
    Close(usize),
    /// Byte offset of the `/>` of `<channel/>`
    SelfClosing(usize),
}

/// Locate the item spans of the first channel and where it ends
fn scan_channel(text: &str) -> Result<(Vec<Range<usize>>, ChannelEnd), DocumentError> {
    let mut reader = Reader::from_str(text);

    let mut depth = 0usize;
    let mut channel_depth: Option<usize> = None;
    let mut channel_end: Option<ChannelEnd> = None;
    let mut item_start: Option<usize> = None;
    let mut spans = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| DocumentError::Xml {
            position: reader.error_position() as u64,
            source: e,
        })?;
        let pos = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                depth += 1;
                let name = e.name();
                if channel_depth.is_none() && channel_end.is_none() && name.as_ref() == CHANNEL_TAG
                {
                    channel_depth = Some(depth);
                } else if channel_depth == Some(depth - 1) && name.as_ref() == ITEM_TAG {
                    item_start = Some(tag_start(text, pos, "<item"));
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                if channel_depth.is_none() && channel_end.is_none() && name.as_ref() == CHANNEL_TAG
                {
                    channel_end = Some(ChannelEnd::SelfClosing(pos - 2));
                } else if channel_depth == Some(depth) && name.as_ref() == ITEM_TAG {
                    spans.push(tag_start(text, pos, "<item")..pos);
                }
            }
            Event::End(e) => {
                let name = e.name();
                if channel_depth == Some(depth) && name.as_ref() == CHANNEL_TAG {
                    channel_depth = None;
                    channel_end = Some(ChannelEnd::Close(tag_start(text, pos, "</")));
                } else if channel_depth.is_some()
                    && channel_depth == depth.checked_sub(1)
                    && name.as_ref() == ITEM_TAG
                    && let Some(start) = item_start.take()
                {
                    spans.push(start..pos);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match (channel_end, channel_depth) {
        (Some(end), _) => Ok((spans, end)),
        (None, Some(_)) => Err(DocumentError::UnclosedChannel),
        (None, None) => Err(DocumentError::ChannelNotFound),
    }
}

/// Numeric value of an `itunes:episode` element. Non-numeric text counts as
/// no index; a number too large for an index is an error.
fn parse_index(text: &str) -> Result<Option<u32>, DocumentError> {
    match text.parse::<u32>() {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => {
            Err(DocumentError::IndexOutOfRange {
                value: text.to_string(),
            })
        }
        Err(_) => Ok(None),
    }
}

/// Byte offset of the tag that ends at `end`
fn tag_start(text: &str, end: usize, opener: &str) -> usize {
    text[..end].rfind(opener).unwrap_or(end)
}
