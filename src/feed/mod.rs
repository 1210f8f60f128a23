// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod document;
mod lock;
mod numbering;
mod parse;

pub use document::{Entry, FeedDocument};
pub use lock::FeedLock;
pub(crate) use lock::sibling_path;
pub use numbering::next_index;
pub use parse::{Enclosure, Episode, Podcast, parse_feed, parse_feed_file};
