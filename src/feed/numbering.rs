// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Episode index for the next entry: one past the highest existing index,
/// or 1 for an empty feed.
///
/// Only the maximum matters, so gaps, duplicates and document order are
/// all tolerated. Returns `None` when the highest index is `u32::MAX` and no
/// larger index exists.
pub fn next_index<I>(existing: I) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    match existing.into_iter().max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_feed_starts_at_one() {
        assert_eq!(next_index(Vec::new()), Some(1));
    }

    #[test]
    fn sequential_indices_continue() {
        assert_eq!(next_index([1, 2, 3]), Some(4));
    }

    #[test]
    fn out_of_order_indices_use_maximum() {
        assert_eq!(next_index([3, 1, 7, 2]), Some(8));
    }

    #[test]
    fn duplicates_are_tolerated() {
        assert_eq!(next_index([2, 2, 5, 5]), Some(6));
    }

    #[test]
    fn gaps_are_not_filled() {
        assert_eq!(next_index([1, 10]), Some(11));
    }

    #[test]
    fn zero_index_still_moves_forward() {
        assert_eq!(next_index([0]), Some(1));
    }

    #[test]
    fn highest_possible_index_has_no_successor() {
        assert_eq!(next_index([3, u32::MAX]), None);
        assert_eq!(next_index([u32::MAX - 1]), Some(u32::MAX));
    }
}
