//! Hybrid Combiner - deterministic interleave of two ranked lists
//!
//! Scores of the two strategies live on different scales, so they are
//! never compared. The first ⌈n/2⌉ slots come from the popularity list,
//! the rest from the collaborative list, each in its own rank order.
//! When one list runs short the other fills the remaining slots.
//!
//! A movie present in both lists is kept once, at its first position.

use crate::types::Recommendation;
use data_loader::MovieId;
use std::collections::HashSet;
use tracing::debug;

/// Merge two independently ranked lists into at most `n` recommendations.
pub fn combine(
    popularity: &[Recommendation],
    collaborative: &[Recommendation],
    n: usize,
) -> Vec<Recommendation> {
    let mut combined: Vec<Recommendation> =
        Vec::with_capacity(n.min(popularity.len() + collaborative.len()));
    let mut seen: HashSet<MovieId> = HashSet::new();
    let (mut pop_cursor, mut collab_cursor) = (0, 0);

    // Popularity share first, then collaborative, then whatever is left
    fill(popularity, &mut pop_cursor, n.div_ceil(2), &mut combined, &mut seen);
    fill(collaborative, &mut collab_cursor, n, &mut combined, &mut seen);
    fill(popularity, &mut pop_cursor, n, &mut combined, &mut seen);

    debug!(
        "Combined {} popularity and {} collaborative into {}",
        popularity.len(),
        collaborative.len(),
        combined.len()
    );
    combined
}

/// Append unseen entries from `source[*cursor..]` until `combined` holds `target`.
fn fill(
    source: &[Recommendation],
    cursor: &mut usize,
    target: usize,
    combined: &mut Vec<Recommendation>,
    seen: &mut HashSet<MovieId>,
) {
    while combined.len() < target && *cursor < source.len() {
        let rec = source[*cursor];
        *cursor += 1;
        if seen.insert(rec.movie_id) {
            combined.push(rec);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Strategy;

    fn content(ids: &[MovieId]) -> Vec<Recommendation> {
        ids.iter()
            .enumerate()
            .map(|(i, &id)| Recommendation::new(id, 100.0 - i as f64, Strategy::Content))
            .collect()
    }

    fn collab(ids: &[MovieId]) -> Vec<Recommendation> {
        ids.iter()
            .enumerate()
            .map(|(i, &id)| Recommendation::new(id, 1.0 - i as f64 * 0.1, Strategy::Collaborative))
            .collect()
    }

    fn ids(recs: &[Recommendation]) -> Vec<MovieId> {
        recs.iter().map(|r| r.movie_id).collect()
    }

    #[test]
    fn test_interleave_split() {
        let combined = combine(&content(&[1, 2, 3, 4, 5]), &collab(&[11, 12, 13, 14]), 5);
        assert_eq!(ids(&combined), vec![1, 2, 3, 11, 12]);
        assert_eq!(combined[3].source, Strategy::Collaborative);
    }

    #[test]
    fn test_even_split() {
        let combined = combine(&content(&[1, 2, 3]), &collab(&[11, 12, 13]), 4);
        assert_eq!(ids(&combined), vec![1, 2, 11, 12]);
    }

    #[test]
    fn test_empty_collaborative_fills_from_popularity() {
        let combined = combine(&content(&[1, 2, 3, 4, 5, 6]), &[], 4);
        assert_eq!(ids(&combined), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_popularity_fills_from_collaborative() {
        let combined = combine(&[], &collab(&[11, 12, 13, 14, 15]), 4);
        assert_eq!(ids(&combined), vec![11, 12, 13, 14]);
    }

    #[test]
    fn test_short_sources_return_what_is_available() {
        let combined = combine(&content(&[1]), &collab(&[11, 12]), 10);
        assert_eq!(ids(&combined), vec![1, 11, 12]);
    }

    #[test]
    fn test_short_collaborative_backfilled() {
        let combined = combine(&content(&[1, 2, 3, 4, 5, 6]), &collab(&[11]), 6);
        assert_eq!(ids(&combined), vec![1, 2, 3, 11, 4, 5]);
    }

    #[test]
    fn test_duplicates_kept_once() {
        let combined = combine(&content(&[1, 2, 3]), &collab(&[2, 11, 12]), 4);
        assert_eq!(ids(&combined), vec![1, 2, 11, 12]);
        assert_eq!(combined[1].source, Strategy::Content);
    }

    #[test]
    fn test_slot_count_beyond_available() {
        let combined = combine(&content(&[1, 2]), &collab(&[11]), usize::MAX);
        assert_eq!(ids(&combined), vec![1, 2, 11]);
    }

    #[test]
    fn test_zero_slots() {
        assert!(combine(&content(&[1]), &collab(&[2]), 0).is_empty());
    }
}
