//! Diff calculation between the previous snapshot and the current run.
//!
//! Only additions matter for alerts: a posting is new when its id was not
//! in the previous snapshot. Postings that disappeared are not tracked.

use std::collections::{HashMap, HashSet};

use crate::models::Posting;

/// Current postings whose id is absent from `previous`, in `current` order.
pub fn new_postings(current: &[Posting], previous: &[Posting]) -> Vec<Posting> {
    let prev_ids: HashSet<&str> = previous.iter().map(|p| p.id.as_str()).collect();

    current
        .iter()
        .filter(|p| !prev_ids.contains(p.id.as_str()))
        .cloned()
        .collect()
}

/// Keep the original `found_at` for postings already seen before.
///
/// Returns how many postings were matched.
pub fn carry_first_seen(current: &mut [Posting], previous: &[Posting]) -> usize {
    let first_seen: HashMap<&str, _> = previous
        .iter()
        .map(|p| (p.id.as_str(), p.found_at))
        .collect();

    let mut matched = 0;
    for posting in current.iter_mut() {
        if let Some(&found_at) = first_seen.get(posting.id.as_str()) {
            posting.found_at = found_at;
            matched += 1;
        }
    }
    matched
}
