//! Order-preserving set operations over bucket contents.
//!
//! Candidate selection combines buckets with intersection and union. Both keep
//! the order in which ids are first seen, so evaluation order (and therefore
//! the order of returned responses) is a pure function of the corpus and the
//! input.

use super::compiled_rules::EntryId;
use std::collections::HashSet;

/// Ids of `a` that also occur in `b`, in `a`'s order, without repeats.
pub(crate) fn intersect(a: &[EntryId], b: &[EntryId]) -> Vec<EntryId> {
    let in_b: HashSet<EntryId> = b.iter().copied().collect();
    let mut seen = HashSet::new();
    a.iter().copied().filter(|id| in_b.contains(id) && seen.insert(*id)).collect()
}

/// Accumulates ids in first-seen order, ignoring repeats.
#[derive(Debug, Default)]
pub(crate) struct CandidateSet {
    ids: Vec<EntryId>,
    seen: HashSet<EntryId>,
}

impl CandidateSet {
    pub(crate) fn extend(&mut self, ids: &[EntryId]) {
        for &id in ids {
            if self.seen.insert(id) {
                self.ids.push(id);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn into_vec(self) -> Vec<EntryId> {
        self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_keeps_left_order() {
        assert_eq!(intersect(&[5, 1, 3, 1], &[1, 3, 9]), vec![1, 3]);
        assert!(intersect(&[1, 2], &[3, 4]).is_empty());
    }

    #[test]
    fn candidate_set_unions_in_first_seen_order() {
        let mut set = CandidateSet::default();
        set.extend(&[4, 2]);
        set.extend(&[2, 7, 4]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.into_vec(), vec![4, 2, 7]);
    }
}
