//! All-vs-all overlap relation
//!
//! Turns a set of keyed collision representations into, for every key, the
//! list of other keys it overlaps:
//!
//! 1. flatten every representation's boxes into one array, remembering the owner
//! 2. ask the [`BroadPhase`] for intersecting box pairs
//! 3. collapse box pairs into owner pairs (any intersecting box pair counts)
//! 4. for each side of an owner pair, drop it if the [`MaskPolicy`] rejects
//!    it from that side's point of view
//! 5. never report an owner against itself
//!
//! Every input key appears in the output, with an empty list when nothing
//! overlaps it, so listeners can clear stale state.

use super::broad_phase::BroadPhase;
use super::collision::CollisionRepresentation;
use super::collision_layers::CollisionGroup;
use crate::config::MaskPolicy;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// One entry of an overlap list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overlap<K> {
    /// The other party
    pub other: K,
    /// Whether the other party's representation is sensor-only
    pub is_excess: bool,
}

/// Overlap relation keyed by representation owner
pub type OverlapMap<K> = HashMap<K, Vec<Overlap<K>>>;

/// Broad-phase overlap engine
pub struct OverlapEngine {
    broad_phase: Box<dyn BroadPhase>,
    policy: MaskPolicy,
}

impl OverlapEngine {
    /// Create an engine from a broad-phase strategy and mask policy
    pub fn new(broad_phase: Box<dyn BroadPhase>, policy: MaskPolicy) -> Self {
        Self {
            broad_phase,
            policy,
        }
    }

    /// Active mask policy
    pub fn policy(&self) -> MaskPolicy {
        self.policy
    }

    /// Active broad-phase strategy
    pub fn broad_phase(&self) -> &dyn BroadPhase {
        self.broad_phase.as_ref()
    }

    /// Compute the overlap relation of `entries`
    ///
    /// Keys must be unique. Each output list is ordered by input position
    /// of the other party, which keeps notification order deterministic.
    pub fn calc_overlap_all_vs_all<K>(
        &self,
        entries: &[(K, &CollisionRepresentation)],
    ) -> OverlapMap<K>
    where
        K: Copy + Eq + Hash,
    {
        let mut boxes = Vec::new();
        let mut owners = Vec::new();
        for (entry_idx, (_, repr)) in entries.iter().enumerate() {
            boxes.extend_from_slice(&repr.boxes);
            owners.extend(std::iter::repeat(entry_idx).take(repr.boxes.len()));
        }

        let mut entry_pairs = BTreeSet::new();
        for (i, j) in self.broad_phase.intersecting_pairs(&boxes) {
            let (a, b) = (owners[i], owners[j]);
            if a != b {
                entry_pairs.insert((a.min(b), a.max(b)));
            }
        }

        let mut related: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
        for (a, b) in entry_pairs {
            let (group_a, group_b) = (&entries[a].1.group, &entries[b].1.group);
            if CollisionGroup::reports(group_a, group_b, self.policy) {
                related[a].push(b);
            }
            if CollisionGroup::reports(group_b, group_a, self.policy) {
                related[b].push(a);
            }
        }

        entries
            .iter()
            .zip(related)
            .map(|((key, _), mut others)| {
                others.sort_unstable();
                let list = others
                    .into_iter()
                    .map(|idx| Overlap {
                        other: entries[idx].0,
                        is_excess: entries[idx].1.is_excess,
                    })
                    .collect();
                (*key, list)
            })
            .collect()
    }
}
