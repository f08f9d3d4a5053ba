// Copyright (c) 2026 Kadmos
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Pure lookup bookkeeping: shortlist, contacted set, nearest-so-far and the
//! α-bounded batch selection. Everything async lives in the engine; this
//! state machine is synchronous and directly testable.

use crate::core::constants::ALPHA;
use crate::core::key::NetworkId;
use crate::core::routing::contact::Contact;
use crate::core::routing::sort_by_distance;
use num_bigint::BigUint;
use std::collections::BTreeSet;

/// Converging view over the K best candidates for a target key.
pub(crate) struct LookupState {
    target: NetworkId,
    /// Best known candidates, closest first, never longer than K.
    shortlist: Vec<Contact>,
    /// Peers a request has been issued to.
    contacted: BTreeSet<NetworkId>,
    /// Closest peer seen so far and its distance to the target.
    nearest: NetworkId,
    nearest_distance: BigUint,
}

impl LookupState {
    /// Seed from the routing table's closest known contacts. `None` when no
    /// seeds are known (the lookup cannot start).
    pub(crate) fn new(target: NetworkId, seeds: Vec<Contact>) -> Option<Self> {
        let shortlist = sort_by_distance(seeds, &target);
        let nearest = shortlist.first()?.network_id.clone();
        let nearest_distance = nearest.distance(&target);
        Some(Self {
            target,
            shortlist,
            contacted: BTreeSet::new(),
            nearest,
            nearest_distance,
        })
    }

    /// Closest uncontacted shortlist members that fit under the α bound
    /// given `in_flight` requests already outstanding. The returned contacts
    /// are marked contacted: the caller issues a request to each.
    pub(crate) fn next_batch(&mut self, in_flight: usize) -> Vec<Contact> {
        let mut batch: Vec<Contact> = Vec::new();
        if in_flight >= ALPHA {
            return batch;
        }
        let budget = ALPHA - in_flight;
        for contact in &self.shortlist {
            if batch.len() >= budget {
                break;
            }
            if !self.contacted.contains(&contact.network_id) {
                batch.push(contact.clone());
            }
        }
        for contact in &batch {
            self.contacted.insert(contact.network_id.clone());
        }
        batch
    }

    /// Drop a peer from the shortlist (failed, expired or returning).
    pub(crate) fn remove(&mut self, id: &NetworkId) {
        self.shortlist.retain(|c| &c.network_id != id);
    }

    /// Merge peers reported by a responder: candidates not already in the
    /// shortlist join it, the result is re-sorted by distance (stable) and
    /// truncated to K.
    pub(crate) fn merge_nodes(&mut self, nodes: Vec<Contact>) {
        let mut merged: Vec<Contact> = nodes
            .into_iter()
            .filter(|candidate| !self.shortlist.contains(candidate))
            .collect();
        merged.append(&mut self.shortlist);
        self.shortlist = sort_by_distance(merged, &self.target);
    }

    /// After a merge: does the shortlist now lead with a strictly closer
    /// peer than anything seen before? Updates the nearest marker when so.
    pub(crate) fn reassess_nearest(&mut self) -> bool {
        let head = match self.shortlist.first() {
            Some(head) => head,
            None => return false,
        };
        let distance = head.network_id.distance(&self.target);
        if distance < self.nearest_distance {
            self.nearest = head.network_id.clone();
            self.nearest_distance = distance;
            return true;
        }
        false
    }

    /// Whether every current shortlist member has been contacted; with no
    /// requests in flight this is the termination condition.
    pub(crate) fn fully_contacted(&self) -> bool {
        self.shortlist
            .iter()
            .all(|c| self.contacted.contains(&c.network_id))
    }

    pub(crate) fn shortlist(&self) -> &[Contact] {
        &self.shortlist
    }

    pub(crate) fn contacted_len(&self) -> usize {
        self.contacted.len()
    }

    pub(crate) fn nearest(&self) -> &NetworkId {
        &self.nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::K;
    use std::net::{IpAddr, Ipv4Addr};

    fn contact(id: u64) -> Contact {
        Contact::with_network_id(
            NetworkId::from(id),
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            9999,
            "0.1",
            0.0,
        )
    }

    #[test]
    fn seeds_sorted_and_nearest_set() {
        let target = NetworkId::from(0u64);
        let state =
            LookupState::new(target, vec![contact(8), contact(1), contact(4)]).unwrap();
        let ids: Vec<u64> = vec![1, 4, 8];
        for (got, want) in state.shortlist().iter().zip(ids) {
            assert_eq!(got.network_id, NetworkId::from(want));
        }
        assert_eq!(state.nearest(), &NetworkId::from(1u64));
    }

    #[test]
    fn empty_seed_list_refused() {
        assert!(LookupState::new(NetworkId::from(0u64), vec![]).is_none());
    }

    #[test]
    fn batch_respects_alpha_bound() {
        let target = NetworkId::from(0u64);
        let seeds = (1..=10).map(contact).collect();
        let mut state = LookupState::new(target, seeds).unwrap();
        let first = state.next_batch(0);
        assert_eq!(first.len(), ALPHA);
        // With two still in flight only one slot remains.
        let second = state.next_batch(ALPHA - 1);
        assert_eq!(second.len(), 1);
        assert!(state.next_batch(ALPHA).is_empty());
        // Batches never repeat a contacted peer.
        let all: Vec<&Contact> = first.iter().chain(second.iter()).collect();
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a.network_id, b.network_id);
            }
        }
    }

    #[test]
    fn merge_ignores_known_and_truncates_to_k() {
        let target = NetworkId::from(0u64);
        let mut state = LookupState::new(target, vec![contact(5)]).unwrap();
        state.merge_nodes((1..=40).map(contact).collect());
        assert_eq!(state.shortlist().len(), K);
        assert_eq!(state.shortlist()[0].network_id, NetworkId::from(1u64));
        // A duplicate of an existing member does not grow the list.
        state.merge_nodes(vec![contact(5)]);
        assert_eq!(state.shortlist().len(), K);
    }

    #[test]
    fn nearest_updates_only_on_strict_improvement() {
        let target = NetworkId::from(0u64);
        let mut state = LookupState::new(target, vec![contact(8)]).unwrap();
        state.merge_nodes(vec![contact(9)]);
        assert!(!state.reassess_nearest());
        state.merge_nodes(vec![contact(2)]);
        assert!(state.reassess_nearest());
        assert_eq!(state.nearest(), &NetworkId::from(2u64));
    }

    #[test]
    fn fully_contacted_tracks_shortlist_membership() {
        let target = NetworkId::from(0u64);
        let mut state = LookupState::new(target, vec![contact(1), contact(2)]).unwrap();
        assert!(!state.fully_contacted());
        let batch = state.next_batch(0);
        assert_eq!(batch.len(), 2);
        assert!(state.fully_contacted());
        // A freshly merged peer reopens the lookup.
        state.merge_nodes(vec![contact(3)]);
        assert!(!state.fully_contacted());
    }
}
