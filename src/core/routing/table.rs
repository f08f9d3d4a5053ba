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

//! The routing table: a binary tree whose leaves are k-buckets.
//!
//! Each bucket covers a range of the id space; together the buckets cover
//! the entire 512-bit space with no overlap. A bucket whose range includes
//! the parent node's own id splits when full; other full buckets spill into
//! a per-bucket replacement cache. Misbehaving peers land on a permanent
//! blacklist and can never re-enter.

use crate::core::clock::Clock;
use crate::core::constants::{ALLOWED_RPC_FAILS, K, REFRESH_TIMEOUT};
use crate::core::key::{id_space_max, NetworkId};
use crate::core::routing::bucket::KBucket;
use crate::core::routing::contact::Contact;
use crate::core::routing::sort_by_distance;
use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-node routing state: the bucket tree, the replacement cache and the
/// blacklist.
pub struct RoutingTable {
    parent_id: NetworkId,
    buckets: Vec<KBucket>,
    /// Contacts eligible to replace stale bucket entries, keyed by bucket
    /// index, most recently seen at the tail.
    replacement_cache: BTreeMap<usize, Vec<Contact>>,
    /// Peers banned for misbehaviour. Permanent.
    blacklist: BTreeSet<NetworkId>,
    clock: Arc<dyn Clock>,
}

impl RoutingTable {
    /// Create the table for the node with id `parent_id`, starting from a
    /// single bucket covering the whole id space.
    pub fn new(parent_id: NetworkId, clock: Arc<dyn Clock>) -> Self {
        Self {
            parent_id,
            buckets: vec![KBucket::new(BigUint::zero(), id_space_max().clone())],
            replacement_cache: BTreeMap::new(),
            blacklist: BTreeSet::new(),
            clock,
        }
    }

    /// Id of the node this table belongs to.
    pub fn parent_id(&self) -> &NetworkId {
        &self.parent_id
    }

    /// The buckets, ascending by range.
    pub fn buckets(&self) -> &[KBucket] {
        &self.buckets
    }

    /// Replacement-cache entries for a bucket index, oldest first.
    pub fn cached_replacements(&self, bucket_index: usize) -> &[Contact] {
        self.replacement_cache
            .get(&bucket_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether an id is banned from the table.
    pub fn is_blacklisted(&self, id: &NetworkId) -> bool {
        self.blacklist.contains(id)
    }

    /// Index of the bucket whose range covers `key`. Total for any
    /// constructed [`NetworkId`]: the buckets partition the id space.
    fn bucket_index(&self, key: &NetworkId) -> usize {
        self.buckets
            .iter()
            .position(|bucket| bucket.key_in_range(key))
            .unwrap_or(self.buckets.len() - 1)
    }

    /// Split the bucket at `index` at the midpoint of its range, inserting
    /// the new upper half at `index + 1`.
    fn split_bucket(&mut self, index: usize) {
        let mid = {
            let bucket = &self.buckets[index];
            bucket.range_max() - (bucket.range_max() - bucket.range_min()) / 2u32
        };
        let upper = self.buckets[index].split_off_upper(mid);
        self.buckets.insert(index + 1, upper);
        debug!(buckets = self.buckets.len(), "split bucket");
    }

    /// Add (or refresh) a contact.
    ///
    /// Blacklisted peers and the parent node itself are dropped silently.
    /// The failed-RPC counter is reset, since an add is always the result of
    /// a successful RPC. A full bucket covering the parent id splits and the
    /// insertion retries; any other full bucket spills the contact into its
    /// replacement cache (capacity K, most recent at the tail).
    pub fn add_contact(&mut self, mut contact: Contact) {
        if self.blacklist.contains(&contact.network_id) {
            return;
        }
        if contact.network_id == self.parent_id {
            return;
        }
        contact.failed_rpcs = 0;
        loop {
            let index = self.bucket_index(&contact.network_id);
            let bucket = &mut self.buckets[index];
            if bucket.contains(&contact.network_id) || !bucket.is_full() {
                let _ = bucket.add_contact(contact);
                return;
            }
            if bucket.key_in_range(&self.parent_id) {
                self.split_bucket(index);
                continue;
            }
            // Optimized contact accounting without PINGs: the newcomer waits
            // in the replacement cache instead of triggering traffic.
            let cache = self.replacement_cache.entry(index).or_default();
            if let Some(pos) = cache.iter().position(|c| *c == contact) {
                cache.remove(pos);
            } else if cache.len() >= K {
                cache.remove(0);
            }
            cache.push(contact);
            return;
        }
    }

    /// Up to K known contacts closest to `key`, closest first. Fewer are
    /// returned only when fewer are known. `exclude` (typically the
    /// requester) never appears in the result.
    pub fn find_close_nodes(&self, key: &NetworkId, exclude: Option<&NetworkId>) -> Vec<Contact> {
        let index = self.bucket_index(key);
        let mut closest = self.buckets[index].get_contacts(K, exclude);
        // Walk outward through neighbouring buckets, alternating lower and
        // higher, until K contacts are collected or the table is exhausted.
        let mut jump = 1usize;
        let count = self.buckets.len();
        let mut can_go_lower = index >= jump;
        let mut can_go_higher = index + jump < count;
        while closest.len() < K && (can_go_lower || can_go_higher) {
            if can_go_lower {
                let remaining = K - closest.len();
                closest.extend(self.buckets[index - jump].get_contacts(remaining, exclude));
                can_go_lower = index >= jump + 1;
            }
            if can_go_higher {
                let remaining = K - closest.len();
                closest.extend(self.buckets[index + jump].get_contacts(remaining, exclude));
                can_go_higher = index + jump + 1 < count;
            }
            jump += 1;
        }
        sort_by_distance(closest, key)
    }

    /// Look up a known contact by id.
    pub fn get_contact(&self, id: &NetworkId) -> Option<&Contact> {
        let index = self.bucket_index(id);
        self.buckets[index].get_contact(id).ok()
    }

    /// Mutable lookup, for liveness bookkeeping by the transport.
    pub fn get_contact_mut(&mut self, id: &NetworkId) -> Option<&mut Contact> {
        let index = self.bucket_index(id);
        self.buckets[index].get_contact_mut(id)
    }

    /// Record a failed RPC against a contact and evict it once the failure
    /// threshold is met (or immediately when `forced`).
    ///
    /// Eviction promotes the most recently seen replacement-cache entry for
    /// the bucket, if any. Unknown ids are a silent no-op.
    pub fn remove_contact(&mut self, id: &NetworkId, forced: bool) {
        let index = self.bucket_index(id);
        let failed = match self.buckets[index].get_contact_mut(id) {
            Some(contact) => {
                contact.failed_rpcs += 1;
                contact.failed_rpcs
            }
            None => return,
        };
        if forced || failed >= ALLOWED_RPC_FAILS {
            self.buckets[index].remove_contact(id);
            if let Some(cache) = self.replacement_cache.get_mut(&index) {
                if let Some(pos) = cache.iter().position(|c| &c.network_id == id) {
                    cache.remove(pos);
                }
                if let Some(replacement) = cache.pop() {
                    let _ = self.buckets[index].add_contact(replacement);
                }
            }
            debug!(peer = %id, forced, "evicted contact");
        }
    }

    /// Ban a peer: force-remove it, purge it from every replacement cache
    /// and bar its id from every future add.
    pub fn blacklist(&mut self, contact: &Contact) {
        self.remove_contact(&contact.network_id, true);
        for cache in self.replacement_cache.values_mut() {
            cache.retain(|c| c.network_id != contact.network_id);
        }
        self.blacklist.insert(contact.network_id.clone());
        warn!(peer = %contact.network_id, "blacklisted peer");
    }

    /// Update the last-accessed timestamp of the bucket covering `key`.
    pub fn touch_bucket(&mut self, key: &NetworkId) {
        let index = self.bucket_index(key);
        self.buckets[index].last_accessed = self.clock.now();
    }

    /// Ids to look up in order to refresh stale buckets, starting at
    /// `start_index`. Every bucket unrefreshed for [`REFRESH_TIMEOUT`] (or
    /// every bucket, when `force`) contributes one id drawn uniformly from
    /// its range.
    pub fn get_refresh_list(&self, start_index: usize, force: bool) -> Vec<NetworkId> {
        let now = self.clock.now();
        let mut rng = rand::thread_rng();
        let mut refresh_ids = Vec::new();
        for bucket in self.buckets.iter().skip(start_index) {
            if force || now - bucket.last_accessed >= REFRESH_TIMEOUT {
                let value = rng.gen_biguint_range(bucket.range_min(), bucket.range_max());
                if let Ok(id) = NetworkId::from_biguint(value) {
                    refresh_ids.push(id);
                }
            }
        }
        refresh_ids
    }
}
