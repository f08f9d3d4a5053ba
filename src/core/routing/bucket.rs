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

//! K-buckets: bounded, LRU-ordered contact lists for one id range.

use crate::core::constants::K;
use crate::core::key::NetworkId;
use crate::core::routing::contact::Contact;
use num_bigint::BigUint;
use thiserror::Error;

/// Bucket-level failures. `Full` never escapes the routing table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BucketError {
    /// The bucket already holds K contacts.
    #[error("bucket is full")]
    Full,
    /// No contact with the requested id.
    #[error("contact not found")]
    NotFound,
}

/// Contacts whose ids fall inside `[range_min, range_max)`, ordered from
/// least recently seen (head) to most recently seen (tail).
#[derive(Clone, Debug)]
pub struct KBucket {
    range_min: BigUint,
    range_max: BigUint,
    contacts: Vec<Contact>,
    /// When the bucket was last involved in traffic (epoch seconds). The
    /// routing table updates this on touch; refresh scans read it.
    pub last_accessed: f64,
}

impl KBucket {
    /// Create an empty bucket covering `[range_min, range_max)`.
    pub fn new(range_min: BigUint, range_max: BigUint) -> Self {
        Self {
            range_min,
            range_max,
            contacts: Vec::new(),
            last_accessed: 0.0,
        }
    }

    /// Inclusive lower bound.
    pub fn range_min(&self) -> &BigUint {
        &self.range_min
    }

    /// Exclusive upper bound.
    pub fn range_max(&self) -> &BigUint {
        &self.range_max
    }

    /// Whether `key` falls inside this bucket's range.
    pub fn key_in_range(&self, key: &NetworkId) -> bool {
        let value = key.as_biguint();
        &self.range_min <= value && value < &self.range_max
    }

    /// The contacts, head (least recently seen) first.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Number of contacts held.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether the bucket holds no contacts.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Whether the bucket is at capacity.
    pub fn is_full(&self) -> bool {
        self.contacts.len() >= K
    }

    /// Whether a contact with this id is present.
    pub fn contains(&self, id: &NetworkId) -> bool {
        self.contacts.iter().any(|c| &c.network_id == id)
    }

    /// Add a contact, or refresh its position if already present.
    ///
    /// A known contact moves to the tail (most recently seen); a new one is
    /// appended while there is room. A full bucket reports
    /// [`BucketError::Full`] so the routing table can split or fall back to
    /// the replacement cache.
    pub fn add_contact(&mut self, contact: Contact) -> Result<(), BucketError> {
        if let Some(pos) = self.contacts.iter().position(|c| *c == contact) {
            self.contacts.remove(pos);
            self.contacts.push(contact);
            return Ok(());
        }
        if self.is_full() {
            return Err(BucketError::Full);
        }
        self.contacts.push(contact);
        Ok(())
    }

    /// Remove the contact with this id. Absent ids are a silent no-op.
    pub fn remove_contact(&mut self, id: &NetworkId) {
        self.contacts.retain(|c| &c.network_id != id);
    }

    /// Look up a contact by id.
    pub fn get_contact(&self, id: &NetworkId) -> Result<&Contact, BucketError> {
        self.contacts
            .iter()
            .find(|c| &c.network_id == id)
            .ok_or(BucketError::NotFound)
    }

    /// Mutable lookup, for liveness bookkeeping.
    pub fn get_contact_mut(&mut self, id: &NetworkId) -> Option<&mut Contact> {
        self.contacts.iter_mut().find(|c| &c.network_id == id)
    }

    /// Up to `count` contacts in head order, skipping `exclude`.
    pub fn get_contacts(&self, count: usize, exclude: Option<&NetworkId>) -> Vec<Contact> {
        self.contacts
            .iter()
            .filter(|c| exclude.map_or(true, |id| &c.network_id != id))
            .take(count)
            .cloned()
            .collect()
    }

    /// Shrink this bucket to `[range_min, mid)` and return a new bucket
    /// covering `[mid, range_max)` holding the contacts that belong there.
    /// Relative contact order is preserved on both sides.
    pub(crate) fn split_off_upper(&mut self, mid: BigUint) -> KBucket {
        let (upper, lower): (Vec<Contact>, Vec<Contact>) = self
            .contacts
            .drain(..)
            .partition(|c| c.network_id.as_biguint() >= &mid);
        self.contacts = lower;
        let upper_bucket = KBucket {
            range_min: mid.clone(),
            range_max: std::mem::replace(&mut self.range_max, mid),
            contacts: upper,
            last_accessed: 0.0,
        };
        upper_bucket
    }
}
