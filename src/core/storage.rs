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

//! Local datastore for published values.
//!
//! Values are stored alongside the local update time; the publisher's key
//! and the original publication time are read through the item's envelope.
//! The base store is an in-memory map; durable backends are a collaborator
//! concern behind the same trait.

use crate::core::clock::Clock;
use crate::core::crypto::envelope::ENVELOPE_KEY;
use crate::core::key::NetworkId;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Key-to-signed-item storage with envelope-aware metadata accessors.
pub trait DataStore: Send {
    /// The signed item stored under `key`.
    fn get(&self, key: &NetworkId) -> Option<&Value>;

    /// Store a signed item, stamping the local update time.
    fn set(&mut self, key: NetworkId, item: Value);

    /// Remove and return the item stored under `key`.
    fn remove(&mut self, key: &NetworkId) -> Option<Value>;

    /// Keys currently held.
    fn keys(&self) -> Vec<NetworkId>;

    /// Number of items held.
    fn len(&self) -> usize;

    /// Whether the store holds nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When the item under `key` was last written locally (epoch seconds).
    fn updated(&self, key: &NetworkId) -> Option<f64>;

    /// The publisher's public key, from the stored item's envelope.
    fn publisher(&self, key: &NetworkId) -> Option<String> {
        self.get(key)?
            .get(ENVELOPE_KEY)?
            .get("public_key")?
            .as_str()
            .map(str::to_owned)
    }

    /// The original publication time claimed by the publisher, from the
    /// stored item's envelope.
    fn created(&self, key: &NetworkId) -> Option<f64> {
        self.get(key)?.get(ENVELOPE_KEY)?.get("timestamp")?.as_f64()
    }
}

/// In-memory datastore.
pub struct MemoryStore {
    entries: BTreeMap<NetworkId, (Value, f64)>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create an empty store using the given time source for update stamps.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: BTreeMap::new(),
            clock,
        }
    }

    /// Iterate over `(key, item, last_updated)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&NetworkId, &Value, f64)> {
        self.entries
            .iter()
            .map(|(key, (item, updated))| (key, item, *updated))
    }
}

impl DataStore for MemoryStore {
    fn get(&self, key: &NetworkId) -> Option<&Value> {
        self.entries.get(key).map(|(item, _)| item)
    }

    fn set(&mut self, key: NetworkId, item: Value) {
        let updated = self.clock.now();
        self.entries.insert(key, (item, updated));
    }

    fn remove(&mut self, key: &NetworkId) -> Option<Value> {
        self.entries.remove(key).map(|(item, _)| item)
    }

    fn keys(&self) -> Vec<NetworkId> {
        self.entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn updated(&self, key: &NetworkId) -> Option<f64> {
        self.entries.get(key).map(|(_, updated)| *updated)
    }
}
