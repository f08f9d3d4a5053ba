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

//! Datastore mapping behaviour and envelope-aware metadata accessors.

use kadmos::core::clock::FixedClock;
use kadmos::core::key::NetworkId;
use kadmos::core::storage::{DataStore, MemoryStore};
use serde_json::json;
use std::sync::Arc;

fn signed_item() -> serde_json::Value {
    json!({
        "name": "a value",
        "_p4p2p": {
            "timestamp": 123.456,
            "expires": 0.0,
            "version": "0.1.0",
            "public_key": "PEM PUBLIC KEY",
            "signature": "c2lnbmF0dXJl",
        }
    })
}

#[test]
fn set_stamps_the_local_update_time() {
    let clock = Arc::new(FixedClock::at(500.0));
    let mut store = MemoryStore::new(clock.clone());
    let key = NetworkId::from(1u64);
    store.set(key.clone(), signed_item());
    assert_eq!(store.updated(&key), Some(500.0));

    // Re-publishing later refreshes the stamp.
    clock.advance(100.0);
    store.set(key.clone(), signed_item());
    assert_eq!(store.updated(&key), Some(600.0));
}

#[test]
fn metadata_reads_through_the_envelope() {
    let mut store = MemoryStore::new(Arc::new(FixedClock::at(500.0)));
    let key = NetworkId::from(2u64);
    store.set(key.clone(), signed_item());

    assert_eq!(store.publisher(&key), Some("PEM PUBLIC KEY".to_owned()));
    assert_eq!(store.created(&key), Some(123.456));
    assert_eq!(
        store.get(&key).and_then(|v| v.get("name")),
        Some(&json!("a value"))
    );
}

#[test]
fn missing_keys_and_envelopes_read_as_none() {
    let mut store = MemoryStore::new(Arc::new(FixedClock::at(0.0)));
    let absent = NetworkId::from(3u64);
    assert_eq!(store.get(&absent), None);
    assert_eq!(store.updated(&absent), None);
    assert_eq!(store.publisher(&absent), None);
    assert_eq!(store.created(&absent), None);

    // A bare value without an envelope has no metadata to expose.
    let bare = NetworkId::from(4u64);
    store.set(bare.clone(), json!({"just": "data"}));
    assert_eq!(store.publisher(&bare), None);
    assert_eq!(store.created(&bare), None);
}

#[test]
fn mapping_operations_behave_like_a_dictionary() {
    let mut store = MemoryStore::new(Arc::new(FixedClock::at(0.0)));
    assert!(store.is_empty());

    let a = NetworkId::from(10u64);
    let b = NetworkId::from(11u64);
    store.set(a.clone(), json!({"v": 1}));
    store.set(b.clone(), json!({"v": 2}));
    assert_eq!(store.len(), 2);
    assert_eq!(store.keys(), vec![a.clone(), b.clone()]);

    // Overwriting does not grow the store.
    store.set(a.clone(), json!({"v": 3}));
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&a), Some(&json!({"v": 3})));

    let removed = store.remove(&a);
    assert_eq!(removed, Some(json!({"v": 3})));
    assert_eq!(store.len(), 1);
    assert_eq!(store.remove(&a), None);
}

#[test]
fn iteration_yields_entries_in_key_order() {
    let mut store = MemoryStore::new(Arc::new(FixedClock::at(9.0)));
    for id in [30u64, 10, 20] {
        store.set(NetworkId::from(id), json!({"id": id}));
    }
    let keys: Vec<NetworkId> = store.iter().map(|(k, _, _)| k.clone()).collect();
    assert_eq!(
        keys,
        vec![
            NetworkId::from(10u64),
            NetworkId::from(20u64),
            NetworkId::from(30u64)
        ]
    );
    for (_, _, updated) in store.iter() {
        assert_eq!(updated, 9.0);
    }
}
