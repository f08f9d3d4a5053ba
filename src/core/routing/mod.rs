// Copyright (c) 2026 Kadmos
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Routing: peer contacts, k-buckets and the routing table.

pub mod bucket;
pub mod contact;
pub mod table;

use crate::core::constants::K;
use crate::core::key::NetworkId;
use crate::core::routing::contact::Contact;

/// Sort contacts by ascending XOR distance to `target` and keep at most K.
///
/// The sort is stable, so contacts at equal distance (impossible with unique
/// ids, but the contract matters) keep their insertion order.
pub fn sort_by_distance(mut nodes: Vec<Contact>, target: &NetworkId) -> Vec<Contact> {
    nodes.sort_by_key(|node| node.network_id.distance(target));
    nodes.truncate(K);
    nodes
}
