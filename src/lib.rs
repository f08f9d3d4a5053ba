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

//! Kadmos - Kademlia-style distributed hash table core.
//!
//! This crate provides:
//! - 512-bit identifiers with the XOR metric and canonical hex encoding
//! - A deterministic Merkle-style SHA-512 digest over structured values
//! - RSA PKCS#1 v1.5 signed-item envelopes for published values and messages
//! - The k-bucket routing table with splitting, replacement cache and blacklist
//! - The iterative, bounded-parallel FIND_NODE / FIND_VALUE lookup engine
//! - An in-memory datastore with envelope-aware metadata accessors
//! - Monitoring via Prometheus metrics and structured logging
//!
//! The UDP/TCP transport, key management, daemonization and configuration are
//! collaborator concerns; the core consumes them through the
//! [`networking::rpc::Transport`] seam and the [`core::clock::Clock`] trait.

/// Core protocol primitives (identifiers, crypto, routing, lookup, storage).
pub mod core;
/// Observability (metrics, structured logging helpers).
pub mod monitoring;
/// Wire-level message types and the transport seam.
pub mod networking;
