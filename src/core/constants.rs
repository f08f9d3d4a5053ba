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

//! Network tunables. Naming and the suggested defaults follow the original
//! Kademlia paper wherever a concept maps onto it.

/// Degree of parallelism in network calls: the maximum number of lookup RPCs
/// in flight at any one time.
pub const ALPHA: usize = 3;

/// Maximum number of contacts stored in a bucket. Must be an even number.
pub const K: usize = 20;

/// Default maximum duration allowed for a single lookup (seconds).
pub const LOOKUP_TIMEOUT: f64 = 600.0;

/// Timeout for a single network call (seconds).
pub const RPC_TIMEOUT: f64 = 5.0;

/// Timeout for receiving a complete message once a connection is made
/// (seconds). Keeps the pending-request map free of stale handles.
pub const RESPONSE_TIMEOUT: f64 = 1800.0;

/// How long an unused bucket may go without traffic before it is refreshed
/// (seconds).
pub const REFRESH_TIMEOUT: f64 = 3600.0;

/// How long to wait before a node replicates any data it stores (seconds).
pub const REPLICATE_INTERVAL: f64 = REFRESH_TIMEOUT;

/// How long to wait between checks for stale buckets or data that needs
/// republishing (seconds).
pub const REFRESH_INTERVAL: f64 = REFRESH_TIMEOUT / 6.0;

/// Number of failed RPCs tolerated for a peer. At or beyond this threshold
/// the contact is evicted from the routing table.
pub const ALLOWED_RPC_FAILS: u32 = 5;

/// Number of nodes used to store a value in the network.
pub const DUPLICATION_COUNT: usize = K;

/// Seconds added to a value's creation time to derive its expiry. A negative
/// value denotes no default expiry.
pub const EXPIRY_DURATION: f64 = -1.0;

/// Protocol version reported in signed envelopes.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
