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

//! Peer contacts: the identity and liveness record for another node.

use crate::core::key::NetworkId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Another node on the network.
///
/// The identity half (id derived from the public key, address, version) is
/// settled at construction; the liveness half (`last_seen`, `failed_rpcs`)
/// mutates with every RPC outcome. Equality is by `network_id` only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    /// Identifier, derived from `public_key`.
    pub network_id: NetworkId,
    /// The peer's public key in PEM form.
    pub public_key: String,
    /// IP address the peer was last reached at.
    pub ip_address: IpAddr,
    /// Port the peer was last reached at.
    pub port: u16,
    /// Protocol version the peer reported.
    pub version: String,
    /// When the last connection with the peer was made (epoch seconds;
    /// 0.0 for never).
    pub last_seen: f64,
    /// Failed RPCs against this peer. Reset whenever the contact re-enters
    /// the routing table off the back of a successful RPC; eviction fires at
    /// the threshold.
    pub failed_rpcs: u32,
}

impl Contact {
    /// Build a contact from its public key; the network id is the SHA-512 of
    /// the key's ASCII form.
    pub fn new(
        public_key: &str,
        ip_address: IpAddr,
        port: u16,
        version: &str,
        last_seen: f64,
    ) -> Self {
        Self {
            network_id: NetworkId::from_public_key(public_key),
            public_key: public_key.to_owned(),
            ip_address,
            port,
            version: version.to_owned(),
            last_seen,
            failed_rpcs: 0,
        }
    }

    /// Build a contact from a bare identifier. Bootstrap shim: real peers
    /// always derive their id from a public key, so the key field stays
    /// empty here.
    pub fn with_network_id(
        network_id: NetworkId,
        ip_address: IpAddr,
        port: u16,
        version: &str,
        last_seen: f64,
    ) -> Self {
        Self {
            network_id,
            public_key: String::new(),
            ip_address,
            port,
            version: version.to_owned(),
            last_seen,
            failed_rpcs: 0,
        }
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.network_id == other.network_id
    }
}

impl Eq for Contact {}

impl PartialEq<NetworkId> for Contact {
    fn eq(&self, other: &NetworkId) -> bool {
        &self.network_id == other
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.network_id,
            self.ip_address,
            self.port,
            self.version,
            self.last_seen,
            self.failed_rpcs
        )
    }
}
