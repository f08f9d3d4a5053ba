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

//! RPC messages the core consumes and the transport seam it drives.
//!
//! The concrete sockets, codecs and retries live with the transport
//! collaborator; the core only needs "send a find request, await a tagged
//! reply". Mis-tagged replies are a protocol-error path handled by the
//! lookup engine, not an exception path.

use crate::core::crypto::envelope::ENVELOPE_KEY;
use crate::core::key::NetworkId;
use crate::core::routing::contact::Contact;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Remote error vocabulary shared by every node on the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The message simply didn't make any sense.
    BadMessage,
    /// The message was parsed but not recognised.
    UnknownMessageType,
    /// The message was recognised but the node hit a problem handling it.
    InternalError,
    /// The message was too big for the node to handle.
    MessageTooBig,
    /// Unsupported version of the protocol.
    UnsupportedProtocol,
    /// The message could not be cryptographically verified.
    UnverifiableProvenance,
}

impl ErrorCode {
    /// Numeric wire code.
    pub fn code(self) -> u8 {
        match self {
            ErrorCode::BadMessage => 1,
            ErrorCode::UnknownMessageType => 2,
            ErrorCode::InternalError => 3,
            ErrorCode::MessageTooBig => 4,
            ErrorCode::UnsupportedProtocol => 5,
            ErrorCode::UnverifiableProvenance => 6,
        }
    }

    /// Parse a numeric wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ErrorCode::BadMessage),
            2 => Some(ErrorCode::UnknownMessageType),
            3 => Some(ErrorCode::InternalError),
            4 => Some(ErrorCode::MessageTooBig),
            5 => Some(ErrorCode::UnsupportedProtocol),
            6 => Some(ErrorCode::UnverifiableProvenance),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::BadMessage => "Bad message",
            ErrorCode::UnknownMessageType => "Unknown message type",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::MessageTooBig => "Message too big",
            ErrorCode::UnsupportedProtocol => "Unsupported protocol",
            ErrorCode::UnverifiableProvenance => "Unverifiable provenance",
        };
        f.write_str(text)
    }
}

/// A value returned for a FIND_VALUE request: the key it was stored under
/// and the signed item (envelope included).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValueMessage {
    /// Key the value was published under.
    pub key: NetworkId,
    /// The signed item, carrying its envelope.
    pub item: Value,
}

impl ValueMessage {
    /// Expiry timestamp from the envelope, if the envelope carries one.
    pub fn expires(&self) -> Option<f64> {
        self.item.get(ENVELOPE_KEY)?.get("expires")?.as_f64()
    }

    /// Whether the value has expired at time `now`. Values with an expiry of
    /// 0.0 (or no readable envelope) never expire.
    pub fn is_expired(&self, now: f64) -> bool {
        match self.expires() {
            Some(expires) => expires > 0.0 && expires < now,
            None => false,
        }
    }
}

/// Closer nodes returned for a find request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodesMessage {
    /// Contacts closer to the requested key, as known by the responder.
    pub nodes: Vec<Contact>,
}

/// Tagged replies a peer may send back for a find request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum FindResponse {
    /// The value stored under the requested key.
    Value(ValueMessage),
    /// Contacts closer to the requested key.
    Nodes(NodesMessage),
}

/// Failures the transport reports for a single request.
#[derive(Debug, Error)]
pub enum RpcError {
    /// No reply within the RPC timeout.
    #[error("request timed out")]
    Timeout,
    /// The connection could not be made or broke mid-exchange.
    #[error("connection failed: {0}")]
    Connection(String),
    /// The remote answered with a protocol error code.
    #[error("remote error: {0}")]
    Remote(ErrorCode),
    /// The request was cancelled locally.
    #[error("request cancelled")]
    Cancelled,
}

/// The kind of find traffic a lookup generates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FindKind {
    /// FIND_NODE: locate the K contacts closest to a key.
    Node,
    /// FIND_VALUE: fetch the value stored under a key, or closer nodes.
    Value,
}

/// The transport collaborator, as seen by the core: fire a find request at a
/// contact and await its tagged reply.
pub trait Transport: Send + Sync {
    /// Send a FIND_NODE / FIND_VALUE for `target` to `contact`.
    fn send_find(
        &self,
        contact: &Contact,
        target: &NetworkId,
        kind: FindKind,
    ) -> BoxFuture<'static, Result<FindResponse, RpcError>>;
}
