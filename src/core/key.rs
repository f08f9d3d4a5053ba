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

//! 512-bit network identifiers and the XOR distance metric.
//!
//! Identifiers are unsigned integers in `[0, 2^512)`, canonically rendered as
//! a `0x`-prefixed lowercase hex string. Distance between two identifiers is
//! their bitwise XOR compared as an unsigned integer; every notion of
//! "closer" in the crate reduces to this.

use num_bigint::BigUint;
use num_traits::One;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Identifier parsing/validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The input is not a hex-encoded unsigned integer.
    #[error("malformed hex key")]
    Malformed,
    /// The value falls outside the `[0, 2^512)` key space.
    #[error("key out of range")]
    OutOfRange,
}

/// Exclusive upper bound of the identifier space (`2^512`).
pub fn id_space_max() -> &'static BigUint {
    static MAX: OnceLock<BigUint> = OnceLock::new();
    MAX.get_or_init(|| BigUint::one() << 512usize)
}

/// A 512-bit identifier for a node or a value in the network.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkId(BigUint);

impl NetworkId {
    /// Parse a hex string, with or without a `0x`/`0X` prefix. Rejects
    /// malformed input and values at or above `2^512`.
    pub fn from_hex(raw: &str) -> Result<Self, KeyError> {
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        let value =
            BigUint::parse_bytes(digits.as_bytes(), 16).ok_or(KeyError::Malformed)?;
        Self::from_biguint(value)
    }

    /// Build from an already-numeric value, range-checked.
    pub fn from_biguint(value: BigUint) -> Result<Self, KeyError> {
        if &value >= id_space_max() {
            return Err(KeyError::OutOfRange);
        }
        Ok(Self(value))
    }

    /// Derive the identifier for a peer from its public key: the SHA-512 of
    /// the key's ASCII (PEM) form, read as a 512-bit integer.
    pub fn from_public_key(public_key: &str) -> Self {
        let digest = Sha512::digest(public_key.as_bytes());
        Self(BigUint::from_bytes_be(&digest))
    }

    /// Canonical `0x`-prefixed lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        format!("{:#x}", self.0)
    }

    /// XOR distance to another identifier.
    pub fn distance(&self, other: &NetworkId) -> BigUint {
        &self.0 ^ &other.0
    }

    /// The numeric value.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for NetworkId {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl Serialize for NetworkId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NetworkId::from_hex(&raw).map_err(de::Error::custom)
    }
}
