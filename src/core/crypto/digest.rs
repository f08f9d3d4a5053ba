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

//! Deterministic Merkle-style digest over structured values.
//!
//! Two peers must produce identical bytes for the same value, so every
//! signature computed over the digest verifies across implementations.
//! The rules, per node kind:
//!
//! - mapping: concatenate `hex(digest(key)) || hex(digest(value))` for every
//!   key in ascending UTF-8 order, then SHA-512 the concatenation
//! - sequence: concatenate `hex(digest(element))` in order, then SHA-512
//! - null: SHA-512 of the literal `null`
//! - boolean: SHA-512 of `true` / `false`
//! - number: SHA-512 of the decimal rendering (shortest round-trip form for
//!   floats, plain decimal for integers)
//! - string: SHA-512 of its UTF-8 bytes
//!
//! Mapping keys are strings by construction of [`serde_json::Value`], which
//! discharges the "reject non-string keys" rule at the type level. NaN and
//! the infinities are not representable either, so the digest is total.

use serde_json::Value;
use sha2::{Digest, Sha512};

/// Number of bytes in a digest.
pub const DIGEST_LEN: usize = 64;

/// SHA-512 root digest of a structured value.
pub fn digest(value: &Value) -> [u8; DIGEST_LEN] {
    Sha512::digest(seed_of(value)).into()
}

/// Lowercase hex form of [`digest`].
pub fn hex_digest(value: &Value) -> String {
    hex::encode(digest(value))
}

/// The byte string a node's digest is computed over.
///
/// Note the empty mapping and the empty sequence both seed with zero bytes
/// and therefore share the digest of the empty string.
fn seed_of(value: &Value) -> Vec<u8> {
    match value {
        Value::Null => b"null".to_vec(),
        Value::Bool(true) => b"true".to_vec(),
        Value::Bool(false) => b"false".to_vec(),
        Value::Number(n) => n.to_string().into_bytes(),
        Value::String(s) => s.clone().into_bytes(),
        Value::Array(items) => {
            let mut seed = String::with_capacity(items.len() * DIGEST_LEN * 2);
            for item in items {
                seed.push_str(&hex_digest(item));
            }
            seed.into_bytes()
        }
        Value::Object(map) => {
            // Sorted explicitly rather than relying on the map's backing
            // store, so the bytes stay stable under `preserve_order` builds.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            let mut seed = String::with_capacity(keys.len() * DIGEST_LEN * 4);
            for key in keys {
                seed.push_str(&hex::encode(Sha512::digest(key.as_bytes())));
                if let Some(child) = map.get(key.as_str()) {
                    seed.push_str(&hex_digest(child));
                }
            }
            seed.into_bytes()
        }
    }
}
