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

//! Signed-item envelopes.
//!
//! Every published value and every inter-peer message carries a metadata
//! record under the reserved [`ENVELOPE_KEY`] field: publication timestamp,
//! expiry, protocol version, the publisher's PEM public key and an RSA
//! PKCS#1 v1.5 / SHA-512 signature over the canonical digest of the object
//! with the signature field absent. The signature travels as standard
//! padded Base64 so the envelope survives text-safe transports.

use crate::core::clock::Clock;
use crate::core::constants::VERSION;
use crate::core::crypto::digest::digest;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::sha2::Sha512;
use rsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rsa::signature::SignatureEncoding;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reserved metadata field attached to signed items and messages.
pub const ENVELOPE_KEY: &str = "_p4p2p";

/// Signing errors. Verification never errors; it reports `false`.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Only mappings can carry an envelope.
    #[error("item is not a mapping")]
    NotAMapping,
    /// The private key did not parse as PKCS#8 or PKCS#1 PEM.
    #[error("invalid private key")]
    BadPrivateKey,
    /// Signature generation failed.
    #[error("signing failed")]
    Signing,
}

/// Return a signed copy of `item`.
///
/// The copy gains an envelope with the current timestamp, an expiry of
/// `timestamp + ttl` when `ttl` is positive (0.0 otherwise, meaning "never
/// expires"), the crate version and the publisher's public key, plus the
/// Base64 signature over the canonical digest of everything else. The input
/// item is left untouched.
pub fn get_signed_item(
    item: &Value,
    public_key_pem: &str,
    private_key_pem: &str,
    ttl: Option<f64>,
    clock: &dyn Clock,
) -> Result<Value, EnvelopeError> {
    let fields = item.as_object().ok_or(EnvelopeError::NotAMapping)?;

    let timestamp = clock.now();
    let expires = match ttl {
        Some(secs) if secs > 0.0 => timestamp + secs,
        _ => 0.0,
    };

    let mut meta = Map::new();
    meta.insert("timestamp".into(), float_value(timestamp));
    meta.insert("expires".into(), float_value(expires));
    meta.insert("version".into(), Value::String(VERSION.to_owned()));
    meta.insert(
        "public_key".into(),
        Value::String(public_key_pem.to_owned()),
    );

    let mut signed = fields.clone();
    signed.insert(ENVELOPE_KEY.to_owned(), Value::Object(meta));
    let mut signed = Value::Object(signed);

    let root = digest(&signed);
    let private = RsaPrivateKey::from_pkcs8_pem(private_key_pem)
        .ok()
        .or_else(|| RsaPrivateKey::from_pkcs1_pem(private_key_pem).ok())
        .ok_or(EnvelopeError::BadPrivateKey)?;
    let signer = SigningKey::<Sha512>::new(private);
    let signature: Signature = signer
        .sign_prehash(&root)
        .map_err(|_| EnvelopeError::Signing)?;

    if let Some(meta) = signed
        .get_mut(ENVELOPE_KEY)
        .and_then(Value::as_object_mut)
    {
        meta.insert(
            "signature".into(),
            Value::String(BASE64.encode(signature.to_bytes())),
        );
    }
    Ok(signed)
}

/// Sign an inter-peer message: identical to item signing with no ttl, so the
/// envelope carries `expires = 0.0`.
pub fn get_signed_message(
    message: &Value,
    public_key_pem: &str,
    private_key_pem: &str,
    clock: &dyn Clock,
) -> Result<Value, EnvelopeError> {
    get_signed_item(message, public_key_pem, private_key_pem, None, clock)
}

/// Check a signed item or message against the public key it names.
///
/// Total: malformed envelopes, undecodable keys or signatures and every
/// parse failure simply report `false`.
pub fn verify_item(item: &Value) -> bool {
    verify_inner(item).unwrap_or(false)
}

fn verify_inner(item: &Value) -> Option<bool> {
    let fields = item.as_object()?;
    let mut unsigned = fields.clone();

    let public_key_pem;
    let raw_signature;
    {
        let meta = unsigned.get_mut(ENVELOPE_KEY)?.as_object_mut()?;
        let removed = meta.remove("signature")?;
        raw_signature = removed.as_str()?.to_owned();
        public_key_pem = meta.get("public_key")?.as_str()?.to_owned();
    }

    let signature_bytes = BASE64.decode(raw_signature.as_bytes()).ok()?;
    let signature = Signature::try_from(signature_bytes.as_slice()).ok()?;
    let public = RsaPublicKey::from_public_key_pem(&public_key_pem)
        .ok()
        .or_else(|| RsaPublicKey::from_pkcs1_pem(&public_key_pem).ok())?;

    let root = digest(&Value::Object(unsigned));
    let verifier = VerifyingKey::<Sha512>::new(public);
    Some(verifier.verify_prehash(&root, &signature).is_ok())
}

/// Envelope floats are plain JSON numbers; non-finite values cannot occur
/// because the inputs are finite clock readings.
fn float_value(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
