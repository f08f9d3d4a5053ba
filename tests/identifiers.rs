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

//! Identifier encoding/metric behaviour and contact identity semantics.

use kadmos::core::key::{id_space_max, KeyError, NetworkId};
use kadmos::core::routing::contact::Contact;
use num_bigint::BigUint;
use num_traits::One;
use std::net::{IpAddr, Ipv4Addr};

fn addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1))
}

#[test]
fn hex_parsing_accepts_optional_prefix_and_case() {
    let bare = NetworkId::from_hex("abc").unwrap();
    let prefixed = NetworkId::from_hex("0xabc").unwrap();
    let upper = NetworkId::from_hex("0XABC").unwrap();
    assert_eq!(bare, prefixed);
    assert_eq!(bare, upper);
    assert_eq!(bare, NetworkId::from(0xabc_u64));
}

#[test]
fn hex_rendering_is_prefixed_lowercase() {
    assert_eq!(NetworkId::from(0xabc_u64).to_hex(), "0xabc");
    assert_eq!(NetworkId::from(0u64).to_hex(), "0x0");
}

#[test]
fn malformed_hex_is_rejected() {
    assert_eq!(NetworkId::from_hex(""), Err(KeyError::Malformed));
    assert_eq!(NetworkId::from_hex("0x"), Err(KeyError::Malformed));
    assert_eq!(NetworkId::from_hex("xyz"), Err(KeyError::Malformed));
    assert_eq!(NetworkId::from_hex("-1"), Err(KeyError::Malformed));
}

#[test]
fn out_of_range_values_are_rejected() {
    // 2^512 is one past the top of the id space.
    let too_big = format!("1{}", "0".repeat(128));
    assert_eq!(NetworkId::from_hex(&too_big), Err(KeyError::OutOfRange));
    assert_eq!(
        NetworkId::from_biguint(id_space_max().clone()),
        Err(KeyError::OutOfRange)
    );
    // The largest representable id parses.
    let max = "f".repeat(128);
    assert!(NetworkId::from_hex(&max).is_ok());
}

#[test]
fn distance_is_xor() {
    let a = NetworkId::from(0b1100_u64);
    let b = NetworkId::from(0b1010_u64);
    assert_eq!(a.distance(&b), BigUint::from(0b0110_u32));
    assert_eq!(a.distance(&a), BigUint::from(0u32));
    // Symmetric.
    assert_eq!(a.distance(&b), b.distance(&a));
}

#[test]
fn serde_round_trips_as_hex_string() {
    let id = NetworkId::from_hex("0xdeadbeef").unwrap();
    let encoded = serde_json::to_string(&id).unwrap();
    assert_eq!(encoded, "\"0xdeadbeef\"");
    let decoded: NetworkId = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, id);
    // Out-of-range wire input must not decode.
    let bad = format!("\"1{}\"", "0".repeat(128));
    assert!(serde_json::from_str::<NetworkId>(&bad).is_err());
}

#[test]
fn contact_id_is_derived_from_the_public_key() {
    let contact = Contact::new("pretend-pem", addr(), 9999, "0.1", 0.0);
    assert_eq!(
        contact.network_id,
        NetworkId::from_public_key("pretend-pem")
    );
    assert_eq!(contact.failed_rpcs, 0);
}

#[test]
fn contact_equality_is_by_id_only() {
    let a = Contact::new("key-one", addr(), 9999, "0.1", 0.0);
    let mut a_elsewhere = Contact::new("key-one", addr(), 1234, "0.2", 5.0);
    a_elsewhere.failed_rpcs = 3;
    let b = Contact::new("key-two", addr(), 9999, "0.1", 0.0);

    assert_eq!(a, a_elsewhere);
    assert_ne!(a, b);
    // A contact also compares against a bare id.
    assert_eq!(a, NetworkId::from_public_key("key-one"));
    assert_ne!(a, NetworkId::from_public_key("key-two"));
}

#[test]
fn contact_display_carries_all_fields() {
    let contact = Contact::with_network_id(NetworkId::from(0xabc_u64), addr(), 9999, "0.1", 0.0);
    let rendered = contact.to_string();
    assert!(rendered.contains("0xabc"));
    assert!(rendered.contains("192.168.0.1"));
    assert!(rendered.contains("9999"));
    assert!(rendered.contains("0.1"));
}

#[test]
fn distance_to_the_far_end_flips_every_bit() {
    let zero = NetworkId::from(0u64);
    let top = NetworkId::from_biguint(id_space_max() - BigUint::one()).unwrap();
    // Their distance flips every bit.
    assert_eq!(zero.distance(&top), id_space_max() - BigUint::one());
}
