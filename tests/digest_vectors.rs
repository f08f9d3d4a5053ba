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

//! Canonical digest vectors. The expected values were produced by an
//! independent implementation of the same rules, so they pin the on-wire
//! bytes rather than this crate's own output.

use kadmos::core::crypto::digest::{digest, hex_digest};
use serde_json::{json, Value};

const SHA512_EMPTY: &str = "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e";

#[test]
fn null_hashes_the_json_literal() {
    assert_eq!(
        hex_digest(&Value::Null),
        "04f8ff2682604862e405bf88de102ed7710ac45c1205957625e4ee3e5f5a2241e453614acc451345b91bafc88f38804019c7492444595674e94e8cf4be53817f"
    );
}

#[test]
fn booleans_hash_lowercase_literals() {
    assert_eq!(
        hex_digest(&json!(true)),
        "9120cd5faef07a08e971ff024a3fcbea1e3a6b44142a6d82ca28c6c42e4f852595bcf53d81d776f10541045abdb7c37950629415d0dc66c8d86c64a5606d32de"
    );
    assert_eq!(
        hex_digest(&json!(false)),
        "719fa67eef49c4b2a2b83f0c62bddd88c106aaadb7e21ae057c8802b700e36f81fe3f144812d8b05d66dc663d908b25645e153262cf6d457aa34e684af9e328d"
    );
}

#[test]
fn integers_hash_decimal_renderings() {
    assert_eq!(
        hex_digest(&json!(12345)),
        "3627909a29c31381a071ec27f7c9ca97726182aed29a7ddd2e54353322cfb30abb9e3a6df2ac2c20fe23436311d678564d0c8d305930575f60e2d3d048184d79"
    );
    assert_eq!(
        hex_digest(&json!(-42)),
        "4a7bdaf9d2043b05a31615757659cf84f60e97e162ad6fbc511d3924c9adc84126c1a3eea646cee4f0c560c3f249892b3b29ada60b8f9b4cbfc81c63ee1ce8ad"
    );
}

#[test]
fn floats_hash_shortest_round_trip_renderings() {
    assert_eq!(
        hex_digest(&json!(12345.6789)),
        "dc02339cdeca994beff8df21b2f449421e6aaab532d0d94f6f5a26a20878ba4fd6b659a945197dd2591fec8e855552776ab8e59022c5fb5f87cfdfa3a85db838"
    );
    // A float with no fractional part still renders as a float.
    assert_eq!(
        hex_digest(&json!(3.0)),
        "0abe9634490fd4dbe1a49f62dc5f529b3ff3731edd11b49ce40a94f3b21792d0b4bc9c65ddf716bbab0161238cf4d5007640733324201efe771e76fff16eccaf"
    );
    assert_eq!(
        hex_digest(&json!(0.5)),
        "adb7585493dae6ec351ac02877c2fe4c3f61240dd677a9b91a64ddf931c1b6b01e2a779eba2dd9e96b9d72e13af81a35b64c70390e5ac3d255697bd5037f1531"
    );
}

#[test]
fn integer_and_float_of_same_value_hash_differently() {
    assert_ne!(hex_digest(&json!(3)), hex_digest(&json!(3.0)));
}

#[test]
fn strings_hash_utf8_bytes() {
    assert_eq!(
        hex_digest(&json!("foo")),
        "f7fbba6e0636f890e56fbbf3283e524c6fa3204ae298382d624741d0dc6638326e282c41be5e4254d8820772c5518a2c5a8c0c7f7eda19594a7eb539453e1ed7"
    );
    assert_eq!(
        hex_digest(&json!("café ☕")),
        "72d701fa89a33117db8c9f9c226633a67b0d3d5ae87fa43a321ffbe8635c0a91e0be5c3aa1a000bc03702a7da30d2b91ec22b6e1336198d49e0bd302bc7f9469"
    );
}

#[test]
fn empty_containers_hash_like_the_empty_string() {
    assert_eq!(hex_digest(&json!({})), SHA512_EMPTY);
    assert_eq!(hex_digest(&json!([])), SHA512_EMPTY);
    assert_eq!(hex_digest(&json!("")), SHA512_EMPTY);
}

#[test]
fn sequences_hash_elementwise_in_order() {
    assert_eq!(
        hex_digest(&json!(["bar", 1, 1.234])),
        "cbf50edc0b5155f8cd9280c685c33f72558059193d85ea19f1e28e40149af2ec1668e760388549639061e785f57246e873ba321cd145456c8280d853a6208fb6"
    );
    assert_ne!(
        hex_digest(&json!([1, 2])),
        hex_digest(&json!([2, 1])),
        "element order must matter"
    );
}

#[test]
fn mappings_hash_keys_in_sorted_order() {
    assert_eq!(
        hex_digest(&json!({"b": false, "a": null, "c": true})),
        "8c1d0b45df5f8f6107878cfaa4868cd615f52e0606edd7d263c178a3369aa3fc136b470aafab7e5d676d7eaaac565a87356475cfec28defc291b61ec85782c47"
    );
}

#[test]
fn nested_structures_hash_to_a_root() {
    let value = json!({
        "foo": ["bar", 1, 1.234],
        "baz": {"b": false, "a": null, "c": true},
    });
    assert_eq!(
        hex_digest(&value),
        "ae7c362a7d89038cf52d48d8a6743d95f6c489de63cfc17e7d6681b494cad68c66e1f5f4b755954991e812390cdd951fc0bf5e017131b60f905d0a35d8811f11"
    );
}

#[test]
fn structurally_equal_values_share_a_digest() {
    // Key insertion order is irrelevant; only content counts.
    let a = json!({"x": 1, "y": [true, null], "z": "s"});
    let b = json!({"z": "s", "x": 1, "y": [true, null]});
    assert_eq!(digest(&a), digest(&b));

    let c = json!({"x": 2, "y": [true, null], "z": "s"});
    assert_ne!(digest(&a), digest(&c));
}

#[test]
fn hex_digest_matches_raw_digest() {
    let value = json!({"k": [1, 2, 3]});
    assert_eq!(hex_digest(&value), hex::encode(digest(&value)));
}
