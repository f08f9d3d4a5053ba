#![no_main]

use libfuzzer_sys::fuzz_target;

use kadmos::core::crypto::digest::digest;

fuzz_target!(|data: &[u8]| {
    // Any JSON document digests without panicking, deterministically.
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let first = digest(&value);
        let second = digest(&value);
        assert_eq!(first, second);
    }
});
