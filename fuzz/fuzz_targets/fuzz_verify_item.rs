#![no_main]

use libfuzzer_sys::fuzz_target;

use kadmos::core::crypto::envelope::verify_item;

fuzz_target!(|data: &[u8]| {
    // Verification is total: untrusted input reports false, never panics.
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = verify_item(&value);
    }
});
