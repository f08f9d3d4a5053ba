#![no_main]

use libfuzzer_sys::fuzz_target;

use kadmos::core::key::NetworkId;

fuzz_target!(|data: &str| {
    // Parsing arbitrary text must never panic, and anything that parses
    // must round-trip through the canonical rendering.
    if let Ok(id) = NetworkId::from_hex(data) {
        let rendered = id.to_hex();
        let reparsed = NetworkId::from_hex(&rendered).expect("canonical form reparses");
        assert_eq!(id, reparsed);
    }
});
