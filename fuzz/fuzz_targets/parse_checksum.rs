//! Fuzz harness for checksum strings (`sha256:<hex>`)

#![no_main]

use convkit_hash::Checksum;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(checksum) = Checksum::parse(input) {
        assert_eq!(Checksum::parse(&checksum.to_string()).ok(), Some(checksum));
    }
});
