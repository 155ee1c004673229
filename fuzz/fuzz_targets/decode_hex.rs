//! Fuzz harness for the lenient hex decoder

#![no_main]

use convkit_hex::{HexOptions, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(bytes) = decode(input) {
        assert_eq!(decode(&encode(&bytes, &HexOptions::default())).ok(), Some(bytes));
    }
});
