//! Fuzz harness for the binary digit decoder

#![no_main]

use convkit_binary::{BinaryOptions, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(bytes) = decode(input) {
        assert_eq!(decode(&encode(&bytes, &BinaryOptions::default())).ok(), Some(bytes));
    }
});
