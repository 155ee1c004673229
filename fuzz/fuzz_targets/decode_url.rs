//! Fuzz harness for percent-decoding and URL parsing

#![no_main]

use convkit_url::{UrlMode, decode, encode, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    for mode in [UrlMode::Component, UrlMode::Uri, UrlMode::Form] {
        if let Ok(text) = decode(input, mode) {
            assert_eq!(decode(&encode(&text, mode), mode).ok(), Some(text));
        }
    }
    let _ = parse(input);
});
