//! Fuzz harness for the Base64 decoder
//!
//! Any text must either decode or return an error; decoded bytes must
//! re-encode to something the decoder accepts.

#![no_main]

use convkit_base64::{Base64Options, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    for opts in [Base64Options::default(), Base64Options::url_safe(), Base64Options::mime()] {
        if let Ok(bytes) = decode(input, &opts) {
            let again = decode(&encode(&bytes, &opts), &opts).expect("re-encoded output decodes");
            assert_eq!(again, bytes);
        }
    }
});
