//! Fuzz harness for UTF-8 byte listings in every notation

#![no_main]

use convkit_utf8::{ByteFormat, decode, parse_bytes, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // raw bytes go straight to the validator
    let _ = validate(data);

    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    for format in [ByteFormat::Hex, ByteFormat::Decimal, ByteFormat::Binary, ByteFormat::Escaped] {
        let _ = parse_bytes(input, format);
        let _ = decode(input, format);
    }
});
