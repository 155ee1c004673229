//! Fuzz harness for convkit config files in both formats

#![no_main]

use convkit_config::{ConfigFormat, parse_config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let _ = parse_config(input, ConfigFormat::Yaml);
    let _ = parse_config(input, ConfigFormat::Json);
});
