//! Small helpers for building fixtures in tests.
//!
//! Keeping these in a microcrate avoids copy-paste across the converter
//! and generator property tests.

pub mod proptest;

use std::io::Write;
use tempfile::NamedTempFile;

/// Write `contents` to a fresh temporary file and return its handle.
///
/// The file is removed when the handle is dropped.
pub fn temp_input_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Mixed-script sample text covering 1, 2, 3 and 4 byte UTF-8 sequences.
pub const MULTILINGUAL_SAMPLE: &str = "Hi é € 😀";
