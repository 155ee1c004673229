//! UTF-8 byte conversion for convkit.
//!
//! Shows how text is laid out as UTF-8 bytes (per character or as a byte
//! listing) and turns byte listings back into text, rejecting byte
//! sequences that are not valid UTF-8.

use convkit_error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notation used for each byte in a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteFormat {
    /// `e2 82 ac`
    #[default]
    Hex,
    /// `226 130 172`
    Decimal,
    /// `11100010 10000010 10101100`
    Binary,
    /// `\xe2\x82\xac`
    Escaped,
}

/// One Unicode scalar value and its encoded bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharInfo {
    pub ch: char,
    pub code_point: u32,
    pub bytes: Vec<u8>,
}

impl CharInfo {
    pub fn new(ch: char) -> Self {
        let mut buf = [0u8; 4];
        let bytes = ch.encode_utf8(&mut buf).as_bytes().to_vec();
        Self {
            ch,
            code_point: ch as u32,
            bytes,
        }
    }

    /// `U+20AC` style label
    pub fn code_point_label(&self) -> String {
        format!("U+{:04X}", self.code_point)
    }
}

impl fmt::Display for CharInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.code_point_label(),
            self.ch.escape_debug(),
            format_bytes(&self.bytes, ByteFormat::Hex)
        )
    }
}

/// Character and byte counts for a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub chars: usize,
    pub bytes: usize,
}

/// Number of bytes UTF-8 uses for a code point, or `None` if the value is
/// a surrogate or beyond U+10FFFF.
pub fn utf8_len(code_point: u32) -> Option<usize> {
    match code_point {
        0..=0x7f => Some(1),
        0x80..=0x7ff => Some(2),
        0xd800..=0xdfff => None,
        0x800..=0xffff => Some(3),
        0x1_0000..=0x10_ffff => Some(4),
        _ => None,
    }
}

/// Break text into characters with their UTF-8 bytes
pub fn inspect(text: &str) -> Vec<CharInfo> {
    text.chars().map(CharInfo::new).collect()
}

pub fn stats(text: &str) -> TextStats {
    TextStats {
        chars: text.chars().count(),
        bytes: text.len(),
    }
}

/// Render raw bytes in the given notation
pub fn format_bytes(bytes: &[u8], format: ByteFormat) -> String {
    let tokens: Vec<String> = bytes
        .iter()
        .map(|b| match format {
            ByteFormat::Hex => format!("{b:02x}"),
            ByteFormat::Decimal => b.to_string(),
            ByteFormat::Binary => format!("{b:08b}"),
            ByteFormat::Escaped => format!("\\x{b:02x}"),
        })
        .collect();
    match format {
        ByteFormat::Escaped => tokens.concat(),
        _ => tokens.join(" "),
    }
}

/// List the UTF-8 bytes of a text
pub fn encode(text: &str, format: ByteFormat) -> String {
    tracing::debug!(chars = text.chars().count(), bytes = text.len(), ?format, "utf8 encode");
    format_bytes(text.as_bytes(), format)
}

/// Parse a byte listing and decode it as UTF-8
pub fn decode(listing: &str, format: ByteFormat) -> Result<String> {
    let bytes = parse_bytes(listing, format)?;
    let text = validate(&bytes)?.to_string();
    tracing::debug!(bytes = bytes.len(), chars = text.chars().count(), "utf8 decode");
    Ok(text)
}

/// Check that bytes are well-formed UTF-8
pub fn validate(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Parse a byte listing without checking UTF-8 well-formedness.
///
/// Tokens are separated by whitespace or commas. Hex tokens may carry a
/// `0x` prefix and may be a run of digit pairs (`e282ac`). In escaped
/// notation, characters outside `\xNN` escapes stand for their own UTF-8
/// bytes.
pub fn parse_bytes(listing: &str, format: ByteFormat) -> Result<Vec<u8>> {
    if format == ByteFormat::Escaped {
        return parse_escaped(listing);
    }

    let mut bytes = Vec::new();
    for token in listing
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match format {
            ByteFormat::Hex => {
                let digits = token
                    .strip_prefix("0x")
                    .or_else(|| token.strip_prefix("0X"))
                    .unwrap_or(token);
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid_byte(token, "not a hex byte"));
                }
                if digits.len() <= 2 {
                    bytes.push(parse_radix(token, digits, 16)?);
                } else if digits.len() % 2 == 0 {
                    for pair in digits.as_bytes().chunks(2) {
                        // Digits were checked above, pairs are ASCII
                        let pair = std::str::from_utf8(pair).unwrap_or_default();
                        bytes.push(parse_radix(token, pair, 16)?);
                    }
                } else {
                    return Err(invalid_byte(token, "odd number of hex digits"));
                }
            }
            ByteFormat::Decimal => {
                if !token.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid_byte(token, "not a decimal number"));
                }
                let byte = token
                    .parse::<u8>()
                    .map_err(|_| invalid_byte(token, "out of range 0-255"))?;
                bytes.push(byte);
            }
            ByteFormat::Binary => {
                if token.len() > 8 || !token.chars().all(|c| c == '0' || c == '1') {
                    return Err(invalid_byte(token, "not a group of at most 8 bits"));
                }
                bytes.push(parse_radix(token, token, 2)?);
            }
            ByteFormat::Escaped => bytes.extend(parse_escaped(token)?),
        }
    }
    Ok(bytes)
}

fn parse_escaped(listing: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(listing.len());
    let mut rest = listing;
    while let Some(idx) = rest.find("\\x") {
        bytes.extend_from_slice(rest[..idx].as_bytes());
        let after = &rest[idx + 2..];
        let digits: String = after.chars().take(2).collect();
        if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid_byte(
                &format!("\\x{digits}"),
                "escape needs two hex digits",
            ));
        }
        bytes.push(parse_radix(&digits, &digits, 16)?);
        rest = &after[2..];
    }
    bytes.extend_from_slice(rest.as_bytes());
    Ok(bytes)
}

fn parse_radix(token: &str, digits: &str, radix: u32) -> Result<u8> {
    u8::from_str_radix(digits, radix).map_err(|e| invalid_byte(token, &e.to_string()))
}

fn invalid_byte(token: &str, reason: &str) -> ConvertError {
    ConvertError::InvalidByte {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_len_boundaries() {
        assert_eq!(utf8_len(0x00), Some(1));
        assert_eq!(utf8_len(0x7f), Some(1));
        assert_eq!(utf8_len(0x80), Some(2));
        assert_eq!(utf8_len(0x7ff), Some(2));
        assert_eq!(utf8_len(0x800), Some(3));
        assert_eq!(utf8_len(0xd7ff), Some(3));
        assert_eq!(utf8_len(0xd800), None);
        assert_eq!(utf8_len(0xdfff), None);
        assert_eq!(utf8_len(0xe000), Some(3));
        assert_eq!(utf8_len(0xffff), Some(3));
        assert_eq!(utf8_len(0x1_0000), Some(4));
        assert_eq!(utf8_len(0x10_ffff), Some(4));
        assert_eq!(utf8_len(0x11_0000), None);
    }

    #[test]
    fn test_utf8_len_matches_std() {
        for ch in ['a', 'é', '€', '😀'] {
            assert_eq!(utf8_len(ch as u32), Some(ch.len_utf8()));
        }
    }

    #[test]
    fn test_inspect() {
        let chars = inspect("a€");
        assert_eq!(chars.len(), 2);
        assert_eq!(chars[0].bytes, vec![0x61]);
        assert_eq!(chars[1].code_point_label(), "U+20AC");
        assert_eq!(chars[1].bytes, vec![0xe2, 0x82, 0xac]);
        assert_eq!(chars[1].to_string(), "U+20AC\t€\te2 82 ac");
    }

    #[test]
    fn test_inspect_escapes_control_characters() {
        let chars = inspect("\n");
        assert_eq!(chars[0].to_string(), "U+000A\t\\n\t0a");
    }

    #[test]
    fn test_stats() {
        let s = stats(convkit_testkit::MULTILINGUAL_SAMPLE);
        assert_eq!(s.chars, 8);
        assert_eq!(s.bytes, 1 + 1 + 1 + 2 + 1 + 3 + 1 + 4);
    }

    #[test]
    fn test_encode_formats() {
        assert_eq!(encode("é", ByteFormat::Hex), "c3 a9");
        assert_eq!(encode("é", ByteFormat::Decimal), "195 169");
        assert_eq!(encode("é", ByteFormat::Binary), "11000011 10101001");
        insta::assert_snapshot!(encode("é!", ByteFormat::Escaped), @r"\xc3\xa9\x21");
    }

    #[test]
    fn test_decode_formats() {
        assert_eq!(decode("c3 a9", ByteFormat::Hex).unwrap(), "é");
        assert_eq!(decode("0xC3, 0xA9", ByteFormat::Hex).unwrap(), "é");
        assert_eq!(decode("e282ac", ByteFormat::Hex).unwrap(), "€");
        assert_eq!(decode("195 169", ByteFormat::Decimal).unwrap(), "é");
        assert_eq!(decode("11000011 10101001", ByteFormat::Binary).unwrap(), "é");
        assert_eq!(decode("caf\\xc3\\xa9", ByteFormat::Escaped).unwrap(), "café");
    }

    #[test]
    fn test_decode_invalid_sequence_reports_offset() {
        // valid 'A', then a lead byte with a bad continuation
        let err = decode("41 e2 28 a1", ByteFormat::Hex).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"invalid UTF-8 sequence at byte 1");
    }

    #[test]
    fn test_decode_rejects_overlong_and_surrogates() {
        // overlong '/' and encoded U+D800
        assert!(decode("c0 af", ByteFormat::Hex).is_err());
        assert!(decode("ed a0 80", ByteFormat::Hex).is_err());
    }

    #[test]
    fn test_decode_truncated_sequence() {
        let err = decode("61 e2 82", ByteFormat::Hex).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidUtf8 { position: 1 }));
    }

    #[test]
    fn test_decode_bad_tokens() {
        let err = decode("c3 zz", ByteFormat::Hex).unwrap_err();
        assert_eq!(err.to_string(), "invalid byte 'zz': not a hex byte");

        let err = decode("256", ByteFormat::Decimal).unwrap_err();
        assert_eq!(err.to_string(), "invalid byte '256': out of range 0-255");

        let err = decode("70000", ByteFormat::Decimal).unwrap_err();
        assert_eq!(err.to_string(), "invalid byte '70000': out of range 0-255");

        let err = decode("+65", ByteFormat::Decimal).unwrap_err();
        assert_eq!(err.to_string(), "invalid byte '+65': not a decimal number");
        assert_eq!(decode("065", ByteFormat::Decimal).unwrap(), "A");

        assert!(decode("abc", ByteFormat::Hex).is_err());
        assert!(decode("101010101", ByteFormat::Binary).is_err());
        assert!(decode("\\xg1", ByteFormat::Escaped).is_err());
        assert!(decode("\\x4", ByteFormat::Escaped).is_err());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("", ByteFormat::Hex).unwrap(), "");
        assert_eq!(decode("", ByteFormat::Escaped).unwrap(), "");
    }
}
