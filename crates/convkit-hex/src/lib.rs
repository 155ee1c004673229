//! Hex encoding/decoding for convkit.
//!
//! Encoding supports upper/lower case, per-byte `0x` or `\x` prefixes,
//! separators and fixed-width rows. Decoding accepts any of those layouts
//! back, so output can be pasted straight into the decoder.

use convkit_error::{ConvertError, Result};
use serde::{Deserialize, Serialize};

/// Letter case for hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexCase {
    #[default]
    Lower,
    Upper,
}

/// Separator placed between bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexSeparator {
    #[default]
    None,
    Space,
    Colon,
    Dash,
    Comma,
    Newline,
}

impl HexSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            HexSeparator::None => "",
            HexSeparator::Space => " ",
            HexSeparator::Colon => ":",
            HexSeparator::Dash => "-",
            HexSeparator::Comma => ", ",
            HexSeparator::Newline => "\n",
        }
    }
}

/// Prefix written before every byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HexPrefix {
    #[default]
    None,
    /// `0x48`
    ZeroX,
    /// `\x48`
    Escape,
}

impl HexPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            HexPrefix::None => "",
            HexPrefix::ZeroX => "0x",
            HexPrefix::Escape => "\\x",
        }
    }
}

/// Formatting options for the hex converter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HexOptions {
    pub case: HexCase,
    pub separator: HexSeparator,
    pub prefix: HexPrefix,
    /// Start a new line after this many bytes
    pub bytes_per_line: Option<usize>,
}

/// Encodes bytes to a hex string using the given layout
pub fn encode(data: &[u8], opts: &HexOptions) -> String {
    let plain = opts.separator == HexSeparator::None
        && opts.prefix == HexPrefix::None
        && opts.bytes_per_line.is_none();
    if plain {
        return match opts.case {
            HexCase::Lower => hex::encode(data),
            HexCase::Upper => hex::encode_upper(data),
        };
    }

    let per_line = opts.bytes_per_line.filter(|n| *n > 0).unwrap_or(usize::MAX);
    let mut out = String::with_capacity(data.len() * 4);
    for (row_idx, row) in data.chunks(per_line.min(data.len().max(1))).enumerate() {
        if row_idx > 0 {
            out.push('\n');
        }
        for (i, byte) in row.iter().enumerate() {
            if i > 0 {
                out.push_str(opts.separator.as_str());
            }
            out.push_str(opts.prefix.as_str());
            out.extend(byte_to_hex(*byte, opts.case));
        }
    }
    tracing::debug!(input_len = data.len(), output_len = out.len(), "hex encode");
    out
}

/// Encodes a string's UTF-8 bytes to hex
pub fn encode_text(text: &str, opts: &HexOptions) -> String {
    encode(text.as_bytes(), opts)
}

/// Decodes hex to bytes.
///
/// Whitespace, `:`, `-` and `,` are ignored, and a `0x`/`0X`/`\x` prefix is
/// skipped wherever a new byte starts. Positions in errors are character
/// positions in `encoded`.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let chars: Vec<char> = encoded.chars().collect();
    let mut compact = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() || matches!(c, ':' | '-' | ',') {
            i += 1;
            continue;
        }
        let at_byte_boundary = compact.len() % 2 == 0;
        if at_byte_boundary
            && matches!(c, '0' | '\\')
            && matches!(chars.get(i + 1), Some('x' | 'X'))
        {
            i += 2;
            continue;
        }
        if !c.is_ascii_hexdigit() {
            return Err(ConvertError::InvalidHex {
                character: c,
                position: i,
            });
        }
        compact.push(c);
        i += 1;
    }

    let bytes = hex::decode(&compact).map_err(|_| ConvertError::OddHexLength(compact.len()))?;
    tracing::debug!(input_len = encoded.len(), output_len = bytes.len(), "hex decode");
    Ok(bytes)
}

/// Decodes hex to a UTF-8 string
pub fn decode_text(encoded: &str) -> Result<String> {
    Ok(String::from_utf8(decode(encoded)?)?)
}

/// Validates if a string is readable as hex
pub fn is_valid_hex(encoded: &str) -> bool {
    decode(encoded).is_ok()
}

/// Converts a single byte to its two hex digits
pub fn byte_to_hex(byte: u8, case: HexCase) -> [char; 2] {
    const LOWER: &[u8; 16] = b"0123456789abcdef";
    const UPPER: &[u8; 16] = b"0123456789ABCDEF";
    let table = match case {
        HexCase::Lower => LOWER,
        HexCase::Upper => UPPER,
    };
    [
        table[(byte >> 4) as usize] as char,
        table[(byte & 0x0f) as usize] as char,
    ]
}

/// Converts a hex character to a nibble (4 bits)
pub fn hex_to_nibble(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='f' => Some(c as u8 - b'a' + 10),
        'A'..='F' => Some(c as u8 - b'A' + 10),
        _ => None,
    }
}
