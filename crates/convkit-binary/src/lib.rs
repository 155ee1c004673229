//! Binary digit conversion for convkit.
//!
//! Bytes are written as eight bits, most significant bit first. The reader
//! takes either whitespace-separated groups of up to eight bits or one
//! unbroken bit string whose length is a multiple of eight.

use convkit_error::{ConvertError, Result};
use serde::{Deserialize, Serialize};

/// Separator placed between encoded bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitSeparator {
    None,
    #[default]
    Space,
    Newline,
}

impl BitSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BitSeparator::None => "",
            BitSeparator::Space => " ",
            BitSeparator::Newline => "\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryOptions {
    pub separator: BitSeparator,
}

/// Render one byte as eight binary digits.
pub fn byte_to_bits(byte: u8) -> String {
    format!("{byte:08b}")
}

/// Parse up to eight binary digits into a byte. Shorter groups are treated
/// as if left-padded with zeros.
pub fn bits_to_byte(bits: &str) -> Option<u8> {
    if bits.is_empty() || bits.len() > 8 {
        return None;
    }
    u8::from_str_radix(bits, 2).ok()
}

/// Encodes bytes as binary digit groups
pub fn encode(data: &[u8], opts: &BinaryOptions) -> String {
    let out = data
        .iter()
        .map(|b| byte_to_bits(*b))
        .collect::<Vec<_>>()
        .join(opts.separator.as_str());
    tracing::debug!(input_len = data.len(), output_len = out.len(), "binary encode");
    out
}

/// Encodes a string's UTF-8 bytes as binary
pub fn encode_text(text: &str, opts: &BinaryOptions) -> String {
    encode(text.as_bytes(), opts)
}

/// Decodes binary digits to bytes
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let mut grouped = false;
    for (position, character) in encoded.chars().enumerate() {
        match character {
            '0' | '1' => {}
            c if c.is_whitespace() => grouped = true,
            _ => {
                return Err(ConvertError::InvalidBinary {
                    character,
                    position,
                });
            }
        }
    }

    let bytes = if grouped {
        encoded
            .split_whitespace()
            .map(|group| {
                bits_to_byte(group).ok_or_else(|| ConvertError::BinaryGroupTooLong {
                    group: group.to_string(),
                    len: group.len(),
                })
            })
            .collect::<Result<Vec<u8>>>()?
    } else {
        if encoded.len() % 8 != 0 {
            return Err(ConvertError::BinaryLength(encoded.len()));
        }
        // Only '0' and '1' remain, so every chunk is valid ASCII
        encoded
            .as_bytes()
            .chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, bit| (acc << 1) | (bit - b'0')))
            .collect()
    };
    tracing::debug!(input_len = encoded.len(), output_len = bytes.len(), "binary decode");
    Ok(bytes)
}

/// Decodes binary digits to a UTF-8 string
pub fn decode_text(encoded: &str) -> Result<String> {
    Ok(String::from_utf8(decode(encoded)?)?)
}
