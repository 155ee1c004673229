//! Base64 encoding/decoding for convkit.
//!
//! Implements RFC 4648 Base64 with the standard and URL-safe alphabets,
//! optional padding and optional MIME-style line wrapping. Decoding is
//! forgiving about whitespace and padding but strict about the alphabet.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use convkit_error::{ConvertError, Result};
use serde::{Deserialize, Serialize};

/// Line length used by MIME (RFC 2045).
pub const MIME_LINE_WIDTH: usize = 76;

/// Base64 alphabet selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Base64Variant {
    /// `+` and `/` (RFC 4648 section 4)
    #[default]
    Standard,
    /// `-` and `_` (RFC 4648 section 5)
    UrlSafe,
}

/// Formatting options for the Base64 converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Base64Options {
    pub variant: Base64Variant,
    /// Emit `=` padding when encoding
    pub padding: bool,
    /// Break encoded output into lines of this many characters
    pub line_width: Option<usize>,
}

impl Default for Base64Options {
    fn default() -> Self {
        Self {
            variant: Base64Variant::Standard,
            padding: true,
            line_width: None,
        }
    }
}

impl Base64Options {
    /// URL-safe alphabet without padding, as used in tokens and URLs.
    pub fn url_safe() -> Self {
        Self {
            variant: Base64Variant::UrlSafe,
            padding: false,
            line_width: None,
        }
    }

    /// Standard alphabet, padded, wrapped at 76 columns.
    pub fn mime() -> Self {
        Self {
            variant: Base64Variant::Standard,
            padding: true,
            line_width: Some(MIME_LINE_WIDTH),
        }
    }

    fn engine(&self) -> GeneralPurpose {
        let config = GeneralPurposeConfig::new()
            .with_encode_padding(self.padding)
            .with_decode_padding_mode(DecodePaddingMode::Indifferent);
        match self.variant {
            Base64Variant::Standard => GeneralPurpose::new(&alphabet::STANDARD, config),
            Base64Variant::UrlSafe => GeneralPurpose::new(&alphabet::URL_SAFE, config),
        }
    }
}

/// Encodes bytes to a base64 string
pub fn encode(data: &[u8], opts: &Base64Options) -> String {
    let encoded = opts.engine().encode(data);
    tracing::debug!(input_len = data.len(), output_len = encoded.len(), "base64 encode");
    match opts.line_width {
        Some(width) if width > 0 && encoded.len() > width => wrap(&encoded, width),
        _ => encoded,
    }
}

/// Encodes a string to base64 (UTF-8 bytes)
pub fn encode_text(text: &str, opts: &Base64Options) -> String {
    encode(text.as_bytes(), opts)
}

/// Decodes a base64 string to bytes.
///
/// ASCII whitespace anywhere in the input is skipped. Positions reported in
/// errors refer to the original input.
pub fn decode(encoded: &str, opts: &Base64Options) -> Result<Vec<u8>> {
    // Map from compacted offset back to the original character position.
    let mut positions = Vec::with_capacity(encoded.len());
    let mut compact = String::with_capacity(encoded.len());
    for (pos, c) in encoded.chars().enumerate() {
        if !c.is_ascii_whitespace() {
            positions.push(pos);
            compact.push(c);
        }
    }

    if let Some((idx, c)) = compact.char_indices().find(|(_, c)| !c.is_ascii()) {
        let position = positions[compact[..idx].chars().count()];
        return Err(ConvertError::InvalidBase64(format!(
            "invalid character '{c}' at position {position}"
        )));
    }

    let decoded = opts.engine().decode(compact.as_bytes()).map_err(|e| {
        let reason = match e {
            base64::DecodeError::InvalidByte(offset, byte) => format!(
                "invalid character '{}' at position {}",
                byte as char,
                positions.get(offset).copied().unwrap_or(offset)
            ),
            base64::DecodeError::InvalidLastSymbol(offset, byte) => format!(
                "invalid trailing character '{}' at position {}",
                byte as char,
                positions.get(offset).copied().unwrap_or(offset)
            ),
            base64::DecodeError::InvalidLength(len) => {
                format!("{len} symbols cannot form whole bytes")
            }
            base64::DecodeError::InvalidPadding => "incorrect padding".to_string(),
        };
        ConvertError::InvalidBase64(reason)
    })?;
    tracing::debug!(input_len = encoded.len(), output_len = decoded.len(), "base64 decode");
    Ok(decoded)
}

/// Decodes a base64 string to a UTF-8 string
pub fn decode_text(encoded: &str, opts: &Base64Options) -> Result<String> {
    let bytes = decode(encoded, opts)?;
    Ok(String::from_utf8(bytes)?)
}

/// Validates if a string is valid base64 for the given options
pub fn is_valid(encoded: &str, opts: &Base64Options) -> bool {
    decode(encoded, opts).is_ok()
}

/// Guess the alphabet from the characters that differ between variants.
pub fn detect_variant(encoded: &str) -> Option<Base64Variant> {
    let standard = encoded.contains(['+', '/']);
    let url_safe = encoded.contains(['-', '_']);
    match (standard, url_safe) {
        (true, false) => Some(Base64Variant::Standard),
        (false, true) => Some(Base64Variant::UrlSafe),
        _ => None,
    }
}

fn wrap(encoded: &str, width: usize) -> String {
    // Encoded output is pure ASCII, so byte chunks are character chunks.
    encoded
        .as_bytes()
        .chunks(width)
        .map(|line| String::from_utf8_lossy(line))
        .collect::<Vec<_>>()
        .join("\r\n")
}
