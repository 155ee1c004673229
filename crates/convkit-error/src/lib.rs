//! Error handling for convkit.
//!
//! Every converter and generator reports malformed input through
//! [`ConvertError`]. The message is meant to be shown to the user as-is,
//! next to the input that caused it.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error category for convkit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Parse,
    Validation,
    Io,
    Config,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Parse => write!(f, "parse"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Config => write!(f, "config"),
        }
    }
}

/// Errors raised by convkit transforms.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("invalid hex character '{character}' at position {position}")]
    InvalidHex { character: char, position: usize },

    #[error("hex input has odd length {0}")]
    OddHexLength(usize),

    #[error("invalid binary character '{character}' at position {position}")]
    InvalidBinary { character: char, position: usize },

    #[error("binary group '{group}' has {len} bits, at most 8 allowed")]
    BinaryGroupTooLong { group: String, len: usize },

    #[error("binary input has {0} bits, expected a multiple of 8")]
    BinaryLength(usize),

    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("invalid UTF-8 sequence at byte {position}")]
    InvalidUtf8 { position: usize },

    #[error("invalid byte '{token}': {reason}")]
    InvalidByte { token: String, reason: String },

    #[error("malformed percent escape at position {position}")]
    MalformedPercent { position: usize },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("invalid {option}: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is {size} bytes, larger than the {limit} byte limit", .path.display())]
    InputTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ConvertError {
    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::InvalidHex { .. }
            | ConvertError::OddHexLength(_)
            | ConvertError::InvalidBinary { .. }
            | ConvertError::BinaryGroupTooLong { .. }
            | ConvertError::BinaryLength(_)
            | ConvertError::InvalidBase64(_)
            | ConvertError::InvalidUtf8 { .. }
            | ConvertError::InvalidByte { .. }
            | ConvertError::MalformedPercent { .. }
            | ConvertError::InvalidUrl(_)
            | ConvertError::InvalidUuid(_) => ErrorCategory::Parse,
            ConvertError::InvalidOption { .. } | ConvertError::InvalidChecksum(_) => {
                ErrorCategory::Validation
            }
            ConvertError::Io { .. } | ConvertError::InputTooLarge { .. } => ErrorCategory::Io,
            ConvertError::Config(_) => ErrorCategory::Config,
        }
    }

    /// Message shown inline next to the offending input.
    pub fn display_message(&self) -> String {
        format!("[{}] {}", self.category(), self)
    }

    pub fn is_parse_error(&self) -> bool {
        self.category() == ErrorCategory::Parse
    }

    pub fn is_validation_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn is_io_error(&self) -> bool {
        self.category() == ErrorCategory::Io
    }
}

/// Result type alias for convkit errors
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Convenience function to create option validation errors
pub fn invalid_option(option: &'static str, reason: impl Into<String>) -> ConvertError {
    ConvertError::InvalidOption {
        option,
        reason: reason.into(),
    }
}

/// Convert a [`std::str::Utf8Error`] into the inline error, keeping the
/// offset of the first byte that is not valid UTF-8.
impl From<std::str::Utf8Error> for ConvertError {
    fn from(err: std::str::Utf8Error) -> Self {
        ConvertError::InvalidUtf8 {
            position: err.valid_up_to(),
        }
    }
}

impl From<std::string::FromUtf8Error> for ConvertError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        err.utf8_error().into()
    }
}
