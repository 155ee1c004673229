//! UUID generation and utilities for convkit.
//!
//! Version 4 UUIDs are built from bytes drawn from a [`RandomSource`], so a
//! seeded source yields the same identifiers every run.

use convkit_error::{ConvertError, Result};
use convkit_random::{RandomSource, check_count};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A UUID wrapper that provides additional utilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uuid(pub uuid::Uuid);

/// Output layout for generated UUIDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UuidFormat {
    pub uppercase: bool,
    pub hyphens: bool,
    pub braces: bool,
}

impl Default for UuidFormat {
    fn default() -> Self {
        Self {
            uppercase: false,
            hyphens: true,
            braces: false,
        }
    }
}

/// The version field of a UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidVersion {
    Nil,
    Mac,
    Dce,
    Md5,
    Random,
    Sha1,
    SortMac,
    SortRand,
    Custom,
    Max,
    Unknown(u8),
}

impl UuidVersion {
    pub fn number(&self) -> Option<u8> {
        match self {
            UuidVersion::Mac => Some(1),
            UuidVersion::Dce => Some(2),
            UuidVersion::Md5 => Some(3),
            UuidVersion::Random => Some(4),
            UuidVersion::Sha1 => Some(5),
            UuidVersion::SortMac => Some(6),
            UuidVersion::SortRand => Some(7),
            UuidVersion::Custom => Some(8),
            UuidVersion::Unknown(n) => Some(*n),
            UuidVersion::Nil | UuidVersion::Max => None,
        }
    }
}

impl fmt::Display for UuidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UuidVersion::Nil => return f.write_str("nil"),
            UuidVersion::Max => return f.write_str("max"),
            UuidVersion::Mac => "time-based",
            UuidVersion::Dce => "DCE security",
            UuidVersion::Md5 => "name-based MD5",
            UuidVersion::Random => "random",
            UuidVersion::Sha1 => "name-based SHA-1",
            UuidVersion::SortMac => "reordered time-based",
            UuidVersion::SortRand => "Unix time-based",
            UuidVersion::Custom => "custom",
            UuidVersion::Unknown(_) => "unknown",
        };
        match self.number() {
            Some(n) => write!(f, "{n} ({label})"),
            None => f.write_str(label),
        }
    }
}

impl Uuid {
    /// Build a UUID from 16 random bytes, setting the version 4 and
    /// RFC 4122 variant bits.
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Parse hyphenated, simple, braced or `urn:uuid:` text.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        // uuid only accepts braces around the hyphenated form
        let inner = input
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(input);
        uuid::Uuid::parse_str(inner)
            .map(Self)
            .map_err(|e| ConvertError::InvalidUuid(e.to_string()))
    }

    pub fn nil() -> Self {
        Self(uuid::Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn version(&self) -> UuidVersion {
        if self.0.is_nil() {
            return UuidVersion::Nil;
        }
        if self.0.as_bytes() == &[0xff; 16] {
            return UuidVersion::Max;
        }
        match self.0.get_version_num() {
            1 => UuidVersion::Mac,
            2 => UuidVersion::Dce,
            3 => UuidVersion::Md5,
            4 => UuidVersion::Random,
            5 => UuidVersion::Sha1,
            6 => UuidVersion::SortMac,
            7 => UuidVersion::SortRand,
            8 => UuidVersion::Custom,
            n => UuidVersion::Unknown(n as u8),
        }
    }

    /// Get the UUID as raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    pub fn format(&self, format: &UuidFormat) -> String {
        let body = if format.hyphens {
            self.0.hyphenated().to_string()
        } else {
            self.0.simple().to_string()
        };
        let body = if format.uppercase {
            body.to_ascii_uppercase()
        } else {
            body
        };
        if format.braces {
            format!("{{{body}}}")
        } else {
            body
        }
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for Uuid {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Generate one version 4 UUID.
pub fn generate_v4(rng: &mut RandomSource) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    Uuid::from_random_bytes(bytes)
}

/// Generate `count` formatted UUIDs.
pub fn generate_many(
    rng: &mut RandomSource,
    count: usize,
    format: &UuidFormat,
) -> Result<Vec<String>> {
    check_count(count)?;
    tracing::debug!(count, ?format, "generate uuids");
    Ok((0..count)
        .map(|_| generate_v4(rng).format(format))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v4_bits() {
        let mut rng = RandomSource::seeded(1);
        for _ in 0..100 {
            let id = generate_v4(&mut rng);
            assert_eq!(id.version(), UuidVersion::Random);
            assert_eq!(id.as_bytes()[6] >> 4, 4);
            assert_eq!(id.as_bytes()[8] & 0xc0, 0x80);
        }
    }

    #[test]
    fn test_from_random_bytes() {
        let id = Uuid::from_random_bytes([0xff; 16]);
        assert_eq!(id.to_string(), "ffffffff-ffff-4fff-bfff-ffffffffffff");
        let id = Uuid::from_random_bytes([0; 16]);
        assert_eq!(id.to_string(), "00000000-0000-4000-8000-000000000000");
    }

    #[test]
    fn test_format_variants() {
        let id = Uuid::parse("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap();
        assert_eq!(
            id.format(&UuidFormat::default()),
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8"
        );
        let upper_braced = UuidFormat {
            uppercase: true,
            hyphens: true,
            braces: true,
        };
        insta::assert_snapshot!(id.format(&upper_braced), @"{6BA7B810-9DAD-11D1-80B4-00C04FD430C8}");
        let simple = UuidFormat {
            hyphens: false,
            ..UuidFormat::default()
        };
        assert_eq!(id.format(&simple), "6ba7b8109dad11d180b400c04fd430c8");
    }

    #[test]
    fn test_parse_forms() {
        let expected = Uuid::parse("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap();
        for input in [
            "6ba7b8109dad11d180b400c04fd430c8",
            "{6ba7b810-9dad-11d1-80b4-00c04fd430c8}",
            "urn:uuid:6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "6BA7B810-9DAD-11D1-80B4-00C04FD430C8",
            " 6ba7b810-9dad-11d1-80b4-00c04fd430c8\n",
        ] {
            assert_eq!(Uuid::parse(input).unwrap(), expected, "input {input:?}");
        }
        assert_eq!(expected.version(), UuidVersion::Mac);
        assert_eq!(expected.version().to_string(), "1 (time-based)");
    }

    #[test]
    fn test_parse_invalid() {
        let err = Uuid::parse("not-a-uuid").unwrap_err();
        assert!(err.is_parse_error());
        assert!("6ba7b810-9dad-11d1-80b4".parse::<Uuid>().is_err());
    }

    #[test]
    fn test_nil() {
        let nil = Uuid::parse("00000000-0000-0000-0000-000000000000").unwrap();
        assert!(nil.is_nil());
        assert_eq!(nil, Uuid::nil());
        assert_eq!(nil.version(), UuidVersion::Nil);
        assert_eq!(nil.version().to_string(), "nil");
    }

    #[test]
    fn test_parse_braced_simple() {
        let mut rng = RandomSource::seeded(7);
        let id = generate_v4(&mut rng);
        let format = UuidFormat {
            uppercase: false,
            hyphens: false,
            braces: true,
        };
        let text = id.format(&format);
        assert!(text.starts_with('{') && !text.contains('-'));
        assert_eq!(Uuid::parse(&text).unwrap(), id);
        assert!(Uuid::parse("{67e5504410b1426f9247bb680e5fe0c8").is_err());
    }

    #[test]
    fn test_generate_many() {
        let mut rng = RandomSource::seeded(99);
        let ids = generate_many(&mut rng, 5, &UuidFormat::default()).unwrap();
        assert_eq!(ids.len(), 5);
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);

        let mut again = RandomSource::seeded(99);
        assert_eq!(generate_many(&mut again, 5, &UuidFormat::default()).unwrap(), ids);
    }

    #[test]
    fn test_generate_many_count_limits() {
        let mut rng = RandomSource::seeded(0);
        assert!(generate_many(&mut rng, 0, &UuidFormat::default()).is_err());
        assert!(generate_many(&mut rng, 1001, &UuidFormat::default()).is_err());
        assert_eq!(generate_many(&mut rng, 1000, &UuidFormat::default()).unwrap().len(), 1000);
    }
}
