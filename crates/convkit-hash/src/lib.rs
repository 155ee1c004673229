//! Message digests for convkit.
//!
//! Supports the SHA-1 and SHA-2 family. Streams are hashed chunk by chunk
//! into one running state, so hashing a file gives the same digest as
//! hashing its contents in memory.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use convkit_error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha384, Sha512};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Read size used when hashing streams
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Hash algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha1,
    /// SHA-256 hash (default)
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// Output size in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// The algorithm producing digests of `len` bytes, if any
    pub fn from_digest_len(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.digest_len() == len)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConvertError;

    /// Accepts `sha256`, `SHA-256`, `sha_256` and the like.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == normalized)
            .ok_or_else(|| {
                convkit_error::invalid_option(
                    "algorithm",
                    format!("unknown hash algorithm '{s}', expected sha1, sha256, sha384 or sha512"),
                )
            })
    }
}

/// How a digest is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestFormat {
    #[default]
    HexLower,
    HexUpper,
    Base64,
}

/// A computed digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub algorithm: HashAlgorithm,
    pub bytes: Vec<u8>,
}

impl Digest {
    pub fn render(&self, format: DigestFormat) -> String {
        match format {
            DigestFormat::HexLower => hex::encode(&self.bytes),
            DigestFormat::HexUpper => hex::encode_upper(&self.bytes),
            DigestFormat::Base64 => STANDARD.encode(&self.bytes),
        }
    }

    pub fn to_hex(&self) -> String {
        self.render(DigestFormat::HexLower)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An incremental hasher over any supported algorithm.
#[derive(Clone)]
pub struct Hasher {
    state: HasherState,
}

#[derive(Clone)]
enum HasherState {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl Hasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        let state = match algorithm {
            HashAlgorithm::Sha1 => HasherState::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => HasherState::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => HasherState::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => HasherState::Sha512(Sha512::new()),
        };
        Self { state }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        match self.state {
            HasherState::Sha1(_) => HashAlgorithm::Sha1,
            HasherState::Sha256(_) => HashAlgorithm::Sha256,
            HasherState::Sha384(_) => HashAlgorithm::Sha384,
            HasherState::Sha512(_) => HashAlgorithm::Sha512,
        }
    }

    /// Add content to be hashed.
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HasherState::Sha1(h) => h.update(data),
            HasherState::Sha256(h) => h.update(data),
            HasherState::Sha384(h) => h.update(data),
            HasherState::Sha512(h) => h.update(data),
        }
    }

    /// Finalize and get the digest.
    pub fn finalize(self) -> Digest {
        let algorithm = self.algorithm();
        let bytes = match self.state {
            HasherState::Sha1(h) => h.finalize().to_vec(),
            HasherState::Sha256(h) => h.finalize().to_vec(),
            HasherState::Sha384(h) => h.finalize().to_vec(),
            HasherState::Sha512(h) => h.finalize().to_vec(),
        };
        Digest { algorithm, bytes }
    }
}

pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> Digest {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    tracing::debug!(%algorithm, input_len = data.len(), "hash bytes");
    hasher.finalize()
}

/// Hash a string's UTF-8 bytes.
pub fn hash_text(text: &str, algorithm: HashAlgorithm) -> Digest {
    hash_bytes(text.as_bytes(), algorithm)
}

/// Hash everything a reader yields, [`CHUNK_SIZE`] bytes at a time.
pub fn hash_reader(mut reader: impl Read, algorithm: HashAlgorithm) -> std::io::Result<Digest> {
    let mut hasher = Hasher::new(algorithm);
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0usize;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        total += n;
    }
    tracing::debug!(%algorithm, input_len = total, "hash stream");
    Ok(hasher.finalize())
}

/// Hash a file on disk.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<Digest> {
    let io_err = |source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    hash_reader(file, algorithm).map_err(io_err)
}

/// Digests of `data` under every supported algorithm.
pub fn hash_all(data: &[u8]) -> Vec<Digest> {
    HashAlgorithm::ALL
        .into_iter()
        .map(|alg| hash_bytes(data, alg))
        .collect()
}

/// An expected digest, written `sha256:<hex>` or as bare hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    pub algorithm: HashAlgorithm,
    /// Lowercase hex
    pub value: String,
}

impl Checksum {
    /// Parse a checksum. Without an `alg:` prefix the algorithm is taken
    /// from the digest length.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (algorithm, value) = match input.split_once(':') {
            Some((alg, value)) => (Some(alg.parse::<HashAlgorithm>()?), value.trim()),
            None => (None, input),
        };

        let bytes = hex::decode(value)
            .map_err(|e| ConvertError::InvalidChecksum(format!("'{value}' is not hex: {e}")))?;
        let algorithm = match algorithm {
            Some(alg) => alg,
            None => HashAlgorithm::from_digest_len(bytes.len()).ok_or_else(|| {
                ConvertError::InvalidChecksum(format!(
                    "no algorithm produces {} byte digests",
                    bytes.len()
                ))
            })?,
        };
        if bytes.len() != algorithm.digest_len() {
            return Err(ConvertError::InvalidChecksum(format!(
                "{algorithm} digests are {} bytes, got {}",
                algorithm.digest_len(),
                bytes.len()
            )));
        }
        Ok(Self {
            algorithm,
            value: hex::encode(bytes),
        })
    }

    /// Verify that data matches this checksum
    pub fn verify(&self, data: &[u8]) -> bool {
        self.matches(&hash_bytes(data, self.algorithm))
    }

    /// Compare against a computed digest without exiting early.
    pub fn matches(&self, digest: &Digest) -> bool {
        if digest.algorithm != self.algorithm {
            return false;
        }
        let computed = digest.to_hex();
        computed.len() == self.value.len()
            && computed
                .bytes()
                .zip(self.value.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            hash_text("abc", HashAlgorithm::Sha1).to_hex(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(hash_text("abc", HashAlgorithm::Sha256).to_hex(), ABC_SHA256);
        assert_eq!(
            hash_text("", HashAlgorithm::Sha256).to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_text("abc", HashAlgorithm::Sha384).to_hex(),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
        );
        assert_eq!(
            hash_text("abc", HashAlgorithm::Sha512).to_hex(),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_render_formats() {
        let digest = hash_text("abc", HashAlgorithm::Sha1);
        assert_eq!(
            digest.render(DigestFormat::HexUpper),
            "A9993E364706816ABA3E25717850C26C9CD0D89D"
        );
        insta::assert_snapshot!(digest.render(DigestFormat::Base64), @"qZk+NkcGgWq6PiVxeFDCbJzQ2J0=");
    }

    #[test]
    fn test_digest_len() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(hash_bytes(b"x", alg).bytes.len(), alg.digest_len());
        }
        assert_eq!(HashAlgorithm::from_digest_len(48), Some(HashAlgorithm::Sha384));
        assert_eq!(HashAlgorithm::from_digest_len(16), None);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("sha1".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha1);
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("sha_384".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha384);
        assert_eq!("Sha512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        let err = "md5".parse::<HashAlgorithm>().unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_reader_matches_in_memory() {
        // spans several chunks with a partial tail
        let data: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        for alg in HashAlgorithm::ALL {
            let streamed = hash_reader(data.as_slice(), alg).unwrap();
            assert_eq!(streamed, hash_bytes(&data, alg));
        }
    }

    #[test]
    fn test_hash_file() {
        let file = convkit_testkit::temp_input_file(b"abc");
        let digest = hash_file(file.path(), HashAlgorithm::Sha256).unwrap();
        assert_eq!(digest.to_hex(), ABC_SHA256);

        let err = hash_file(Path::new("/nonexistent/convkit"), HashAlgorithm::Sha256).unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_hash_all() {
        let all = hash_all(b"abc");
        let algorithms: Vec<_> = all.iter().map(|d| d.algorithm).collect();
        assert_eq!(algorithms, HashAlgorithm::ALL.to_vec());
        assert_eq!(all[1].to_hex(), ABC_SHA256);
    }

    #[test]
    fn test_checksum_parse_and_verify() {
        let checksum = Checksum::parse(&format!("sha256:{}", ABC_SHA256.to_uppercase())).unwrap();
        assert_eq!(checksum.algorithm, HashAlgorithm::Sha256);
        assert_eq!(checksum.value, ABC_SHA256);
        assert!(checksum.verify(b"abc"));
        assert!(!checksum.verify(b"abd"));
        assert_eq!(checksum.to_string(), format!("sha256:{ABC_SHA256}"));
    }

    #[test]
    fn test_checksum_infers_algorithm() {
        let checksum = Checksum::parse("a9993e364706816aba3e25717850c26c9cd0d89d").unwrap();
        assert_eq!(checksum.algorithm, HashAlgorithm::Sha1);
        assert!(checksum.verify(b"abc"));
    }

    #[test]
    fn test_checksum_errors() {
        let err = Checksum::parse("sha256:abcd").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"invalid checksum: sha256 digests are 32 bytes, got 2");
        assert!(Checksum::parse("sha256:zz").is_err());
        assert!(Checksum::parse("abcd").is_err());
        assert!(Checksum::parse("md5:abcd").unwrap_err().is_validation_error());
    }

    #[test]
    fn test_checksum_algorithm_mismatch() {
        let checksum = Checksum::parse(&format!("sha256:{ABC_SHA256}")).unwrap();
        assert!(!checksum.matches(&hash_text("abc", HashAlgorithm::Sha512)));
    }
}
