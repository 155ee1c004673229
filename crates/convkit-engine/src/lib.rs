//! Orchestration engine for convkit.
//!
//! Every converter is reached through the [`Transform`] port and every
//! generator through [`Generator`]. [`run`] and [`run_generator`] are the
//! one place where failures are caught, logged and turned into a message
//! for the user; nothing below them prints.

use convkit_base64::Base64Options;
use convkit_binary::BinaryOptions;
use convkit_caesar::Caesar;
use convkit_error::{ConvertError, Result, invalid_option};
use convkit_generate::{
    ChoiceOptions, DateOptions, IpOptions, LetterOptions, MonthOptions, choices, dates,
    ip_addresses, letters, months,
};
use convkit_hash::{Checksum, Digest, DigestFormat, HashAlgorithm};
use convkit_hex::HexOptions;
use convkit_random::RandomSource;
use convkit_url::UrlMode;
use convkit_utf8::ByteFormat;
use convkit_uuid::UuidFormat;
use std::io::Read;
use std::path::Path;

/// Which way a reversible converter runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

/// A converter from input bytes to displayable text.
///
/// Implementations should be pure: input in, text out.
pub trait Transform {
    fn name(&self) -> &'static str;
    fn apply(&self, input: &[u8]) -> Result<String>;
}

/// Every converter with its options
#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    Base64(Direction, Base64Options),
    Hex(Direction, HexOptions),
    Binary(Direction, BinaryOptions),
    Utf8(Direction, ByteFormat),
    /// Per-character code point and byte breakdown
    Utf8Inspect,
    Url(Direction, UrlMode),
    UrlParse,
    Caesar { shift: i32, direction: Direction },
    CaesarBruteForce,
    CaesarCrack,
    Hash(HashAlgorithm, DigestFormat),
    HashAll(DigestFormat),
    Verify(Checksum),
}

const TOOL_NAMES: &[&str] = &[
    "base64-encode",
    "base64-decode",
    "hex-encode",
    "hex-decode",
    "binary-encode",
    "binary-decode",
    "utf8-encode",
    "utf8-decode",
    "utf8-inspect",
    "url-encode",
    "url-decode",
    "url-parse",
    "caesar-encrypt",
    "caesar-decrypt",
    "caesar-brute-force",
    "caesar-crack",
    "hash",
    "hash-all",
    "hash-verify",
    "uuid",
    "ip",
    "date",
    "letters",
    "months",
    "choices",
];

/// Names of every registered converter and generator
pub fn tool_names() -> &'static [&'static str] {
    TOOL_NAMES
}

impl Tool {
    /// Whether the tool reads its input as encoded text, in which case a
    /// trailing newline from a pipe is not part of the payload.
    pub fn reads_encoded_text(&self) -> bool {
        matches!(
            self,
            Tool::Base64(Direction::Decode, _)
                | Tool::Hex(Direction::Decode, _)
                | Tool::Binary(Direction::Decode, _)
                | Tool::Utf8(Direction::Decode, _)
                | Tool::Url(Direction::Decode, _)
                | Tool::UrlParse
        )
    }
}

impl Transform for Tool {
    fn name(&self) -> &'static str {
        use Direction::{Decode, Encode};
        match self {
            Tool::Base64(Encode, _) => "base64-encode",
            Tool::Base64(Decode, _) => "base64-decode",
            Tool::Hex(Encode, _) => "hex-encode",
            Tool::Hex(Decode, _) => "hex-decode",
            Tool::Binary(Encode, _) => "binary-encode",
            Tool::Binary(Decode, _) => "binary-decode",
            Tool::Utf8(Encode, _) => "utf8-encode",
            Tool::Utf8(Decode, _) => "utf8-decode",
            Tool::Utf8Inspect => "utf8-inspect",
            Tool::Url(Encode, _) => "url-encode",
            Tool::Url(Decode, _) => "url-decode",
            Tool::UrlParse => "url-parse",
            Tool::Caesar {
                direction: Encode, ..
            } => "caesar-encrypt",
            Tool::Caesar {
                direction: Decode, ..
            } => "caesar-decrypt",
            Tool::CaesarBruteForce => "caesar-brute-force",
            Tool::CaesarCrack => "caesar-crack",
            Tool::Hash(..) => "hash",
            Tool::HashAll(_) => "hash-all",
            Tool::Verify(_) => "hash-verify",
        }
    }

    fn apply(&self, input: &[u8]) -> Result<String> {
        use Direction::{Decode, Encode};
        match self {
            Tool::Base64(Encode, opts) => Ok(convkit_base64::encode(input, opts)),
            Tool::Base64(Decode, opts) => convkit_base64::decode_text(as_text(input)?, opts),
            Tool::Hex(Encode, opts) => Ok(convkit_hex::encode(input, opts)),
            Tool::Hex(Decode, _) => convkit_hex::decode_text(as_text(input)?),
            Tool::Binary(Encode, opts) => Ok(convkit_binary::encode(input, opts)),
            Tool::Binary(Decode, _) => convkit_binary::decode_text(as_text(input)?),
            Tool::Utf8(Encode, format) => Ok(convkit_utf8::encode(as_text(input)?, *format)),
            Tool::Utf8(Decode, format) => convkit_utf8::decode(as_text(input)?, *format),
            Tool::Utf8Inspect => Ok(convkit_utf8::inspect(as_text(input)?)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")),
            Tool::Url(Encode, mode) => Ok(convkit_url::encode(as_text(input)?, *mode)),
            Tool::Url(Decode, mode) => convkit_url::decode(as_text(input)?, *mode),
            Tool::UrlParse => Ok(convkit_url::parse(as_text(input)?)?.to_string()),
            Tool::Caesar { shift, direction } => {
                let cipher = Caesar::new(*shift);
                let text = as_text(input)?;
                Ok(match direction {
                    Encode => cipher.encrypt(text),
                    Decode => cipher.decrypt(text),
                })
            }
            Tool::CaesarBruteForce => Ok(convkit_caesar::brute_force(as_text(input)?)
                .into_iter()
                .map(|(shift, text)| format!("{shift:>2}: {text}"))
                .collect::<Vec<_>>()
                .join("\n")),
            Tool::CaesarCrack => convkit_caesar::crack(as_text(input)?)
                .map(|(shift, text)| format!("{shift:>2}: {text}"))
                .ok_or_else(|| invalid_option("input", "no letters to analyse")),
            Tool::Hash(algorithm, format) => {
                Ok(convkit_hash::hash_bytes(input, *algorithm).render(*format))
            }
            Tool::HashAll(format) => Ok(render_all(&convkit_hash::hash_all(input), *format)),
            Tool::Verify(checksum) => {
                verified(checksum, &convkit_hash::hash_bytes(input, checksum.algorithm))
            }
        }
    }
}

fn render_all(digests: &[Digest], format: DigestFormat) -> String {
    digests
        .iter()
        .map(|digest| format!("{}: {}", digest.algorithm, digest.render(format)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn verified(checksum: &Checksum, digest: &Digest) -> Result<String> {
    if checksum.matches(digest) {
        Ok(format!("OK {checksum}"))
    } else {
        Err(ConvertError::InvalidChecksum(format!(
            "mismatch, expected {} but got {}",
            checksum.value,
            digest.to_hex()
        )))
    }
}

/// Every generator with its options
#[derive(Debug, Clone, PartialEq)]
pub enum Generator {
    Uuid(UuidFormat),
    Ip(IpOptions),
    Date(DateOptions),
    Letters(LetterOptions),
    Months(MonthOptions),
    Choices(Vec<String>, ChoiceOptions),
}

impl Generator {
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Uuid(_) => "uuid",
            Generator::Ip(_) => "ip",
            Generator::Date(_) => "date",
            Generator::Letters(_) => "letters",
            Generator::Months(_) => "months",
            Generator::Choices(..) => "choices",
        }
    }

    pub fn generate(&self, rng: &mut RandomSource, count: usize) -> Result<Vec<String>> {
        match self {
            Generator::Uuid(format) => convkit_uuid::generate_many(rng, count, format),
            Generator::Ip(opts) => ip_addresses(rng, count, opts),
            Generator::Date(opts) => dates(rng, count, opts),
            Generator::Letters(opts) => letters(rng, count, opts),
            Generator::Months(opts) => months(rng, count, opts),
            Generator::Choices(items, opts) => choices(rng, items.as_slice(), count, opts),
        }
    }
}

/// What the user sees after running a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The converted value
    Output(String),
    /// Why the input could not be converted
    Message(String),
}

impl Outcome {
    pub fn is_output(&self) -> bool {
        matches!(self, Outcome::Output(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Outcome::Output(text) | Outcome::Message(text) => text,
        }
    }
}

fn caught(tool: &'static str, result: Result<String>) -> Outcome {
    match result {
        Ok(output) => Outcome::Output(output),
        Err(err) => {
            tracing::info!(tool, category = %err.category(), error = %err, "tool failed");
            Outcome::Message(err.display_message())
        }
    }
}

/// Apply a transform, turning any failure into a message.
pub fn run(transform: &dyn Transform, input: &[u8]) -> Outcome {
    tracing::debug!(tool = transform.name(), input_len = input.len(), "running transform");
    caught(transform.name(), transform.apply(input))
}

/// Run a generator, one value per line.
pub fn run_generator(generator: &Generator, rng: &mut RandomSource, count: usize) -> Outcome {
    tracing::debug!(tool = generator.name(), count, seed = ?rng.seed(), "running generator");
    caught(
        generator.name(),
        generator.generate(rng, count).map(|values| values.join("\n")),
    )
}

/// Apply a tool to a file. Digests stream the file; everything else reads
/// it whole, subject to `limit`.
pub fn run_file(tool: &Tool, path: &Path, limit: u64) -> Outcome {
    tracing::debug!(tool = tool.name(), path = %path.display(), "running transform on file");
    let result = match tool {
        Tool::Hash(algorithm, format) => {
            convkit_hash::hash_file(path, *algorithm).map(|digest| digest.render(*format))
        }
        Tool::HashAll(format) => HashAlgorithm::ALL
            .iter()
            .map(|algorithm| convkit_hash::hash_file(path, *algorithm))
            .collect::<Result<Vec<_>>>()
            .map(|digests| render_all(&digests, *format)),
        Tool::Verify(checksum) => convkit_hash::hash_file(path, checksum.algorithm)
            .and_then(|digest| verified(checksum, &digest)),
        _ => load_input(path, limit).and_then(|data| tool.apply(&data)),
    };
    caught(tool.name(), result)
}

/// Interpret input as UTF-8 text
pub fn as_text(input: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(input)?)
}

/// Drop one trailing `\n` or `\r\n`.
pub fn strip_trailing_newline(input: &[u8]) -> &[u8] {
    input
        .strip_suffix(b"\r\n")
        .or_else(|| input.strip_suffix(b"\n"))
        .unwrap_or(input)
}

/// Read a file, refusing anything larger than `limit` bytes.
pub fn load_input(path: &Path, limit: u64) -> Result<Vec<u8>> {
    let io_err = |source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    };
    let too_large = |size| ConvertError::InputTooLarge {
        path: path.to_path_buf(),
        size,
        limit,
    };

    let file = std::fs::File::open(path).map_err(io_err)?;
    let size = file.metadata().map_err(io_err)?.len();
    if size > limit {
        return Err(too_large(size));
    }
    // the file may grow after the size check
    let mut data = Vec::with_capacity(size as usize);
    file.take(limit.saturating_add(1))
        .read_to_end(&mut data)
        .map_err(io_err)?;
    if data.len() as u64 > limit {
        return Err(too_large(data.len() as u64));
    }
    tracing::debug!(path = %path.display(), bytes = data.len(), "loaded input");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use convkit_hex::HexSeparator;

    #[test]
    fn test_run_output() {
        let tool = Tool::Base64(Direction::Encode, Base64Options::default());
        assert_eq!(run(&tool, b"hello"), Outcome::Output("aGVsbG8=".into()));
    }

    #[test]
    fn test_run_catches_errors() {
        let tool = Tool::Hex(Direction::Decode, HexOptions::default());
        let outcome = run(&tool, b"zz");
        assert!(!outcome.is_output());
        insta::assert_snapshot!(outcome.text(), @"[parse] invalid hex character 'z' at position 0");
    }

    #[test]
    fn test_decoders_require_utf8_input() {
        let tool = Tool::Url(Direction::Decode, UrlMode::Component);
        let outcome = run(&tool, &[b'a', 0xff]);
        assert_eq!(
            outcome,
            Outcome::Message("[parse] invalid UTF-8 sequence at byte 1".into())
        );
    }

    #[test]
    fn test_encoders_take_raw_bytes() {
        let hex = Tool::Hex(
            Direction::Encode,
            HexOptions {
                separator: HexSeparator::Space,
                ..HexOptions::default()
            },
        );
        assert_eq!(hex.apply(&[0x00, 0xff]).unwrap(), "00 ff");
        let hash = Tool::Hash(HashAlgorithm::Sha1, DigestFormat::HexLower);
        assert_eq!(
            hash.apply(b"abc").unwrap(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_caesar_tools() {
        let encrypt = Tool::Caesar {
            shift: 3,
            direction: Direction::Encode,
        };
        assert_eq!(encrypt.apply(b"Hello").unwrap(), "Khoor");
        let brute = Tool::CaesarBruteForce.apply(b"Khoor").unwrap();
        assert_eq!(brute.lines().count(), 25);
        assert!(brute.lines().any(|l| l == " 3: Hello"));
        assert!(run(&Tool::CaesarCrack, b"1234").text().contains("no letters"));
    }

    #[test]
    fn test_utf8_inspect() {
        let out = Tool::Utf8Inspect.apply("aé".as_bytes()).unwrap();
        assert_eq!(out, "U+0061\ta\t61\nU+00E9\té\tc3 a9");
    }

    #[test]
    fn test_hash_all_and_verify() {
        let all = Tool::HashAll(DigestFormat::HexLower).apply(b"abc").unwrap();
        assert_eq!(all.lines().count(), 4);
        assert!(all.starts_with("sha1: a9993e36"));

        let checksum = Checksum::parse("sha1:a9993e364706816aba3e25717850c26c9cd0d89d").unwrap();
        let verify = Tool::Verify(checksum);
        assert!(verify.apply(b"abc").unwrap().starts_with("OK sha1:"));
        let outcome = run(&verify, b"abd");
        assert!(outcome.text().starts_with("[validation] invalid checksum: mismatch"));
    }

    #[test]
    fn test_names_registered() {
        let tools = [
            Tool::Base64(Direction::Decode, Base64Options::default()),
            Tool::Utf8(Direction::Encode, ByteFormat::Hex),
            Tool::UrlParse,
            Tool::Caesar {
                shift: 1,
                direction: Direction::Decode,
            },
            Tool::HashAll(DigestFormat::Base64),
        ];
        for tool in &tools {
            assert!(tool_names().contains(&tool.name()), "{}", tool.name());
        }
        let generators = [
            Generator::Uuid(UuidFormat::default()),
            Generator::Choices(vec![], ChoiceOptions::default()),
        ];
        for generator in &generators {
            assert!(tool_names().contains(&generator.name()));
        }
    }

    #[test]
    fn test_reads_encoded_text() {
        assert!(Tool::Base64(Direction::Decode, Base64Options::default()).reads_encoded_text());
        assert!(!Tool::Base64(Direction::Encode, Base64Options::default()).reads_encoded_text());
        assert!(!Tool::Hash(HashAlgorithm::Sha256, DigestFormat::HexLower).reads_encoded_text());
    }

    #[test]
    fn test_strip_trailing_newline() {
        assert_eq!(strip_trailing_newline(b"abc\n"), b"abc");
        assert_eq!(strip_trailing_newline(b"abc\r\n"), b"abc");
        assert_eq!(strip_trailing_newline(b"abc\n\n"), b"abc\n");
        assert_eq!(strip_trailing_newline(b"abc"), b"abc");
    }

    #[test]
    fn test_run_generator() {
        let mut rng = RandomSource::seeded(5);
        let outcome = run_generator(&Generator::Letters(LetterOptions::default()), &mut rng, 4);
        assert_eq!(outcome.text().lines().count(), 4);

        let outcome = run_generator(&Generator::Uuid(UuidFormat::default()), &mut rng, 0);
        assert_eq!(
            outcome,
            Outcome::Message(
                "[validation] invalid count: must be between 1 and 1000, got 0".into()
            )
        );
    }

    #[test]
    fn test_load_input_limit() {
        let file = convkit_testkit::temp_input_file(b"0123456789");
        assert_eq!(load_input(file.path(), 10).unwrap(), b"0123456789");
        let err = load_input(file.path(), 9).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InputTooLarge {
                size: 10,
                limit: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_run_file() {
        let file = convkit_testkit::temp_input_file(b"abc");
        let hash = Tool::Hash(HashAlgorithm::Sha1, DigestFormat::HexLower);
        // streamed digests ignore the size limit
        assert_eq!(
            run_file(&hash, file.path(), 1),
            Outcome::Output("a9993e364706816aba3e25717850c26c9cd0d89d".into())
        );
        let hex = Tool::Hex(Direction::Encode, HexOptions::default());
        assert_eq!(run_file(&hex, file.path(), 10), Outcome::Output("616263".into()));
        assert!(!run_file(&hex, file.path(), 2).is_output());
    }

    #[test]
    fn test_run_file_verify_and_hash_all_stream() {
        let file = convkit_testkit::temp_input_file(b"abc");
        let checksum = Checksum::parse("sha1:a9993e364706816aba3e25717850c26c9cd0d89d").unwrap();
        assert_eq!(
            run_file(&Tool::Verify(checksum), file.path(), 1),
            Outcome::Output("OK sha1:a9993e364706816aba3e25717850c26c9cd0d89d".into())
        );

        let all = run_file(&Tool::HashAll(DigestFormat::HexLower), file.path(), 1);
        assert!(all.is_output());
        assert_eq!(all.text().lines().count(), 4);
        assert!(all.text().starts_with("sha1: a9993e36"));

        let wrong = Checksum::parse("sha1:0000000000000000000000000000000000000000").unwrap();
        let outcome = run_file(&Tool::Verify(wrong), file.path(), 1);
        assert!(outcome.text().starts_with("[validation] invalid checksum: mismatch"));
    }

    #[test]
    fn test_load_input_missing() {
        let err = load_input(Path::new("/nonexistent/convkit-input"), 10).unwrap_err();
        assert!(err.is_io_error());
        assert!(err.to_string().contains("convkit-input"));
    }
}
