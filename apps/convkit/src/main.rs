use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use convkit_base64::{Base64Options, Base64Variant};
use convkit_binary::{BinaryOptions, BitSeparator};
use convkit_config::ConvkitConfig;
use convkit_engine::{Direction, Generator, Outcome, Tool, run, run_file, run_generator};
use convkit_generate::{
    ChoiceOptions, DateOptions, IpKind, IpOptions, LetterCase, LetterOptions, MonthOptions,
    MonthStyle,
};
use convkit_hash::{Checksum, DigestFormat, HashAlgorithm};
use convkit_hex::{HexCase, HexOptions, HexPrefix, HexSeparator};
use convkit_logging::LogLevel;
use convkit_random::RandomSource;
use convkit_url::UrlMode;
use convkit_utf8::ByteFormat;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "convkit", version)]
#[command(about = "Encode, decode, hash and generate test data.", long_about = None)]
struct Cli {
    /// Config file with converter defaults (YAML, or JSON for *.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Seed for reproducible generator output.
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct Input {
    /// Input text. Stdin is read when neither this nor --file is given.
    text: Option<String>,
    /// Read input from a file.
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct Count {
    /// How many values to generate (1-1000).
    #[arg(long, short = 'n', default_value_t = 1)]
    count: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Base64 (RFC 4648).
    Base64 {
        action: Codec,
        #[command(flatten)]
        input: Input,
        /// Use the URL-safe alphabet (- and _).
        #[arg(long)]
        url_safe: bool,
        /// Omit = padding when encoding.
        #[arg(long)]
        no_pad: bool,
        /// Wrap encoded lines at this many characters.
        #[arg(long)]
        wrap: Option<usize>,
    },
    /// Hexadecimal bytes.
    Hex {
        action: Codec,
        #[command(flatten)]
        input: Input,
        /// Uppercase digits.
        #[arg(long)]
        upper: bool,
        #[arg(long, value_enum)]
        sep: Option<HexSep>,
        #[arg(long, value_enum)]
        prefix: Option<HexPrefixArg>,
        /// Bytes per output line.
        #[arg(long)]
        per_line: Option<usize>,
    },
    /// Binary digits, eight per byte.
    Binary {
        action: Codec,
        #[command(flatten)]
        input: Input,
        #[arg(long, value_enum)]
        sep: Option<BitSep>,
    },
    /// UTF-8 byte listings.
    Utf8 {
        action: Utf8Action,
        #[command(flatten)]
        input: Input,
        #[arg(long, value_enum)]
        format: Option<Utf8Format>,
    },
    /// Percent-encoding and URL inspection.
    Url {
        action: UrlAction,
        #[command(flatten)]
        input: Input,
        #[arg(long, value_enum)]
        mode: Option<UrlModeArg>,
    },
    /// Caesar shift cipher.
    Caesar {
        action: CaesarAction,
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
        shift: i32,
    },
    /// SHA-1 / SHA-2 digests.
    Hash {
        #[command(flatten)]
        input: Input,
        /// sha1, sha256, sha384, sha512 or all.
        #[arg(long)]
        algorithm: Option<String>,
        #[arg(long, value_enum)]
        format: Option<DigestFormatArg>,
        /// Compare against an expected digest, e.g. sha256:<hex>.
        #[arg(long, conflicts_with_all = ["algorithm", "format"])]
        verify: Option<String>,
    },
    /// Random version 4 UUIDs.
    Uuid {
        #[command(flatten)]
        count: Count,
        #[arg(long)]
        upper: bool,
        #[arg(long)]
        no_hyphens: bool,
        #[arg(long)]
        braces: bool,
    },
    /// Random IP addresses.
    Ip {
        #[command(flatten)]
        count: Count,
        /// IPv6 instead of IPv4.
        #[arg(long)]
        v6: bool,
        /// Only globally routable addresses.
        #[arg(long)]
        public: bool,
    },
    /// Random dates in an inclusive range.
    Date {
        #[command(flatten)]
        count: Count,
        /// First date, YYYY-MM-DD
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last date, YYYY-MM-DD
        #[arg(long)]
        end: Option<NaiveDate>,
        /// strftime output format.
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        sorted: bool,
    },
    /// Random letters.
    Letters {
        #[command(flatten)]
        count: Count,
        #[arg(long, value_enum, default_value = "upper")]
        case: CaseArg,
        #[arg(long)]
        unique: bool,
    },
    /// Random month names.
    Months {
        #[command(flatten)]
        count: Count,
        #[arg(long, value_enum, default_value = "full")]
        style: StyleArg,
        #[arg(long)]
        unique: bool,
    },
    /// Random picks from the given items.
    Choices {
        #[arg(required = true)]
        items: Vec<String>,
        #[command(flatten)]
        count: Count,
        #[arg(long)]
        unique: bool,
    },
    /// List the available tools.
    Tools,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Codec {
    Encode,
    Decode,
}

impl From<Codec> for Direction {
    fn from(codec: Codec) -> Self {
        match codec {
            Codec::Encode => Direction::Encode,
            Codec::Decode => Direction::Decode,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Utf8Action {
    Encode,
    Decode,
    Inspect,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum UrlAction {
    Encode,
    Decode,
    Parse,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CaesarAction {
    Encrypt,
    Decrypt,
    Brute,
    Crack,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HexSep {
    None,
    Space,
    Colon,
    Dash,
    Comma,
    Newline,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HexPrefixArg {
    None,
    #[value(name = "0x")]
    ZeroX,
    Escape,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BitSep {
    None,
    Space,
    Newline,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Utf8Format {
    Hex,
    Decimal,
    Binary,
    Escaped,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum UrlModeArg {
    Component,
    Uri,
    Form,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DigestFormatArg {
    #[value(name = "hex")]
    Hex,
    #[value(name = "HEX")]
    HexUpper,
    #[value(name = "base64")]
    Base64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CaseArg {
    Upper,
    Lower,
    Mixed,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Full,
    Short,
    Number,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(Outcome::Output(text)) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Message(message)) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<Outcome> {
    let mut config = match &cli.config {
        Some(path) => convkit_config::load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConvkitConfig::default(),
    };
    if cli.verbose {
        config.logging.level = LogLevel::Debug;
    }
    convkit_logging::init(&config.logging)?;

    tracing::debug!(config = ?cli.config, seed = ?cli.seed, "starting");

    let mut rng = match cli.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };

    let outcome = match cli.cmd {
        Command::Base64 {
            action,
            input,
            url_safe,
            no_pad,
            wrap,
        } => {
            let mut opts = config.base64.clone();
            if url_safe {
                opts.variant = Base64Variant::UrlSafe;
            }
            if no_pad {
                opts.padding = false;
            }
            if wrap.is_some() {
                opts.line_width = wrap;
            }
            convert(&Tool::Base64(action.into(), opts), input, &config)?
        }
        Command::Hex {
            action,
            input,
            upper,
            sep,
            prefix,
            per_line,
        } => {
            let mut opts = config.hex.clone();
            if upper {
                opts.case = HexCase::Upper;
            }
            if let Some(sep) = sep {
                opts.separator = hex_separator(sep);
            }
            if let Some(prefix) = prefix {
                opts.prefix = match prefix {
                    HexPrefixArg::None => HexPrefix::None,
                    HexPrefixArg::ZeroX => HexPrefix::ZeroX,
                    HexPrefixArg::Escape => HexPrefix::Escape,
                };
            }
            if per_line.is_some() {
                opts.bytes_per_line = per_line;
            }
            convert(&Tool::Hex(action.into(), opts), input, &config)?
        }
        Command::Binary { action, input, sep } => {
            let mut opts: BinaryOptions = config.binary.clone();
            if let Some(sep) = sep {
                opts.separator = match sep {
                    BitSep::None => BitSeparator::None,
                    BitSep::Space => BitSeparator::Space,
                    BitSep::Newline => BitSeparator::Newline,
                };
            }
            convert(&Tool::Binary(action.into(), opts), input, &config)?
        }
        Command::Utf8 {
            action,
            input,
            format,
        } => {
            let format = format.map_or(config.utf8.format, |f| match f {
                Utf8Format::Hex => ByteFormat::Hex,
                Utf8Format::Decimal => ByteFormat::Decimal,
                Utf8Format::Binary => ByteFormat::Binary,
                Utf8Format::Escaped => ByteFormat::Escaped,
            });
            let tool = match action {
                Utf8Action::Encode => Tool::Utf8(Direction::Encode, format),
                Utf8Action::Decode => Tool::Utf8(Direction::Decode, format),
                Utf8Action::Inspect => Tool::Utf8Inspect,
            };
            convert(&tool, input, &config)?
        }
        Command::Url {
            action,
            input,
            mode,
        } => {
            let mode = mode.map_or(config.url.mode, |m| match m {
                UrlModeArg::Component => UrlMode::Component,
                UrlModeArg::Uri => UrlMode::Uri,
                UrlModeArg::Form => UrlMode::Form,
            });
            let tool = match action {
                UrlAction::Encode => Tool::Url(Direction::Encode, mode),
                UrlAction::Decode => Tool::Url(Direction::Decode, mode),
                UrlAction::Parse => Tool::UrlParse,
            };
            convert(&tool, input, &config)?
        }
        Command::Caesar {
            action,
            input,
            shift,
        } => {
            let tool = match action {
                CaesarAction::Encrypt => Tool::Caesar {
                    shift,
                    direction: Direction::Encode,
                },
                CaesarAction::Decrypt => Tool::Caesar {
                    shift,
                    direction: Direction::Decode,
                },
                CaesarAction::Brute => Tool::CaesarBruteForce,
                CaesarAction::Crack => Tool::CaesarCrack,
            };
            convert(&tool, input, &config)?
        }
        Command::Hash {
            input,
            algorithm,
            format,
            verify,
        } => {
            let format = format.map_or(config.hash.format, |f| match f {
                DigestFormatArg::Hex => DigestFormat::HexLower,
                DigestFormatArg::HexUpper => DigestFormat::HexUpper,
                DigestFormatArg::Base64 => DigestFormat::Base64,
            });
            let tool = if let Some(expected) = verify {
                match Checksum::parse(&expected) {
                    Ok(checksum) => Tool::Verify(checksum),
                    Err(err) => return Ok(Outcome::Message(err.to_string())),
                }
            } else {
                match algorithm.as_deref() {
                    Some(name) if name.eq_ignore_ascii_case("all") => Tool::HashAll(format),
                    Some(name) => match name.parse::<HashAlgorithm>() {
                        Ok(alg) => Tool::Hash(alg, format),
                        Err(err) => return Ok(Outcome::Message(err.to_string())),
                    },
                    None => Tool::Hash(config.hash.algorithm, format),
                }
            };
            convert(&tool, input, &config)?
        }
        Command::Uuid {
            count,
            upper,
            no_hyphens,
            braces,
        } => {
            let mut format = config.uuid;
            format.uppercase |= upper;
            format.hyphens &= !no_hyphens;
            format.braces |= braces;
            run_generator(&Generator::Uuid(format), &mut rng, count.count)
        }
        Command::Ip { count, v6, public } => {
            let opts = IpOptions {
                kind: if v6 { IpKind::V6 } else { IpKind::V4 },
                public_only: public,
            };
            run_generator(&Generator::Ip(opts), &mut rng, count.count)
        }
        Command::Date {
            count,
            start,
            end,
            format,
            sorted,
        } => {
            let defaults = DateOptions::default();
            let opts = DateOptions {
                start: start.unwrap_or(defaults.start),
                end: end.unwrap_or(defaults.end),
                format: format.unwrap_or(defaults.format),
                sorted,
            };
            run_generator(&Generator::Date(opts), &mut rng, count.count)
        }
        Command::Letters {
            count,
            case,
            unique,
        } => {
            let case = match case {
                CaseArg::Upper => LetterCase::Upper,
                CaseArg::Lower => LetterCase::Lower,
                CaseArg::Mixed => LetterCase::Mixed,
            };
            let opts = LetterOptions { case, unique };
            run_generator(&Generator::Letters(opts), &mut rng, count.count)
        }
        Command::Months {
            count,
            style,
            unique,
        } => {
            let style = match style {
                StyleArg::Full => MonthStyle::Full,
                StyleArg::Short => MonthStyle::Short,
                StyleArg::Number => MonthStyle::Number,
            };
            let opts = MonthOptions { style, unique };
            run_generator(&Generator::Months(opts), &mut rng, count.count)
        }
        Command::Choices {
            items,
            count,
            unique,
        } => run_generator(
            &Generator::Choices(items, ChoiceOptions { unique }),
            &mut rng,
            count.count,
        ),
        Command::Tools => Outcome::Output(convkit_engine::tool_names().join("\n")),
    };
    Ok(outcome)
}

fn hex_separator(sep: HexSep) -> HexSeparator {
    match sep {
        HexSep::None => HexSeparator::None,
        HexSep::Space => HexSeparator::Space,
        HexSep::Colon => HexSeparator::Colon,
        HexSep::Dash => HexSeparator::Dash,
        HexSep::Comma => HexSeparator::Comma,
        HexSep::Newline => HexSeparator::Newline,
    }
}

/// Run a converter on positional text, a file, or stdin.
fn convert(tool: &Tool, input: Input, config: &ConvkitConfig) -> Result<Outcome> {
    if let Some(path) = &input.file {
        return Ok(run_file(tool, path, config.max_input_bytes));
    }
    if let Some(text) = &input.text {
        return Ok(run(tool, text.as_bytes()));
    }

    let mut data = Vec::new();
    std::io::stdin()
        .lock()
        .take(config.max_input_bytes.saturating_add(1))
        .read_to_end(&mut data)
        .context("failed to read stdin")?;
    if data.len() as u64 > config.max_input_bytes {
        anyhow::bail!(
            "stdin is larger than the {} byte limit",
            config.max_input_bytes
        );
    }
    let payload = if tool.reads_encoded_text() {
        convkit_engine::strip_trailing_newline(&data)
    } else {
        &data
    };
    Ok(run(tool, payload))
}
