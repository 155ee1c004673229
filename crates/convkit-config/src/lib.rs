//! Configuration management and loading for convkit.
//!
//! A config file sets the default options of each converter. Every field
//! is optional; anything missing keeps its built-in default.

use convkit_base64::Base64Options;
use convkit_binary::BinaryOptions;
use convkit_error::{ConvertError, Result};
use convkit_hash::{DigestFormat, HashAlgorithm};
use convkit_hex::HexOptions;
use convkit_logging::LoggingConfig;
use convkit_url::UrlMode;
use convkit_utf8::ByteFormat;
use convkit_uuid::UuidFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on file input, 10 MiB
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Configuration format types supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    #[default]
    Yaml,
}

impl ConfigFormat {
    /// JSON for `.json` files, YAML for everything else
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Utf8Config {
    pub format: ByteFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    pub mode: UrlMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    pub algorithm: HashAlgorithm,
    pub format: DigestFormat,
}

/// Main convkit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvkitConfig {
    pub base64: Base64Options,
    pub hex: HexOptions,
    pub binary: BinaryOptions,
    pub utf8: Utf8Config,
    pub url: UrlConfig,
    pub hash: HashConfig,
    pub uuid: UuidFormat,
    pub logging: LoggingConfig,
    /// Largest file accepted as input
    pub max_input_bytes: u64,
}

impl Default for ConvkitConfig {
    fn default() -> Self {
        Self {
            base64: Base64Options::default(),
            hex: HexOptions::default(),
            binary: BinaryOptions::default(),
            utf8: Utf8Config::default(),
            url: UrlConfig::default(),
            hash: HashConfig::default(),
            uuid: UuidFormat::default(),
            logging: LoggingConfig::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Parse configuration text in the given format
pub fn parse_config(contents: &str, format: ConfigFormat) -> Result<ConvkitConfig> {
    match format {
        ConfigFormat::Json => serde_json::from_str(contents)
            .map_err(|e| ConvertError::Config(format!("failed to parse JSON config: {e}"))),
        ConfigFormat::Yaml => {
            // an empty YAML document means "all defaults"
            if contents.trim().is_empty() {
                return Ok(ConvkitConfig::default());
            }
            serde_yaml::from_str(contents)
                .map_err(|e| ConvertError::Config(format!("failed to parse YAML config: {e}")))
        }
    }
}

/// Load configuration from a file
pub fn load_config(path: impl AsRef<Path>) -> Result<ConvkitConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents, ConfigFormat::from_path(path)).map_err(|e| match e {
        ConvertError::Config(msg) => ConvertError::Config(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Save configuration to a file
pub fn save_config(config: &ConvkitConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let contents = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| ConvertError::Config(format!("failed to serialize JSON config: {e}")))?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| ConvertError::Config(format!("failed to serialize YAML config: {e}")))?,
    };
    std::fs::write(path, contents).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use convkit_base64::Base64Variant;
    use convkit_hex::{HexCase, HexSeparator};
    use convkit_logging::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn config_default_values() {
        let config = ConvkitConfig::default();
        assert_eq!(config.max_input_bytes, 10 * 1024 * 1024);
        assert_eq!(config.hash.algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.url.mode, UrlMode::Component);
        assert!(config.uuid.hyphens);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("convkitrc")), ConfigFormat::Yaml);
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = "hex:\n  case: upper\n  separator: colon\nhash:\n  algorithm: sha512\nlogging:\n  level: debug\n";
        let config = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.hex.case, HexCase::Upper);
        assert_eq!(config.hex.separator, HexSeparator::Colon);
        assert_eq!(config.hash.algorithm, HashAlgorithm::Sha512);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.base64, Base64Options::default());
        assert_eq!(config.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(
            parse_config("  \n", ConfigFormat::Yaml).unwrap(),
            ConvkitConfig::default()
        );
    }

    #[test]
    fn parse_unknown_value() {
        let err = parse_config(r#"{"hash": {"algorithm": "md5"}}"#, ConfigFormat::Json).unwrap_err();
        assert_eq!(err.category(), convkit_error::ErrorCategory::Config);
    }

    #[test]
    fn load_save_yaml_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("convkit.yaml");

        let mut config = ConvkitConfig::default();
        config.base64.variant = Base64Variant::UrlSafe;
        config.base64.padding = false;
        config.max_input_bytes = 1024;

        save_config(&config, &config_path).unwrap();
        let loaded = load_config(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_save_json_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("convkit.json");

        let config = ConvkitConfig::default();
        save_config(&config, &config_path).unwrap();
        let text = std::fs::read_to_string(&config_path).unwrap();
        assert!(text.trim_start().starts_with('{'));
        assert_eq!(load_config(&config_path).unwrap(), config);
    }

    #[test]
    fn load_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.json");
        std::fs::write(&config_path, "{not json").unwrap();
        let err = load_config(&config_path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));

        let missing = load_config(temp_dir.path().join("missing.yaml")).unwrap_err();
        assert!(missing.is_io_error());
    }
}
