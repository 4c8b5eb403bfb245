use std::path::{Path, PathBuf};

use crate::config::schema::{Config, ProviderKind, CONFIG_VERSION};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

/// `~/.claimdesk/config.json`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claimdesk").join("config.json"))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads `path` when given, otherwise the default location when that file
/// exists, otherwise built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            log::debug!("Loading config from {}", path.display());
            load_config(path)
        }
        _ => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.media.max_dimension == 0 {
        return Err(ConfigError::Validation {
            message: "media.maxDimension must be positive".to_string(),
        });
    }
    if !(1..=100).contains(&config.media.jpeg_quality) {
        return Err(ConfigError::Validation {
            message: format!(
                "media.jpegQuality must be between 1 and 100, got {}",
                config.media.jpeg_quality
            ),
        });
    }

    let assessment = &config.assessment;
    if assessment.max_attempts == 0 {
        return Err(ConfigError::Validation {
            message: "assessment.maxAttempts must be at least 1".to_string(),
        });
    }

    if assessment.provider == ProviderKind::Remote {
        let url = reqwest::Url::parse(&assessment.endpoint).map_err(|e| ConfigError::Validation {
            message: format!("Invalid assessment endpoint '{}': {}", assessment.endpoint, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                message: format!(
                    "Assessment endpoint must use http or https, got '{}'",
                    url.scheme()
                ),
            });
        }

        if !assessment.has_api_key_source() {
            return Err(ConfigError::Validation {
                message: "Remote assessment provider needs apiKey, apiKeyFile or apiKeyEnvVar"
                    .to_string(),
            });
        }
    }

    Ok(())
}
