//! Configuration file parser for ~/.config/pressmark/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! which points at the Sun News deployment the app was built around.
//! Unknown keys are silently ignored by serde, though we log a warning when
//! the file contains potential typos.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// One news category: a display name plus the WordPress category id on each
/// site. A category without an Urdu id is hidden while browsing in Urdu.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub english_id: u32,
    #[serde(default)]
    pub urdu_id: Option<u32>,
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display label attached to every article (constant per deployment).
    pub source_name: String,

    /// Root of the English WordPress site.
    pub english_base_url: String,

    /// Root of the Urdu WordPress site.
    pub urdu_base_url: String,

    /// Startup language ("en" or "ur") when no session preference exists.
    pub default_language: String,

    /// Browsable categories, in display order.
    pub categories: Vec<CategoryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_name: "Sun News".to_string(),
            english_base_url: "https://sunnewshd.tv/english".to_string(),
            urdu_base_url: "https://sunnewshd.tv".to_string(),
            default_language: "en".to_string(),
            categories: vec![
                CategoryConfig {
                    name: "Latest".to_string(),
                    english_id: 24,
                    urdu_id: Some(33),
                },
                CategoryConfig {
                    name: "Business".to_string(),
                    english_id: 19,
                    urdu_id: None,
                },
                CategoryConfig {
                    name: "Entertainment".to_string(),
                    english_id: 26,
                    urdu_id: Some(37),
                },
                CategoryConfig {
                    name: "Podcast".to_string(),
                    english_id: 50,
                    urdu_id: Some(1),
                },
            ],
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a corrupted or
        // maliciously large file.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "source_name",
                "english_base_url",
                "urdu_base_url",
                "default_language",
                "categories",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            source = %config.source_name,
            categories = config.categories.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
