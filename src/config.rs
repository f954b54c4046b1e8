//! Service configuration.
//!
//! Loaded from an optional TOML file. Every key has a default, so an empty
//! file (or no file at all) gives the built-in behaviour.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! file = "poolchem.log"
//! timestamps = true
//!
//! [florida_floors]
//! alkalinity = 60
//! calcium = 200
//! cya = 30
//! ```
//!
//! The binary takes the file path from `--config` / `POOLCHEM_CONFIG` and
//! a level override from `--log-level` / `POOLCHEM_LOG_LEVEL`; a `.env`
//! file is honoured for both.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::logging::LogLevel;
use crate::regions::{FloorThresholds, DEFAULT_FLORIDA_FLOORS};

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub florida_floors: FloorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

/// Florida trigger floors, ppm.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloorConfig {
    pub alkalinity: f64,
    pub calcium: f64,
    pub cya: f64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            alkalinity: DEFAULT_FLORIDA_FLOORS.alkalinity_ppm,
            calcium: DEFAULT_FLORIDA_FLOORS.calcium_ppm,
            cya: DEFAULT_FLORIDA_FLOORS.cya_ppm,
        }
    }
}

impl From<FloorConfig> for FloorThresholds {
    fn from(c: FloorConfig) -> Self {
        Self {
            alkalinity_ppm: c.alkalinity,
            calcium_ppm: c.calcium,
            cya_ppm: c.cya,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The file could not be read.
    Io { path: String, message: String },
    /// The file is not valid TOML for this schema.
    Parse(String),
    /// Values parsed but are out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Cannot read config {}: {}", path, message)
            }
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads `path` when given, else defaults, then applies an optional
    /// log-level override.
    pub fn resolve(path: Option<&Path>, log_level: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(level) = log_level {
            config.logging.level = level.to_string();
            config.validate()?;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level()?;
        let floors = [
            ("alkalinity", self.florida_floors.alkalinity),
            ("calcium", self.florida_floors.calcium),
            ("cya", self.florida_floors.cya),
        ];
        for (name, value) in floors {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "florida_floors.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.logging
            .level
            .parse::<LogLevel>()
            .map_err(ConfigError::Invalid)
    }

    pub fn florida_floors(&self) -> FloorThresholds {
        self.florida_floors.into()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.florida_floors(), DEFAULT_FLORIDA_FLOORS);
        assert_eq!(config.log_level(), Ok(LogLevel::Info));
    }

    #[test]
    fn test_partial_floor_override_keeps_other_defaults() {
        let config = EngineConfig::from_toml_str("[florida_floors]\nalkalinity = 70\n")
            .expect("valid config");
        let floors = config.florida_floors();
        assert_eq!(floors.alkalinity_ppm, 70.0);
        assert_eq!(floors.calcium_ppm, DEFAULT_FLORIDA_FLOORS.calcium_ppm);
        assert_eq!(floors.cya_ppm, DEFAULT_FLORIDA_FLOORS.cya_ppm);
    }

    #[test]
    fn test_logging_section() {
        let config = EngineConfig::from_toml_str(
            "[logging]\nlevel = \"debug\"\nfile = \"pool.log\"\ntimestamps = true\n",
        )
        .expect("valid config");
        assert_eq!(config.log_level(), Ok(LogLevel::Debug));
        assert_eq!(config.logging.file.as_deref(), Some("pool.log"));
        assert!(config.logging.timestamps);
    }

    #[test]
    fn test_negative_floor_is_invalid() {
        let err = EngineConfig::from_toml_str("[florida_floors]\ncya = -5\n")
            .expect_err("negative floor must be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_log_level_is_invalid() {
        let err = EngineConfig::from_toml_str("[logging]\nlevel = \"chatty\"\n")
            .expect_err("unknown level must be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("[florida_floors]\nph = 7\n")
            .expect_err("unknown key must be rejected");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_resolve_without_file_applies_level_override() {
        let config = EngineConfig::resolve(None, Some("warn")).expect("valid override");
        assert_eq!(config.log_level(), Ok(LogLevel::Warning));
        assert_eq!(config.florida_floors(), DEFAULT_FLORIDA_FLOORS);

        let err = EngineConfig::resolve(None, Some("loud")).expect_err("bad override");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/poolchem.toml"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
