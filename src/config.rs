//! Engine configuration
//!
//! Defaults match the CloudFormation `Multiply` macro contract. A TOML file can
//! override any of them:
//!
//! ```toml
//! [multiply]
//! marker_field = "MultiplyKey"
//! default_placeholder = "%d"
//! default_count = 1
//! max_count = 1000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_MARKER_FIELD: &str = "MultiplyKey";
pub const DEFAULT_PLACEHOLDER: &str = "%d";
pub const DEFAULT_COUNT: u64 = 1;
pub const DEFAULT_MAX_COUNT: u64 = 1000;

/// Configuration options for template multiplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiplyConfig {
    /// Resource field naming the directive that targets the resource
    pub marker_field: String,

    /// Placeholder token used when the request omits `Placeholder`
    pub default_placeholder: String,

    /// Count used when a single-key request omits `Multiply`
    pub default_count: u64,

    /// Largest count a single directive may request
    pub max_count: u64,
}

/// TOML structure for deserializing configuration files
#[derive(Deserialize)]
struct TomlConfig {
    multiply: Option<TomlMultiply>,
}

#[derive(Deserialize)]
struct TomlMultiply {
    marker_field: Option<String>,
    default_placeholder: Option<String>,
    default_count: Option<u64>,
    max_count: Option<u64>,
}

impl Default for MultiplyConfig {
    fn default() -> Self {
        Self {
            marker_field: DEFAULT_MARKER_FIELD.to_string(),
            default_placeholder: DEFAULT_PLACEHOLDER.to_string(),
            default_count: DEFAULT_COUNT,
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl MultiplyConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string, falling back to defaults for missing fields
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(section) = parsed.multiply {
            if let Some(marker) = section.marker_field {
                config.marker_field = marker;
            }
            if let Some(placeholder) = section.default_placeholder {
                config.default_placeholder = placeholder;
            }
            if let Some(count) = section.default_count {
                config.default_count = count;
            }
            if let Some(max) = section.max_count {
                config.max_count = max;
            }
        }

        Ok(config)
    }

    /// Set the resource marker field
    pub fn with_marker_field(mut self, field: impl Into<String>) -> Self {
        self.marker_field = field.into();
        self
    }

    /// Set the placeholder used when none is supplied
    pub fn with_default_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.default_placeholder = placeholder.into();
        self
    }

    /// Set the count used when none is supplied
    pub fn with_default_count(mut self, count: u64) -> Self {
        self.default_count = count;
        self
    }

    /// Set the largest count a directive may request
    pub fn with_max_count(mut self, max: u64) -> Self {
        self.max_count = max;
        self
    }
}
