//! Typed editor configuration.
//!
//! The GUI layer owns where (and whether) configuration is stored; this
//! module only defines the typed value, its serde JSON round trip, and a
//! version gate so a newer file is rejected instead of silently
//! misread. Preferences feed the pure helpers explicitly; nothing here
//! is ambient state.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BLEND_ALPHA, DEFAULT_UNDO_DEPTH, MIN_PREVIEW_BORDER};

/// Current configuration format version. Increment on breaking changes.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's filter type.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Editor configuration that can be exported and imported as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration format.
    pub version: u32,

    /// Application name (for identification).
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences.
    #[serde(default)]
    pub preferences: EditorPreferences,
}

fn default_app_name() -> String {
    "Pixie".to_string()
}

/// User preferences consumed by the editing core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// Border, in pixels, around an object when building preview crops.
    #[serde(default = "default_border_px")]
    pub border_px: u32,

    /// Mask overlay blend numerator over 255.
    #[serde(default = "default_blend_alpha")]
    pub blend_alpha: u8,

    /// Undo history depth per editing session.
    #[serde(default = "default_undo_depth")]
    pub max_undo_depth: usize,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_border_px() -> u32 {
    16
}

fn default_blend_alpha() -> u8 {
    DEFAULT_BLEND_ALPHA
}

fn default_undo_depth() -> usize {
    DEFAULT_UNDO_DEPTH
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            border_px: default_border_px(),
            blend_alpha: default_blend_alpha(),
            max_undo_depth: default_undo_depth(),
            log_level: LogLevel::default(),
        }
    }
}

impl EditorPreferences {
    /// Border preference with the floor applied.
    pub fn effective_border(&self) -> u32 {
        self.border_px.max(MIN_PREVIEW_BORDER)
    }
}

impl EditorConfig {
    /// A configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: EditorPreferences::default(),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON, rejecting files written by a newer
    /// version.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },
}
