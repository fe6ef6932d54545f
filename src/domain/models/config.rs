use serde::{Deserialize, Serialize};

/// Top-level shape of the bootstrap settings inside a profile.
///
/// Profiles carry the bootstrap settings under a `boot` key, next to
/// whatever top-level keys the registered configuration targets use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootDocument {
    #[serde(default)]
    pub boot: BootConfig,
}

/// Bootstrap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootConfig {
    /// Active environment; selects `<prefix>-<active>.yaml` as the override profile
    #[serde(default = "default_active")]
    pub active: String,

    /// Logging configuration
    #[serde(default)]
    pub log: LogSettings,
}

fn default_active() -> String {
    "dev".to_string()
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            active: default_active(),
            log: LogSettings::default(),
        }
    }
}

/// Logging configuration
///
/// Keys are stored lowercased (`savetype`, `maxsize`, ...), the form every
/// profile tree is normalized to. The camelCase spellings are accepted as
/// aliases when the struct is deserialized directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Minimum severity name (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory holding the log file
    #[serde(default = "default_path")]
    pub path: String,

    /// `json` for structured records, anything else for plain text
    #[serde(rename = "savetype", alias = "saveType", default = "default_save_type")]
    pub save_type: String,

    /// Log file name without the `.log` extension
    #[serde(rename = "filename", alias = "fileName", default = "default_file_name")]
    pub file_name: String,

    /// Size in megabytes at which the log file rotates
    #[serde(rename = "maxsize", alias = "maxSize", default = "default_max_size")]
    pub max_size: u64,

    /// Number of rotated files to keep
    #[serde(rename = "maxbackups", alias = "maxBackups", default = "default_max_backups")]
    pub max_backups: usize,

    /// Days a rotated file is kept
    #[serde(rename = "maxage", alias = "maxAge", default = "default_max_age")]
    pub max_age: u32,

    /// Compress rotated files
    #[serde(default = "default_true")]
    pub compress: bool,
}

/// Output format derived from [`LogSettings::save_type`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogSettings {
    pub fn format(&self) -> LogFormat {
        if self.save_type == "json" {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_path() -> String {
    ".".to_string()
}

fn default_save_type() -> String {
    "text".to_string()
}

fn default_file_name() -> String {
    "boot".to_string()
}

const fn default_max_size() -> u64 {
    10
}

const fn default_max_backups() -> usize {
    3
}

const fn default_max_age() -> u32 {
    30
}

const fn default_true() -> bool {
    true
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            path: default_path(),
            save_type: default_save_type(),
            file_name: default_file_name(),
            max_size: default_max_size(),
            max_backups: default_max_backups(),
            max_age: default_max_age(),
            compress: default_true(),
        }
    }
}
