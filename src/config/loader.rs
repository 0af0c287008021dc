//! Configuration file loading with precedence handling.

use crate::matcher::FindOptions;
use crate::source::DEFAULT_DELIMITER;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GRIDFIND_CONFIG";

/// Environment variable overriding the match limit.
pub const MATCH_LIMIT_ENV: &str = "GRIDFIND_MATCH_LIMIT";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An override environment variable holds an unusable value.
    #[error("Invalid value '{value}' for {name}")]
    InvalidEnvValue {
        /// Variable name.
        name: &'static str,
        /// Value as found in the environment.
        value: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/gridfind/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Match case exactly.
    #[serde(default)]
    pub case_sensitive: Option<bool>,

    /// Only match whole words.
    #[serde(default)]
    pub whole_words: Option<bool>,

    /// Treat the query as a regular expression.
    #[serde(default)]
    pub regex: Option<bool>,

    /// Stop a scan after this many matches. `0` means unlimited.
    #[serde(default)]
    pub match_limit: Option<usize>,

    /// Cell delimiter of input files.
    #[serde(default)]
    pub delimiter: Option<char>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Match case exactly.
    pub case_sensitive: bool,
    /// Only match whole words.
    pub whole_words: bool,
    /// Treat the query as a regular expression.
    pub regex: bool,
    /// `None` means unlimited.
    pub match_limit: Option<usize>,
    /// Column separator of the input.
    pub delimiter: char,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_words: false,
            regex: false,
            match_limit: None,
            delimiter: DEFAULT_DELIMITER,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Find options handed to the matcher.
    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            case_sensitive: self.case_sensitive,
            whole_words: self.whole_words,
            regex: self.regex,
        }
    }
}

/// Flags given on the command line. `None` leaves the lower layer in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--case-sensitive`.
    pub case_sensitive: Option<bool>,
    /// `--whole-words`.
    pub whole_words: Option<bool>,
    /// `--regex`.
    pub regex: Option<bool>,
    /// `--limit`; 0 means unlimited.
    pub match_limit: Option<usize>,
    /// `--delimiter`.
    pub delimiter: Option<char>,
}

fn limit_from(value: usize) -> Option<usize> {
    (value > 0).then_some(value)
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/gridfind/gridfind.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("gridfind").join("gridfind.log")
    } else {
        PathBuf::from("gridfind.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/gridfind/config.toml` on Unix, appropriate path on other
/// platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gridfind").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `GRIDFIND_CONFIG` environment variable
/// 3. Default path `~/.config/gridfind/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `GRIDFIND_MATCH_LIMIT`: override the match limit (`0` = unlimited)
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvValue` if a variable is set but does not
/// parse.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(MATCH_LIMIT_ENV) {
        let value = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidEnvValue {
                name: MATCH_LIMIT_ENV,
                value: raw.clone(),
            })?;
        config.match_limit = limit_from(value);
    }

    Ok(config)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        case_sensitive: config.case_sensitive.unwrap_or(defaults.case_sensitive),
        whole_words: config.whole_words.unwrap_or(defaults.whole_words),
        regex: config.regex.unwrap_or(defaults.regex),
        match_limit: config.match_limit.map_or(defaults.match_limit, limit_from),
        delimiter: config.delimiter.unwrap_or(defaults.delimiter),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(case_sensitive) = overrides.case_sensitive {
        config.case_sensitive = case_sensitive;
    }
    if let Some(whole_words) = overrides.whole_words {
        config.whole_words = whole_words;
    }
    if let Some(regex) = overrides.regex {
        config.regex = regex;
    }
    if let Some(limit) = overrides.match_limit {
        config.match_limit = limit_from(limit);
    }
    if let Some(delimiter) = overrides.delimiter {
        config.delimiter = delimiter;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
