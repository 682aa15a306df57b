//! TOML-based application configuration.
//!
//! Stores the timer's configuration surface:
//! - Phase durations and tick resolution
//! - Display preferences for the CLI driver
//!
//! Configuration is stored at `~/.config/intermezzo/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::timer::Phase;

/// Returns `~/.config/intermezzo[-dev]/` based on INTERMEZZO_ENV.
///
/// Set INTERMEZZO_ENV=dev to use the development config directory, or
/// INTERMEZZO_CONFIG_DIR to point somewhere else entirely (used by tests).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = if let Ok(dir) = std::env::var("INTERMEZZO_CONFIG_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("INTERMEZZO_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("intermezzo-dev")
        } else {
            base_dir.join("intermezzo")
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Timer-specific configuration: the two phase durations and the tick
/// resolution the driver is expected to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_secs")]
    pub work_secs: u64,
    #[serde(default = "default_relax_secs")]
    pub relax_secs: u64,
    /// How many driver ticks make up one second of countdown.
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u64,
    /// Allow a single `tick` call to consume more than one whole second.
    /// Off by default: a backlog of ticks drains one second per call.
    #[serde(default)]
    pub catch_up: bool,
}

impl TimerConfig {
    /// Configured duration of the given phase, in seconds.
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Relax => self.relax_secs,
        }
    }

    /// Reject configurations the timer cannot meaningfully run with.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero tick resolution or a zero-length phase.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.ticks_per_second".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.work_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.work_secs".into(),
                message: "phase duration must be at least 1 second".into(),
            });
        }
        if self.relax_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.relax_secs".into(),
                message: "phase duration must be at least 1 second".into(),
            });
        }
        Ok(())
    }
}

/// Display configuration for the CLI driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Redraw cadence in milliseconds.
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Render an ASCII progress bar next to the countdown label.
    #[serde(default = "default_true")]
    pub progress_bar: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/intermezzo/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// Default functions
fn default_work_secs() -> u64 {
    20
}
fn default_relax_secs() -> u64 {
    5
}
fn default_ticks_per_second() -> u64 {
    1000
}
fn default_refresh_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_secs: default_work_secs(),
            relax_secs: default_relax_secs(),
            ticks_per_second: default_ticks_per_second(),
            catch_up: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            progress_bar: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.into(),
                            message: e.to_string(),
                        })?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                            key: key.into(),
                            message: format!("cannot parse '{value}' as number"),
                        })?;
                        serde_json::Value::Number(n.into())
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
        }

        Err(ConfigError::UnknownKey(key.into()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                cfg.timer.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist. Returns error if the key is
    /// unknown, the value does not parse, or the result fails validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// the resulting timer config is invalid, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.timer.validate()?;
        *self = updated;
        self.save()?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
