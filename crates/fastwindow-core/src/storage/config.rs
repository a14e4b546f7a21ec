//! TOML-based application configuration.
//!
//! Stores the fasting window preference and notification settings at
//! `<data_dir>/config.toml`. The active fasting *duration* lives in the
//! record store instead, pinned there whenever a fast starts, so a
//! config edit can never change the terms of a session already running.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, ValidationError};

/// Fasting window preference: the intended daily start/end hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastingConfig {
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
}

/// Notification preferences, pass-through for the reminder planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub fasting_success_notification: bool,
    #[serde(default = "default_fasting_emoji")]
    pub fasting_emoji: String,
    #[serde(default = "default_weight_emoji")]
    pub weight_emoji: String,
    /// 1 = Sunday, 2 = Monday, ... matching the source convention.
    #[serde(default = "default_weight_day")]
    pub weight_record_day_of_week: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fasting: FastingConfig,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

/// Default fasting duration in hours when the store holds none.
pub const DEFAULT_DURATION_HOURS: f64 = 16.0;
const MIN_DURATION_HOURS: f64 = 12.0;
const MAX_DURATION_HOURS: f64 = 24.0;

/// Check a proposed fasting duration against the supported window.
pub fn validate_duration(hours: f64) -> Result<(), ValidationError> {
    if !hours.is_finite() || !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&hours) {
        return Err(ValidationError::DurationOutOfRange { hours });
    }
    Ok(())
}

fn default_start_hour() -> u32 {
    10
}
fn default_end_hour() -> u32 {
    22
}
fn default_fasting_emoji() -> String {
    "🔥".into()
}
fn default_weight_emoji() -> String {
    "⚖️".into()
}
fn default_weight_day() -> u32 {
    2 // Monday
}

impl Default for FastingConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            fasting_success_notification: false,
            fasting_emoji: default_fasting_emoji(),
            weight_emoji: default_weight_emoji(),
            weight_record_day_of_week: default_weight_day(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
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
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// as the existing type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()
    }
}

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
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current
            .get_mut(part)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    }

    Err(ConfigError::UnknownKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.fasting.start_hour, 10);
        assert_eq!(parsed.fasting.end_hour, 22);
        assert!(!parsed.notifications.fasting_success_notification);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("fasting.start_hour").as_deref(), Some("10"));
        assert_eq!(
            cfg.get("notifications.fasting_success_notification")
                .as_deref(),
            Some("false")
        );
        assert!(cfg.get("fasting.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values_in_place() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        set_json_value_by_path(&mut json, "fasting.end_hour", "20").unwrap();
        assert_eq!(
            get_json_value_by_path(&json, "fasting.end_hour").unwrap(),
            &serde_json::Value::Number(20.into())
        );
        set_json_value_by_path(&mut json, "notifications.fasting_emoji", "🥗").unwrap();
        assert_eq!(
            get_json_value_by_path(&json, "notifications.fasting_emoji").unwrap(),
            &serde_json::Value::String("🥗".into())
        );
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(set_json_value_by_path(&mut json, "fasting.nope", "1").is_err());
        assert!(set_json_value_by_path(
            &mut json,
            "notifications.fasting_success_notification",
            "not_a_bool"
        )
        .is_err());
    }

    #[test]
    fn duration_validation_bounds() {
        assert!(validate_duration(16.0).is_ok());
        assert!(validate_duration(12.0).is_ok());
        assert!(validate_duration(24.0).is_ok());
        assert_eq!(
            validate_duration(11.5),
            Err(ValidationError::DurationOutOfRange { hours: 11.5 })
        );
        assert!(validate_duration(f64::NAN).is_err());
    }
}
