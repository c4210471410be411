//! TOML-based planner configuration.
//!
//! Holds the tunables of plan generation:
//! - Session layout (maximum session length)
//! - Linear progression shape (minutes per tier, tier cap)
//! - Calendar policy (week start, rest days)
//! - Validation limits (weekly minute cap, weekly tolerance)
//! - Optional fixed RNG seed
//!
//! Configuration is stored at `~/.config/ergplan/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Returns `~/.config/ergplan[-dev]/` based on ERGPLAN_ENV.
///
/// Set ERGPLAN_ENV=dev to use the development directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ERGPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ergplan-dev")
    } else {
        base_dir.join("ergplan")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Longest single session; longer days are split into several sessions.
    #[serde(default = "default_max_session_minutes")]
    pub max_session_minutes: u32,
    /// Weekly minutes that add one progression tier.
    #[serde(default = "default_minutes_per_tier")]
    pub minutes_per_tier: u32,
    #[serde(default = "default_max_tiers")]
    pub max_tiers: u8,
    /// Requests above this weekly volume are rejected.
    #[serde(default = "default_max_weekly_minutes")]
    pub max_weekly_minutes: u32,
    /// Allowed distance between a week's total and its target, in minutes.
    #[serde(default = "default_minute_tolerance")]
    pub minute_tolerance: u32,
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
    #[serde(default = "default_rest_days")]
    pub rest_days: Vec<Weekday>,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_session_minutes() -> u32 {
    90
}
fn default_minutes_per_tier() -> u32 {
    240
}
fn default_max_tiers() -> u8 {
    5
}
fn default_max_weekly_minutes() -> u32 {
    3000
}
fn default_minute_tolerance() -> u32 {
    60
}
fn default_week_start() -> Weekday {
    Weekday::Mon
}
fn default_rest_days() -> Vec<Weekday> {
    vec![Weekday::Sun]
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_session_minutes: default_max_session_minutes(),
            minutes_per_tier: default_minutes_per_tier(),
            max_tiers: default_max_tiers(),
            max_weekly_minutes: default_max_weekly_minutes(),
            minute_tolerance: default_minute_tolerance(),
            week_start: default_week_start(),
            rest_days: default_rest_days(),
            seed: None,
        }
    }
}

impl PlanConfig {
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
            return Err(invalid("config key is empty".into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| invalid("unknown config key".into()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| invalid("unknown config key".into()))?;

                let new_value = match existing {
                    serde_json::Value::Number(_) if value == "none" => serde_json::Value::Null,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::Null if value == "none" => serde_json::Value::Null,
                    serde_json::Value::Null => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| invalid("unknown config key".into()))?;
        }

        Err(invalid("unknown config key".into()))
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by key. The change is validated but not saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: PlanConfig = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.check()?;
        *self = updated;
        Ok(())
    }

    /// Reject settings that would make every plan impossible.
    pub fn check(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        if self.max_session_minutes == 0 {
            return Err(invalid("max_session_minutes", "must be positive"));
        }
        if self.minutes_per_tier == 0 {
            return Err(invalid("minutes_per_tier", "must be positive"));
        }
        if self.max_tiers == 0 {
            return Err(invalid("max_tiers", "must be at least 1"));
        }
        if self.max_weekly_minutes == 0 {
            return Err(invalid("max_weekly_minutes", "must be positive"));
        }
        Ok(())
    }
}
