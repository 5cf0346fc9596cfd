//! User configuration at ~/.config/countdays/config.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::recurrence::milestone::PastEntries;
use crate::recurrence::LeapDayPolicy;

/// Upper bound for listing lengths and the D-Day window radius
pub const MAX_LISTING_LEN: u32 = 1000;

/// Language used for rendered day counts and notification texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

fn default_database() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("countdays")
        .join("events.db")
}

fn default_yearly_past() -> PastEntries {
    PastEntries::Keep
}

fn default_monthly_past() -> PastEntries {
    PastEntries::Drop
}

fn default_milestone_interval() -> u32 {
    100
}

fn default_milestone_count() -> u32 {
    10
}

fn default_yearly_count() -> u32 {
    10
}

fn default_monthly_count() -> u32 {
    12
}

fn default_dday_window() -> u32 {
    7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: PathBuf,

    #[serde(default)]
    pub language: Language,

    /// IANA timezone used for "today"; the system zone when unset
    pub timezone: Option<String>,

    #[serde(default)]
    pub leap_day: LeapDayPolicy,

    /// Past entries in the yearly listing (the start date is one of them)
    #[serde(default = "default_yearly_past")]
    pub yearly_past: PastEntries,

    #[serde(default = "default_monthly_past")]
    pub monthly_past: PastEntries,

    #[serde(default = "default_milestone_interval")]
    pub milestone_interval: u32,

    #[serde(default = "default_milestone_count")]
    pub milestone_count: u32,

    #[serde(default = "default_yearly_count")]
    pub yearly_count: u32,

    #[serde(default = "default_monthly_count")]
    pub monthly_count: u32,

    /// Days shown on each side of a D-Day target
    #[serde(default = "default_dday_window")]
    pub dday_window: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            language: Language::default(),
            timezone: None,
            leap_day: LeapDayPolicy::default(),
            yearly_past: default_yearly_past(),
            monthly_past: default_monthly_past(),
            milestone_interval: default_milestone_interval(),
            milestone_count: default_milestone_count(),
            yearly_count: default_yearly_count(),
            monthly_count: default_monthly_count(),
            dday_window: default_dday_window(),
        }
    }
}

impl Config {
    pub fn config_path() -> AppResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Config("Could not determine config directory".into()))?
            .join("countdays");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from `path`, or defaults when the file does not exist
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.milestone_interval == 0 {
            return Err("milestone_interval must be at least 1".to_string());
        }
        let limits = [
            ("milestone_count", self.milestone_count),
            ("yearly_count", self.yearly_count),
            ("monthly_count", self.monthly_count),
            ("dday_window", self.dday_window),
        ];
        for (name, value) in limits {
            if value > MAX_LISTING_LEN {
                return Err(format!("{name} must be at most {MAX_LISTING_LEN}, got {value}"));
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }
}
