use crate::error::{config_error, env_error, OpenHoursResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Offset used for all-day events when none is configured
pub const DEFAULT_TIME_OFFSET: &str = "-06:00";

/// Google Calendar v3 REST endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Config file read when OPENHOURS_CONFIG is not set
pub const DEFAULT_CONFIG_PATH: &str = "config/openhours.toml";

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Calendar API key
    pub api_key: String,
    /// Map of location names to calendar IDs
    pub locations: HashMap<String, String>,
    /// UTC offset appended to all-day event dates, e.g. "-06:00"
    pub utc_offset: String,
    /// Whether diagnostic output is suppressed
    pub silent: bool,
    /// Base URL of the calendar API
    pub api_base_url: String,
    /// IANA timezone used for display; host local time when unset
    pub timezone: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            locations: HashMap::new(),
            utc_offset: DEFAULT_TIME_OFFSET.to_string(),
            silent: false,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timezone: None,
        }
    }
}

/// Partial update accepted by `OpenHours::configure`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    pub api_key: Option<String>,
    pub calendar: Option<HashMap<String, String>>,
    pub silence: Option<bool>,
    pub time_offset: Option<String>,
}

/// Layout of the optional TOML config file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    time_offset: Option<String>,
    silent: Option<bool>,
    timezone: Option<String>,
    api_base_url: Option<String>,
    #[serde(default)]
    calendars: HashMap<String, String>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> OpenHoursResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let path = env::var("OPENHOURS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = if Path::new(&path).exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };

        // Environment variables take precedence over the file
        if let Ok(key) = env::var("OPENHOURS_API_KEY") {
            config.api_key = key;
        }
        if let Ok(offset) = env::var("OPENHOURS_TIME_OFFSET") {
            config.utc_offset = offset;
        }
        if let Ok(silent) = env::var("OPENHOURS_SILENT") {
            config.silent = parse_flag(&silent)
                .ok_or_else(|| env_error("Invalid OPENHOURS_SILENT value"))?;
        }
        if let Ok(timezone) = env::var("OPENHOURS_TIMEZONE") {
            config.timezone = Some(timezone);
        }
        if let Ok(base_url) = env::var("OPENHOURS_API_BASE_URL") {
            config.api_base_url = base_url;
        }

        // Fail early on a timezone we cannot resolve
        config.display_timezone()?;

        Ok(config)
    }

    /// Build a config from the contents of a TOML file
    pub fn from_toml_str(content: &str) -> OpenHoursResult<Self> {
        let file: FileConfig = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(Self {
            api_key: file.api_key.unwrap_or(defaults.api_key),
            locations: file.calendars,
            utc_offset: file.time_offset.unwrap_or(defaults.utc_offset),
            silent: file.silent.unwrap_or(defaults.silent),
            api_base_url: file.api_base_url.unwrap_or(defaults.api_base_url),
            timezone: file.timezone,
        })
    }

    /// True when both an API key and at least one calendar are set
    pub fn is_ready(&self) -> bool {
        !self.api_key.is_empty() && !self.locations.is_empty()
    }

    /// Look up the calendar ID for a location
    pub fn calendar_for(&self, location: &str) -> Option<&str> {
        self.locations.get(location).map(String::as_str)
    }

    /// Resolve the configured display timezone
    pub fn display_timezone(&self) -> OpenHoursResult<Option<Tz>> {
        match &self.timezone {
            Some(name) => name
                .parse::<Tz>()
                .map(Some)
                .map_err(|_| config_error(&format!("Unknown timezone: {}", name))),
            None => Ok(None),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
