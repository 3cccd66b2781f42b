use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "/next-pokemon";
pub const DEFAULT_ALERT: &str = "Could not load the next Pokémon. Reloading the page...";

/// Widget settings, read from the `data-config` attribute of the mount element.
///
/// Every field is optional; an absent attribute gives the defaults, which
/// reproduce the plain behaviour: fetch `/next-pokemon`, and on any failure
/// alert and reload straight away.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub endpoint: String,
    /// Extra attempts after a failed fetch before giving up and reloading
    pub max_retries: u32,
    /// Base delay before a retry, doubled on every further attempt
    pub retry_delay_ms: u32,
    pub alert_message: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            endpoint: DEFAULT_ENDPOINT.into(),
            max_retries: 0,
            retry_delay_ms: 500,
            alert_message: DEFAULT_ALERT.into(),
            log_level: "info".into(),
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.level_filter()?;
        Ok(config)
    }

    /// Parse the attribute if present, falling back to the defaults
    pub fn from_attribute(raw: Option<&str>) -> Result<Config, ConfigError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Config::default()),
            Some(raw) => Config::from_json(raw),
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}
