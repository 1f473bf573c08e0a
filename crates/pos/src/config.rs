use std::path::PathBuf;
use std::time::Duration;

use pizzeria_observability::{LogFormat, LogFormatError};

pub const ENV_API_URL: &str = "PIZZERIA_API_URL";
pub const ENV_DATA_DIR: &str = "PIZZERIA_DATA_DIR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "PIZZERIA_HTTP_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "PIZZERIA_LOG_FORMAT";

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

const APP_DIR: &str = "pizzeria-pos";

/// Runtime settings of the POS binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosConfig {
    /// Catalog API base, without trailing slash.
    pub api_url: String,
    /// Directory holding the persisted cart.
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PIZZERIA_API_URL must be an http(s) URL, got `{0}`")]
    InvalidApiUrl(String),
    #[error("PIZZERIA_HTTP_TIMEOUT_SECS must be a positive integer, got `{0}`")]
    InvalidTimeout(String),
    #[error("PIZZERIA_LOG_FORMAT: {0}")]
    LogFormat(#[from] LogFormatError),
    #[error("failed to resolve an app data directory; set PIZZERIA_DATA_DIR")]
    NoDataDir,
}

impl PosConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or blank values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = match get(ENV_API_URL) {
            Some(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidApiUrl(url));
                }
                url.trim_end_matches('/').to_string()
            }
            None => {
                tracing::debug!("{ENV_API_URL} not set; using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
        };

        let data_dir = match get(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        let http_timeout = match get(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_url,
            data_dir,
            http_timeout,
            log_format,
        })
    }
}

fn default_data_dir() -> Option<PathBuf> {
    let base = dirs::data_dir().or_else(|| {
        dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        })
    })?;
    Some(base.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = PosConfig::from_lookup(lookup(&[(ENV_DATA_DIR, "/tmp/pos")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/pos"));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn explicit_values_are_used() {
        let config = PosConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://menu.example.com/api/"),
            (ENV_DATA_DIR, "/var/lib/pos"),
            (ENV_HTTP_TIMEOUT_SECS, "3"),
            (ENV_LOG_FORMAT, "pretty"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://menu.example.com/api");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = PosConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/tmp/pos"),
            (ENV_API_URL, "   "),
        ]))
        .unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = [(ENV_DATA_DIR, "/tmp/pos")];

        let err = PosConfig::from_lookup(lookup(&[base[0], (ENV_HTTP_TIMEOUT_SECS, "0")]));
        assert_eq!(err, Err(ConfigError::InvalidTimeout("0".into())));

        let err = PosConfig::from_lookup(lookup(&[base[0], (ENV_HTTP_TIMEOUT_SECS, "soon")]));
        assert!(matches!(err, Err(ConfigError::InvalidTimeout(_))));

        let err = PosConfig::from_lookup(lookup(&[base[0], (ENV_API_URL, "ftp://menu")]));
        assert!(matches!(err, Err(ConfigError::InvalidApiUrl(_))));

        let err = PosConfig::from_lookup(lookup(&[base[0], (ENV_LOG_FORMAT, "xml")]));
        assert!(matches!(err, Err(ConfigError::LogFormat(_))));
    }
}
