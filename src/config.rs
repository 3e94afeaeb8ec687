//! Build-time configuration
//!
//! Values come from environment variables seen by the compiler
//! (`LEDGER_API_URL=... trunk build`), falling back to logged defaults.

use std::str::FromStr;

use log::{info, warn, LevelFilter};
use reqwest::Url;

use crate::error::ConfigError;
use crate::models::RecordId;

const DEFAULT_API_URL: &str = "http://localhost:3000/api/";
const DEFAULT_TOKEN_KEY: &str = "access_token";
const DEFAULT_TEMPLATE_ID: &str = "1";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// REST API root; always ends with `/`
    pub api_base_url: Url,
    /// localStorage key holding the session token
    pub token_key: String,
    /// Template new expense entries are attached to
    pub default_template_id: RecordId,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("LEDGER_API_URL"),
            option_env!("LEDGER_TOKEN_KEY"),
            option_env!("LEDGER_DEFAULT_TEMPLATE_ID"),
            option_env!("LEDGER_LOG_LEVEL"),
        )
    }

    pub fn from_values(
        api_url: Option<&str>,
        token_key: Option<&str>,
        default_template_id: Option<&str>,
        log_level: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_url = or_default("LEDGER_API_URL", api_url, DEFAULT_API_URL);
        Ok(Self {
            api_base_url: parse_base_url(&api_url)?,
            token_key: or_default("LEDGER_TOKEN_KEY", token_key, DEFAULT_TOKEN_KEY),
            default_template_id: RecordId::new(or_default(
                "LEDGER_DEFAULT_TEMPLATE_ID",
                default_template_id,
                DEFAULT_TEMPLATE_ID,
            )),
            log_level: try_parse(
                "LEDGER_LOG_LEVEL",
                &or_default("LEDGER_LOG_LEVEL", log_level, DEFAULT_LOG_LEVEL),
                LevelFilter::Info,
            ),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            default_template_id: RecordId::new(DEFAULT_TEMPLATE_ID),
            log_level: LevelFilter::Info,
        }
    }
}

fn or_default(key: &str, value: Option<&str>, default: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

fn try_parse<T: FromStr>(key: &str, value: &str, fallback: T) -> T {
    value.parse().unwrap_or_else(|_| {
        warn!("Invalid {key} value: {value}");
        fallback
    })
}

/// Parse the API root, adding the trailing slash `Url::join` needs to keep
/// the last path segment.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "not a base URL".to_string(),
        });
    }
    Ok(url)
}
