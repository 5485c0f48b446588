use dotenv::dotenv;
use std::env;
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::constants::{DEFAULT_API_VERSION, DEFAULT_HOST, DEFAULT_PORT, FACEBOOK_BASE_URL};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub meta: MetaConfig,
}

/// Credentials and endpoint settings for the Meta Graph API.
///
/// Empty strings mean "not configured". Missing credentials are reported by
/// [`MetaConfig::missing_fields`] and never fail loading.
#[derive(Clone)]
pub struct MetaConfig {
    pub app_id: String,
    pub app_secret: String,
    pub access_token: String,
    pub ad_account_id: String,
    pub page_id: String,
    pub api_version: String,
    pub graph_url: Url,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(String),
    #[error("Invalid Graph API URL: {0}")]
    InvalidGraphUrl(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT").filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let meta = MetaConfig::from_lookup(&lookup)?;

        Ok(Self { host, port, meta })
    }
}

impl MetaConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let api_version = match var("META_API_VERSION") {
            v if v.is_empty() => DEFAULT_API_VERSION.to_string(),
            v => v,
        };

        let graph_raw = match var("META_GRAPH_URL") {
            v if v.is_empty() => FACEBOOK_BASE_URL.to_string(),
            v => v,
        };

        // Validate the URL format
        let graph_url =
            Url::parse(&graph_raw).map_err(|e| ConfigError::InvalidGraphUrl(e.to_string()))?;

        Ok(Self {
            app_id: var("META_APP_ID"),
            app_secret: var("META_APP_SECRET"),
            access_token: var("META_ACCESS_TOKEN"),
            ad_account_id: var("META_AD_ACCOUNT_ID"),
            page_id: var("META_PAGE_ID"),
            api_version,
            graph_url,
        })
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("META_APP_ID", &self.app_id),
            ("META_APP_SECRET", &self.app_secret),
            ("META_ACCESS_TOKEN", &self.access_token),
            ("META_AD_ACCOUNT_ID", &self.ad_account_id),
            ("META_PAGE_ID", &self.page_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect()
    }
}

impl fmt::Debug for MetaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &str| if value.is_empty() { "" } else { "<redacted>" };

        f.debug_struct("MetaConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &redact(&self.app_secret))
            .field("access_token", &redact(&self.access_token))
            .field("ad_account_id", &self.ad_account_id)
            .field("page_id", &self.page_id)
            .field("api_version", &self.api_version)
            .field("graph_url", &self.graph_url.as_str())
            .finish()
    }
}
