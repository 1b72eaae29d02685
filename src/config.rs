//! Client configuration: provider base URLs, transport timeouts, and the
//! query omission policy.
//!
//! Values come from [`ClientConfig::default`], optionally overridden from the
//! environment with [`ClientConfig::from_env`]. Both paths run through
//! [`ClientConfig::validate`] before a session is built from them.

use std::env;

use url::Url;

use crate::error::ConfigError;
use crate::query::OmissionPolicy;
use crate::user_agent;

/// Default Aladhan prayer-times API base URL.
pub const DEFAULT_PRAYER_BASE_URL: &str = "http://api.aladhan.com/v1";

/// Default AlQuran Cloud API base URL.
pub const DEFAULT_QURAN_BASE_URL: &str = "http://api.alquran.cloud/v1";

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout (30 seconds).
pub const READ_TIMEOUT_SECS: u64 = 30;

const ENV_PRAYER_BASE_URL: &str = "ALADHAN_BASE_URL";
const ENV_QURAN_BASE_URL: &str = "ALQURAN_BASE_URL";
const ENV_CONNECT_TIMEOUT: &str = "ALADHAN_CONNECT_TIMEOUT_SECS";
const ENV_READ_TIMEOUT: &str = "ALADHAN_READ_TIMEOUT_SECS";

/// Settings shared by the session manager and every request shape.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for calendar, timings, current-time and methods shapes.
    pub prayer_base_url: String,
    /// Base URL for sura text lookups.
    pub quran_base_url: String,
    /// Connect timeout for the shared session, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for the shared session, in seconds.
    pub read_timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Which parameter values are left out of rendered query strings.
    pub omission: OmissionPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            prayer_base_url: DEFAULT_PRAYER_BASE_URL.to_string(),
            quran_base_url: DEFAULT_QURAN_BASE_URL.to_string(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            user_agent: user_agent::default_user_agent(),
            omission: OmissionPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Points both providers at the same base URL (mock servers, proxies).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = trim_base(base_url.into());
        Self {
            prayer_base_url: base_url.clone(),
            quran_base_url: base_url,
            ..Self::default()
        }
    }

    /// Builds a configuration from defaults plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override is not a number or the
    /// resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(base) = read(ENV_PRAYER_BASE_URL) {
            config.prayer_base_url = trim_base(base);
        }
        if let Some(base) = read(ENV_QURAN_BASE_URL) {
            config.quran_base_url = trim_base(base);
        }
        if let Some(raw) = read(ENV_CONNECT_TIMEOUT) {
            config.connect_timeout_secs = parse_secs("connect_timeout_secs", &raw)?;
        }
        if let Some(raw) = read(ENV_READ_TIMEOUT) {
            config.read_timeout_secs = parse_secs("read_timeout_secs", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks timeouts and base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a timeout outside `1..=3600` or a base URL
    /// that is not an absolute `http`/`https` URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        validate_base_url("prayer_base_url", &self.prayer_base_url)?;
        validate_base_url("quran_base_url", &self.quran_base_url)?;
        Ok(())
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

fn parse_secs(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse().map_err(|_| ConfigError::OutOfRange {
        field,
        value: raw.to_string(),
        expected: "1..=3600",
    })
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if !(1..=3600).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value: value.to_string(),
            expected: "1..=3600",
        });
    }
    Ok(())
}

fn validate_base_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(())
}
