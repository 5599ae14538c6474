//! Client configuration.
//!
//! Values come from the defaults below, then the environment (a `.env` file
//! is loaded by the binary before this runs), then CLI flags.

use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://svc.metrotransit.org/NexTrip/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const BASE_URL_VAR: &str = "NEXTRIP_BASE_URL";
pub const TIMEOUT_VAR: &str = "NEXTRIP_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "NEXTRIP_CONNECT_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root. Always ends with `/` so endpoint paths can be appended.
    pub base_url: Url,
    /// Whole-request timeout. `None` waits forever.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Some(DEFAULT_TIMEOUT),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(BASE_URL_VAR) {
            config = config.with_base_url(&base)?;
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            config.timeout = parse_timeout(&secs).with_context(|| format!("{TIMEOUT_VAR}={secs}"))?;
        }
        if let Some(secs) = lookup(CONNECT_TIMEOUT_VAR) {
            config.connect_timeout = parse_secs(&secs)
                .with_context(|| format!("{CONNECT_TIMEOUT_VAR}={secs}"))?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base: &str) -> Result<Self> {
        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.base_url =
            Url::parse(&base).with_context(|| format!("invalid NexTrip base URL {base:?}"))?;
        Ok(self)
    }

    /// Full URL for `path`, which must not start with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// `0` disables the request timeout.
pub fn parse_timeout(secs: &str) -> Result<Option<Duration>> {
    let duration = parse_secs(secs)?;
    Ok((!duration.is_zero()).then_some(duration))
}

fn parse_secs(secs: &str) -> Result<Duration> {
    let secs: u64 = secs
        .trim()
        .parse()
        .with_context(|| format!("expected a whole number of seconds, got {secs:?}"))?;
    Ok(Duration::from_secs(secs))
}
