use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_MAXIMUM_SIZE: usize = 1000;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const MAXIMUM_SIZE_VAR: &str = "LOADCACHE_MAXIMUM_SIZE";
const CONNECT_TIMEOUT_VAR: &str = "LOADCACHE_CONNECT_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Upper bound on the number of cached entries.
    pub maximum_size:         usize,
    pub connect_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            maximum_size:         DEFAULT_MAXIMUM_SIZE,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl CacheConfig {
    /// Reads overrides from the process environment, missing variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(MAXIMUM_SIZE_VAR) {
            config.maximum_size = parse_var(MAXIMUM_SIZE_VAR, &v)?;
        }
        if let Some(v) = lookup(CONNECT_TIMEOUT_VAR) {
            config.connect_timeout_secs = parse_var(CONNECT_TIMEOUT_VAR, &v)?;
        }
        Ok(config)
    }

    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{name}={value}").into()))
}
