use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the contacts module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactsConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// How long a soft-deleted account stays restorable before the sweeper purges it.
    #[serde(default = "default_retention", with = "humantime_serde")]
    pub retention: Duration,
    #[serde(default = "default_sweep_interval", with = "humantime_serde")]
    pub sweep_interval: Duration,
    /// Upper bound for one engine operation, transaction included.
    #[serde(default = "default_store_timeout", with = "humantime_serde")]
    pub store_timeout: Duration,
    #[serde(default = "default_sweeper_enabled")]
    pub sweeper_enabled: bool,
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

fn default_retention() -> Duration {
    Duration::from_secs(72 * 60 * 60)
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_store_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_sweeper_enabled() -> bool {
    true
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            retention: default_retention(),
            sweep_interval: default_sweep_interval(),
            store_timeout: default_store_timeout(),
            sweeper_enabled: default_sweeper_enabled(),
        }
    }
}

impl ContactsConfig {
    /// Reject values that would make the engine misbehave.
    ///
    /// # Errors
    /// Returns a description of the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err("page sizes must be positive".to_owned());
        }
        if self.default_page_size > self.max_page_size {
            return Err(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size, self.max_page_size
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err("sweep_interval must be positive".to_owned());
        }
        if self.store_timeout.is_zero() {
            return Err("store_timeout must be positive".to_owned());
        }
        Ok(())
    }

    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            retention: self.retention,
            store_timeout: self.store_timeout,
        }
    }
}

/// Serde support for `Duration` via `humantime` (`"72h"`, `"5s"`, `"1h 30m"`).
pub mod humantime_serde {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    /// # Errors
    /// Fails when the string is not a humantime duration.
    pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        humantime::parse_duration(&s).map_err(de::Error::custom)
    }

    /// # Errors
    /// Propagates serializer failures.
    pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&humantime::format_duration(*d).to_string())
    }
}
