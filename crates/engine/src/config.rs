//! Store configuration
//!
//! A [`StoreConfig`] can be built in code with [`StoreConfig::builder`] or
//! loaded from TOML:
//!
//! ```toml
//! ttl_ms = 3600000
//! max_value_bytes = 10485760
//! max_partition_bytes = 104857600
//! partition_limit = "enforce"
//! ```
//!
//! Every key is optional. Missing keys take the defaults below.

use serde::{Deserialize, Serialize};
use stash_core::limits::{DEFAULT_MAX_PARTITION_BYTES, DEFAULT_MAX_VALUE_BYTES};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default idle time before an execution/workflow entry is evicted: one hour
pub const DEFAULT_TTL_MS: u64 = 3_600_000;

/// What happens when a write would push a partition past its ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitPolicy {
    /// Reject the write with `PartitionLimitExceeded`
    #[default]
    Enforce,
    /// Log a warning and accept the write
    Advisory,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is out of range
    #[error("invalid config value for '{field}': {reason}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Tunables for a [`Store`](crate::Store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Idle time in milliseconds after which an execution/workflow entry is evicted
    pub ttl_ms: u64,
    /// Largest serialized value a single write may store
    pub max_value_bytes: u64,
    /// Largest aggregate serialized size of one partition
    pub max_partition_bytes: u64,
    /// Whether the partition ceiling rejects writes or only warns
    pub partition_limit: LimitPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
            max_partition_bytes: DEFAULT_MAX_PARTITION_BYTES,
            partition_limit: LimitPolicy::Enforce,
        }
    }
}

impl StoreConfig {
    /// Start from the defaults
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }

    /// Eviction TTL as a duration
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "ttl_ms",
                reason: "must be greater than zero",
            });
        }
        if self.max_value_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_value_bytes",
                reason: "must be greater than zero",
            });
        }
        if self.max_partition_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_partition_bytes",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

/// Builder for [`StoreConfig`]
///
/// ```ignore
/// let config = StoreConfig::builder()
///     .ttl(Duration::from_secs(60))
///     .max_value_bytes(1024)
///     .advisory_partition_limit()
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Builder seeded with the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Eviction TTL
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.config.ttl_ms = ttl.as_millis() as u64;
        self
    }

    /// Per-value ceiling in bytes
    pub fn max_value_bytes(mut self, bytes: u64) -> Self {
        self.config.max_value_bytes = bytes;
        self
    }

    /// Per-partition ceiling in bytes
    pub fn max_partition_bytes(mut self, bytes: u64) -> Self {
        self.config.max_partition_bytes = bytes;
        self
    }

    /// Only warn when a partition passes its ceiling
    pub fn advisory_partition_limit(mut self) -> Self {
        self.config.partition_limit = LimitPolicy::Advisory;
        self
    }

    /// Set the partition ceiling policy explicitly
    pub fn partition_limit(mut self, policy: LimitPolicy) -> Self {
        self.config.partition_limit = policy;
        self
    }

    /// Finish building
    pub fn build(self) -> StoreConfig {
        self.config
    }
}
