use log::warn;
use std::env;
use std::time::Duration;

use crate::envelope::MIN_FRAME_SIZE;
use crate::errors::RpcError;

/// Timeout applied to calls whose deadline tracker carries no deadline.
#[cfg(not(test))]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(test)]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Largest frame accepted or produced, header and body included.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 8 * 1024 * 1024;

/// Environment variable overriding [`RpcConfig::default_timeout`], in milliseconds.
pub const DEFAULT_TIMEOUT_ENV: &str = "CLUSTERRPC_DEFAULT_TIMEOUT_MS";

/// Environment variable overriding [`RpcConfig::max_message_size`], in bytes.
pub const MAX_MESSAGE_SIZE_ENV: &str = "CLUSTERRPC_MAX_MESSAGE_SIZE";

#[derive(Debug, Clone)]
pub struct RpcConfig {
    default_timeout: Duration,
    max_message_size: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl RpcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from the defaults, overridden by any of the
    /// `CLUSTERRPC_*` variables that hold a positive integer. A size too
    /// small to hold an empty frame is ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(millis) = positive_from_env(DEFAULT_TIMEOUT_ENV) {
            config.default_timeout = Duration::from_millis(millis);
        }
        match positive_from_env(MAX_MESSAGE_SIZE_ENV) {
            Some(size) if size as usize >= MIN_FRAME_SIZE => {
                config.max_message_size = size as usize;
            }
            Some(size) => {
                warn!(
                    "Ignoring {}={}: below the {} byte frame overhead",
                    MAX_MESSAGE_SIZE_ENV, size, MIN_FRAME_SIZE
                );
            }
            None => {}
        }
        config
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub fn validate(&self) -> Result<(), RpcError> {
        if self.default_timeout.is_zero() {
            return Err(RpcError::ConfigError(
                "default timeout must be non-zero".to_string(),
            ));
        }
        // A frame must at least hold its three length fields.
        if self.max_message_size < MIN_FRAME_SIZE {
            return Err(RpcError::ConfigError(format!(
                "max message size {} is below the {} byte frame overhead",
                self.max_message_size, MIN_FRAME_SIZE
            )));
        }
        Ok(())
    }
}

fn positive_from_env(key: &str) -> Option<u64> {
    let raw = env::var(key).ok()?;
    parse_positive(&raw)
}

fn parse_positive(raw: &str) -> Option<u64> {
    let value = raw.trim().parse::<u64>().ok()?;
    (value > 0).then_some(value)
}
