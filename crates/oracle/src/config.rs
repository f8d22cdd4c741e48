//! Configuration of the relay workers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_BLOCK_INTERVAL, DEFAULT_RESTART_BACKOFF, DEFAULT_STEP_INTERVAL},
    supervisor::SupervisorConfig,
};

/// Settings shared by the deposit and block relay workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Interval between sealed child-ledger blocks.
    #[serde(default = "default_block_interval")]
    pub block_interval: u64,

    /// First root-ledger block scanned for deposits.
    #[serde(default)]
    pub start_eth_block: u64,

    /// Minimum duration of one worker iteration.
    #[serde(default = "default_step_interval")]
    pub step_interval: Duration,

    /// Pause before relaunching a crashed worker.
    #[serde(default = "default_restart_backoff")]
    pub restart_backoff: Duration,

    /// Whether to run the block relay, which needs the authority's key.
    #[serde(default = "default_relay_blocks")]
    pub relay_blocks: bool,
}

impl OracleConfig {
    /// Updates the block interval and returns the updated config.
    pub fn with_block_interval(mut self, interval: u64) -> Self {
        self.block_interval = interval;
        self
    }

    /// Updates the deposit scan start and returns the updated config.
    pub fn with_start_eth_block(mut self, block: u64) -> Self {
        self.start_eth_block = block;
        self
    }

    /// Updates the minimum step duration and returns the updated config.
    pub fn with_step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = interval;
        self
    }

    /// Updates the restart backoff and returns the updated config.
    pub fn with_restart_backoff(mut self, backoff: Duration) -> Self {
        self.restart_backoff = backoff;
        self
    }

    /// Enables or disables the block relay and returns the updated config.
    pub fn with_relay_blocks(mut self, relay_blocks: bool) -> Self {
        self.relay_blocks = relay_blocks;
        self
    }

    /// Scheduling parameters handed to the supervisor.
    pub const fn supervisor(&self) -> SupervisorConfig {
        SupervisorConfig {
            step_interval: self.step_interval,
            restart_backoff: self.restart_backoff,
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            block_interval: DEFAULT_BLOCK_INTERVAL,
            start_eth_block: 0,
            step_interval: DEFAULT_STEP_INTERVAL,
            restart_backoff: DEFAULT_RESTART_BACKOFF,
            relay_blocks: true,
        }
    }
}

const fn default_block_interval() -> u64 {
    DEFAULT_BLOCK_INTERVAL
}

const fn default_step_interval() -> Duration {
    DEFAULT_STEP_INTERVAL
}

const fn default_restart_backoff() -> Duration {
    DEFAULT_RESTART_BACKOFF
}

const fn default_relay_blocks() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serde_toml() {
        let config = r#"
            start_eth_block = 42
            relay_blocks = false
        "#;

        let config = toml::from_str::<OracleConfig>(config);
        assert!(
            config.is_ok(),
            "must be able to deserialize config from toml but got: {}",
            config.unwrap_err()
        );

        let config = config.unwrap();
        assert_eq!(
            config,
            OracleConfig::default()
                .with_start_eth_block(42)
                .with_relay_blocks(false)
        );

        let serialized = toml::to_string(&config).unwrap();
        let deserialized = toml::from_str::<OracleConfig>(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }
}
