//! Configuration of the root-ledger client.

use std::time::Duration;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EXIT_BOND, DEFAULT_TX_POLL_INTERVAL, DEFAULT_TX_TIMEOUT};

/// Connection and submission parameters for an [`EthRootChainClient`](crate::EthRootChainClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootChainConfig {
    /// JSON-RPC endpoint of the root ledger.
    pub rpc_url: String,

    /// Address of the deployed `RootChain` contract.
    pub contract_address: Address,

    /// How often the receipt of a submitted transaction is polled for.
    #[serde(default = "default_tx_poll_interval")]
    pub tx_poll_interval: Duration,

    /// How long a submitted transaction may stay unmined before the submission fails.
    #[serde(default = "default_tx_timeout")]
    pub tx_timeout: Duration,

    /// Value attached to `startExit` and `challengeBefore`, in wei.
    #[serde(default = "default_exit_bond")]
    pub exit_bond: U256,
}

impl RootChainConfig {
    /// Creates a config for the contract at `contract_address` behind `rpc_url`, with default
    /// submission parameters.
    pub fn new(rpc_url: impl Into<String>, contract_address: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            contract_address,
            tx_poll_interval: DEFAULT_TX_POLL_INTERVAL,
            tx_timeout: DEFAULT_TX_TIMEOUT,
            exit_bond: DEFAULT_EXIT_BOND,
        }
    }

    /// Updates the receipt polling interval and returns the updated config.
    pub fn with_tx_poll_interval(mut self, interval: Duration) -> Self {
        self.tx_poll_interval = interval;
        self
    }

    /// Updates the confirmation deadline and returns the updated config.
    pub fn with_tx_timeout(mut self, timeout: Duration) -> Self {
        self.tx_timeout = timeout;
        self
    }

    /// Updates the exit bond and returns the updated config.
    pub fn with_exit_bond(mut self, bond: U256) -> Self {
        self.exit_bond = bond;
        self
    }
}

const fn default_tx_poll_interval() -> Duration {
    DEFAULT_TX_POLL_INTERVAL
}

const fn default_tx_timeout() -> Duration {
    DEFAULT_TX_TIMEOUT
}

const fn default_exit_bond() -> U256 {
    DEFAULT_EXIT_BOND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serde_toml() {
        let config = r#"
            rpc_url = "http://localhost:8545"
            contract_address = "0x5194b63f10691e46635b27925100cfc0a5ceca62"
            tx_poll_interval = { secs = 1, nanos = 0 }
        "#;

        let config = toml::from_str::<RootChainConfig>(config);
        assert!(
            config.is_ok(),
            "must be able to deserialize config from toml but got: {}",
            config.unwrap_err()
        );

        let config = config.unwrap();
        assert_eq!(config.tx_poll_interval, Duration::from_secs(1));
        assert_eq!(config.tx_timeout, DEFAULT_TX_TIMEOUT);
        assert_eq!(config.exit_bond, U256::from(100_000_000_000_000_000u64));

        let serialized = toml::to_string(&config).unwrap();
        let deserialized = toml::from_str::<RootChainConfig>(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }
}
