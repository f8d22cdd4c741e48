//! Configuration of the child-ledger authority.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BLOCK_INTERVAL;

/// Parameters of a [`PlasmaCashChain`](crate::PlasmaCashChain).
///
/// Construct with [`Default::default`] and adjust with the builder methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildChainConfig {
    /// Spacing between sealed blocks. Must match the root ledger's `childBlockInterval`.
    pub block_interval: u64,

    /// Root-ledger address of the oracle, the only issuer of relayed deposits and seal requests.
    ///
    /// Without one every signed command is refused.
    #[serde(default)]
    pub oracle: Option<Address>,
}

impl ChildChainConfig {
    /// Updates the block interval and returns the updated config.
    ///
    /// # Panics
    ///
    /// If `interval` is zero.
    pub fn with_block_interval(mut self, interval: u64) -> Self {
        assert!(interval > 0, "block interval must be positive");
        self.block_interval = interval;
        self
    }

    /// Sets the oracle address and returns the updated config.
    pub const fn with_oracle(mut self, oracle: Address) -> Self {
        self.oracle = Some(oracle);
        self
    }
}

impl Default for ChildChainConfig {
    fn default() -> Self {
        Self {
            block_interval: DEFAULT_BLOCK_INTERVAL,
            oracle: None,
        }
    }
}
