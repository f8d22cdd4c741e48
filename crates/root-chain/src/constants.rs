//! Default values for root-ledger interaction.

use std::time::Duration;

use alloy_primitives::U256;

/// How often a submitted transaction's receipt is polled for.
pub(crate) const DEFAULT_TX_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How long a submitted transaction may remain unmined before the submission fails.
pub(crate) const DEFAULT_TX_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Bond attached to `startExit` and `challengeBefore`: 0.1 ether.
pub(crate) const DEFAULT_EXIT_BOND: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);
