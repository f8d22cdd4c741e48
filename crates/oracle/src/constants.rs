//! Default values of the oracle configuration.

use std::time::Duration;

/// Minimum wall-clock time between two steps of the same worker.
pub(crate) const DEFAULT_STEP_INTERVAL: Duration = Duration::from_secs(5);

/// Pause before a crashed worker is relaunched.
pub(crate) const DEFAULT_RESTART_BACKOFF: Duration = Duration::from_secs(30);

/// Child-ledger block interval.
pub(crate) const DEFAULT_BLOCK_INTERVAL: u64 = 1000;
