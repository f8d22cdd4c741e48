//! Constants used throughout the crate.

/// Default spacing between blocks sealed by the authority.
pub(crate) const DEFAULT_BLOCK_INTERVAL: u64 = 1000;
