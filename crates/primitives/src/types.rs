//! Scalar aliases used across the workspace.

/// Unique 64-bit identifier of a plasma coin.
pub type Slot = u64;

/// Child-ledger block number, as recorded on both ledgers.
pub type BlockHeight = u64;
