//! Exits and the challenges raised against them.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{
    tx::PlasmaTx,
    types::{BlockHeight, Slot},
};

/// A pending claim to withdraw a coin to the root ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    /// The exiting coin.
    pub slot: Slot,

    /// Claimed current owner.
    pub owner: Address,

    /// Owner of the coin in `prev_block`, who signed the exiting transaction.
    pub prev_owner: Address,

    /// Block of the parent transaction; `0` for an exit straight from a deposit.
    pub prev_block: BlockHeight,

    /// Block of the exiting transaction.
    pub exit_block: BlockHeight,

    /// Timestamp at which the challenge window opened.
    pub created_at: u64,

    /// Value at risk.
    pub bond: U256,
}

/// A dispute against an exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// The challenged coin.
    pub slot: Slot,

    /// Account that posted the challenge bond.
    pub challenger: Address,

    /// Recipient named by the challenging transaction.
    pub owner: Address,

    /// The contradicting transaction.
    pub challenging_tx: PlasmaTx,

    /// Canonical hash of [`Challenge::challenging_tx`].
    pub challenging_tx_hash: B256,

    /// Block holding the challenging transaction.
    pub challenged_block: BlockHeight,

    /// Value at risk.
    pub bond: U256,
}
