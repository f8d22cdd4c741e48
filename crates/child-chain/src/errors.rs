//! Errors raised by the child ledger.

use alloy_primitives::Address;
use plasma_cash_primitives::{BlockHeight, EncodingError, Slot};
use thiserror::Error;

use crate::store::StoreError;

/// Rejections and failures of child-ledger calls.
#[derive(Debug, Error)]
pub enum ChildChainError {
    /// No block exists at the requested height.
    #[error("block {0} not found")]
    BlockNotFound(BlockHeight),

    /// A transaction for this coin is already waiting for the next block.
    #[error("slot {0} already has a pending transaction")]
    SlotAlreadyPending(Slot),

    /// The block named as `prev_block` holds no transaction for the coin.
    #[error("no transaction for slot {slot} in block {prev_block}")]
    UnknownPrevTx {
        /// The coin.
        slot: Slot,

        /// Referenced block.
        prev_block: BlockHeight,
    },

    /// The referenced transaction was already spent by a later one.
    #[error("transaction for slot {slot} in block {prev_block} was spent in block {spent_in}")]
    PrevTxSpent {
        /// The coin.
        slot: Slot,

        /// Referenced block.
        prev_block: BlockHeight,

        /// Block of the coin's latest transaction.
        spent_in: BlockHeight,
    },

    /// The transaction is not signed by the current owner of the coin.
    #[error("slot {slot} is owned by {owner}, transaction signed by {signer}")]
    NotOwner {
        /// The coin.
        slot: Slot,

        /// Current owner.
        owner: Address,

        /// Recovered signer.
        signer: Address,
    },

    /// A different deposit was already recorded at the same height.
    #[error("conflicting deposit for slot {slot} at block {deposit_block}")]
    ConflictingDeposit {
        /// The coin of the rejected deposit.
        slot: Slot,

        /// The contested height.
        deposit_block: BlockHeight,
    },

    /// Deposits may not occupy heights reserved for sealed blocks.
    #[error("block {0} is not a deposit height")]
    InvalidDepositBlock(BlockHeight),

    /// A deposit or seal request was not signed by the configured oracle.
    #[error("command signed by {signer}, not by the oracle")]
    NotOracle {
        /// Recovered issuer of the command.
        signer: Address,
    },

    /// A seal request was issued against a height that has since been sealed past.
    #[error("seal requested after block {requested}, ledger is at {current}")]
    StaleSeal {
        /// Height the requester observed.
        requested: BlockHeight,

        /// Height of the ledger when the request arrived.
        current: BlockHeight,
    },

    /// Signed commands cannot be issued without the oracle's key.
    #[error("no oracle key to sign the command with")]
    MissingOracleKey,

    /// The transaction could not be decoded or its signature recovered.
    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),

    /// The persistence layer failed.
    #[error("store: {0}")]
    Store(#[from] StoreError),

    /// The remote authority rejected the call.
    #[error("rejected by child ledger: {0}")]
    Rejected(String),

    /// The remote authority could not be reached.
    #[error("transport: {0}")]
    Transport(String),
}

/// Result type used by child-ledger calls.
pub type ChildChainResult<T> = Result<T, ChildChainError>;
