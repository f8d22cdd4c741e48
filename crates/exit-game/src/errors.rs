//! Errors raised by the exit-game client.

use alloy_primitives::Address;
use plasma_cash_child_chain::ChildChainError;
use plasma_cash_primitives::{BlockHeight, EncodingError, Slot};
use plasma_cash_root_chain::RootChainError;
use thiserror::Error;

/// Failures of exit-game calls.
#[derive(Debug, Error)]
pub enum ExitGameError {
    /// The requested block holds no transaction for the coin.
    #[error("block {block} holds no transaction for slot {slot}")]
    SlotNotInBlock {
        /// The coin.
        slot: Slot,

        /// The block searched.
        block: BlockHeight,
    },

    /// A transaction in a sealed block came without its inclusion proof.
    #[error("transaction for slot {slot} in block {block} has no inclusion proof")]
    MissingProof {
        /// The coin.
        slot: Slot,

        /// The block holding the transaction.
        block: BlockHeight,
    },

    /// The inclusion proof does not lead to the block's root.
    #[error("proof for slot {slot} does not match the root of block {block}")]
    ProofMismatch {
        /// The coin.
        slot: Slot,

        /// The block holding the transaction.
        block: BlockHeight,
    },

    /// The transaction carries no signature to present to the root ledger.
    #[error("transaction for slot {slot} in block {block} is unsigned")]
    MissingSignature {
        /// The coin.
        slot: Slot,

        /// The block holding the transaction.
        block: BlockHeight,
    },

    /// The signing key does not belong to the account the root-ledger client calls as.
    #[error("signer {signer} does not match root-ledger caller {caller}")]
    SignerMismatch {
        /// Address of the signing key.
        signer: Address,

        /// Account of the root-ledger client.
        caller: Address,
    },

    /// The client was configured with a block interval of zero.
    #[error("block interval must be positive")]
    ZeroBlockInterval,

    /// A root-ledger call failed or was rejected.
    #[error("root ledger: {0}")]
    RootChain(#[from] RootChainError),

    /// A child-ledger call failed or was rejected.
    #[error("child ledger: {0}")]
    ChildChain(#[from] ChildChainError),

    /// Signing or encoding a transaction failed.
    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),
}

/// Result type of exit-game calls.
pub type ExitGameResult<T> = Result<T, ExitGameError>;
