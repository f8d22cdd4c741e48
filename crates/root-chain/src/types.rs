//! Argument bundles of the exit-game calls, and the exit record read back from the contract.
//!
//! Field order follows the argument order of the corresponding contract functions.

use alloy_primitives::{Address, Bytes, B256};
use plasma_cash_primitives::{BlockHeight, CoinState, PlasmaTx, Slot};

/// Arguments of `startExit` and `challengeBefore`: a transaction and the one it spends, each with
/// its inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitClaim {
    /// The coin.
    pub slot: Slot,

    /// The spent transaction; `None` when the claimed transaction is a deposit.
    pub prev_tx: Option<PlasmaTx>,

    /// The claimed transaction.
    pub exiting_tx: PlasmaTx,

    /// Raw inclusion proof of `prev_tx`; empty when not needed.
    pub prev_tx_proof: Bytes,

    /// Raw inclusion proof of `exiting_tx`; empty for a deposit.
    pub exiting_tx_proof: Bytes,

    /// Signature over `exiting_tx`.
    pub signature: Bytes,

    /// Block of `prev_tx`; `0` for a deposit.
    pub prev_block: BlockHeight,

    /// Block of `exiting_tx`.
    pub exit_block: BlockHeight,
}

impl ExitClaim {
    /// Encoded bytes of the spent transaction, empty if there is none.
    pub fn prev_tx_bytes(&self) -> Bytes {
        self.prev_tx
            .as_ref()
            .map(PlasmaTx::rlp_bytes)
            .unwrap_or_default()
    }
}

/// Arguments of `challengeBetween` and `challengeAfter`: a single included transaction that
/// contradicts the exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeEvidence {
    /// The coin.
    pub slot: Slot,

    /// Block holding `tx`.
    pub challenging_block: BlockHeight,

    /// The contradicting transaction.
    pub tx: PlasmaTx,

    /// Raw inclusion proof of `tx`.
    pub proof: Bytes,

    /// Signature over `tx`.
    pub signature: Bytes,
}

/// Arguments of `respondChallengeBefore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeResponse {
    /// The coin.
    pub slot: Slot,

    /// Hash of the challenging transaction being answered.
    pub challenging_tx_hash: B256,

    /// Block holding `responding_tx`.
    pub responding_block: BlockHeight,

    /// Transaction spending the challenging one.
    pub responding_tx: PlasmaTx,

    /// Raw inclusion proof of `responding_tx`.
    pub proof: Bytes,

    /// Signature over `responding_tx`.
    pub signature: Bytes,
}

/// Reply of `getExit(slot)` for a coin with an open exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    /// Account that started the exit.
    pub owner: Address,

    /// Block of the exiting transaction's parent; `0` for an exit from a deposit.
    pub prev_block: BlockHeight,

    /// Block of the exiting transaction.
    pub exit_block: BlockHeight,

    /// State of the exiting coin.
    pub state: CoinState,
}
