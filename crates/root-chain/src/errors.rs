//! Errors raised by root-ledger calls.

use std::time::Duration;

use alloy_primitives::B256;
use alloy_transport::TransportError;
use plasma_cash_primitives::EncodingError;
use thiserror::Error;

/// Failures of root-ledger calls.
#[derive(Debug, Error)]
pub enum RootChainError {
    /// The JSON-RPC endpoint could not be reached or answered with an error.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    /// Call data or return data did not match the contract ABI.
    #[error("abi: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    /// The transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(B256),

    /// The transaction was not mined within the configured deadline.
    #[error("transaction {tx_hash} not confirmed within {timeout:?}")]
    ConfirmationTimeout {
        /// The pending transaction.
        tx_hash: B256,

        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// The wait for confirmation was abandoned because the host is shutting down.
    #[error("confirmation wait for {0} cancelled")]
    Cancelled(B256),

    /// The ledger refused the call.
    #[error("rejected: {0}")]
    Rejected(String),

    /// A value returned by the ledger is out of range.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transaction data could not be encoded.
    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),

    /// A state-changing call was attempted on a read-only client.
    #[error("no signer configured")]
    MissingSigner,
}

impl RootChainError {
    /// Whether the call may succeed if repeated later with fresh parameters.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConfirmationTimeout { .. } | Self::Cancelled(_)
        )
    }
}

/// Result type of root-ledger calls.
pub type RootChainResult<T> = Result<T, RootChainError>;
