//! Errors raised by the relay workers.

use plasma_cash_child_chain::ChildChainError;
use plasma_cash_root_chain::RootChainError;
use thiserror::Error;

/// Failure of a single worker step.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A root-ledger call failed.
    #[error("root ledger: {0}")]
    RootChain(#[from] RootChainError),

    /// A child-ledger call failed.
    #[error("child ledger: {0}")]
    ChildChain(#[from] ChildChainError),
}

impl OracleError {
    /// Whether repeating the step can succeed.
    ///
    /// Malformed data, a missing signing key and a key the child ledger does not accept as the
    /// oracle fail identically on every attempt, so the supervisor stops the worker instead of
    /// retrying.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::RootChain(RootChainError::Encoding(_) | RootChainError::MissingSigner)
                | Self::ChildChain(
                    ChildChainError::Encoding(_)
                        | ChildChainError::NotOracle { .. }
                        | ChildChainError::MissingOracleKey
                )
        )
    }
}

/// Result type of worker steps.
pub type OracleResult<T> = Result<T, OracleError>;

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;

    #[test]
    fn only_data_and_key_errors_are_fatal() {
        assert!(!OracleError::ChildChain(ChildChainError::NotOracle {
            signer: Address::ZERO
        })
        .is_recoverable());
        assert!(!OracleError::ChildChain(ChildChainError::MissingOracleKey).is_recoverable());
        assert!(!OracleError::RootChain(RootChainError::MissingSigner).is_recoverable());
        assert!(OracleError::RootChain(RootChainError::Rejected("busy".into())).is_recoverable());
        assert!(OracleError::ChildChain(ChildChainError::BlockNotFound(1000)).is_recoverable());
    }
}
