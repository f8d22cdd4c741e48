use thiserror::Error;

/// Errors raised while decoding a Merkle inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// A raw proof must carry exactly one 32-byte sibling per tree level.
    #[error("invalid proof length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length in bytes.
        expected: usize,

        /// Length that was supplied.
        actual: usize,
    },

    /// The compressed proof is shorter than its bitmap or carries a different number of siblings
    /// than the bitmap announces.
    #[error("invalid compressed proof length: expected {expected} bytes, got {actual}")]
    InvalidCompressedLength {
        /// Length implied by the bitmap.
        expected: usize,

        /// Length that was supplied.
        actual: usize,
    },
}
