//! Errors raised while encoding or decoding data that crosses ledger boundaries.

use thiserror::Error;

/// Malformed field widths, lengths or signatures.
///
/// These are fatal to the operation that produced them and are never silently coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// An address must be exactly 20 bytes.
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidAddressLength(usize),

    /// Integer widths must be a multiple of 8 between 8 and 256 bits.
    #[error("invalid uint width: {0} bits")]
    InvalidUintWidth(u16),

    /// The value needs more bits than the declared width.
    #[error("value does not fit in uint{bits}")]
    UintOverflow {
        /// Declared width of the field.
        bits: u16,
    },

    /// A `uint256` given as raw bytes was longer than 32 bytes.
    #[error("uint256 value is {0} bytes long")]
    Uint256TooLarge(usize),

    /// Transaction bytes are not a valid RLP list of the expected shape.
    #[error("invalid rlp: {0}")]
    Rlp(#[from] alloy_rlp::Error),

    /// Trailing bytes after a complete RLP transaction.
    #[error("{0} trailing bytes after transaction")]
    TrailingBytes(usize),

    /// A signature must be one mode byte followed by 65 signature bytes.
    #[error("invalid signature length: expected 66 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// Only raw-hash signatures are supported.
    #[error("unsupported signature mode {0}")]
    UnsupportedSignatureMode(u8),

    /// The signature bytes could not be parsed, produced or recovered.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The transaction carries no signature.
    #[error("transaction is unsigned")]
    MissingSignature,

    /// The root ledger reported a coin state outside the known range.
    #[error("unknown coin state {0}")]
    UnknownCoinState(u8),

    /// The root ledger reported a coin mode outside the known range.
    #[error("unknown coin mode {0}")]
    UnknownCoinMode(u8),
}
