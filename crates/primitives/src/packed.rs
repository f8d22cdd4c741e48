//! Tight ABI packing, as done by Solidity's `abi.encodePacked`.
//!
//! Each value is written at its natural width with no padding and no separators: addresses take
//! 20 bytes, `uintN` takes `N / 8` big-endian bytes and `uint256` takes a full left-padded word.

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::errors::EncodingError;

/// Width of a packed address.
const ADDRESS_LEN: usize = 20;

/// A single value to be packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedValue {
    /// Raw address bytes; anything but 20 bytes is rejected.
    Address(Vec<u8>),

    /// Unsigned integer of the given width in bits.
    Uint {
        /// Width in bits, a multiple of 8 in `8..=256`.
        bits: u16,

        /// The value, which must fit in `bits`.
        value: U256,
    },

    /// Big-endian bytes of a `uint256`, left padded to 32 bytes.
    Uint256Bytes(Vec<u8>),

    /// A fixed 32-byte word.
    Bytes32(B256),

    /// Dynamic bytes, copied verbatim.
    Bytes(Vec<u8>),
}

impl PackedValue {
    /// Packs an address.
    pub fn address(address: Address) -> Self {
        Self::Address(address.to_vec())
    }

    /// Packs a `uint16`.
    pub fn uint16(value: u16) -> Self {
        Self::Uint {
            bits: 16,
            value: U256::from(value),
        }
    }

    /// Packs a `uint32`.
    pub fn uint32(value: u32) -> Self {
        Self::Uint {
            bits: 32,
            value: U256::from(value),
        }
    }

    /// Packs a `uint64`.
    pub fn uint64(value: u64) -> Self {
        Self::Uint {
            bits: 64,
            value: U256::from(value),
        }
    }

    /// Packs a `uint256`.
    pub const fn uint256(value: U256) -> Self {
        Self::Uint { bits: 256, value }
    }

    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodingError> {
        match self {
            Self::Address(bytes) => {
                if bytes.len() != ADDRESS_LEN {
                    return Err(EncodingError::InvalidAddressLength(bytes.len()));
                }
                out.extend_from_slice(bytes);
            }
            Self::Uint { bits, value } => {
                let bits = *bits;
                if bits == 0 || bits > 256 || bits % 8 != 0 {
                    return Err(EncodingError::InvalidUintWidth(bits));
                }
                if value.bit_len() > usize::from(bits) {
                    return Err(EncodingError::UintOverflow { bits });
                }
                let word = value.to_be_bytes::<32>();
                out.extend_from_slice(&word[32 - usize::from(bits / 8)..]);
            }
            Self::Uint256Bytes(bytes) => {
                if bytes.len() > 32 {
                    return Err(EncodingError::Uint256TooLarge(bytes.len()));
                }
                out.resize(out.len() + 32 - bytes.len(), 0);
                out.extend_from_slice(bytes);
            }
            Self::Bytes32(word) => out.extend_from_slice(word.as_slice()),
            Self::Bytes(bytes) => out.extend_from_slice(bytes),
        }

        Ok(())
    }
}

/// Concatenates the tight encodings of `values`.
pub fn encode_packed(values: &[PackedValue]) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::new();
    for value in values {
        value.encode_into(&mut out)?;
    }
    Ok(out)
}

/// `keccak256(abi.encodePacked(values...))`.
pub fn solidity_keccak256(values: &[PackedValue]) -> Result<B256, EncodingError> {
    encode_packed(values).map(keccak256)
}
