//! Coins held in custody by the root ledger.

use alloy_primitives::{Address, U256};
use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

use crate::{
    errors::EncodingError,
    types::{BlockHeight, Slot},
};

/// Lifecycle of a coin on the root ledger.
///
/// The discriminants match the root contract's `uint8` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Arbitrary)]
pub enum CoinState {
    /// Held by the root ledger and freely transferable on the child ledger.
    Deposited = 0,

    /// An exit is pending its challenge window.
    Exiting = 1,

    /// An exit has at least one open challenge.
    Challenged = 2,

    /// Every open challenge was answered; the exit proceeds as if it had never been challenged.
    Responded = 3,

    /// The exit finalized; the owner may withdraw.
    Exited = 4,
}

impl CoinState {
    /// Whether an exit is in progress for the coin.
    pub const fn is_exiting(&self) -> bool {
        matches!(self, Self::Exiting | Self::Challenged | Self::Responded)
    }

    /// Whether moving from `self` to `next` is a legal step of the exit game.
    pub const fn can_transition_to(&self, next: CoinState) -> bool {
        use CoinState::*;

        matches!(
            (self, next),
            (Deposited, Exiting)
                | (Exiting, Challenged)
                | (Exiting, Deposited)
                | (Exiting, Exited)
                | (Challenged, Challenged)
                | (Challenged, Responded)
                | (Challenged, Deposited)
                | (Responded, Challenged)
                | (Responded, Deposited)
                | (Responded, Exited)
        )
    }
}

impl TryFrom<u8> for CoinState {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Deposited),
            1 => Ok(Self::Exiting),
            2 => Ok(Self::Challenged),
            3 => Ok(Self::Responded),
            4 => Ok(Self::Exited),
            other => Err(EncodingError::UnknownCoinState(other)),
        }
    }
}

/// Kind of asset a coin represents, matching the root contract's `uint8` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Arbitrary)]
pub enum CoinMode {
    /// Native ether.
    Eth = 0,

    /// A single non-fungible token.
    Erc721 = 1,

    /// An amount of a fungible token.
    Erc20 = 2,
}

impl TryFrom<u8> for CoinMode {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Eth),
            1 => Ok(Self::Erc721),
            2 => Ok(Self::Erc20),
            other => Err(EncodingError::UnknownCoinMode(other)),
        }
    }
}

/// A root-ledger-custodied asset slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlasmaCoin {
    /// Unique identifier of the coin.
    pub slot: Slot,

    /// Token id for NFTs, zero otherwise.
    pub uid: U256,

    /// Block number of the deposit that created the coin.
    pub deposit_block: BlockHeight,

    /// Amount or token count.
    pub denomination: U256,

    /// Depositor, replaced by the exit owner once an exit finalizes.
    pub owner: Address,

    /// Position in the exit game.
    pub state: CoinState,

    /// Asset kind.
    pub mode: CoinMode,

    /// Token contract, zero for ether.
    pub contract_address: Address,
}
