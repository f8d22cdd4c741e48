//! Deposits moving coins from the root ledger onto the child ledger.

use alloy_primitives::{Address, U256};
use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

use crate::{
    tx::PlasmaTx,
    types::{BlockHeight, Slot},
};

/// A decoded `Deposit` event of the root ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEvent {
    /// The new coin.
    pub slot: Slot,

    /// Plasma block number assigned to the deposit.
    pub block_number: BlockHeight,

    /// Amount or token count deposited.
    pub denomination: U256,

    /// Depositor.
    pub from: Address,

    /// Token contract, zero for ether.
    pub contract_address: Address,

    /// Root-ledger block that emitted the event.
    pub eth_block: u64,
}

/// Denomination carried by every genesis transaction on the child ledger.
///
/// Child-ledger transfers always move a whole coin. Its value stays on the root ledger and is
/// read back from `getPlasmaCoin` when the coin exits, so the transfer field never has to hold it.
pub const GENESIS_DENOMINATION: u32 = 1;

/// The child-ledger call that records a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Arbitrary)]
pub struct DepositRequest {
    /// The new coin.
    pub slot: Slot,

    /// Height of the deposit block on the child ledger.
    pub deposit_block: BlockHeight,

    /// Amount or token count locked on the root ledger, at full width.
    pub denomination: U256,

    /// Depositor, owner of the genesis transaction.
    pub from: Address,
}

impl DepositRequest {
    /// The transaction that brings the deposited coin into existence on the child ledger.
    pub const fn genesis_tx(&self) -> PlasmaTx {
        PlasmaTx::genesis(self.slot, GENESIS_DENOMINATION, self.from)
    }
}

impl From<&DepositEvent> for DepositRequest {
    fn from(event: &DepositEvent) -> Self {
        Self {
            slot: event.slot,
            deposit_block: event.block_number,
            denomination: event.denomination,
            from: event.from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(denomination: U256) -> DepositEvent {
        DepositEvent {
            slot: 11,
            block_number: 1001,
            denomination,
            from: Address::repeat_byte(1),
            contract_address: Address::ZERO,
            eth_block: 42,
        }
    }

    #[test]
    fn keeps_the_full_root_ledger_denomination() {
        let one_ether = U256::from(10).pow(U256::from(18));
        let request = DepositRequest::from(&event(one_ether));

        assert_eq!(request.slot, 11);
        assert_eq!(request.deposit_block, 1001);
        assert_eq!(request.denomination, one_ether);
    }

    #[test]
    fn genesis_does_not_depend_on_the_deposited_amount() {
        let small = DepositRequest::from(&event(U256::from(1)));
        let huge = DepositRequest::from(&event(U256::MAX));

        assert_eq!(small.genesis_tx(), huge.genesis_tx());
        assert_eq!(huge.genesis_tx().denomination, GENESIS_DENOMINATION);
        assert!(huge.genesis_tx().is_genesis());
    }
}
