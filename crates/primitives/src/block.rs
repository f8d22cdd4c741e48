//! Blocks of the child ledger.

use alloy_primitives::B256;
use plasma_cash_smt::{MerkleProof, SparseMerkleTree};
use serde::{Deserialize, Serialize};

use crate::{
    deposit::DepositRequest,
    height::is_deposit_block,
    tx::PlasmaTx,
    types::{BlockHeight, Slot},
};

/// A unit of child-ledger finality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlasmaBlock {
    /// Block number.
    pub height: BlockHeight,

    /// Commitment to the transactions, as submitted to the root ledger.
    pub merkle_root: B256,

    /// Transactions sorted by slot, at most one per slot.
    pub transactions: Vec<PlasmaTx>,

    /// The relayed deposit a deposit block records, `None` for interval blocks.
    #[serde(default)]
    pub deposit: Option<DepositRequest>,
}

impl PlasmaBlock {
    /// Seals `txs` into a block at `height`.
    ///
    /// Leaves are keyed by slot and hold each transaction's canonical hash. Every transaction in
    /// the returned block carries its inclusion proof. Slot uniqueness is enforced when
    /// transactions are accepted, not here.
    pub fn build(height: BlockHeight, txs: impl IntoIterator<Item = PlasmaTx>) -> Self {
        let mut transactions: Vec<PlasmaTx> = txs.into_iter().collect();
        transactions.sort_by_key(|tx| tx.slot);

        let tree = SparseMerkleTree::new(transactions.iter().map(|tx| (tx.slot, tx.hash())));
        for tx in &mut transactions {
            tx.proof = Some(tree.proof(tx.slot));
        }

        Self {
            height,
            merkle_root: tree.root(),
            transactions,
            deposit: None,
        }
    }

    /// Creates the block recording a single deposit at its deposit height.
    ///
    /// The root ledger commits to a deposit block with the genesis transaction's hash itself,
    /// so no tree is built and no proof is attached.
    pub fn deposit(request: DepositRequest) -> Self {
        let tx = request.genesis_tx();
        Self {
            height: request.deposit_block,
            merkle_root: tx.hash(),
            transactions: vec![tx],
            deposit: Some(request),
        }
    }

    /// Returns the transaction spending `slot` in this block, if any.
    pub fn tx_for_slot(&self, slot: Slot) -> Option<&PlasmaTx> {
        self.transactions
            .binary_search_by_key(&slot, |tx| tx.slot)
            .ok()
            .map(|idx| &self.transactions[idx])
    }

    /// Proves that a sealed block spends nothing for `slot`.
    ///
    /// The tree is rebuilt from the block's transactions and the path to the slot's empty leaf is
    /// returned. `None` if the block does hold a transaction for the slot.
    pub fn exclusion_proof(&self, slot: Slot) -> Option<MerkleProof> {
        if self.tx_for_slot(slot).is_some() {
            return None;
        }

        let tree = SparseMerkleTree::new(self.transactions.iter().map(|tx| (tx.slot, tx.hash())));
        Some(tree.proof(slot))
    }

    /// Whether this is a deposit block under the given interval.
    pub const fn is_deposit(&self, interval: u64) -> bool {
        is_deposit_block(self.height, interval)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};

    use super::*;

    fn tx(slot: Slot, owner: u8) -> PlasmaTx {
        PlasmaTx::new(slot, 1000, 1, Address::repeat_byte(owner))
    }

    #[test]
    fn build_is_order_independent() {
        let forward = PlasmaBlock::build(2000, [tx(3, 1), tx(1, 2)]);
        let backward = PlasmaBlock::build(2000, [tx(1, 2), tx(3, 1)]);

        assert_eq!(forward, backward);
        assert_eq!(forward.transactions[0].slot, 1);
    }

    #[test]
    fn every_transaction_proves_against_the_root() {
        let block = PlasmaBlock::build(3000, (0..16).map(|slot| tx(slot * 7, slot as u8)));

        for tx in &block.transactions {
            let proof = tx.proof.as_ref().expect("built blocks attach proofs");
            assert!(proof.verify(block.merkle_root, tx.slot, tx.hash()));
        }
    }

    #[test]
    fn finds_transactions_by_slot() {
        let block = PlasmaBlock::build(1000, [tx(10, 1), tx(4, 2), tx(99, 3)]);

        assert_eq!(block.tx_for_slot(4).map(|tx| tx.slot), Some(4));
        assert!(block.tx_for_slot(5).is_none());
    }

    #[test]
    fn proves_absent_slots_against_the_root() {
        let block = PlasmaBlock::build(2000, [tx(10, 1), tx(11, 2)]);
        let empty_leaf = plasma_cash_smt::default_hashes()[0];

        let proof = block.exclusion_proof(12).expect("slot 12 is absent");
        assert!(proof.verify(block.merkle_root, 12, empty_leaf));
        assert!(!proof.verify(block.merkle_root, 10, empty_leaf));
        assert!(block.exclusion_proof(10).is_none());
    }

    #[test]
    fn deposit_block_commits_to_the_genesis_hash() {
        let request = DepositRequest {
            slot: 77,
            deposit_block: 1001,
            denomination: U256::from(u64::MAX),
            from: Address::repeat_byte(9),
        };
        let genesis = PlasmaTx::genesis(77, 1, Address::repeat_byte(9));
        let block = PlasmaBlock::deposit(request.clone());

        assert_eq!(block.height, 1001);
        assert_eq!(block.merkle_root, genesis.hash());
        assert!(block.is_deposit(1000));
        assert_eq!(block.tx_for_slot(77), Some(&genesis));
        assert_eq!(block.deposit, Some(request));
    }
}
