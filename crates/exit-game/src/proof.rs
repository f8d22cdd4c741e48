//! Transactions paired with the evidence of their inclusion.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Bytes, B256};
use plasma_cash_primitives::{BlockHeight, PlasmaTx, Slot};
use plasma_cash_smt::{default_hashes, MerkleProof};

/// How a transaction is shown to be part of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InclusionProof {
    /// The block is a deposit block, whose root is the transaction's hash. No proof bytes are
    /// sent.
    Deposit,

    /// Sparse Merkle path to the root of a sealed block.
    Merkle(MerkleProof),
}

impl InclusionProof {
    /// Proof bytes in the form the root ledger expects.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::Deposit => Bytes::new(),
            Self::Merkle(proof) => proof.to_bytes().into(),
        }
    }
}

/// A transaction read from a child-ledger block, with its inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxAndProof {
    /// The transaction, signature included.
    pub tx: PlasmaTx,

    /// Proof of inclusion in `block`.
    pub proof: InclusionProof,

    /// Height of the block holding the transaction.
    pub block: BlockHeight,
}

/// What the child ledger shows about a coin in every block since its deposit.
///
/// Each height appears in exactly one of the two maps of a well-formed history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinHistory {
    /// Blocks that spend the coin, with the spending transaction.
    pub inclusions: BTreeMap<BlockHeight, TxAndProof>,

    /// Blocks that leave the coin untouched, with the path to its empty leaf.
    pub exclusions: BTreeMap<BlockHeight, MerkleProof>,
}

impl CoinHistory {
    /// Heights covered by either map, in ascending order and without repeats.
    pub fn heights(&self) -> BTreeSet<BlockHeight> {
        self.inclusions
            .keys()
            .chain(self.exclusions.keys())
            .copied()
            .collect()
    }
}

/// Whether `proof` shows that the block with `root` holds nothing for `slot`.
pub fn check_exclusion(root: B256, slot: Slot, proof: &MerkleProof) -> bool {
    proof.verify(root, slot, default_hashes()[0])
}
