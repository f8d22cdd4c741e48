//! Construction of the sparse Merkle tree.

use std::{collections::BTreeMap, sync::LazyLock};

use alloy_primitives::{keccak256, B256};

use crate::proof::MerkleProof;

/// Number of hashing levels between a leaf and the root.
pub const TREE_DEPTH: usize = 64;

static DEFAULT_HASHES: LazyLock<[B256; TREE_DEPTH + 1]> = LazyLock::new(|| {
    let mut hashes = [B256::ZERO; TREE_DEPTH + 1];
    hashes[0] = keccak256(B256::ZERO);
    for level in 1..=TREE_DEPTH {
        let below = hashes[level - 1];
        hashes[level] = hash_pair(&below, &below);
    }
    hashes
});

/// Returns the hash of an empty subtree for every level, from the empty leaf (`[0]`) up to the
/// root of an empty tree (`[TREE_DEPTH]`).
pub fn default_hashes() -> &'static [B256; TREE_DEPTH + 1] {
    &DEFAULT_HASHES
}

/// Hashes two sibling nodes into their parent: `keccak256(left || right)`.
pub fn hash_pair(left: &B256, right: &B256) -> B256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left.as_slice());
    buf[32..].copy_from_slice(right.as_slice());
    keccak256(buf)
}

/// A sparse Merkle tree over the full 64-bit slot space.
///
/// Only non-default nodes are stored. Nodes are kept in ordered maps per level, so the resulting
/// root depends solely on the set of `(slot, leaf)` pairs and never on insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMerkleTree {
    /// `levels[0]` holds the leaves and `levels[TREE_DEPTH]` holds the root (if non-default).
    levels: Vec<BTreeMap<u64, B256>>,
}

impl SparseMerkleTree {
    /// Builds a tree from `(slot, leaf)` pairs.
    ///
    /// If the same slot appears more than once the last pair wins; callers are expected to have
    /// enforced uniqueness before building.
    pub fn new(leaves: impl IntoIterator<Item = (u64, B256)>) -> Self {
        let mut levels = Vec::with_capacity(TREE_DEPTH + 1);
        let mut current: BTreeMap<u64, B256> = leaves.into_iter().collect();

        for default in default_hashes().iter().take(TREE_DEPTH) {
            let parents = hash_level(&current, default);
            levels.push(current);
            current = parents;
        }
        levels.push(current);

        Self { levels }
    }

    /// Returns the root digest.
    pub fn root(&self) -> B256 {
        self.levels[TREE_DEPTH]
            .get(&0)
            .copied()
            .unwrap_or(default_hashes()[TREE_DEPTH])
    }

    /// Returns the leaf stored at `slot`, if any.
    pub fn leaf(&self, slot: u64) -> Option<B256> {
        self.levels[0].get(&slot).copied()
    }

    /// Number of non-empty leaves.
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// Whether the tree has no non-empty leaves.
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Produces the sibling path for `slot`, ordered from the leaf level to the level just below
    /// the root.
    ///
    /// A proof can be produced for any slot; for an empty slot it proves the default leaf.
    pub fn proof(&self, slot: u64) -> MerkleProof {
        let defaults = default_hashes();
        let siblings = (0..TREE_DEPTH)
            .map(|level| {
                let sibling_index = (slot >> level) ^ 1;
                self.levels[level]
                    .get(&sibling_index)
                    .copied()
                    .unwrap_or(defaults[level])
            })
            .collect();

        MerkleProof::from_siblings(siblings)
    }
}

/// Hashes one level of non-default nodes into the level above it.
fn hash_level(nodes: &BTreeMap<u64, B256>, default: &B256) -> BTreeMap<u64, B256> {
    let mut parents = BTreeMap::new();
    let mut iter = nodes.iter().peekable();

    while let Some((&index, node)) = iter.next() {
        let is_left = index % 2 == 0;
        let right_sibling = match iter.peek() {
            Some(&(&next, sibling)) if is_left && next == index + 1 => Some(*sibling),
            _ => None,
        };

        let parent = match (is_left, right_sibling) {
            (true, Some(sibling)) => {
                iter.next();
                hash_pair(node, &sibling)
            }
            (true, None) => hash_pair(node, default),
            (false, _) => hash_pair(default, node),
        };

        parents.insert(index / 2, parent);
    }

    parents
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{b256, keccak256, B256};
    use proptest::prelude::*;

    use super::*;

    fn leaf(n: u64) -> B256 {
        keccak256(n.to_be_bytes())
    }

    #[test]
    fn default_leaf_is_hash_of_zero_word() {
        assert_eq!(
            default_hashes()[0],
            b256!("290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563")
        );
    }

    #[test]
    fn empty_tree_has_default_root() {
        let tree = SparseMerkleTree::new([]);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), default_hashes()[TREE_DEPTH]);
    }

    #[test]
    fn single_leaf_root_is_folded_defaults() {
        let slot = 2;
        let tree = SparseMerkleTree::new([(slot, leaf(slot))]);

        // slot 2 is a left child at level 0, a right child at level 1, then left all the way up
        let mut expected = hash_pair(&leaf(slot), &default_hashes()[0]);
        expected = hash_pair(&default_hashes()[1], &expected);
        for level in 2..TREE_DEPTH {
            expected = hash_pair(&expected, &default_hashes()[level]);
        }

        assert_eq!(tree.root(), expected);
    }

    #[test]
    fn adjacent_leaves_share_a_parent() {
        let tree = SparseMerkleTree::new([(0, leaf(0)), (1, leaf(1))]);
        let proof = tree.proof(0);

        assert_eq!(proof.siblings()[0], leaf(1));
        assert!(proof.verify(tree.root(), 0, leaf(0)));
        assert!(tree.proof(1).verify(tree.root(), 1, leaf(1)));
    }

    #[test]
    fn extreme_slots_are_supported() {
        let tree = SparseMerkleTree::new([(0, leaf(0)), (u64::MAX, leaf(u64::MAX))]);

        assert!(tree.proof(u64::MAX).verify(tree.root(), u64::MAX, leaf(u64::MAX)));
        assert!(tree.proof(0).verify(tree.root(), 0, leaf(0)));
        assert!(!tree.proof(0).verify(tree.root(), u64::MAX, leaf(0)));
    }

    #[test]
    fn empty_slot_proves_default_leaf() {
        let tree = SparseMerkleTree::new([(7, leaf(7))]);
        let proof = tree.proof(8);

        assert!(proof.verify(tree.root(), 8, default_hashes()[0]));
        assert!(!proof.verify(tree.root(), 8, leaf(8)));
    }

    proptest! {
        #[test]
        fn root_is_independent_of_insertion_order(
            slots in proptest::collection::btree_set(any::<u64>(), 1..24),
        ) {
            let pairs: Vec<_> = slots.iter().map(|s| (*s, leaf(*s))).collect();
            let forward = SparseMerkleTree::new(pairs.clone());
            let backward = SparseMerkleTree::new(pairs.into_iter().rev());

            prop_assert_eq!(forward.root(), backward.root());
            for slot in &slots {
                prop_assert_eq!(forward.proof(*slot), backward.proof(*slot));
            }
        }

        #[test]
        fn every_included_leaf_verifies(
            slots in proptest::collection::btree_set(any::<u64>(), 1..24),
        ) {
            let tree = SparseMerkleTree::new(slots.iter().map(|s| (*s, leaf(*s))));
            let root = tree.root();

            for slot in &slots {
                let proof = tree.proof(*slot);
                prop_assert_eq!(proof.compute_root(*slot, leaf(*slot)), root);
            }
        }

        #[test]
        fn tampered_proof_byte_fails_verification(
            slots in proptest::collection::btree_set(0u64..4096, 1..8),
            byte in 0usize..crate::PROOF_LEN,
            mask in 1u8..=255,
        ) {
            let tree = SparseMerkleTree::new(slots.iter().map(|s| (*s, leaf(*s))));
            let slot = *slots.iter().next().expect("set is non-empty");

            let mut raw = tree.proof(slot).to_bytes();
            raw[byte] ^= mask;
            let tampered = MerkleProof::from_bytes(&raw).expect("length is unchanged");

            prop_assert!(!tampered.verify(tree.root(), slot, leaf(slot)));
        }
    }
}
