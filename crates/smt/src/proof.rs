//! Inclusion proofs and their wire formats.

use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    errors::ProofError,
    tree::{default_hashes, hash_pair, TREE_DEPTH},
};

/// Length of a raw proof: one 32-byte sibling per level.
pub const PROOF_LEN: usize = TREE_DEPTH * 32;

/// Length of the bitmap that prefixes a compressed proof.
const BITMAP_LEN: usize = 8;

/// Sibling-hash path from a leaf to the root.
///
/// The raw wire format is the concatenation of all [`TREE_DEPTH`] siblings ordered from the leaf
/// level upwards. The compressed format is an 8-byte big-endian bitmap, where bit `d` marks a
/// non-default sibling at level `d`, followed by only those non-default siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MerkleProof {
    siblings: Vec<B256>,
}

impl MerkleProof {
    pub(crate) fn from_siblings(siblings: Vec<B256>) -> Self {
        debug_assert_eq!(siblings.len(), TREE_DEPTH);
        Self { siblings }
    }

    /// Siblings ordered from the leaf level to the level just below the root.
    pub fn siblings(&self) -> &[B256] {
        &self.siblings
    }

    /// Folds `leaf` up the tree along this path and returns the resulting root.
    pub fn compute_root(&self, slot: u64, leaf: B256) -> B256 {
        let mut node = leaf;
        let mut index = slot;

        for sibling in &self.siblings {
            node = if index % 2 == 0 {
                hash_pair(&node, sibling)
            } else {
                hash_pair(sibling, &node)
            };
            index /= 2;
        }

        node
    }

    /// Checks that `leaf` sits at `slot` in the tree committed to by `root`.
    pub fn verify(&self, root: B256, slot: u64, leaf: B256) -> bool {
        self.compute_root(slot, leaf) == root
    }

    /// Encodes the proof in the raw format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PROOF_LEN);
        for sibling in &self.siblings {
            out.extend_from_slice(sibling.as_slice());
        }
        out
    }

    /// Decodes a proof from the raw format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        if bytes.len() != PROOF_LEN {
            return Err(ProofError::InvalidLength {
                expected: PROOF_LEN,
                actual: bytes.len(),
            });
        }

        let siblings = bytes.chunks_exact(32).map(B256::from_slice).collect();
        Ok(Self::from_siblings(siblings))
    }

    /// Encodes the proof in the compressed format.
    pub fn to_compressed(&self) -> Vec<u8> {
        let defaults = default_hashes();
        let mut bitmap = 0u64;
        let mut out = vec![0u8; BITMAP_LEN];

        for (level, sibling) in self.siblings.iter().enumerate() {
            if *sibling != defaults[level] {
                bitmap |= 1 << level;
                out.extend_from_slice(sibling.as_slice());
            }
        }

        out[..BITMAP_LEN].copy_from_slice(&bitmap.to_be_bytes());
        out
    }

    /// Decodes a proof from the compressed format.
    pub fn from_compressed(bytes: &[u8]) -> Result<Self, ProofError> {
        let Some((bitmap, mut rest)) = bytes.split_first_chunk::<BITMAP_LEN>() else {
            return Err(ProofError::InvalidCompressedLength {
                expected: BITMAP_LEN,
                actual: bytes.len(),
            });
        };

        let bitmap = u64::from_be_bytes(*bitmap);
        let expected = BITMAP_LEN + 32 * bitmap.count_ones() as usize;
        if bytes.len() != expected {
            return Err(ProofError::InvalidCompressedLength {
                expected,
                actual: bytes.len(),
            });
        }

        let defaults = default_hashes();
        let siblings = (0..TREE_DEPTH)
            .map(|level| {
                if bitmap & (1 << level) == 0 {
                    defaults[level]
                } else {
                    let (sibling, tail) = rest.split_at(32);
                    rest = tail;
                    B256::from_slice(sibling)
                }
            })
            .collect();

        Ok(Self::from_siblings(siblings))
    }
}

impl Serialize for MerkleProof {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Bytes::from(self.to_bytes()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MerkleProof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Bytes::deserialize(deserializer)?;
        Self::from_bytes(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::keccak256;

    use super::*;
    use crate::SparseMerkleTree;

    fn sample_tree() -> SparseMerkleTree {
        SparseMerkleTree::new(
            [1u64, 2, 3, 1_000_000, u64::MAX]
                .into_iter()
                .map(|slot| (slot, keccak256(slot.to_be_bytes()))),
        )
    }

    #[test]
    fn raw_proof_has_one_word_per_level() {
        let proof = sample_tree().proof(2);
        let raw = proof.to_bytes();

        assert_eq!(raw.len(), PROOF_LEN);
        assert_eq!(MerkleProof::from_bytes(&raw), Ok(proof));
    }

    #[test]
    fn raw_proof_rejects_wrong_length() {
        let raw = sample_tree().proof(2).to_bytes();

        assert_eq!(
            MerkleProof::from_bytes(&raw[..PROOF_LEN - 1]),
            Err(ProofError::InvalidLength {
                expected: PROOF_LEN,
                actual: PROOF_LEN - 1
            })
        );
    }

    #[test]
    fn compressed_proof_drops_default_siblings() {
        let tree = sample_tree();
        let proof = tree.proof(1_000_000);
        let compressed = proof.to_compressed();

        let non_default = proof
            .siblings()
            .iter()
            .enumerate()
            .filter(|(level, sibling)| **sibling != default_hashes()[*level])
            .count();
        assert_eq!(compressed.len(), BITMAP_LEN + 32 * non_default);
        assert_eq!(MerkleProof::from_compressed(&compressed), Ok(proof));
    }

    #[test]
    fn empty_tree_proof_compresses_to_bitmap_only() {
        let proof = SparseMerkleTree::new([]).proof(42);
        assert_eq!(proof.to_compressed(), vec![0u8; BITMAP_LEN]);
    }

    #[test]
    fn compressed_proof_rejects_truncation() {
        let compressed = sample_tree().proof(3).to_compressed();

        assert!(matches!(
            MerkleProof::from_compressed(&compressed[..compressed.len() - 1]),
            Err(ProofError::InvalidCompressedLength { .. })
        ));
        assert!(matches!(
            MerkleProof::from_compressed(&compressed[..4]),
            Err(ProofError::InvalidCompressedLength { .. })
        ));
    }

    #[test]
    fn serializes_as_hex_bytes() {
        let proof = sample_tree().proof(u64::MAX);
        let json = serde_json::to_string(&proof).expect("must serialize");

        assert_eq!(json, format!("\"0x{}\"", hex::encode(proof.to_bytes())));
        assert_eq!(
            serde_json::from_str::<MerkleProof>(&json).expect("must deserialize"),
            proof
        );
        assert!(serde_json::from_str::<MerkleProof>("\"0x00\"").is_err());
    }
}
