//! Sparse Merkle tree of fixed depth 64, keyed by coin slot.
//!
//! Every possible slot owns exactly one leaf. Leaves that hold no transaction take a well-known
//! default value, so a tree is fully described by its non-empty leaves and can be rebuilt and
//! verified by both ledgers independently.

mod errors;
mod proof;
mod tree;

pub use errors::ProofError;
pub use proof::{MerkleProof, PROOF_LEN};
pub use tree::{default_hashes, hash_pair, SparseMerkleTree, TREE_DEPTH};
