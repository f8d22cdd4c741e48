//! Persistence of child-ledger state.
//!
//! The layout is a current-height record, one block record per height, a single
//! pending-transaction-set record that is cleared on every block finalization, and the height of
//! each coin's latest transaction.

use async_trait::async_trait;
use plasma_cash_primitives::{BlockHeight, PlasmaBlock, PlasmaTx, Slot};
use thiserror::Error;

mod inmemory;
mod persistent;

pub use inmemory::InMemoryChainStore;
pub use persistent::SledChainStore;

/// Failures of the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The sled database failed.
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),

    /// A record could not be (de)serialized.
    #[error("serialization: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type of store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value persistence required by [`PlasmaCashChain`](crate::PlasmaCashChain).
///
/// The authority serializes all writes. A new block and the records derived from it are written
/// together through [`ChainStore::commit_block`], which must apply all of them or none.
#[async_trait]
pub trait ChainStore: Send + Sync + 'static {
    /// Height of the latest block, deposit or sealed. Zero for an empty ledger.
    async fn current_height(&self) -> StoreResult<BlockHeight>;

    /// Gets, if present, the block at `height`.
    async fn get_block(&self, height: BlockHeight) -> StoreResult<Option<PlasmaBlock>>;

    /// Atomically stores `block` under its height, moves the head of every coin it spends to
    /// that height, and raises the current height to it if lower.
    ///
    /// With `clear_pending` the pending set is emptied in the same write.
    async fn commit_block(&self, block: &PlasmaBlock, clear_pending: bool) -> StoreResult<()>;

    /// Transactions waiting for the next sealed block.
    async fn pending_txs(&self) -> StoreResult<Vec<PlasmaTx>>;

    /// Replaces the pending set. An empty slice clears it.
    async fn set_pending_txs(&self, txs: &[PlasmaTx]) -> StoreResult<()>;

    /// Gets, if present, the height of the coin's latest transaction.
    async fn coin_head(&self, slot: Slot) -> StoreResult<Option<BlockHeight>>;

    /// Makes previous writes durable.
    async fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}
