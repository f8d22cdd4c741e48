//! Volatile store, used in tests and by throwaway nodes.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use plasma_cash_primitives::{BlockHeight, PlasmaBlock, PlasmaTx, Slot};
use tokio::sync::RwLock;

use super::{ChainStore, StoreResult};

/// In-memory [`ChainStore`].
///
/// Clones share the same underlying state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryChainStore {
    current_height: Arc<RwLock<BlockHeight>>,

    /// height -> block
    blocks: Arc<RwLock<HashMap<BlockHeight, PlasmaBlock>>>,

    pending: Arc<RwLock<Vec<PlasmaTx>>>,

    /// slot -> height of the latest transaction
    coin_heads: Arc<RwLock<HashMap<Slot, BlockHeight>>>,
}

#[async_trait]
impl ChainStore for InMemoryChainStore {
    async fn current_height(&self) -> StoreResult<BlockHeight> {
        Ok(*self.current_height.read().await)
    }

    async fn get_block(&self, height: BlockHeight) -> StoreResult<Option<PlasmaBlock>> {
        Ok(self.blocks.read().await.get(&height).cloned())
    }

    async fn commit_block(&self, block: &PlasmaBlock, clear_pending: bool) -> StoreResult<()> {
        // Lock order: height, blocks, heads, pending.
        let mut current = self.current_height.write().await;
        let mut blocks = self.blocks.write().await;
        let mut heads = self.coin_heads.write().await;
        let mut pending = self.pending.write().await;

        blocks.insert(block.height, block.clone());
        for tx in &block.transactions {
            heads.insert(tx.slot, block.height);
        }
        *current = (*current).max(block.height);
        if clear_pending {
            pending.clear();
        }

        Ok(())
    }

    async fn pending_txs(&self) -> StoreResult<Vec<PlasmaTx>> {
        Ok(self.pending.read().await.clone())
    }

    async fn set_pending_txs(&self, txs: &[PlasmaTx]) -> StoreResult<()> {
        *self.pending.write().await = txs.to_vec();
        Ok(())
    }

    async fn coin_head(&self, slot: Slot) -> StoreResult<Option<BlockHeight>> {
        Ok(self.coin_heads.read().await.get(&slot).copied())
    }
}
