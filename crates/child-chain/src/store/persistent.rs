//! Durable store backed by sled.

use std::path::Path;

use async_trait::async_trait;
use plasma_cash_primitives::{BlockHeight, PlasmaBlock, PlasmaTx, Slot};
use serde::{de::DeserializeOwned, Serialize};
use sled::{
    transaction::{ConflictableTransactionError, ConflictableTransactionResult, TransactionError},
    Transactional,
};
use tracing::debug;

use super::{ChainStore, StoreError, StoreResult};

const CURRENT_HEIGHT_KEY: &[u8] = b"current_height";
const PENDING_KEY: &[u8] = b"pending";
const BLOCKS_TREE: &str = "blocks";
const COIN_HEADS_TREE: &str = "coin_heads";

/// [`ChainStore`] persisted in a sled database, records encoded with bincode.
///
/// Metadata lives in the default tree, blocks and coin heads in their own trees keyed by the
/// big-endian height or slot so that iteration follows numeric order.
#[derive(Debug, Clone)]
pub struct SledChainStore {
    db: sled::Db,
    blocks: sled::Tree,
    coin_heads: sled::Tree,
}

impl SledChainStore {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        debug!(path = %path.as_ref().display(), "opening sled database");
        Self::from_db(sled::open(path)?)
    }

    /// Opens a database that is deleted when dropped.
    pub fn temporary() -> StoreResult<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> StoreResult<Self> {
        let blocks = db.open_tree(BLOCKS_TREE)?;
        let coin_heads = db.open_tree(COIN_HEADS_TREE)?;

        Ok(Self {
            db,
            blocks,
            coin_heads,
        })
    }
}

fn get<T: DeserializeOwned>(tree: &sled::Tree, key: &[u8]) -> StoreResult<Option<T>> {
    tree.get(key)?
        .map(|raw| bincode::deserialize(&raw))
        .transpose()
        .map_err(Into::into)
}

fn put<T: Serialize + ?Sized>(tree: &sled::Tree, key: &[u8], value: &T) -> StoreResult<()> {
    tree.insert(key, bincode::serialize(value)?)?;
    Ok(())
}

#[async_trait]
impl ChainStore for SledChainStore {
    async fn current_height(&self) -> StoreResult<BlockHeight> {
        Ok(get(&self.db, CURRENT_HEIGHT_KEY)?.unwrap_or_default())
    }

    async fn get_block(&self, height: BlockHeight) -> StoreResult<Option<PlasmaBlock>> {
        get(&self.blocks, &height.to_be_bytes())
    }

    async fn commit_block(&self, block: &PlasmaBlock, clear_pending: bool) -> StoreResult<()> {
        let height_key = block.height.to_be_bytes();
        let encoded_block = bincode::serialize(block)?;
        let encoded_height = bincode::serialize(&block.height)?;
        let no_pending = bincode::serialize(&Vec::<PlasmaTx>::new())?;

        (&*self.db, &self.blocks, &self.coin_heads)
            .transaction(
                |(meta, blocks, heads)| -> ConflictableTransactionResult<(), StoreError> {
                    blocks.insert(&height_key[..], encoded_block.as_slice())?;
                    for tx in &block.transactions {
                        heads.insert(&tx.slot.to_be_bytes()[..], encoded_height.as_slice())?;
                    }

                    let current: BlockHeight = match meta.get(CURRENT_HEIGHT_KEY)? {
                        Some(raw) => bincode::deserialize(&raw).map_err(|err| {
                            ConflictableTransactionError::Abort(StoreError::from(err))
                        })?,
                        None => 0,
                    };
                    if current < block.height {
                        meta.insert(CURRENT_HEIGHT_KEY, encoded_height.as_slice())?;
                    }
                    if clear_pending {
                        meta.insert(PENDING_KEY, no_pending.as_slice())?;
                    }

                    Ok(())
                },
            )
            .map_err(|err| match err {
                TransactionError::Abort(err) => err,
                TransactionError::Storage(err) => StoreError::Sled(err),
            })
    }

    async fn pending_txs(&self) -> StoreResult<Vec<PlasmaTx>> {
        Ok(get(&self.db, PENDING_KEY)?.unwrap_or_default())
    }

    async fn set_pending_txs(&self, txs: &[PlasmaTx]) -> StoreResult<()> {
        put(&self.db, PENDING_KEY, txs)
    }

    async fn coin_head(&self, slot: Slot) -> StoreResult<Option<BlockHeight>> {
        get(&self.coin_heads, &slot.to_be_bytes())
    }

    async fn flush(&self) -> StoreResult<()> {
        self.db.flush_async().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use plasma_cash_primitives::DepositRequest;

    use super::*;

    #[tokio::test]
    async fn records_survive_reopening() {
        let dir = tempfile::tempdir().expect("must create temp dir");
        let block = PlasmaBlock::build(1000, [PlasmaTx::new(3, 1, 1, Address::repeat_byte(2))]);

        {
            let store = SledChainStore::open(dir.path()).expect("must open");
            store
                .set_pending_txs(&[PlasmaTx::new(4, 2, 1, Address::ZERO)])
                .await
                .expect("must set pending");
            store.commit_block(&block, false).await.expect("must commit");
            store.flush().await.expect("must flush");
        }

        let store = SledChainStore::open(dir.path()).expect("must reopen");
        assert_eq!(store.current_height().await.expect("height"), 1000);
        assert_eq!(store.get_block(1000).await.expect("block"), Some(block));
        assert_eq!(store.coin_head(3).await.expect("head"), Some(1000));
        assert_eq!(store.pending_txs().await.expect("pending").len(), 1);
    }

    #[tokio::test]
    async fn empty_store_reads_defaults() {
        let store = SledChainStore::temporary().expect("must open");

        assert_eq!(store.current_height().await.expect("height"), 0);
        assert!(store.get_block(1000).await.expect("block").is_none());
        assert!(store.pending_txs().await.expect("pending").is_empty());
        assert!(store.coin_head(1).await.expect("head").is_none());
    }

    #[tokio::test]
    async fn commit_updates_every_record_together() {
        let store = SledChainStore::temporary().expect("must open");
        let deposit = PlasmaBlock::deposit(DepositRequest {
            slot: 3,
            deposit_block: 1001,
            denomination: U256::from(5),
            from: Address::repeat_byte(1),
        });
        store.commit_block(&deposit, false).await.expect("deposit");

        store
            .set_pending_txs(&[PlasmaTx::new(9, 7, 1, Address::ZERO)])
            .await
            .expect("must set pending");
        let sealed = PlasmaBlock::build(1000, [PlasmaTx::new(9, 7, 1, Address::ZERO)]);
        store.commit_block(&sealed, true).await.expect("seal");

        assert_eq!(store.get_block(1000).await.expect("block"), Some(sealed));
        assert_eq!(store.coin_head(9).await.expect("head"), Some(1000));
        assert_eq!(store.coin_head(3).await.expect("head"), Some(1001));
        // A block below the current height never lowers it.
        assert_eq!(store.current_height().await.expect("height"), 1001);
        assert!(store.pending_txs().await.expect("pending").is_empty());
    }
}
