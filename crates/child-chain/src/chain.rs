//! State machine of the child-ledger authority.

use alloy_primitives::B256;
use plasma_cash_primitives::{
    height::{is_deposit_block, next_child_block_height},
    BlockHeight, DepositRequest, OracleMessage, OracleSigned, PlasmaBlock, PlasmaTx, SealBlock,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::{
    config::ChildChainConfig,
    errors::{ChildChainError, ChildChainResult},
    store::ChainStore,
};

/// The child-ledger block authority.
///
/// Every state-changing call holds a single write lock, so the pending set is never observed or
/// mutated while a block is being sealed.
#[derive(Debug)]
pub struct PlasmaCashChain<S> {
    store: S,
    config: ChildChainConfig,
    write_lock: Mutex<()>,
}

impl<S: ChainStore> PlasmaCashChain<S> {
    /// Creates an authority over `store`.
    pub fn new(store: S, config: ChildChainConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// The configuration this authority runs with.
    pub const fn config(&self) -> &ChildChainConfig {
        &self.config
    }

    /// Height of the latest block, deposit or sealed.
    pub async fn current_block(&self) -> ChildChainResult<BlockHeight> {
        Ok(self.store.current_height().await?)
    }

    /// The block at `height`.
    pub async fn block(&self, height: BlockHeight) -> ChildChainResult<PlasmaBlock> {
        self.store
            .get_block(height)
            .await?
            .ok_or(ChildChainError::BlockNotFound(height))
    }

    /// Records a deposit relayed from the root ledger as a block holding its genesis transaction.
    ///
    /// Replaying an already recorded deposit succeeds without effect, so a relay that retries a
    /// partially forwarded batch is harmless. A different deposit at the same height, or a second
    /// deposit for the same coin, is rejected.
    pub async fn deposit(&self, request: DepositRequest) -> ChildChainResult<()> {
        let _guard = self.write_lock.lock().await;

        let slot = request.slot;
        let deposit_block = request.deposit_block;
        if !is_deposit_block(deposit_block, self.config.block_interval) {
            return Err(ChildChainError::InvalidDepositBlock(deposit_block));
        }

        if let Some(existing) = self.store.get_block(deposit_block).await? {
            if existing.deposit.as_ref() == Some(&request) {
                debug!(%slot, %deposit_block, "deposit already recorded");
                return Ok(());
            }

            return Err(ChildChainError::ConflictingDeposit {
                slot,
                deposit_block,
            });
        }

        if self.store.coin_head(slot).await?.is_some() {
            return Err(ChildChainError::ConflictingDeposit {
                slot,
                deposit_block,
            });
        }

        let owner = request.from;
        let denomination = request.denomination;
        self.store
            .commit_block(&PlasmaBlock::deposit(request), false)
            .await?;
        self.store.flush().await?;

        info!(%slot, %deposit_block, %owner, %denomination, "recorded deposit");

        Ok(())
    }

    /// [`PlasmaCashChain::deposit`] on behalf of a remote caller, who must be the oracle.
    pub async fn relayed_deposit(
        &self,
        signed: OracleSigned<DepositRequest>,
    ) -> ChildChainResult<()> {
        self.ensure_oracle(&signed)?;
        self.deposit(signed.message).await
    }

    /// Accepts a signed transfer into the pending set and returns its hash.
    ///
    /// The transaction must spend the coin's latest transaction, be signed by that transaction's
    /// recipient, and be the only pending transaction for its slot.
    pub async fn submit_tx(&self, tx: PlasmaTx) -> ChildChainResult<B256> {
        let _guard = self.write_lock.lock().await;

        let slot = tx.slot;
        let mut pending = self.store.pending_txs().await?;
        if pending.iter().any(|p| p.slot == slot) {
            return Err(ChildChainError::SlotAlreadyPending(slot));
        }

        let unknown_prev = || ChildChainError::UnknownPrevTx {
            slot,
            prev_block: tx.prev_block,
        };
        let prev_block = self
            .store
            .get_block(tx.prev_block)
            .await?
            .ok_or_else(unknown_prev)?;
        let prev_tx = prev_block.tx_for_slot(slot).ok_or_else(unknown_prev)?;

        if let Some(head) = self.store.coin_head(slot).await? {
            if head != tx.prev_block {
                return Err(ChildChainError::PrevTxSpent {
                    slot,
                    prev_block: tx.prev_block,
                    spent_in: head,
                });
            }
        }

        let signer = tx.recover_signer()?;
        if signer != prev_tx.new_owner {
            return Err(ChildChainError::NotOwner {
                slot,
                owner: prev_tx.new_owner,
                signer,
            });
        }

        let mut tx = tx;
        tx.proof = None;
        let hash = tx.hash();
        info!(%slot, prev_block = %tx.prev_block, new_owner = %tx.new_owner, %hash, "accepted transaction");

        pending.push(tx);
        self.store.set_pending_txs(&pending).await?;

        Ok(hash)
    }

    /// Seals the pending set into the next interval block and clears it.
    ///
    /// Returns the height of the new block, or `None` if nothing was pending. If the store fails
    /// the pending set is left untouched, so the call can simply be retried.
    pub async fn finalize_block(&self) -> ChildChainResult<Option<BlockHeight>> {
        let guard = self.write_lock.lock().await;
        self.seal_pending(&guard).await
    }

    /// [`PlasmaCashChain::finalize_block`] on behalf of a remote caller, who must be the oracle.
    ///
    /// The request names the height the oracle last saw. It is refused with
    /// [`ChildChainError::StaleSeal`] once the block after that height has been sealed, so a
    /// replayed request never seals a second block.
    pub async fn requested_seal(
        &self,
        signed: OracleSigned<SealBlock>,
    ) -> ChildChainResult<Option<BlockHeight>> {
        self.ensure_oracle(&signed)?;

        let guard = self.write_lock.lock().await;
        let requested = signed.message.current;
        let current = self.store.current_height().await?;
        let interval = self.config.block_interval;
        let next = next_child_block_height(current, interval);
        if next_child_block_height(requested, interval) != next {
            return Err(ChildChainError::StaleSeal { requested, current });
        }

        self.seal_pending(&guard).await
    }

    /// Seals under the write lock, which the caller proves it holds.
    async fn seal_pending(
        &self,
        _guard: &MutexGuard<'_, ()>,
    ) -> ChildChainResult<Option<BlockHeight>> {
        let pending = self.store.pending_txs().await?;
        if pending.is_empty() {
            debug!("no pending transactions to seal");
            return Ok(None);
        }

        let current = self.store.current_height().await?;
        let height = next_child_block_height(current, self.config.block_interval);
        let block = PlasmaBlock::build(height, pending);

        self.store.commit_block(&block, true).await?;
        self.store.flush().await?;

        info!(%height, root = %block.merkle_root, num_txs = block.transactions.len(), "sealed block");

        Ok(Some(height))
    }

    fn ensure_oracle<T: OracleMessage>(
        &self,
        signed: &OracleSigned<T>,
    ) -> ChildChainResult<()> {
        let signer = signed.signer()?;
        if self.config.oracle != Some(signer) {
            warn!(%signer, "refusing command not signed by the oracle");
            return Err(ChildChainError::NotOracle { signer });
        }

        Ok(())
    }
}
