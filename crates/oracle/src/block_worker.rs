//! Relays sealed child-ledger block roots to the root ledger.

use async_trait::async_trait;
use plasma_cash_child_chain::ChildChainApi;
use plasma_cash_primitives::{height::next_plasma_block_num, BlockHeight};
use plasma_cash_root_chain::RootChainAuthority;
use tracing::{debug, info};

use crate::{errors::OracleResult, supervisor::Worker};

/// Submits the roots of sealed child-ledger blocks the root ledger has not seen yet, then asks the
/// child ledger to seal its pending transactions.
///
/// The worker keeps no watermark: the root ledger's current block number tells it what was
/// already submitted.
#[derive(Debug)]
pub struct PlasmaBlockWorker<R, C> {
    root: R,
    child: C,
    block_interval: u64,
}

impl<R, C> PlasmaBlockWorker<R, C>
where
    R: RootChainAuthority,
    C: ChildChainApi,
{
    /// Creates a worker for a child ledger sealing blocks every `block_interval` heights.
    pub const fn new(root: R, child: C, block_interval: u64) -> Self {
        Self {
            root,
            child,
            block_interval,
        }
    }

    /// Submits every sealed block above the root ledger's current block, in order, and returns
    /// the heights actually submitted.
    pub async fn sync_blocks(&self) -> OracleResult<Vec<BlockHeight>> {
        let root_current = self.root.current_block().await?;
        let child_current = self.child.current_block_num().await?;
        if root_current == child_current {
            debug!(height = %root_current, "ledgers in sync");
            return Ok(Vec::new());
        }

        let mut submitted = Vec::new();
        let mut next = next_plasma_block_num(root_current, self.block_interval);
        while next <= child_current {
            if self.submit_block(next).await? {
                submitted.push(next);
            }
            // resume past `next`: rounding a multiple of the interval returns it unchanged
            next = next_plasma_block_num(next + 1, self.block_interval);
        }

        Ok(submitted)
    }

    /// Submits the root of the child block at `height`, unless the root ledger already holds it.
    ///
    /// Returns whether a submission was made.
    pub async fn submit_block(&self, height: BlockHeight) -> OracleResult<bool> {
        let root_current = self.root.current_block().await?;
        if root_current >= height {
            debug!(%height, %root_current, "block already submitted");
            return Ok(false);
        }

        let block = self.child.block_at(height).await?;
        let tx_hash = self.root.submit_block(block.merkle_root).await?;

        info!(%height, root = %block.merkle_root, %tx_hash, num_txs = block.transactions.len(), "submitted block root");

        Ok(true)
    }
}

#[async_trait]
impl<R, C> Worker for PlasmaBlockWorker<R, C>
where
    R: RootChainAuthority + 'static,
    C: ChildChainApi + 'static,
{
    fn name(&self) -> &'static str {
        "block-relay"
    }

    async fn step(&mut self) -> OracleResult<()> {
        self.sync_blocks().await?;

        if let Some(height) = self.child.finalize_block().await? {
            debug!(%height, "sealed child block");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::{B256, U256};
    use alloy_signer_local::PrivateKeySigner;
    use plasma_cash_child_chain::{store::InMemoryChainStore, ChildChainConfig, PlasmaCashChain};
    use plasma_cash_primitives::{DepositEvent, DepositRequest, PlasmaTx};
    use plasma_cash_root_chain::RootChainReader;
    use plasma_cash_test_utils::{
        child_chain::FlakyChildChain,
        keys::{alice, authority, bob, charlie},
        root_chain::{InMemoryRootChain, RootCall},
    };

    use super::*;
    use crate::errors::OracleError;

    const INTERVAL: u64 = 1000;

    type Child = Arc<FlakyChildChain<PlasmaCashChain<InMemoryChainStore>>>;

    struct Fixture {
        root: InMemoryRootChain,
        child: Child,
        worker: PlasmaBlockWorker<InMemoryRootChain, Child>,
    }

    impl Fixture {
        fn new() -> Self {
            let root = InMemoryRootChain::new(authority().address(), INTERVAL);
            let child = Arc::new(FlakyChildChain::new(PlasmaCashChain::new(
                InMemoryChainStore::default(),
                ChildChainConfig::default(),
            )));
            let worker = PlasmaBlockWorker::new(root.clone(), child.clone(), INTERVAL);

            Self {
                root,
                child,
                worker,
            }
        }

        async fn deposit(&self, owner: &PrivateKeySigner) -> DepositEvent {
            let event = self
                .root
                .deposit(owner.address(), U256::from(1))
                .expect("deposit");
            self.child
                .deposit(DepositRequest::from(&event))
                .await
                .expect("relayed");
            event
        }

        /// Moves the coin along `owners`, sealing one block per hop.
        async fn transfer_chain(&self, slot: u64, prev_block: u64, owners: &[PrivateKeySigner]) {
            let mut prev_block = prev_block;
            for pair in owners.windows(2) {
                let tx = PlasmaTx::new(slot, prev_block, 1, pair[1].address())
                    .signed_by(&pair[0])
                    .expect("sign");
                self.child.submit_tx(tx).await.expect("accepted");
                prev_block = self
                    .child
                    .finalize_block()
                    .await
                    .expect("sealed")
                    .expect("non-empty");
            }
        }
    }

    #[tokio::test]
    async fn submits_every_missing_block_in_order() {
        let fx = Fixture::new();
        let deposit = fx.deposit(&alice()).await;
        fx.transfer_chain(
            deposit.slot,
            deposit.block_number,
            &[alice(), bob(), charlie(), alice()],
        )
        .await;

        assert_eq!(
            fx.worker.sync_blocks().await.expect("sync"),
            vec![1000, 2000, 3000]
        );

        let mut expected = Vec::new();
        for height in [1000, 2000, 3000] {
            let block = fx.child.block_at(height).await.expect("sealed");
            expected.push((height, block.merkle_root));
        }
        assert_eq!(fx.root.submissions(), expected);

        assert!(fx.worker.sync_blocks().await.expect("in sync").is_empty());
        assert_eq!(fx.root.submissions().len(), 3);
    }

    #[tokio::test]
    async fn resubmitting_a_block_is_a_no_op() {
        let fx = Fixture::new();
        let deposit = fx.deposit(&alice()).await;
        fx.transfer_chain(deposit.slot, deposit.block_number, &[alice(), bob()])
            .await;

        assert!(fx.worker.submit_block(1000).await.expect("first"));
        assert!(!fx.worker.submit_block(1000).await.expect("second"));
        assert_eq!(fx.root.submissions().len(), 1);
    }

    #[tokio::test]
    async fn interleaved_deposits_do_not_confuse_numbering() {
        let fx = Fixture::new();
        let first = fx.deposit(&alice()).await;
        fx.transfer_chain(first.slot, first.block_number, &[alice(), bob()])
            .await;
        fx.worker.sync_blocks().await.expect("sync");

        let second = fx.deposit(&charlie()).await;
        assert_eq!(second.block_number, 1001);
        fx.transfer_chain(second.slot, second.block_number, &[charlie(), alice()])
            .await;

        assert_eq!(fx.worker.sync_blocks().await.expect("sync"), vec![2000]);
        assert_eq!(
            fx.root.block_root(2000).await.expect("root"),
            fx.child.block_at(2000).await.expect("sealed").merkle_root
        );
        assert_eq!(fx.root.current_block().await.expect("current"), 2000);
    }

    #[tokio::test]
    async fn failed_pass_is_retried_without_duplicates() {
        let mut fx = Fixture::new();
        let deposit = fx.deposit(&alice()).await;
        fx.transfer_chain(deposit.slot, deposit.block_number, &[alice(), bob(), charlie()])
            .await;
        fx.child.fail_block(2000, 1);

        assert!(matches!(
            fx.worker.sync_blocks().await,
            Err(OracleError::ChildChain(_))
        ));
        assert_eq!(fx.root.submissions().len(), 1);

        fx.root.fail_next(RootCall::SubmitBlock, 1);
        assert!(fx.worker.step().await.is_err());

        fx.worker.step().await.expect("recovered");
        let heights: Vec<_> = fx.root.submissions().iter().map(|(h, _)| *h).collect();
        assert_eq!(heights, vec![1000, 2000]);
    }

    #[tokio::test]
    async fn step_seals_pending_transactions_for_the_next_pass() {
        let mut fx = Fixture::new();
        let deposit = fx.deposit(&alice()).await;
        let tx = PlasmaTx::new(deposit.slot, deposit.block_number, 1, bob().address())
            .signed_by(&alice())
            .expect("sign");
        fx.child.submit_tx(tx).await.expect("accepted");

        fx.worker.step().await.expect("step");
        assert!(fx.root.submissions().is_empty());
        assert_eq!(fx.child.current_block_num().await.expect("height"), 1000);

        fx.worker.step().await.expect("step");
        assert_eq!(fx.root.block_root(1000).await.expect("root"), {
            let block = fx.child.block_at(1000).await.expect("sealed");
            block.merkle_root
        });
        assert_ne!(fx.root.block_root(1000).await.expect("root"), B256::ZERO);
    }
}
