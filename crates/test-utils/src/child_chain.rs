//! Child-ledger wrapper with scripted failures.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use alloy_primitives::B256;
use async_trait::async_trait;
use plasma_cash_child_chain::{ChildChainApi, ChildChainError, ChildChainResult};
use plasma_cash_primitives::{BlockHeight, DepositRequest, PlasmaBlock, PlasmaTx, Slot};

#[derive(Debug, Default)]
struct Script {
    failing_deposits: BTreeMap<Slot, usize>,
    failing_blocks: BTreeMap<BlockHeight, usize>,
    forwarded: Vec<DepositRequest>,
}

/// Wraps a child ledger, failing selected calls a set number of times and recording every
/// deposit that reaches it.
#[derive(Debug)]
pub struct FlakyChildChain<C> {
    inner: C,
    script: Mutex<Script>,
}

impl<C: ChildChainApi> FlakyChildChain<C> {
    /// Wraps `inner` with no failures scheduled.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            script: Mutex::default(),
        }
    }

    /// The wrapped ledger.
    pub const fn inner(&self) -> &C {
        &self.inner
    }

    /// Makes the next `times` deposits of `slot` fail with a transport error.
    pub fn fail_deposit(&self, slot: Slot, times: usize) {
        self.script().failing_deposits.insert(slot, times);
    }

    /// Makes the next `times` fetches of the block at `height` fail with a transport error.
    pub fn fail_block(&self, height: BlockHeight, times: usize) {
        self.script().failing_blocks.insert(height, times);
    }

    /// Every deposit call received so far, failed ones included.
    pub fn forwarded_deposits(&self) -> Vec<DepositRequest> {
        self.script().forwarded.clone()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn take_failure<K: Ord>(failures: &mut BTreeMap<K, usize>, key: &K) -> bool {
    match failures.get_mut(key) {
        Some(remaining) if *remaining > 0 => {
            *remaining -= 1;
            true
        }
        _ => false,
    }
}

#[async_trait]
impl<C: ChildChainApi> ChildChainApi for FlakyChildChain<C> {
    async fn current_block_num(&self) -> ChildChainResult<BlockHeight> {
        self.inner.current_block_num().await
    }

    async fn block_at(&self, height: BlockHeight) -> ChildChainResult<PlasmaBlock> {
        if take_failure(&mut self.script().failing_blocks, &height) {
            return Err(ChildChainError::Transport(format!(
                "injected failure fetching block {height}"
            )));
        }

        self.inner.block_at(height).await
    }

    async fn deposit(&self, request: DepositRequest) -> ChildChainResult<()> {
        let fail = {
            let mut script = self.script();
            script.forwarded.push(request.clone());
            take_failure(&mut script.failing_deposits, &request.slot)
        };
        if fail {
            return Err(ChildChainError::Transport(format!(
                "injected failure forwarding deposit of slot {}",
                request.slot
            )));
        }

        self.inner.deposit(request).await
    }

    async fn submit_tx(&self, tx: PlasmaTx) -> ChildChainResult<B256> {
        self.inner.submit_tx(tx).await
    }

    async fn finalize_block(&self) -> ChildChainResult<Option<BlockHeight>> {
        self.inner.finalize_block().await
    }
}
