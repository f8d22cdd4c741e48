//! Capability interface over the child ledger.

use std::sync::Arc;

use alloy_primitives::B256;
use async_trait::async_trait;
use plasma_cash_primitives::{BlockHeight, DepositRequest, PlasmaBlock, PlasmaTx};

use crate::{chain::PlasmaCashChain, errors::ChildChainResult, store::ChainStore};

/// Operations the relay workers and the exit-game client need from the child ledger.
///
/// Implemented by the in-process authority and by the RPC client, so callers never depend on the
/// transport.
#[async_trait]
pub trait ChildChainApi: Send + Sync {
    /// `GetCurrentBlockRequest`: height of the latest block.
    async fn current_block_num(&self) -> ChildChainResult<BlockHeight>;

    /// `GetBlockRequest`: the block at `height`.
    async fn block_at(&self, height: BlockHeight) -> ChildChainResult<PlasmaBlock>;

    /// `DepositRequest`: records a deposit relayed from the root ledger.
    async fn deposit(&self, request: DepositRequest) -> ChildChainResult<()>;

    /// `PlasmaTxRequest`: submits a signed transfer, returning its hash.
    async fn submit_tx(&self, tx: PlasmaTx) -> ChildChainResult<B256>;

    /// `SubmitBlockToMainnetRequest`: seals pending transactions into a new block.
    async fn finalize_block(&self) -> ChildChainResult<Option<BlockHeight>>;
}

#[async_trait]
impl<S: ChainStore> ChildChainApi for PlasmaCashChain<S> {
    async fn current_block_num(&self) -> ChildChainResult<BlockHeight> {
        self.current_block().await
    }

    async fn block_at(&self, height: BlockHeight) -> ChildChainResult<PlasmaBlock> {
        self.block(height).await
    }

    async fn deposit(&self, request: DepositRequest) -> ChildChainResult<()> {
        PlasmaCashChain::deposit(self, request).await
    }

    async fn submit_tx(&self, tx: PlasmaTx) -> ChildChainResult<B256> {
        PlasmaCashChain::submit_tx(self, tx).await
    }

    async fn finalize_block(&self) -> ChildChainResult<Option<BlockHeight>> {
        PlasmaCashChain::finalize_block(self).await
    }
}

#[async_trait]
impl<T: ChildChainApi + ?Sized> ChildChainApi for Arc<T> {
    async fn current_block_num(&self) -> ChildChainResult<BlockHeight> {
        (**self).current_block_num().await
    }

    async fn block_at(&self, height: BlockHeight) -> ChildChainResult<PlasmaBlock> {
        (**self).block_at(height).await
    }

    async fn deposit(&self, request: DepositRequest) -> ChildChainResult<()> {
        (**self).deposit(request).await
    }

    async fn submit_tx(&self, tx: PlasmaTx) -> ChildChainResult<B256> {
        (**self).submit_tx(tx).await
    }

    async fn finalize_block(&self) -> ChildChainResult<Option<BlockHeight>> {
        (**self).finalize_block().await
    }
}
