//! Traits for the RPC server.

use alloy_primitives::B256;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use plasma_cash_primitives::{
    BlockHeight, DepositRequest, OracleSigned, PlasmaBlock, PlasmaTx, SealBlock,
};

/// RPCs of the child-ledger authority.
///
/// Reads and transfers are open to anyone. `deposit` and `submitBlockToMainnet` only accept
/// commands signed by the oracle, which relays deposits and seals pending transactions before
/// relaying each block's root.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "plasmacash"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "plasmacash"))]
pub trait PlasmaCashApi {
    /// Height of the latest block, deposit or sealed.
    #[method(name = "currentBlock")]
    async fn current_block(&self) -> RpcResult<BlockHeight>;

    /// The block at `height`.
    #[method(name = "block")]
    async fn block(&self, height: BlockHeight) -> RpcResult<PlasmaBlock>;

    /// Seals the pending transactions into the next interval block.
    ///
    /// Returns the new block's height, or `None` if nothing was pending.
    #[method(name = "submitBlockToMainnet")]
    async fn submit_block_to_mainnet(
        &self,
        request: OracleSigned<SealBlock>,
    ) -> RpcResult<Option<BlockHeight>>;

    /// Queues a signed transfer for the next sealed block and returns its hash.
    #[method(name = "plasmaTx")]
    async fn plasma_tx(&self, tx: PlasmaTx) -> RpcResult<B256>;

    /// Records a deposit relayed from the root ledger.
    #[method(name = "deposit")]
    async fn deposit(&self, request: OracleSigned<DepositRequest>) -> RpcResult<()>;
}
