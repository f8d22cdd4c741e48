//! Serves the child ledger over JSON-RPC.

use std::{net::SocketAddr, sync::Arc};

use alloy_primitives::B256;
use anyhow::Context;
use async_trait::async_trait;
use jsonrpsee::{
    core::RpcResult, server::ServerHandle, types::ErrorObjectOwned, RpcModule,
};
use plasma_cash_child_chain::{store::ChainStore, ChildChainError, PlasmaCashChain};
use plasma_cash_primitives::{
    BlockHeight, DepositRequest, OracleSigned, PlasmaBlock, PlasmaTx, SealBlock,
};
use plasma_cash_rpc::{codes, PlasmaCashApiServer};
use tracing::{debug, info, warn};

/// Starts the RPC server at `rpc_addr` and returns the address it bound to, with a handle to
/// stop it.
pub(crate) async fn start_rpc<T>(
    rpc_impl: &T,
    rpc_addr: &str,
) -> anyhow::Result<(SocketAddr, ServerHandle)>
where
    T: PlasmaCashApiServer + Clone + Sync + Send,
{
    let mut rpc_module = RpcModule::new(rpc_impl.clone());

    let plasma_api = PlasmaCashApiServer::into_rpc(rpc_impl.clone());
    rpc_module.merge(plasma_api).context("merge plasma cash api")?;

    let rpc_server = jsonrpsee::server::ServerBuilder::new()
        .build(rpc_addr)
        .await
        .context("build plasma rpc server")?;
    let local_addr = rpc_server
        .local_addr()
        .context("read rpc server address")?;

    info!(%local_addr, "starting plasma rpc server");
    let rpc_handle = rpc_server.start(rpc_module);
    debug!("plasma rpc server started");

    Ok((local_addr, rpc_handle))
}

/// The `plasmacash` namespace over a child ledger.
#[derive(Debug)]
pub(crate) struct PlasmaCashRpc<S> {
    chain: Arc<PlasmaCashChain<S>>,
}

impl<S> PlasmaCashRpc<S> {
    pub(crate) const fn new(chain: Arc<PlasmaCashChain<S>>) -> Self {
        Self { chain }
    }
}

impl<S> Clone for PlasmaCashRpc<S> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
        }
    }
}

#[async_trait]
impl<S: ChainStore> PlasmaCashApiServer for PlasmaCashRpc<S> {
    async fn current_block(&self) -> RpcResult<BlockHeight> {
        self.chain.current_block().await.map_err(to_rpc_error)
    }

    async fn block(&self, height: BlockHeight) -> RpcResult<PlasmaBlock> {
        self.chain.block(height).await.map_err(to_rpc_error)
    }

    async fn submit_block_to_mainnet(
        &self,
        request: OracleSigned<SealBlock>,
    ) -> RpcResult<Option<BlockHeight>> {
        self.chain.requested_seal(request).await.map_err(to_rpc_error)
    }

    async fn plasma_tx(&self, tx: PlasmaTx) -> RpcResult<B256> {
        self.chain.submit_tx(tx).await.map_err(to_rpc_error)
    }

    async fn deposit(&self, request: OracleSigned<DepositRequest>) -> RpcResult<()> {
        self.chain.relayed_deposit(request).await.map_err(to_rpc_error)
    }
}

fn to_rpc_error(err: ChildChainError) -> ErrorObjectOwned {
    let code = match &err {
        ChildChainError::BlockNotFound(_) => codes::BLOCK_NOT_FOUND,
        ChildChainError::NotOracle { .. } => codes::UNAUTHORIZED,
        ChildChainError::Store(_) | ChildChainError::Transport(_) => {
            warn!(%err, "child ledger failed");
            codes::INTERNAL
        }
        _ => codes::REJECTED,
    };

    rpc_error(code, &err.to_string())
}

/// Returns an [`ErrorObjectOwned`] with the given code and message.
fn rpc_error(code: i32, message: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned::<()>(code, message, None)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use alloy_signer_local::PrivateKeySigner;
    use plasma_cash_child_chain::{store::InMemoryChainStore, ChildChainApi, ChildChainConfig};
    use plasma_cash_rpc::client::RpcChildChainClient;

    use super::*;

    async fn serve(oracle: &PrivateKeySigner) -> (String, ServerHandle) {
        let chain = Arc::new(PlasmaCashChain::new(
            InMemoryChainStore::default(),
            ChildChainConfig::default().with_oracle(oracle.address()),
        ));
        let (addr, handle) = start_rpc(&PlasmaCashRpc::new(chain), "127.0.0.1:0")
            .await
            .expect("server starts");

        (format!("http://{addr}"), handle)
    }

    fn client(url: &str, key: &PrivateKeySigner) -> RpcChildChainClient {
        RpcChildChainClient::new(url)
            .expect("client")
            .with_oracle_key(key.clone())
    }

    fn deposit_of(slot: u64, deposit_block: u64, from: Address) -> DepositRequest {
        DepositRequest {
            slot,
            deposit_block,
            denomination: U256::from(1),
            from,
        }
    }

    #[tokio::test]
    async fn drives_the_ledger_over_rpc() {
        let oracle = PrivateKeySigner::random();
        let (url, _handle) = serve(&oracle).await;
        let client = client(&url, &oracle);
        let alice = PrivateKeySigner::random();

        let deposit = deposit_of(7, 1, alice.address());
        client.deposit(deposit.clone()).await.expect("deposit");
        client.deposit(deposit).await.expect("replay is accepted");
        assert_eq!(client.current_block_num().await.expect("height"), 1);

        let tx = PlasmaTx::new(7, 1, 1, Address::repeat_byte(0xb0))
            .signed_by(&alice)
            .expect("sign");
        let hash = client.submit_tx(tx).await.expect("accepted");

        assert_eq!(client.finalize_block().await.expect("seal"), Some(1000));
        assert_eq!(client.finalize_block().await.expect("nothing pending"), None);

        let block = client.block_at(1000).await.expect("sealed");
        let included = block.tx_for_slot(7).expect("included");
        assert_eq!(included.hash(), hash);
        assert!(included
            .proof
            .as_ref()
            .expect("proof")
            .verify(block.merkle_root, 7, hash));
    }

    #[tokio::test]
    async fn forged_deposits_do_not_block_the_real_one() {
        let oracle = PrivateKeySigner::random();
        let intruder = PrivateKeySigner::random();
        let (url, _handle) = serve(&oracle).await;
        let alice = Address::repeat_byte(0xa1);

        let forger = client(&url, &intruder);
        assert!(matches!(
            forger.deposit(deposit_of(7, 1, intruder.address())).await,
            Err(ChildChainError::NotOracle { signer }) if signer == intruder.address()
        ));
        assert!(matches!(
            forger.finalize_block().await,
            Err(ChildChainError::NotOracle { .. })
        ));

        let anonymous = RpcChildChainClient::new(&url).expect("client");
        assert!(matches!(
            anonymous.deposit(deposit_of(7, 1, alice)).await,
            Err(ChildChainError::MissingOracleKey)
        ));

        let relay = client(&url, &oracle);
        relay
            .deposit(deposit_of(7, 1, alice))
            .await
            .expect("oracle deposit goes through");
        let block = relay.block_at(1).await.expect("recorded");
        assert_eq!(block.tx_for_slot(7).expect("genesis").new_owner, alice);
    }

    #[tokio::test]
    async fn refusals_and_missing_blocks_keep_their_meaning() {
        let oracle = PrivateKeySigner::random();
        let (url, _handle) = serve(&oracle).await;
        let client = client(&url, &oracle);

        assert!(matches!(
            client.block_at(2000).await,
            Err(ChildChainError::BlockNotFound(2000))
        ));

        let err = client
            .deposit(deposit_of(1, 1000, Address::repeat_byte(1)))
            .await
            .expect_err("interval heights are reserved");
        assert!(matches!(err, ChildChainError::Rejected(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let oracle = PrivateKeySigner::random();
        let (url, handle) = serve(&oracle).await;
        let client = client(&url, &oracle);
        handle.stop().expect("running");
        handle.stopped().await;

        assert!(matches!(
            client.current_block_num().await,
            Err(ChildChainError::Transport(_))
        ));
    }
}
