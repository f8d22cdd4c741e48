//! A child-ledger client over JSON-RPC.

use alloy_primitives::B256;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use jsonrpsee::{
    core::client::Error as ClientError,
    http_client::{HttpClient, HttpClientBuilder},
};
use plasma_cash_child_chain::{ChildChainApi, ChildChainError, ChildChainResult};
use plasma_cash_primitives::{
    BlockHeight, DepositRequest, OracleMessage, OracleSigned, PlasmaBlock, PlasmaTx, SealBlock,
};

use crate::{codes, PlasmaCashApiClient};

/// Drives a remote child-ledger authority through its `plasmacash` RPC namespace.
///
/// Deposits and seal requests are signed with the oracle key given to
/// [`RpcChildChainClient::with_oracle_key`]. Without one they fail with
/// [`ChildChainError::MissingOracleKey`] before anything is sent.
#[derive(Debug, Clone)]
pub struct RpcChildChainClient {
    client: HttpClient,
    oracle_key: Option<PrivateKeySigner>,
}

impl RpcChildChainClient {
    /// Connects to the authority listening at `url`.
    pub fn new(url: &str) -> ChildChainResult<Self> {
        let client = HttpClientBuilder::default()
            .build(url)
            .map_err(|e| ChildChainError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            oracle_key: None,
        })
    }

    /// Signs oracle commands with `key` and returns the updated client.
    pub fn with_oracle_key(mut self, key: PrivateKeySigner) -> Self {
        self.oracle_key = Some(key);
        self
    }

    fn sign<T: OracleMessage>(&self, message: T) -> ChildChainResult<OracleSigned<T>> {
        let key = self
            .oracle_key
            .as_ref()
            .ok_or(ChildChainError::MissingOracleKey)?;

        Ok(OracleSigned::sign(message, key)?)
    }

    /// Maps an RPC failure back onto the authority's error.
    ///
    /// Refusals keep their message so that callers can tell them apart from an unreachable
    /// server.
    fn to_child_chain_error(
        &self,
        err: ClientError,
        height: Option<BlockHeight>,
    ) -> ChildChainError {
        match (err, height) {
            (ClientError::Call(obj), Some(height)) if obj.code() == codes::BLOCK_NOT_FOUND => {
                ChildChainError::BlockNotFound(height)
            }
            (ClientError::Call(obj), _) if obj.code() == codes::UNAUTHORIZED => {
                match &self.oracle_key {
                    Some(key) => ChildChainError::NotOracle {
                        signer: key.address(),
                    },
                    None => ChildChainError::MissingOracleKey,
                }
            }
            (ClientError::Call(obj), _) if obj.code() == codes::REJECTED => {
                ChildChainError::Rejected(obj.message().to_string())
            }
            (err, _) => ChildChainError::Transport(err.to_string()),
        }
    }
}

#[async_trait]
impl ChildChainApi for RpcChildChainClient {
    async fn current_block_num(&self) -> ChildChainResult<BlockHeight> {
        self.client
            .current_block()
            .await
            .map_err(|e| self.to_child_chain_error(e, None))
    }

    async fn block_at(&self, height: BlockHeight) -> ChildChainResult<PlasmaBlock> {
        self.client
            .block(height)
            .await
            .map_err(|e| self.to_child_chain_error(e, Some(height)))
    }

    async fn deposit(&self, request: DepositRequest) -> ChildChainResult<()> {
        let signed = self.sign(request)?;
        PlasmaCashApiClient::deposit(&self.client, signed)
            .await
            .map_err(|e| self.to_child_chain_error(e, None))
    }

    async fn submit_tx(&self, tx: PlasmaTx) -> ChildChainResult<B256> {
        self.client
            .plasma_tx(tx)
            .await
            .map_err(|e| self.to_child_chain_error(e, None))
    }

    async fn finalize_block(&self) -> ChildChainResult<Option<BlockHeight>> {
        let current = self.current_block_num().await?;
        let signed = self.sign(SealBlock { current })?;
        self.client
            .submit_block_to_mainnet(signed)
            .await
            .map_err(|e| self.to_child_chain_error(e, None))
    }
}
