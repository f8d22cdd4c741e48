//! JSON-RPC client of the deployed `RootChain` contract.

use std::fmt;

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{Filter, TransactionRequest},
    signers::local::PrivateKeySigner,
};
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use plasma_cash_primitives::{BlockHeight, CoinMode, CoinState, DepositEvent, PlasmaCoin, Slot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    bindings::RootChain,
    config::RootChainConfig,
    errors::{RootChainError, RootChainResult},
    receipt::wait_for_receipt,
    traits::{RootChainAuthority, RootChainExitGame, RootChainReader},
    types::{ChallengeEvidence, ChallengeResponse, ExitClaim, ExitStatus},
};

/// Root-ledger client talking to the `RootChain` contract.
///
/// Without a signer the client can only read. State-changing calls wait for their receipt and
/// abandon the wait when the cancellation token fires.
#[derive(Clone)]
pub struct EthRootChainClient {
    provider: DynProvider,
    config: RootChainConfig,
    caller: Option<Address>,
    cancel: CancellationToken,
}

impl fmt::Debug for EthRootChainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthRootChainClient")
            .field("config", &self.config)
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}

impl EthRootChainClient {
    /// Connects to the endpoint in `config`, signing with `signer` if given.
    pub async fn connect(
        config: RootChainConfig,
        signer: Option<PrivateKeySigner>,
        cancel: CancellationToken,
    ) -> RootChainResult<Self> {
        let caller = signer.as_ref().map(PrivateKeySigner::address);
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect(&config.rpc_url)
                .await?
                .erased(),
            None => ProviderBuilder::new()
                .connect(&config.rpc_url)
                .await?
                .erased(),
        };

        info!(rpc_url = %config.rpc_url, contract = %config.contract_address, ?caller, "connected to root ledger");

        Ok(Self::from_provider(provider, config, caller, cancel))
    }

    /// Wraps an existing provider. `caller` must be the account the provider signs for.
    pub const fn from_provider(
        provider: DynProvider,
        config: RootChainConfig,
        caller: Option<Address>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            provider,
            config,
            caller,
            cancel,
        }
    }

    /// The configuration this client runs with.
    pub const fn config(&self) -> &RootChainConfig {
        &self.config
    }

    /// `childBlockInterval()`.
    pub async fn child_block_interval(&self) -> RootChainResult<u64> {
        let interval = self.call(RootChain::childBlockIntervalCall {}).await?;
        to_u64(interval, "child block interval")
    }

    async fn call<C: SolCall>(&self, call: C) -> RootChainResult<C::Return> {
        let tx = TransactionRequest::default()
            .with_to(self.config.contract_address)
            .with_input(call.abi_encode());

        let raw = self.provider.call(tx).await?;
        Ok(C::abi_decode_returns(&raw)?)
    }

    async fn send<C: SolCall>(&self, call: C, value: U256) -> RootChainResult<B256> {
        let from = self.caller.ok_or(RootChainError::MissingSigner)?;
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(self.config.contract_address)
            .with_input(call.abi_encode())
            .with_value(value);

        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, function = C::SIGNATURE, %value, "submitted transaction");

        wait_for_receipt(
            &self.provider,
            tx_hash,
            self.config.tx_poll_interval,
            self.config.tx_timeout,
            &self.cancel,
        )
        .await?;

        Ok(tx_hash)
    }
}

fn to_u64(value: U256, what: &str) -> RootChainResult<u64> {
    if value > U256::from(u64::MAX) {
        return Err(RootChainError::InvalidResponse(format!(
            "{what} {value} exceeds u64"
        )));
    }

    Ok(value.to::<u64>())
}

#[async_trait]
impl RootChainReader for EthRootChainClient {
    async fn current_block(&self) -> RootChainResult<BlockHeight> {
        let current = self.call(RootChain::currentBlockCall {}).await?;
        to_u64(current, "current block")
    }

    async fn latest_eth_block_num(&self) -> RootChainResult<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn fetch_deposits(&self, from: u64, to: u64) -> RootChainResult<Vec<DepositEvent>> {
        let filter = Filter::new()
            .address(self.config.contract_address)
            .event_signature(RootChain::Deposit::SIGNATURE_HASH)
            .from_block(from)
            .to_block(to);

        let logs = self.provider.get_logs(&filter).await?;
        debug!(%from, %to, num_logs = logs.len(), "fetched deposit logs");

        logs.iter()
            .map(|log| {
                let eth_block = log.block_number.ok_or_else(|| {
                    RootChainError::InvalidResponse("deposit log without block number".into())
                })?;
                let deposit = log.log_decode::<RootChain::Deposit>()?.inner.data;

                Ok(DepositEvent {
                    slot: deposit.slot,
                    block_number: to_u64(deposit.blockNumber, "deposit block")?,
                    denomination: deposit.denomination,
                    from: deposit.from,
                    contract_address: deposit.contractAddress,
                    eth_block,
                })
            })
            .collect()
    }

    async fn plasma_coin(&self, slot: Slot) -> RootChainResult<PlasmaCoin> {
        let coin = self.call(RootChain::getPlasmaCoinCall { slot }).await?;

        Ok(PlasmaCoin {
            slot,
            uid: coin.uid,
            deposit_block: to_u64(coin.depositBlock, "deposit block")?,
            denomination: coin.denomination,
            owner: coin.owner,
            state: CoinState::try_from(coin.state)?,
            mode: CoinMode::try_from(coin.mode)?,
            contract_address: coin.contractAddress,
        })
    }

    async fn block_root(&self, height: BlockHeight) -> RootChainResult<B256> {
        self.call(RootChain::getBlockRootCall {
            blockNumber: U256::from(height),
        })
        .await
    }

    async fn exit_status(&self, slot: Slot) -> RootChainResult<Option<ExitStatus>> {
        let exit = self.call(RootChain::getExitCall { slot }).await?;
        if exit.owner.is_zero() {
            return Ok(None);
        }

        Ok(Some(ExitStatus {
            owner: exit.owner,
            prev_block: to_u64(exit.prevBlock, "exit parent block")?,
            exit_block: to_u64(exit.exitBlock, "exit block")?,
            state: CoinState::try_from(exit.state)?,
        }))
    }
}

#[async_trait]
impl RootChainAuthority for EthRootChainClient {
    async fn submit_block(&self, root: B256) -> RootChainResult<B256> {
        self.send(RootChain::submitBlockCall { root }, U256::ZERO)
            .await
    }
}

#[async_trait]
impl RootChainExitGame for EthRootChainClient {
    fn caller(&self) -> Address {
        self.caller.unwrap_or_default()
    }

    async fn start_exit(&self, claim: ExitClaim) -> RootChainResult<B256> {
        let call = RootChain::startExitCall {
            slot: claim.slot,
            prevTxBytes: claim.prev_tx_bytes(),
            exitingTxBytes: claim.exiting_tx.rlp_bytes(),
            prevTxInclusionProof: claim.prev_tx_proof,
            exitingTxInclusionProof: claim.exiting_tx_proof,
            signature: claim.signature,
            blocks: [U256::from(claim.prev_block), U256::from(claim.exit_block)],
        };

        self.send(call, self.config.exit_bond).await
    }

    async fn challenge_before(&self, claim: ExitClaim) -> RootChainResult<B256> {
        let call = RootChain::challengeBeforeCall {
            slot: claim.slot,
            prevTxBytes: claim.prev_tx_bytes(),
            txBytes: claim.exiting_tx.rlp_bytes(),
            prevTxInclusionProof: claim.prev_tx_proof,
            txInclusionProof: claim.exiting_tx_proof,
            signature: claim.signature,
            blocks: [U256::from(claim.prev_block), U256::from(claim.exit_block)],
        };

        self.send(call, self.config.exit_bond).await
    }

    async fn challenge_between(&self, evidence: ChallengeEvidence) -> RootChainResult<B256> {
        let call = RootChain::challengeBetweenCall {
            slot: evidence.slot,
            challengingBlockNumber: U256::from(evidence.challenging_block),
            challengingTransaction: evidence.tx.rlp_bytes(),
            proof: evidence.proof,
            signature: evidence.signature,
        };

        self.send(call, U256::ZERO).await
    }

    async fn challenge_after(&self, evidence: ChallengeEvidence) -> RootChainResult<B256> {
        let call = RootChain::challengeAfterCall {
            slot: evidence.slot,
            challengingBlockNumber: U256::from(evidence.challenging_block),
            challengingTransaction: evidence.tx.rlp_bytes(),
            proof: evidence.proof,
            signature: evidence.signature,
        };

        self.send(call, U256::ZERO).await
    }

    async fn respond_challenge_before(
        &self,
        response: ChallengeResponse,
    ) -> RootChainResult<B256> {
        let call = RootChain::respondChallengeBeforeCall {
            slot: response.slot,
            challengingTxHash: response.challenging_tx_hash,
            respondingBlockNumber: U256::from(response.responding_block),
            respondingTransaction: response.responding_tx.rlp_bytes(),
            proof: response.proof,
            signature: response.signature,
        };

        self.send(call, U256::ZERO).await
    }

    async fn cancel_exit(&self, slot: Slot) -> RootChainResult<B256> {
        self.send(RootChain::cancelExitCall { slot }, U256::ZERO).await
    }

    async fn cancel_exits(&self, slots: Vec<Slot>) -> RootChainResult<B256> {
        self.send(RootChain::cancelExitsCall { slots }, U256::ZERO)
            .await
    }

    async fn finalize_exits(&self) -> RootChainResult<B256> {
        self.send(RootChain::finalizeExitsCall {}, U256::ZERO).await
    }

    async fn finalize_exit(&self, slot: Slot) -> RootChainResult<B256> {
        self.send(RootChain::finalizeExitCall { slot }, U256::ZERO)
            .await
    }

    async fn withdraw(&self, slot: Slot) -> RootChainResult<B256> {
        self.send(RootChain::withdrawCall { slot }, U256::ZERO).await
    }

    async fn withdraw_bonds(&self) -> RootChainResult<B256> {
        self.send(RootChain::withdrawBondsCall {}, U256::ZERO).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_block_numbers_beyond_u64() {
        assert_eq!(to_u64(U256::from(1000), "block").ok(), Some(1000));
        assert!(matches!(
            to_u64(U256::from(u64::MAX) + U256::from(1), "block"),
            Err(RootChainError::InvalidResponse(_))
        ));
    }

    #[test]
    fn start_exit_arguments_keep_contract_order() {
        let call = RootChain::startExitCall {
            slot: 1,
            prevTxBytes: Default::default(),
            exitingTxBytes: Default::default(),
            prevTxInclusionProof: Default::default(),
            exitingTxInclusionProof: Default::default(),
            signature: Default::default(),
            blocks: [U256::ZERO, U256::from(1001)],
        };

        assert_eq!(
            RootChain::startExitCall::SIGNATURE,
            "startExit(uint64,bytes,bytes,bytes,bytes,bytes,uint256[2])"
        );
        let encoded = call.abi_encode();
        assert_eq!(&encoded[..4], RootChain::startExitCall::SELECTOR.as_slice());
    }

    #[test]
    fn exit_management_signatures_match_the_contract() {
        assert_eq!(RootChain::getExitCall::SIGNATURE, "getExit(uint64)");
        assert_eq!(RootChain::cancelExitCall::SIGNATURE, "cancelExit(uint64)");
        assert_eq!(RootChain::cancelExitsCall::SIGNATURE, "cancelExits(uint64[])");
    }
}
