//! Capability interfaces over the root ledger.
//!
//! Split by role: anyone can read, only the block authority submits roots, and users play the
//! exit game. Write calls return the hash of the confirmed transaction.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use plasma_cash_primitives::{BlockHeight, DepositEvent, PlasmaCoin, Slot};

use crate::{
    errors::RootChainResult,
    types::{ChallengeEvidence, ChallengeResponse, ExitClaim, ExitStatus},
};

/// Read-only access to the root ledger.
#[async_trait]
pub trait RootChainReader: Send + Sync {
    /// `currentBlock()`: the latest plasma block number known to the contract.
    async fn current_block(&self) -> RootChainResult<BlockHeight>;

    /// Number of the latest root-ledger block.
    async fn latest_eth_block_num(&self) -> RootChainResult<u64>;

    /// `Deposit` events emitted in root-ledger blocks `from..=to`, in emission order.
    async fn fetch_deposits(&self, from: u64, to: u64) -> RootChainResult<Vec<DepositEvent>>;

    /// `getPlasmaCoin(slot)`.
    async fn plasma_coin(&self, slot: Slot) -> RootChainResult<PlasmaCoin>;

    /// `getBlockRoot(height)`: the committed root, zero if nothing was committed.
    async fn block_root(&self, height: BlockHeight) -> RootChainResult<B256>;

    /// `getExit(slot)`: the open exit of the coin, `None` if there is none.
    async fn exit_status(&self, slot: Slot) -> RootChainResult<Option<ExitStatus>>;
}

/// Calls reserved to the child-ledger block authority.
#[async_trait]
pub trait RootChainAuthority: RootChainReader {
    /// `submitBlock(root)`: commits the next plasma block.
    async fn submit_block(&self, root: B256) -> RootChainResult<B256>;
}

/// The exit game, played on behalf of one account.
#[async_trait]
pub trait RootChainExitGame: RootChainReader {
    /// Account whose key signs the calls.
    fn caller(&self) -> Address;

    /// `startExit`, bond attached.
    async fn start_exit(&self, claim: ExitClaim) -> RootChainResult<B256>;

    /// `challengeBefore`, bond attached.
    async fn challenge_before(&self, claim: ExitClaim) -> RootChainResult<B256>;

    /// `challengeBetween`.
    async fn challenge_between(&self, evidence: ChallengeEvidence) -> RootChainResult<B256>;

    /// `challengeAfter`.
    async fn challenge_after(&self, evidence: ChallengeEvidence) -> RootChainResult<B256>;

    /// `respondChallengeBefore`.
    async fn respond_challenge_before(
        &self,
        response: ChallengeResponse,
    ) -> RootChainResult<B256>;

    /// `cancelExit(slot)`: withdraws the caller's own exit and frees its bond.
    async fn cancel_exit(&self, slot: Slot) -> RootChainResult<B256>;

    /// `cancelExits(slots)`: cancels several of the caller's exits in one transaction.
    async fn cancel_exits(&self, slots: Vec<Slot>) -> RootChainResult<B256>;

    /// `finalizeExits()`: settles every exit whose challenge window elapsed.
    async fn finalize_exits(&self) -> RootChainResult<B256>;

    /// `finalizeExit(slot)`: settles a single exit.
    async fn finalize_exit(&self, slot: Slot) -> RootChainResult<B256>;

    /// `withdraw(slot)`: takes custody of an exited coin.
    async fn withdraw(&self, slot: Slot) -> RootChainResult<B256>;

    /// `withdrawBonds()`: pays out the caller's freed bonds.
    async fn withdraw_bonds(&self) -> RootChainResult<B256>;
}
