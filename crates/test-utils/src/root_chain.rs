//! In-memory root ledger.
//!
//! Mirrors the `RootChain` contract: deposits take sequential plasma block numbers, the authority
//! submits roots at multiples of the block interval, and the exit game validates transactions by
//! signature and inclusion against the committed roots. Bonds are tracked per account as bonded
//! and withdrawable amounts. Time only moves when a test advances it.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_transport::TransportErrorKind;
use async_trait::async_trait;
use plasma_cash_primitives::{
    height::{is_deposit_block, next_child_block_height},
    packed::{solidity_keccak256, PackedValue},
    BlockHeight, Challenge, CoinMode, CoinState, DepositEvent, Exit, PlasmaCoin, PlasmaTx, Slot,
    TxSignature, GENESIS_DENOMINATION,
};
use plasma_cash_root_chain::{
    ChallengeEvidence, ChallengeResponse, ExitClaim, ExitStatus, RootChainAuthority,
    RootChainError, RootChainExitGame, RootChainReader, RootChainResult,
};
use plasma_cash_smt::MerkleProof;
use tracing::debug;

/// Challenge window of an exit.
pub const DEFAULT_MATURITY_PERIOD: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Bond attached to exits and `challengeBefore`: 0.1 ether.
pub const DEFAULT_BOND: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);

/// Calls whose next invocations can be made to fail with a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RootCall {
    /// `currentBlock()`.
    CurrentBlock,

    /// Latest root-ledger block number.
    LatestEthBlock,

    /// `Deposit` log query.
    FetchDeposits,

    /// `submitBlock`.
    SubmitBlock,
}

/// Bond accounting of one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BondBalance {
    /// Locked in an open exit or challenge.
    pub bonded: U256,

    /// Released and claimable through `withdrawBonds`.
    pub withdrawable: U256,
}

#[derive(Debug)]
struct RootState {
    authority: Address,
    block_interval: u64,
    maturity: u64,
    bond: U256,
    now: u64,
    eth_block: u64,
    current_block: BlockHeight,
    num_coins: u64,
    tx_nonce: u64,
    blocks: BTreeMap<BlockHeight, B256>,
    submissions: Vec<(BlockHeight, B256)>,
    coins: BTreeMap<Slot, PlasmaCoin>,
    withdrawn: BTreeSet<Slot>,
    exits: BTreeMap<Slot, Exit>,
    challenges: BTreeMap<Slot, Vec<Challenge>>,
    balances: BTreeMap<Address, BondBalance>,
    payouts: BTreeMap<Address, U256>,
    deposits: Vec<DepositEvent>,
    faults: BTreeMap<RootCall, usize>,
}

fn rejected(reason: impl Into<String>) -> RootChainError {
    RootChainError::Rejected(reason.into())
}

fn ensure(condition: bool, reason: &str) -> RootChainResult<()> {
    if condition {
        Ok(())
    } else {
        Err(rejected(reason))
    }
}

fn recover(tx: &PlasmaTx, signature: &Bytes) -> RootChainResult<Address> {
    Ok(TxSignature::from_slice(signature)?.recover(&tx.hash())?)
}

impl RootState {
    fn new(authority: Address, block_interval: u64) -> Self {
        Self {
            authority,
            block_interval,
            maturity: DEFAULT_MATURITY_PERIOD.as_secs(),
            bond: DEFAULT_BOND,
            now: 0,
            eth_block: 0,
            current_block: 0,
            num_coins: 0,
            tx_nonce: 0,
            blocks: BTreeMap::new(),
            submissions: Vec::new(),
            coins: BTreeMap::new(),
            withdrawn: BTreeSet::new(),
            exits: BTreeMap::new(),
            challenges: BTreeMap::new(),
            balances: BTreeMap::new(),
            payouts: BTreeMap::new(),
            deposits: Vec::new(),
            faults: BTreeMap::new(),
        }
    }

    fn check_fault(&mut self, call: RootCall) -> RootChainResult<()> {
        match self.faults.get_mut(&call) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(RootChainError::Transport(TransportErrorKind::custom_str(
                    &format!("injected {call:?} failure"),
                )))
            }
            _ => Ok(()),
        }
    }

    /// Mines a transaction into a new root-ledger block and returns its hash.
    fn mine(&mut self) -> B256 {
        self.eth_block += 1;
        self.tx_nonce += 1;
        keccak256(self.tx_nonce.to_be_bytes())
    }

    fn coin(&self, slot: Slot) -> RootChainResult<&PlasmaCoin> {
        self.coins
            .get(&slot)
            .ok_or_else(|| rejected(format!("unknown coin {slot}")))
    }

    fn set_state(&mut self, slot: Slot, next: CoinState) -> RootChainResult<()> {
        let coin = self
            .coins
            .get_mut(&slot)
            .ok_or_else(|| rejected(format!("unknown coin {slot}")))?;
        ensure(
            coin.state.can_transition_to(next),
            "illegal coin state transition",
        )?;
        coin.state = next;
        Ok(())
    }

    fn exit(&self, slot: Slot) -> RootChainResult<&Exit> {
        self.exits
            .get(&slot)
            .ok_or_else(|| rejected(format!("no exit for coin {slot}")))
    }

    fn deposit(&mut self, from: Address, denomination: U256) -> RootChainResult<DepositEvent> {
        let block_number = self.current_block + 1;
        ensure(
            is_deposit_block(block_number, self.block_interval),
            "deposit would take a plasma block number",
        )?;

        let digest = solidity_keccak256(&[
            PackedValue::address(from),
            PackedValue::address(Address::ZERO),
            PackedValue::uint64(self.num_coins),
        ])?;
        let mut slot_bytes = [0u8; 8];
        slot_bytes.copy_from_slice(&digest[..8]);
        let slot = u64::from_be_bytes(slot_bytes);

        self.num_coins += 1;
        self.current_block = block_number;
        self.mine();

        let genesis = PlasmaTx::genesis(slot, GENESIS_DENOMINATION, from);
        self.blocks.insert(block_number, genesis.hash());
        self.coins.insert(
            slot,
            PlasmaCoin {
                slot,
                uid: U256::ZERO,
                deposit_block: block_number,
                denomination,
                owner: from,
                state: CoinState::Deposited,
                mode: CoinMode::Eth,
                contract_address: Address::ZERO,
            },
        );

        let event = DepositEvent {
            slot,
            block_number,
            denomination,
            from,
            contract_address: Address::ZERO,
            eth_block: self.eth_block,
        };
        self.deposits.push(event.clone());

        debug!(%slot, %block_number, %from, "simulated deposit");
        Ok(event)
    }

    fn submit_block(&mut self, caller: Address, root: B256) -> RootChainResult<B256> {
        self.check_fault(RootCall::SubmitBlock)?;
        ensure(caller == self.authority, "caller is not the authority")?;

        let height = next_child_block_height(self.current_block, self.block_interval);
        self.blocks.insert(height, root);
        self.submissions.push((height, root));
        self.current_block = height;

        debug!(%height, %root, "simulated block submission");
        Ok(self.mine())
    }

    /// Checks that `tx` is committed to in block `height`.
    ///
    /// A deposit block commits to its genesis transaction's hash directly; the transaction must
    /// also name the depositor.
    fn check_included(&self, tx: &PlasmaTx, height: BlockHeight, proof: &[u8]) -> RootChainResult<()> {
        let root = self
            .blocks
            .get(&height)
            .ok_or_else(|| rejected(format!("block {height} not committed")))?;

        if is_deposit_block(height, self.block_interval) {
            let coin = self.coin(tx.slot)?;
            ensure(tx.is_genesis(), "deposit block holds a deposit transaction")?;
            ensure(coin.deposit_block == height, "coin not deposited in block")?;
            ensure(coin.owner == tx.new_owner, "deposit owner mismatch")?;
            ensure(tx.hash() == *root, "deposit root mismatch")
        } else {
            let proof = MerkleProof::from_bytes(proof).map_err(|e| rejected(e.to_string()))?;
            ensure(
                proof.verify(*root, tx.slot, tx.hash()),
                "transaction not included in block",
            )
        }
    }

    /// Validates an exit claim and returns the account that signed the exiting transaction.
    fn check_claim(&self, claim: &ExitClaim) -> RootChainResult<Address> {
        let tx = &claim.exiting_tx;
        ensure(tx.slot == claim.slot, "slot mismatch")?;

        if is_deposit_block(claim.exit_block, self.block_interval) {
            self.check_included(tx, claim.exit_block, &claim.exiting_tx_proof)?;
            ensure(
                recover(tx, &claim.signature)? == tx.new_owner,
                "deposit transaction not signed by its owner",
            )?;
            return Ok(tx.new_owner);
        }

        let prev = claim
            .prev_tx
            .as_ref()
            .ok_or_else(|| rejected("missing parent transaction"))?;
        ensure(prev.slot == claim.slot, "parent slot mismatch")?;
        ensure(tx.prev_block == claim.prev_block, "parent block mismatch")?;
        self.check_included(prev, claim.prev_block, &claim.prev_tx_proof)?;
        self.check_included(tx, claim.exit_block, &claim.exiting_tx_proof)?;
        ensure(
            recover(tx, &claim.signature)? == prev.new_owner,
            "transaction not signed by the parent's owner",
        )?;

        Ok(prev.new_owner)
    }

    fn lock_bond(&mut self, account: Address) -> U256 {
        self.balances.entry(account).or_default().bonded += self.bond;
        self.bond
    }

    fn release_bond(&mut self, account: Address, amount: U256) {
        let balance = self.balances.entry(account).or_default();
        balance.bonded = balance.bonded.saturating_sub(amount);
        balance.withdrawable += amount;
    }

    fn slash_bond(&mut self, from: Address, to: Address, amount: U256) {
        let loser = self.balances.entry(from).or_default();
        loser.bonded = loser.bonded.saturating_sub(amount);
        self.balances.entry(to).or_default().withdrawable += amount;
    }

    fn start_exit(&mut self, caller: Address, claim: ExitClaim) -> RootChainResult<B256> {
        let slot = claim.slot;
        ensure(
            self.coin(slot)?.state == CoinState::Deposited,
            "coin is not in the deposited state",
        )?;
        ensure(
            claim.exiting_tx.new_owner == caller,
            "caller does not own the exiting transaction",
        )?;
        let prev_owner = self.check_claim(&claim)?;

        let bond = self.lock_bond(caller);
        self.exits.insert(
            slot,
            Exit {
                slot,
                owner: caller,
                prev_owner,
                prev_block: claim.prev_block,
                exit_block: claim.exit_block,
                created_at: self.now,
                bond,
            },
        );
        self.set_state(slot, CoinState::Exiting)?;

        debug!(%slot, owner = %caller, exit_block = %claim.exit_block, "simulated exit");
        Ok(self.mine())
    }

    fn challenge_before(&mut self, caller: Address, claim: ExitClaim) -> RootChainResult<B256> {
        let slot = claim.slot;
        ensure(self.coin(slot)?.state.is_exiting(), "coin is not exiting")?;
        ensure(
            claim.exit_block < self.exit(slot)?.exit_block,
            "challenge must predate the exit",
        )?;
        self.check_claim(&claim)?;

        let tx = claim.exiting_tx.stripped();
        let challenging_tx_hash = tx.hash();
        let challenges = self.challenges.get(&slot);
        ensure(
            !challenges.is_some_and(|c| c.iter().any(|c| c.challenging_tx_hash == challenging_tx_hash)),
            "transaction already used to challenge",
        )?;

        let bond = self.lock_bond(caller);
        self.challenges.entry(slot).or_default().push(Challenge {
            slot,
            challenger: caller,
            owner: tx.new_owner,
            challenging_tx: tx,
            challenging_tx_hash,
            challenged_block: claim.exit_block,
            bond,
        });
        self.set_state(slot, CoinState::Challenged)?;

        Ok(self.mine())
    }

    /// Voids the exit of `slot`, paying its bond to `challenger` and releasing the bonds of any
    /// open `challengeBefore`.
    fn void_exit(&mut self, slot: Slot, challenger: Address) -> RootChainResult<()> {
        let exit = self
            .exits
            .remove(&slot)
            .ok_or_else(|| rejected(format!("no exit for coin {slot}")))?;
        self.slash_bond(exit.owner, challenger, exit.bond);

        for challenge in self.challenges.remove(&slot).unwrap_or_default() {
            self.release_bond(challenge.challenger, challenge.bond);
        }
        self.set_state(slot, CoinState::Deposited)
    }

    fn challenge_between(
        &mut self,
        caller: Address,
        evidence: ChallengeEvidence,
    ) -> RootChainResult<B256> {
        let slot = evidence.slot;
        ensure(self.coin(slot)?.state.is_exiting(), "coin is not exiting")?;
        let exit = self.exit(slot)?;
        ensure(
            exit.prev_block < evidence.challenging_block
                && evidence.challenging_block < exit.exit_block,
            "challenge must sit between the exit's blocks",
        )?;
        ensure(evidence.tx.slot == slot, "slot mismatch")?;
        ensure(
            recover(&evidence.tx, &evidence.signature)? == exit.prev_owner,
            "challenge not signed by the exit's previous owner",
        )?;
        self.check_included(&evidence.tx, evidence.challenging_block, &evidence.proof)?;

        self.void_exit(slot, caller)?;
        Ok(self.mine())
    }

    fn challenge_after(
        &mut self,
        caller: Address,
        evidence: ChallengeEvidence,
    ) -> RootChainResult<B256> {
        let slot = evidence.slot;
        ensure(self.coin(slot)?.state.is_exiting(), "coin is not exiting")?;
        let exit = self.exit(slot)?;
        ensure(
            evidence.challenging_block > exit.exit_block,
            "challenge must follow the exit",
        )?;
        ensure(evidence.tx.slot == slot, "slot mismatch")?;
        ensure(
            evidence.tx.prev_block == exit.exit_block,
            "challenge must spend the exiting transaction",
        )?;
        ensure(
            recover(&evidence.tx, &evidence.signature)? == exit.owner,
            "challenge not signed by the exit's owner",
        )?;
        self.check_included(&evidence.tx, evidence.challenging_block, &evidence.proof)?;

        self.void_exit(slot, caller)?;
        Ok(self.mine())
    }

    fn respond_challenge_before(
        &mut self,
        caller: Address,
        response: ChallengeResponse,
    ) -> RootChainResult<B256> {
        let slot = response.slot;
        ensure(
            self.coin(slot)?.state == CoinState::Challenged,
            "coin is not challenged",
        )?;
        let challenge = self
            .challenges
            .get(&slot)
            .and_then(|c| {
                c.iter()
                    .find(|c| c.challenging_tx_hash == response.challenging_tx_hash)
            })
            .cloned()
            .ok_or_else(|| rejected("no such challenge"))?;

        ensure(response.responding_tx.slot == slot, "slot mismatch")?;
        ensure(
            response.responding_block > challenge.challenged_block,
            "response must follow the challenge",
        )?;
        ensure(
            recover(&response.responding_tx, &response.signature)? == challenge.owner,
            "response not signed by the challenge's owner",
        )?;
        self.check_included(
            &response.responding_tx,
            response.responding_block,
            &response.proof,
        )?;

        self.slash_bond(challenge.challenger, caller, challenge.bond);
        let remaining = self.challenges.entry(slot).or_default();
        remaining.retain(|c| c.challenging_tx_hash != challenge.challenging_tx_hash);
        if remaining.is_empty() {
            self.challenges.remove(&slot);
            self.set_state(slot, CoinState::Responded)?;
        }

        Ok(self.mine())
    }

    /// Withdraws the caller's exits of `slots`, all or none.
    ///
    /// Each exit bond goes back to its owner, bonds of open `challengeBefore` go back to their
    /// challengers, and the coins return to the deposited state.
    fn cancel_exits(&mut self, caller: Address, slots: &[Slot]) -> RootChainResult<B256> {
        for slot in slots {
            ensure(
                self.exit(*slot)?.owner == caller,
                "caller does not own the exit",
            )?;
        }

        for slot in slots {
            let Some(exit) = self.exits.remove(slot) else {
                continue;
            };
            self.release_bond(exit.owner, exit.bond);
            for challenge in self.challenges.remove(slot).unwrap_or_default() {
                self.release_bond(challenge.challenger, challenge.bond);
            }
            self.set_state(*slot, CoinState::Deposited)?;
            debug!(%slot, owner = %caller, "exit cancelled");
        }

        Ok(self.mine())
    }

    /// Settles the exit of `slot` if its challenge window has elapsed.
    fn finalize(&mut self, slot: Slot) -> RootChainResult<()> {
        let Some(exit) = self.exits.get(&slot).cloned() else {
            return Ok(());
        };
        if self.now.saturating_sub(exit.created_at) < self.maturity {
            return Ok(());
        }

        self.exits.remove(&slot);
        let open = self.challenges.remove(&slot).unwrap_or_default();
        match open.first() {
            Some(first) => {
                self.slash_bond(exit.owner, first.challenger, exit.bond);
                for challenge in &open {
                    self.release_bond(challenge.challenger, challenge.bond);
                }
                self.set_state(slot, CoinState::Deposited)?;
                debug!(%slot, "exit voided by standing challenge");
            }
            None => {
                self.release_bond(exit.owner, exit.bond);
                self.set_state(slot, CoinState::Exited)?;
                if let Some(coin) = self.coins.get_mut(&slot) {
                    coin.owner = exit.owner;
                }
                debug!(%slot, owner = %exit.owner, "exit finalized");
            }
        }

        Ok(())
    }

    fn finalize_exits(&mut self) -> RootChainResult<B256> {
        let slots: Vec<Slot> = self.exits.keys().copied().collect();
        for slot in slots {
            self.finalize(slot)?;
        }
        Ok(self.mine())
    }

    fn withdraw(&mut self, caller: Address, slot: Slot) -> RootChainResult<B256> {
        let coin = self.coin(slot)?;
        ensure(coin.state == CoinState::Exited, "coin has not exited")?;
        ensure(coin.owner == caller, "caller does not own the coin")?;

        let amount = coin.denomination;
        self.coins.remove(&slot);
        self.withdrawn.insert(slot);
        *self.payouts.entry(caller).or_default() += amount;

        Ok(self.mine())
    }

    fn withdraw_bonds(&mut self, caller: Address) -> RootChainResult<B256> {
        let balance = self.balances.entry(caller).or_default();
        let amount = std::mem::take(&mut balance.withdrawable);
        ensure(!amount.is_zero(), "no withdrawable bonds")?;
        *self.payouts.entry(caller).or_default() += amount;

        Ok(self.mine())
    }
}

/// A simulated `RootChain` contract shared between any number of accounts.
///
/// Clones and [`InMemoryRootChain::client_for`] handles all see the same ledger; each handle
/// issues calls as its own account.
#[derive(Debug, Clone)]
pub struct InMemoryRootChain {
    state: Arc<Mutex<RootState>>,
    caller: Address,
}

impl InMemoryRootChain {
    /// Creates an empty ledger whose block authority is `authority`. The handle calls as the
    /// authority.
    pub fn new(authority: Address, block_interval: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(RootState::new(authority, block_interval))),
            caller: authority,
        }
    }

    /// A handle on the same ledger calling as `caller`.
    pub fn client_for(&self, caller: Address) -> Self {
        Self {
            state: self.state.clone(),
            caller,
        }
    }

    /// Changes the challenge window.
    pub fn set_maturity_period(&self, maturity: Duration) {
        self.state().maturity = maturity.as_secs();
    }

    /// Moves the ledger clock forward.
    pub fn advance_time(&self, by: Duration) {
        self.state().now += by.as_secs();
    }

    /// Makes the next `times` invocations of `call` fail with a transport error.
    pub fn fail_next(&self, call: RootCall, times: usize) {
        self.state().faults.insert(call, times);
    }

    /// Deposits `denomination` wei on behalf of `from`.
    pub fn deposit(&self, from: Address, denomination: U256) -> RootChainResult<DepositEvent> {
        self.state().deposit(from, denomination)
    }

    /// Every root committed by `submitBlock`, in submission order.
    pub fn submissions(&self) -> Vec<(BlockHeight, B256)> {
        self.state().submissions.clone()
    }

    /// The coin at `slot`, unless it never existed or was withdrawn.
    pub fn coin(&self, slot: Slot) -> Option<PlasmaCoin> {
        self.state().coins.get(&slot).cloned()
    }

    /// Whether the coin at `slot` was withdrawn.
    pub fn is_withdrawn(&self, slot: Slot) -> bool {
        self.state().withdrawn.contains(&slot)
    }

    /// The pending exit of `slot`.
    pub fn exit(&self, slot: Slot) -> Option<Exit> {
        self.state().exits.get(&slot).cloned()
    }

    /// Open challenges against the exit of `slot`.
    pub fn challenges(&self, slot: Slot) -> Vec<Challenge> {
        self.state().challenges.get(&slot).cloned().unwrap_or_default()
    }

    /// Bond accounting of `account`.
    pub fn bond_balance(&self, account: Address) -> BondBalance {
        self.state()
            .balances
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    /// Total paid out to `account` by withdrawals.
    pub fn payouts(&self, account: Address) -> U256 {
        self.state()
            .payouts
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    fn state(&self) -> MutexGuard<'_, RootState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RootChainReader for InMemoryRootChain {
    async fn current_block(&self) -> RootChainResult<BlockHeight> {
        let mut state = self.state();
        state.check_fault(RootCall::CurrentBlock)?;
        Ok(state.current_block)
    }

    async fn latest_eth_block_num(&self) -> RootChainResult<u64> {
        let mut state = self.state();
        state.check_fault(RootCall::LatestEthBlock)?;
        Ok(state.eth_block)
    }

    async fn fetch_deposits(&self, from: u64, to: u64) -> RootChainResult<Vec<DepositEvent>> {
        let mut state = self.state();
        state.check_fault(RootCall::FetchDeposits)?;
        Ok(state
            .deposits
            .iter()
            .filter(|d| (from..=to).contains(&d.eth_block))
            .cloned()
            .collect())
    }

    async fn plasma_coin(&self, slot: Slot) -> RootChainResult<PlasmaCoin> {
        self.state().coin(slot).cloned()
    }

    async fn block_root(&self, height: BlockHeight) -> RootChainResult<B256> {
        Ok(self
            .state()
            .blocks
            .get(&height)
            .copied()
            .unwrap_or_default())
    }

    async fn exit_status(&self, slot: Slot) -> RootChainResult<Option<ExitStatus>> {
        let state = self.state();
        let Some(exit) = state.exits.get(&slot) else {
            return Ok(None);
        };

        Ok(Some(ExitStatus {
            owner: exit.owner,
            prev_block: exit.prev_block,
            exit_block: exit.exit_block,
            state: state.coin(slot)?.state,
        }))
    }
}

#[async_trait]
impl RootChainAuthority for InMemoryRootChain {
    async fn submit_block(&self, root: B256) -> RootChainResult<B256> {
        self.state().submit_block(self.caller, root)
    }
}

#[async_trait]
impl RootChainExitGame for InMemoryRootChain {
    fn caller(&self) -> Address {
        self.caller
    }

    async fn start_exit(&self, claim: ExitClaim) -> RootChainResult<B256> {
        self.state().start_exit(self.caller, claim)
    }

    async fn challenge_before(&self, claim: ExitClaim) -> RootChainResult<B256> {
        self.state().challenge_before(self.caller, claim)
    }

    async fn challenge_between(&self, evidence: ChallengeEvidence) -> RootChainResult<B256> {
        self.state().challenge_between(self.caller, evidence)
    }

    async fn challenge_after(&self, evidence: ChallengeEvidence) -> RootChainResult<B256> {
        self.state().challenge_after(self.caller, evidence)
    }

    async fn respond_challenge_before(
        &self,
        response: ChallengeResponse,
    ) -> RootChainResult<B256> {
        self.state().respond_challenge_before(self.caller, response)
    }

    async fn cancel_exit(&self, slot: Slot) -> RootChainResult<B256> {
        self.state().cancel_exits(self.caller, &[slot])
    }

    async fn cancel_exits(&self, slots: Vec<Slot>) -> RootChainResult<B256> {
        self.state().cancel_exits(self.caller, &slots)
    }

    async fn finalize_exits(&self) -> RootChainResult<B256> {
        self.state().finalize_exits()
    }

    async fn finalize_exit(&self, slot: Slot) -> RootChainResult<B256> {
        let mut state = self.state();
        state.finalize(slot)?;
        Ok(state.mine())
    }

    async fn withdraw(&self, slot: Slot) -> RootChainResult<B256> {
        self.state().withdraw(self.caller, slot)
    }

    async fn withdraw_bonds(&self) -> RootChainResult<B256> {
        self.state().withdraw_bonds(self.caller)
    }
}
