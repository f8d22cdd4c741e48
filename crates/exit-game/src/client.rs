//! The exit-game client.

use alloy_primitives::{Address, Bytes, B256};
use alloy_signer_local::PrivateKeySigner;
use plasma_cash_child_chain::ChildChainApi;
use plasma_cash_primitives::{
    height::is_deposit_block, BlockHeight, PlasmaBlock, PlasmaCoin, PlasmaTx, Slot,
    GENESIS_DENOMINATION,
};
use plasma_cash_root_chain::{ChallengeEvidence, ChallengeResponse, ExitClaim, RootChainExitGame};
use tracing::{info, warn};

use crate::{
    errors::{ExitGameError, ExitGameResult},
    proof::{check_exclusion, CoinHistory, InclusionProof, TxAndProof},
};

/// Plays the exit game for one account.
///
/// Transactions and proofs are read from the child ledger; calls go to the root ledger, which
/// alone decides their validity and moves funds.
#[derive(Debug)]
pub struct PlasmaCashClient<R, C> {
    root: R,
    child: C,
    signer: PrivateKeySigner,
    block_interval: u64,
}

impl<R, C> PlasmaCashClient<R, C>
where
    R: RootChainExitGame,
    C: ChildChainApi,
{
    /// Creates a client signing with `signer`, which must be the key `root` calls with.
    pub fn new(
        root: R,
        child: C,
        signer: PrivateKeySigner,
        block_interval: u64,
    ) -> ExitGameResult<Self> {
        if block_interval == 0 {
            return Err(ExitGameError::ZeroBlockInterval);
        }
        if signer.address() != root.caller() {
            return Err(ExitGameError::SignerMismatch {
                signer: signer.address(),
                caller: root.caller(),
            });
        }

        Ok(Self {
            root,
            child,
            signer,
            block_interval,
        })
    }

    /// The account this client plays for.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Reads the transaction for `slot` in the block at `height`, together with its inclusion
    /// proof.
    ///
    /// The proof is checked against the block's root before it is returned, so a bundle built
    /// from the result is never rejected for a bad proof.
    pub async fn get_tx_and_proof(
        &self,
        height: BlockHeight,
        slot: Slot,
    ) -> ExitGameResult<TxAndProof> {
        let block = self.child.block_at(height).await?;
        self.proven_tx(&block, slot)
    }

    /// Heights of every block that can hold a spend of `slot`: its deposit block, then each
    /// plasma block after it up to the root ledger's latest.
    pub async fn get_block_numbers(&self, slot: Slot) -> ExitGameResult<Vec<BlockHeight>> {
        let start = self.root.plasma_coin(slot).await?.deposit_block;
        let end = self.root.current_block().await?;
        let first_plasma = (start / self.block_interval + 1) * self.block_interval;

        let mut heights = vec![start];
        let mut height = first_plasma;
        while height <= end {
            heights.push(height);
            height += self.block_interval;
        }

        Ok(heights)
    }

    /// Collects, for every block since the deposit of `slot`, either the transaction spending
    /// the coin or a proof that the block leaves it untouched.
    pub async fn get_coin_history(&self, slot: Slot) -> ExitGameResult<CoinHistory> {
        let mut history = CoinHistory::default();

        for height in self.get_block_numbers(slot).await? {
            let block = self.child.block_at(height).await?;
            match block.exclusion_proof(slot) {
                Some(proof) => {
                    history.exclusions.insert(height, proof);
                }
                None => {
                    history.inclusions.insert(height, self.proven_tx(&block, slot)?);
                }
            }
        }

        Ok(history)
    }

    /// Checks a history of `slot` received from someone else against the roots committed on the
    /// root ledger.
    ///
    /// The history must cover every block since the deposit exactly once. A failed check
    /// returns `Ok(false)`; errors are left for calls that could not be made.
    pub async fn verify_coin_history(
        &self,
        slot: Slot,
        history: &CoinHistory,
    ) -> ExitGameResult<bool> {
        let covered = history.heights();
        if covered.len() != history.inclusions.len() + history.exclusions.len() {
            return Ok(false);
        }
        let expected = self.get_block_numbers(slot).await?;
        if !covered.iter().copied().eq(expected) {
            return Ok(false);
        }

        for (height, entry) in &history.inclusions {
            if entry.block != *height || entry.tx.slot != slot {
                return Ok(false);
            }
            let root = self.root.block_root(*height).await?;
            let included = match &entry.proof {
                InclusionProof::Deposit => {
                    is_deposit_block(*height, self.block_interval) && entry.tx.hash() == root
                }
                InclusionProof::Merkle(proof) => {
                    !is_deposit_block(*height, self.block_interval)
                        && proof.verify(root, slot, entry.tx.hash())
                }
            };
            if !included {
                return Ok(false);
            }
        }

        for (height, proof) in &history.exclusions {
            let root = self.root.block_root(*height).await?;
            if !check_exclusion(root, slot, proof) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// The root the root ledger committed for the block at `height`, zero if none.
    pub async fn block_root(&self, height: BlockHeight) -> ExitGameResult<B256> {
        Ok(self.root.block_root(height).await?)
    }

    /// Signs a transfer of `slot` to `new_owner` and submits it to the child ledger.
    pub async fn send_transaction(
        &self,
        slot: Slot,
        prev_block: BlockHeight,
        denomination: u32,
        new_owner: Address,
    ) -> ExitGameResult<B256> {
        let tx = PlasmaTx::new(slot, prev_block, denomination, new_owner).signed_by(&self.signer)?;
        let hash = self.child.submit_tx(tx).await?;

        info!(%slot, %prev_block, %new_owner, %hash, "sent transaction");

        Ok(hash)
    }

    /// The coin as recorded by the root ledger.
    pub async fn plasma_coin(&self, slot: Slot) -> ExitGameResult<PlasmaCoin> {
        Ok(self.root.plasma_coin(slot).await?)
    }

    /// Starts an exit of `slot` with the transaction in `exit_block`, whose parent is in
    /// `prev_block`.
    ///
    /// Exiting from a deposit block needs no history: a deposit transaction naming this account
    /// is signed on the spot and submitted without proofs.
    pub async fn start_exit(
        &self,
        slot: Slot,
        prev_block: BlockHeight,
        exit_block: BlockHeight,
    ) -> ExitGameResult<B256> {
        let claim = self.build_claim(slot, prev_block, exit_block).await?;
        let tx_hash = self.root.start_exit(claim).await?;

        info!(%slot, %prev_block, %exit_block, %tx_hash, "started exit");

        Ok(tx_hash)
    }

    /// Challenges the exit of `slot` with an earlier history: the transaction in `tx_block` and
    /// its parent in `prev_block`.
    pub async fn challenge_before(
        &self,
        slot: Slot,
        prev_block: BlockHeight,
        tx_block: BlockHeight,
    ) -> ExitGameResult<B256> {
        let claim = self.build_claim(slot, prev_block, tx_block).await?;
        let tx_hash = self.root.challenge_before(claim).await?;

        info!(%slot, %prev_block, %tx_block, %tx_hash, "challenged exit with earlier history");

        Ok(tx_hash)
    }

    /// Challenges the exit of `slot` with a spend of its parent transaction included in
    /// `challenging_block`, between the exit's two blocks.
    pub async fn challenge_between(
        &self,
        slot: Slot,
        challenging_block: BlockHeight,
    ) -> ExitGameResult<B256> {
        let evidence = self.build_evidence(slot, challenging_block).await?;
        let tx_hash = self.root.challenge_between(evidence).await?;

        info!(%slot, %challenging_block, %tx_hash, "challenged double spend");

        Ok(tx_hash)
    }

    /// Challenges the exit of `slot` with a spend of the exiting transaction included in
    /// `challenging_block`.
    pub async fn challenge_after(
        &self,
        slot: Slot,
        challenging_block: BlockHeight,
    ) -> ExitGameResult<B256> {
        let evidence = self.build_evidence(slot, challenging_block).await?;
        let tx_hash = self.root.challenge_after(evidence).await?;

        info!(%slot, %challenging_block, %tx_hash, "challenged spent exit");

        Ok(tx_hash)
    }

    /// Answers the challenge `challenging_tx_hash` against the exit of `slot` with the
    /// transaction in `responding_block` that spent the challenging one.
    pub async fn respond_challenge_before(
        &self,
        slot: Slot,
        responding_block: BlockHeight,
        challenging_tx_hash: B256,
    ) -> ExitGameResult<B256> {
        let TxAndProof { tx, proof, block } =
            self.get_tx_and_proof(responding_block, slot).await?;
        let signature = signature_of(&tx, block)?;

        let response = ChallengeResponse {
            slot,
            challenging_tx_hash,
            responding_block,
            proof: proof.to_bytes(),
            signature,
            responding_tx: tx,
        };
        let tx_hash = self.root.respond_challenge_before(response).await?;

        info!(%slot, %responding_block, %challenging_tx_hash, %tx_hash, "responded to challenge");

        Ok(tx_hash)
    }

    /// Contests someone else's exit of `slot` with the first spend in the coin's history that
    /// disproves it.
    ///
    /// A spend after the exit block calls `challengeAfter`, a spend between the exit's two
    /// blocks calls `challengeBetween`, and a spend before its parent block starts a
    /// `challengeBefore` from that spend's own history. Returns `None` without calling the root
    /// ledger when there is no exit, the exit is this account's own, or the history holds
    /// nothing against it.
    pub async fn challenge_exit(&self, slot: Slot) -> ExitGameResult<Option<B256>> {
        let Some(exit) = self.root.exit_status(slot).await? else {
            return Ok(None);
        };
        if exit.owner == self.address() {
            return Ok(None);
        }

        let history = self.get_coin_history(slot).await?;
        for (height, entry) in &history.inclusions {
            let height = *height;
            if height > exit.exit_block {
                return self.challenge_after(slot, height).await.map(Some);
            }
            if exit.prev_block < height && height < exit.exit_block {
                return self.challenge_between(slot, height).await.map(Some);
            }
            if height < exit.prev_block {
                return self
                    .challenge_before(slot, entry.tx.prev_block, height)
                    .await
                    .map(Some);
            }
        }

        warn!(%slot, owner = %exit.owner, "coin history holds nothing against the exit");
        Ok(None)
    }

    /// Withdraws this account's exit of `slot`, freeing its bond.
    pub async fn cancel_exit(&self, slot: Slot) -> ExitGameResult<B256> {
        let tx_hash = self.root.cancel_exit(slot).await?;
        info!(%slot, %tx_hash, "cancelled exit");
        Ok(tx_hash)
    }

    /// Withdraws several of this account's exits in one call.
    pub async fn cancel_exits(&self, slots: Vec<Slot>) -> ExitGameResult<B256> {
        let count = slots.len();
        let tx_hash = self.root.cancel_exits(slots).await?;
        info!(%count, %tx_hash, "cancelled exits");
        Ok(tx_hash)
    }

    /// Settles every exit whose challenge window has elapsed.
    pub async fn finalize_exits(&self) -> ExitGameResult<B256> {
        Ok(self.root.finalize_exits().await?)
    }

    /// Settles the exit of `slot` if its challenge window has elapsed.
    pub async fn finalize_exit(&self, slot: Slot) -> ExitGameResult<B256> {
        Ok(self.root.finalize_exit(slot).await?)
    }

    /// Withdraws an exited coin.
    pub async fn withdraw(&self, slot: Slot) -> ExitGameResult<B256> {
        let tx_hash = self.root.withdraw(slot).await?;
        info!(%slot, %tx_hash, "withdrew coin");
        Ok(tx_hash)
    }

    /// Withdraws every freed bond of this account.
    pub async fn withdraw_bonds(&self) -> ExitGameResult<B256> {
        Ok(self.root.withdraw_bonds().await?)
    }

    /// The transaction for `slot` in `block` with its proof, checked against the block's root.
    fn proven_tx(&self, block: &PlasmaBlock, slot: Slot) -> ExitGameResult<TxAndProof> {
        let height = block.height;
        let tx = block
            .tx_for_slot(slot)
            .ok_or(ExitGameError::SlotNotInBlock {
                slot,
                block: height,
            })?
            .clone();

        let proof = if is_deposit_block(height, self.block_interval) {
            if tx.hash() != block.merkle_root {
                return Err(ExitGameError::ProofMismatch {
                    slot,
                    block: height,
                });
            }
            InclusionProof::Deposit
        } else {
            let proof = tx.proof.clone().ok_or(ExitGameError::MissingProof {
                slot,
                block: height,
            })?;
            if !proof.verify(block.merkle_root, slot, tx.hash()) {
                return Err(ExitGameError::ProofMismatch {
                    slot,
                    block: height,
                });
            }
            InclusionProof::Merkle(proof)
        };

        Ok(TxAndProof {
            tx,
            proof,
            block: height,
        })
    }

    async fn build_claim(
        &self,
        slot: Slot,
        prev_block: BlockHeight,
        tx_block: BlockHeight,
    ) -> ExitGameResult<ExitClaim> {
        if is_deposit_block(tx_block, self.block_interval) {
            let genesis = PlasmaTx::genesis(slot, GENESIS_DENOMINATION, self.address())
                .signed_by(&self.signer)?;
            let signature = signature_of(&genesis, tx_block)?;

            return Ok(ExitClaim {
                slot,
                prev_tx: None,
                exiting_tx: genesis,
                prev_tx_proof: Bytes::new(),
                exiting_tx_proof: Bytes::new(),
                signature,
                prev_block: 0,
                exit_block: tx_block,
            });
        }

        let exiting = self.get_tx_and_proof(tx_block, slot).await?;
        let prev = self.get_tx_and_proof(prev_block, slot).await?;
        let signature = signature_of(&exiting.tx, tx_block)?;

        Ok(ExitClaim {
            slot,
            prev_tx: Some(prev.tx),
            exiting_tx: exiting.tx,
            prev_tx_proof: prev.proof.to_bytes(),
            exiting_tx_proof: exiting.proof.to_bytes(),
            signature,
            prev_block,
            exit_block: tx_block,
        })
    }

    async fn build_evidence(
        &self,
        slot: Slot,
        challenging_block: BlockHeight,
    ) -> ExitGameResult<ChallengeEvidence> {
        let TxAndProof { tx, proof, block } =
            self.get_tx_and_proof(challenging_block, slot).await?;
        let signature = signature_of(&tx, block)?;

        Ok(ChallengeEvidence {
            slot,
            challenging_block,
            proof: proof.to_bytes(),
            signature,
            tx,
        })
    }
}

fn signature_of(tx: &PlasmaTx, block: BlockHeight) -> ExitGameResult<Bytes> {
    tx.signature
        .clone()
        .map(Bytes::from)
        .ok_or(ExitGameError::MissingSignature {
            slot: tx.slot,
            block,
        })
}
