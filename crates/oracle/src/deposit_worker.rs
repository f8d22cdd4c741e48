//! Relays root-ledger deposits to the child ledger.

use async_trait::async_trait;
use plasma_cash_child_chain::ChildChainApi;
use plasma_cash_primitives::DepositRequest;
use plasma_cash_root_chain::RootChainReader;
use tracing::{debug, info, trace};

use crate::{errors::OracleResult, supervisor::Worker};

/// Forwards every `Deposit` event of the root ledger to the child ledger.
///
/// The worker scans root-ledger blocks from its watermark up to the latest block. The watermark
/// only moves once every deposit of the scanned range reached the child ledger, so a failed batch
/// is scanned again in full on the next step. The child ledger accepts replays of deposits it
/// already recorded.
#[derive(Debug)]
pub struct PlasmaDepositWorker<R, C> {
    root: R,
    child: C,
    start_eth_block: u64,
}

impl<R, C> PlasmaDepositWorker<R, C>
where
    R: RootChainReader,
    C: ChildChainApi,
{
    /// Creates a worker that starts scanning at root-ledger block `start_eth_block`.
    pub const fn new(root: R, child: C, start_eth_block: u64) -> Self {
        Self {
            root,
            child,
            start_eth_block,
        }
    }

    /// First root-ledger block not yet scanned.
    pub const fn start_eth_block(&self) -> u64 {
        self.start_eth_block
    }

    /// Forwards the deposits emitted since the watermark and returns how many were relayed.
    pub async fn relay_deposits(&mut self) -> OracleResult<usize> {
        let latest = self.root.latest_eth_block_num().await?;
        if latest < self.start_eth_block {
            trace!(%latest, start = %self.start_eth_block, "root ledger has not advanced");
            return Ok(0);
        }

        let deposits = self
            .root
            .fetch_deposits(self.start_eth_block, latest)
            .await?;
        debug!(from = %self.start_eth_block, to = %latest, num_deposits = deposits.len(), "scanned for deposits");

        for event in &deposits {
            self.child.deposit(DepositRequest::from(event)).await?;

            info!(slot = %event.slot, block = %event.block_number, from = %event.from, denomination = %event.denomination, "relayed deposit");
        }

        self.start_eth_block = latest + 1;

        Ok(deposits.len())
    }
}

#[async_trait]
impl<R, C> Worker for PlasmaDepositWorker<R, C>
where
    R: RootChainReader + 'static,
    C: ChildChainApi + 'static,
{
    fn name(&self) -> &'static str {
        "deposit-relay"
    }

    async fn step(&mut self) -> OracleResult<()> {
        self.relay_deposits().await.map(|_| ())
    }
}
