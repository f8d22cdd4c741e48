//! The relay oracle: a deposit relay from the root ledger to the child ledger, a block relay in
//! the other direction, and the supervisor that keeps both running.
//!
//! The two workers share nothing and run as independent tasks. Each is paced, restarted after a
//! panic and stopped through a common cancellation token.

pub mod block_worker;
pub mod config;
pub mod deposit_worker;
pub mod errors;
pub mod supervisor;

mod constants;

use plasma_cash_child_chain::ChildChainApi;
use plasma_cash_root_chain::RootChainAuthority;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub use block_worker::PlasmaBlockWorker;
pub use config::OracleConfig;
pub use deposit_worker::PlasmaDepositWorker;
pub use errors::{OracleError, OracleResult};
pub use supervisor::{spawn_supervised, supervise, SupervisorConfig, Worker, WorkerExit};

/// Handle on a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    /// Name of the worker.
    pub name: &'static str,

    /// Resolves once the worker stops.
    pub handle: JoinHandle<WorkerExit>,
}

/// Starts the relay workers selected by `config`.
///
/// The deposit relay always runs. The block relay runs if [`OracleConfig::relay_blocks`] is set,
/// in which case `root` must be able to sign as the block authority.
pub fn spawn_oracle<R, C>(
    config: &OracleConfig,
    root: R,
    child: C,
    cancel: CancellationToken,
) -> Vec<WorkerHandle>
where
    R: RootChainAuthority + Clone + 'static,
    C: ChildChainApi + Clone + 'static,
{
    let supervisor = config.supervisor();
    let mut handles = Vec::with_capacity(2);

    let deposits = PlasmaDepositWorker::new(root.clone(), child.clone(), config.start_eth_block);
    handles.push(WorkerHandle {
        name: deposits.name(),
        handle: spawn_supervised(deposits, supervisor, cancel.clone()),
    });

    if config.relay_blocks {
        let blocks = PlasmaBlockWorker::new(root, child, config.block_interval);
        handles.push(WorkerHandle {
            name: blocks.name(),
            handle: spawn_supervised(blocks, supervisor, cancel),
        });
    }

    info!(workers = handles.len(), start_eth_block = %config.start_eth_block, "oracle started");

    handles
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use alloy_primitives::U256;
    use plasma_cash_child_chain::{store::InMemoryChainStore, ChildChainConfig, PlasmaCashChain};
    use plasma_cash_primitives::PlasmaTx;
    use plasma_cash_test_utils::{
        keys::{alice, authority, bob},
        root_chain::InMemoryRootChain,
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn workers_relay_both_ways_until_cancelled() {
        let root = InMemoryRootChain::new(authority().address(), 1000);
        let child = Arc::new(PlasmaCashChain::new(
            InMemoryChainStore::default(),
            ChildChainConfig::default(),
        ));
        let cancel = CancellationToken::new();

        let handles = spawn_oracle(
            &OracleConfig::default(),
            root.clone(),
            child.clone(),
            cancel.clone(),
        );
        assert_eq!(handles.len(), 2);

        let deposit = root.deposit(alice().address(), U256::from(1)).expect("deposit");
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(child.block(deposit.block_number).await.is_ok());

        let tx = PlasmaTx::new(deposit.slot, deposit.block_number, 1, bob().address())
            .signed_by(&alice())
            .expect("sign");
        child.submit_tx(tx).await.expect("accepted");
        tokio::time::sleep(Duration::from_secs(11)).await;

        let sealed = child.block(1000).await.expect("sealed");
        assert_eq!(root.submissions(), vec![(1000, sealed.merkle_root)]);

        cancel.cancel();
        for WorkerHandle { name, handle } in handles {
            let exit = handle.await.expect("supervisor never panics");
            assert!(matches!(exit, WorkerExit::Cancelled), "{name} stopped with {exit:?}");
        }
    }
}
