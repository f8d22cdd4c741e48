//! Supervision of worker loops.
//!
//! A worker is a type with a fallible `step`. The supervisor runs the step repeatedly, at most
//! once per `step_interval`, inside its own task. A step error is logged and the loop carries on,
//! unless the error is not recoverable, in which case the worker stops for good. A panic kills the
//! task; the supervisor waits `restart_backoff` and relaunches the loop on the same worker state,
//! so progress markers survive the crash.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{sleep, Instant},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::{OracleError, OracleResult};

/// A unit of repeatable relay work.
#[async_trait]
pub trait Worker: Send + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Performs one iteration.
    async fn step(&mut self) -> OracleResult<()>;
}

/// Scheduling parameters of a supervised worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Minimum wall-clock duration of one iteration.
    pub step_interval: Duration,

    /// Pause before relaunching a crashed worker.
    pub restart_backoff: Duration,
}

/// Why a supervised worker stopped.
#[derive(Debug)]
pub enum WorkerExit {
    /// The cancellation token fired.
    Cancelled,

    /// A step failed with an error that retrying cannot fix.
    Fault(OracleError),
}

/// Runs `worker` under supervision in a new task.
pub fn spawn_supervised<W: Worker>(
    worker: W,
    config: SupervisorConfig,
    cancel: CancellationToken,
) -> JoinHandle<WorkerExit> {
    tokio::spawn(supervise(worker, config, cancel))
}

/// Runs `worker` under supervision until it is cancelled or hits a non-recoverable fault.
pub async fn supervise<W: Worker>(
    worker: W,
    config: SupervisorConfig,
    cancel: CancellationToken,
) -> WorkerExit {
    let name = worker.name();
    let worker = Arc::new(Mutex::new(worker));

    loop {
        let run = tokio::spawn(step_loop(
            worker.clone(),
            config.step_interval,
            cancel.clone(),
        ));

        match run.await {
            Ok(Ok(())) => {
                info!(worker = name, "worker stopped");
                return WorkerExit::Cancelled;
            }
            Ok(Err(e)) => {
                error!(worker = name, %e, "worker hit a non-recoverable fault");
                return WorkerExit::Fault(e);
            }
            Err(e) if e.is_panic() => {
                warn!(worker = name, backoff = ?config.restart_backoff, "worker panicked, restarting after backoff");
            }
            Err(e) => {
                warn!(worker = name, %e, "worker task aborted");
                return WorkerExit::Cancelled;
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return WorkerExit::Cancelled,
            _ = sleep(config.restart_backoff) => {}
        }
    }
}

/// Steps the worker until cancelled, pacing iterations to at least `step_interval`.
///
/// Returns `Ok` on cancellation and the error of the first non-recoverable step failure.
async fn step_loop<W: Worker>(
    worker: Arc<Mutex<W>>,
    step_interval: Duration,
    cancel: CancellationToken,
) -> OracleResult<()> {
    let mut worker = worker.lock().await;
    let name = worker.name();

    loop {
        let started = Instant::now();

        let result = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            result = worker.step() => result,
        };

        match result {
            Ok(()) => debug!(worker = name, "step complete"),
            Err(e) if e.is_recoverable() => error!(worker = name, %e, "step failed"),
            Err(e) => return Err(e),
        }

        if let Some(remaining) = step_interval.checked_sub(started.elapsed()) {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = sleep(remaining) => {}
            }
        }
    }
}
