//! The relay oracle of a Plasma Cash chain.
//!
//! Forwards root-ledger deposits to the child-ledger node and, when holding the authority's key,
//! relays sealed child-ledger block roots back to the root ledger. Exits non-zero if a worker
//! stops on a fault it cannot recover from.

use std::{fs, path::Path};

use anyhow::{bail, ensure, Context};
use clap::Parser;
use config::Config;
use constants::DEFAULT_THREAD_COUNT;
use futures::future::join_all;
use keys::load_private_key;
use plasma_cash_common::logging::{self, LoggerConfig};
use plasma_cash_oracle::{spawn_oracle, WorkerExit, WorkerHandle};
use plasma_cash_root_chain::EthRootChainClient;
use plasma_cash_rpc::client::RpcChildChainClient;
use serde::de::DeserializeOwned;
use tokio::{runtime, signal};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

mod args;
mod config;
mod keys;

mod constants;

fn main() -> anyhow::Result<()> {
    logging::init(LoggerConfig::with_base_name("plasma-oracle")).context("init logging")?;

    let cli = args::Cli::parse();
    info!(config = %cli.config.display(), "starting plasma oracle");

    let config = parse_toml::<Config>(cli.config);

    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(config.num_threads.unwrap_or(DEFAULT_THREAD_COUNT).into())
        .enable_all()
        .build()
        .context("create runtime")?;

    runtime.block_on(run(config))?;

    info!("plasma oracle shutdown complete");

    Ok(())
}

async fn run(config: Config) -> anyhow::Result<()> {
    let signer = config
        .authority_key_file
        .as_deref()
        .map(load_private_key)
        .transpose()?;
    let oracle_key = load_private_key(&config.oracle_key_file)?;
    info!(oracle = %oracle_key.address(), "loaded oracle key");
    if config.oracle.relay_blocks && signer.is_none() {
        bail!("the block relay needs `authority_key_file`");
    }

    let cancel = CancellationToken::new();

    let root = EthRootChainClient::connect(config.root.clone(), signer, cancel.clone())
        .await
        .context("connect to root ledger")?;
    let interval = root
        .child_block_interval()
        .await
        .context("read child block interval")?;
    ensure!(
        interval == config.oracle.block_interval,
        "configured block interval {} differs from the contract's {interval}",
        config.oracle.block_interval
    );

    let child = RpcChildChainClient::new(&config.child_rpc_url)
        .context("connect to child ledger")?
        .with_oracle_key(oracle_key);

    let handles = spawn_oracle(&config.oracle, root, child, cancel.clone());

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("received shutdown signal"),
            Err(e) => error!(%e, "could not listen for shutdown signal"),
        }
        shutdown.cancel();
    });

    // a faulted worker takes the others down with it
    let watchers = handles.into_iter().map(|WorkerHandle { name, handle }| {
        let cancel = cancel.clone();
        async move {
            let exit = handle.await;
            if !matches!(exit, Ok(WorkerExit::Cancelled)) {
                cancel.cancel();
            }
            (name, exit)
        }
    });

    let mut faulted = Vec::new();
    for (name, exit) in join_all(watchers).await {
        match exit {
            Ok(WorkerExit::Cancelled) => info!(worker = name, "worker stopped"),
            Ok(WorkerExit::Fault(e)) => {
                error!(worker = name, %e, "worker failed, stopped the oracle");
                faulted.push(name);
            }
            Err(e) => {
                error!(worker = name, %e, "supervisor task failed");
                faulted.push(name);
            }
        }
    }

    if !faulted.is_empty() {
        bail!("workers stopped on a fault: {}", faulted.join(", "));
    }

    Ok(())
}

/// Reads and parses a TOML file from the given path into the given type `T`.
///
/// # Panics
///
/// 1. If the file is not readable.
/// 2. If the contents of the file cannot be deserialized into the given type `T`.
fn parse_toml<T>(path: impl AsRef<Path>) -> T
where
    T: std::fmt::Debug + DeserializeOwned,
{
    fs::read_to_string(path)
        .map(|p| {
            trace!(?p, "read file");

            let parsed = toml::from_str::<T>(&p).unwrap_or_else(|e| {
                panic!("failed to parse TOML file: {e:?}");
            });
            debug!(?parsed, "parsed TOML file");

            parsed
        })
        .unwrap_or_else(|_| {
            panic!("failed to read TOML file");
        })
}
