//! The child-ledger authority of a Plasma Cash chain.
//!
//! Records relayed deposits, accepts signed transfers and seals them into blocks on request, all
//! persisted in a sled database and served over JSON-RPC.

use std::{fs, path::Path, sync::Arc};

use anyhow::{ensure, Context};
use clap::Parser;
use config::Config;
use constants::DEFAULT_THREAD_COUNT;
use plasma_cash_child_chain::{store::SledChainStore, ChildChainConfig, PlasmaCashChain};
use plasma_cash_common::logging::{self, LoggerConfig};
use rpc_server::{start_rpc, PlasmaCashRpc};
use serde::de::DeserializeOwned;
use tokio::{runtime, signal};
use tracing::{debug, info, trace, warn};

mod args;
mod config;
mod rpc_server;

mod constants;

fn main() -> anyhow::Result<()> {
    logging::init(LoggerConfig::with_base_name("plasma-node")).context("init logging")?;

    let cli = args::Cli::parse();
    info!(config = %cli.config.display(), "starting plasma node");

    let config = parse_toml::<Config>(cli.config);

    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(config.num_threads.unwrap_or(DEFAULT_THREAD_COUNT).into())
        .enable_all()
        .build()
        .context("create runtime")?;

    runtime.block_on(run(config))?;

    info!("plasma node shutdown complete");

    Ok(())
}

async fn run(config: Config) -> anyhow::Result<()> {
    ensure!(config.block_interval > 0, "block interval must be positive");

    let store = SledChainStore::open(&config.datadir).context("open chain database")?;
    let chain_config = ChildChainConfig::default()
        .with_block_interval(config.block_interval)
        .with_oracle(config.oracle_address);
    let chain = Arc::new(PlasmaCashChain::new(store, chain_config));

    let height = chain.current_block().await.context("read current block")?;
    info!(
        %height,
        block_interval = %config.block_interval,
        oracle = %config.oracle_address,
        "child ledger loaded"
    );

    let (_, handle) = start_rpc(&PlasmaCashRpc::new(chain), &config.rpc_addr).await?;

    signal::ctrl_c().await.context("listen for shutdown signal")?;
    info!("stopping rpc server");

    if handle.stop().is_err() {
        warn!("rpc server already stopped");
    }
    handle.stopped().await;

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
