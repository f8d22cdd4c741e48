use std::path::PathBuf;

use plasma_cash_oracle::OracleConfig;
use plasma_cash_root_chain::RootChainConfig;
use serde::{Deserialize, Serialize};

/// The configuration of the relay oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The JSON-RPC endpoint of the child-ledger node.
    pub child_rpc_url: String,

    /// A file holding the hex-encoded private key that signs relayed deposits and seal requests.
    ///
    /// Its address must be the `oracle_address` the child-ledger node is configured with.
    pub oracle_key_file: PathBuf,

    /// A file holding the hex-encoded private key of the block authority.
    ///
    /// Required when the block relay is enabled.
    pub authority_key_file: Option<PathBuf>,

    /// The number of runtime worker threads.
    pub num_threads: Option<u8>,

    /// The connection to the root ledger.
    pub root: RootChainConfig,

    /// The relay workers.
    #[serde(default)]
    pub oracle: OracleConfig,
}
