use std::path::PathBuf;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// The configuration of the child-ledger node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The directory the chain database lives in.
    pub datadir: PathBuf,

    /// The address the JSON-RPC server listens on.
    pub rpc_addr: String,

    /// Spacing between sealed blocks.
    ///
    /// Must equal the root ledger's `childBlockInterval`, otherwise the roots relayed by the
    /// oracle land at different heights than the ones recorded here.
    pub block_interval: u64,

    /// Root-ledger address of the oracle.
    ///
    /// Relayed deposits and seal requests signed by any other key are refused.
    pub oracle_address: Address,

    /// The number of runtime worker threads.
    pub num_threads: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_toml() {
        let config = r#"
            datadir = ".data"
            rpc_addr = "127.0.0.1:46321"
            block_interval = 1000
            oracle_address = "0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1"
            num_threads = 2
        "#;

        let config = toml::from_str::<Config>(config);
        assert!(
            config.is_ok(),
            "must be able to deserialize config from toml but got: {}",
            config.unwrap_err()
        );

        let config = config.unwrap();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized = toml::from_str::<Config>(&serialized).unwrap();

        assert_eq!(
            deserialized, config,
            "must be able to serialize and deserialize config to toml"
        );
    }

    #[test]
    fn thread_count_is_optional() {
        let config = toml::from_str::<Config>(
            r#"
            datadir = ".data"
            rpc_addr = "127.0.0.1:46321"
            block_interval = 1000
            oracle_address = "0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1"
        "#,
        )
        .expect("must parse");

        assert_eq!(config.num_threads, None);
    }

    #[test]
    fn oracle_address_is_required() {
        let config = toml::from_str::<Config>(
            r#"
            datadir = ".data"
            rpc_addr = "127.0.0.1:46321"
            block_interval = 1000
        "#,
        );

        assert!(config.is_err());
    }
}
