//! Parses command-line arguments for the relay oracle.

use std::path::PathBuf;

use clap::{crate_version, Parser};

#[derive(Debug, Parser)]
#[clap(
    name = "plasma-oracle",
    about = "Relays deposits and block roots between the root and child ledgers",
    version = crate_version!()
)]
pub(crate) struct Cli {
    #[clap(
        long,
        short = 'c',
        help = "The file containing the configuration for the oracle",
        default_value = "config.toml"
    )]
    pub config: PathBuf,
}
