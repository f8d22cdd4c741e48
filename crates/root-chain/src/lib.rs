//! Access to the root ledger.
//!
//! Workers and the exit-game client only see the capability traits in [`traits`]. The
//! [`EthRootChainClient`] implements them against the deployed `RootChain` contract over JSON-RPC.

pub mod bindings;
pub mod client;
pub mod config;
pub mod errors;
pub mod receipt;
pub mod traits;
pub mod types;

mod constants;

pub use client::EthRootChainClient;
pub use config::RootChainConfig;
pub use errors::{RootChainError, RootChainResult};
pub use traits::{RootChainAuthority, RootChainExitGame, RootChainReader};
pub use types::{ChallengeEvidence, ChallengeResponse, ExitClaim, ExitStatus};
