//! The child-ledger authority.
//!
//! Accepts deposits relayed from the root ledger and signed transfers from users, keeps at most
//! one pending transaction per coin, and seals the pending set into interval blocks whose Merkle
//! roots are later relayed back to the root ledger.

pub mod api;
pub mod chain;
pub mod config;
pub mod errors;
pub mod store;

mod constants;

pub use api::ChildChainApi;
pub use chain::PlasmaCashChain;
pub use config::ChildChainConfig;
pub use errors::{ChildChainError, ChildChainResult};
