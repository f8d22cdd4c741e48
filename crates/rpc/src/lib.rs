//! JSON-RPC interface of the child-ledger authority.
//!
//! The `client` feature adds [`client::RpcChildChainClient`], which lets the relay workers drive
//! a remote authority through the same capability trait they use for an in-process one.

#[cfg(feature = "client")]
pub mod client;
pub mod codes;
mod traits;

pub use traits::*;
