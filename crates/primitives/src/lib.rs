//! Core data types and pure functions shared by every component of the Plasma Cash system.
//!
//! This crate sits at the bottom of the workspace hierarchy: it defines what a coin, a
//! transaction, a block, an exit and a challenge are, and it owns the canonical hashing rule that
//! the root ledger and the child ledger must agree on byte for byte.

pub mod block;
pub mod coin;
pub mod command;
pub mod deposit;
pub mod errors;
pub mod exit;
pub mod height;
pub mod packed;
pub mod signature;
pub mod tx;
pub mod types;

pub use block::PlasmaBlock;
pub use coin::{CoinMode, CoinState, PlasmaCoin};
pub use command::{OracleMessage, OracleSigned, SealBlock};
pub use deposit::{DepositEvent, DepositRequest, GENESIS_DENOMINATION};
pub use errors::EncodingError;
pub use exit::{Challenge, Exit};
pub use signature::TxSignature;
pub use tx::PlasmaTx;
pub use types::{BlockHeight, Slot};
