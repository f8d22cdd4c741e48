//! Client side of the Plasma Cash exit game.
//!
//! [`PlasmaCashClient`] assembles the transaction and proof bundles for exits, challenges and
//! responses from the child ledger's blocks and submits them to the root ledger on behalf of one
//! account. Every error is returned to the caller; nothing is retried, since the exit and
//! `challengeBefore` calls carry a bond.

pub mod client;
pub mod errors;
pub mod proof;

pub use client::PlasmaCashClient;
pub use errors::{ExitGameError, ExitGameResult};
pub use proof::{check_exclusion, CoinHistory, InclusionProof, TxAndProof};
