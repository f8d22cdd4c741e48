//! Deterministic fakes and fixtures for exercising the relay workers and the exit game without a
//! live root ledger.
//!
//! [`root_chain::InMemoryRootChain`] follows the rules of the `RootChain` contract closely enough
//! that a sequence of calls which succeeds against it also succeeds against the deployed contract.

pub mod arbitrary_generator;
pub mod child_chain;
pub mod keys;
pub mod root_chain;
