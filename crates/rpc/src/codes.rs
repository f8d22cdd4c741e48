//! Application error codes returned by the `plasmacash` namespace.

/// No block is recorded at the requested height.
pub const BLOCK_NOT_FOUND: i32 = -32001;

/// The authority refused the request: bad signature, spent coin, conflicting deposit and so on.
pub const REJECTED: i32 = -32002;

/// A deposit or seal request was not signed by the oracle.
pub const UNAUTHORIZED: i32 = -32003;

/// The authority failed internally, usually in its store.
pub const INTERNAL: i32 = -32603;
