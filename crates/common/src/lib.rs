//! Utilities shared by the plasma-cash services, such as setting up logging and tracing.

pub mod logging;

// Re-export tracing crate for convenience.
pub use tracing;
