//! Process-level helpers used by the server entry point.

pub mod shutdown;

// Re-export public API
pub use shutdown::cancel_on_signal;
