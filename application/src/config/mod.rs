//! Application-level configuration.
//!
//! - [`ExecutionParams`]: per-call timeouts for the chairman and title calls

pub mod execution_params;

pub use execution_params::ExecutionParams;
