//! sl-core: shared error type and configuration.
//!
//! This crate is the foundational dependency for the other sl-* crates,
//! providing the unified error type with its HTTP status mapping and the
//! application configuration.

pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
