//! Error handling for the provider contract

pub mod types;
pub mod validate;

// Re-export the primary error type and result
pub use types::{Error, Result};
