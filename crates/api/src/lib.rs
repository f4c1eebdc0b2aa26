//! Public contract between a cryptographic engine and cipher providers
//!
//! This crate defines everything both sides of the boundary agree on: the
//! error type, the parameter schema and value entries, the buffer aliasing
//! model, the stable function identifiers and the provider traits.

#![forbid(unsafe_code)]

pub mod dispatch;
pub mod error;
pub mod inout;
pub mod params;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate level for convenience
pub use dispatch::{derive_capabilities, CapabilityKind, Capabilities, DispatchDefect, FunctionId};
pub use error::{Error, Result};
pub use inout::InOut;
pub use params::{
    Param, ParamDescriptor, ParamRequest, ParamSchema, ParamType, ParamValue, UnknownParamPolicy,
};
pub use traits::{CipherProvider, ProviderCipherContext};
pub use types::*;
