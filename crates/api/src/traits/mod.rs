//! Provider-side traits
//!
//! A provider is registered once per algorithm and hands out per-operation
//! contexts. Together the two traits form the dispatch table an engine drives;
//! which of their methods are meaningful is declared through
//! [`CipherProvider::functions`].

pub mod context;
pub mod provider;

pub use context::ProviderCipherContext;
pub use provider::{answer_shape_param, CipherProvider, SHAPE_PARAMS};
