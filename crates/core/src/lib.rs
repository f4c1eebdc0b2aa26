//! Engine-side machinery for driving cipher providers
//!
//! [`CipherContext`] is the handle every engine call goes through. It owns a
//! provider context, enforces the streaming state machine and the algorithm's
//! capabilities, and validates parameter sets at the boundary. The
//! [`Registry`] maps algorithm names to their descriptors. The [`block`]
//! module holds the buffering and padding logic shared by block-mode
//! providers.

#![forbid(unsafe_code)]

pub mod block;
pub mod context;
pub mod provctx;
pub mod registry;

pub use context::{CipherContext, StreamState};
pub use provctx::ProviderContext;
pub use registry::{AlgorithmDescriptor, Registry, RegistryBuilder};

#[cfg(test)]
pub(crate) mod mock;
