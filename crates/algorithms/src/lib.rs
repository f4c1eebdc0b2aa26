//! Reference cipher providers
//!
//! AES-128/192/256 in ECB and CBC mode (feature `block`), in CTR mode
//! (feature `stream`) and AES-128/256-GCM with TLS record support
//! (feature `aead`). Each provider plugs into a [`Registry`] through the
//! [`CipherProvider`](dprov_api::CipherProvider) contract.
//!
//! ```
//! use dprov_core::{ProviderContext, Registry};
//!
//! let registry = dprov_algorithms::register_all(Registry::builder())?.build();
//! let ctx = registry.new_ctx("aes-128-cbc", &ProviderContext::default())?;
//! assert_eq!(ctx.name(), "AES-128-CBC");
//! # Ok::<(), dprov_api::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod block;
pub mod keygen;
mod common;

#[cfg(feature = "aead")]
pub mod aead;

pub use block::AesKey;

#[cfg(feature = "aead")]
pub use aead::AesGcm;
#[cfg(feature = "block")]
pub use block::modes::{AesBlockMode, Chaining};
#[cfg(feature = "stream")]
pub use block::modes::AesCtr;

use dprov_api::Result;
use dprov_core::{Registry, RegistryBuilder};

/// Registers every provider enabled at compile time
#[allow(unused_mut)]
pub fn register_all(mut builder: RegistryBuilder) -> Result<RegistryBuilder> {
    #[cfg(feature = "block")]
    for provider in block::modes::cbc::providers() {
        builder = builder.register(provider)?;
    }
    #[cfg(feature = "stream")]
    for provider in block::modes::ctr::providers() {
        builder = builder.register(provider)?;
    }
    #[cfg(feature = "aead")]
    for provider in aead::gcm::providers() {
        builder = builder.register(provider)?;
    }
    Ok(builder)
}

/// A registry holding every enabled reference provider
pub fn registry() -> Result<Registry> {
    Ok(register_all(Registry::builder())?.build())
}
