//! # dprov
//!
//! The contract between a generic cryptographic engine and pluggable cipher
//! providers, together with reference AES providers.
//!
//! ## Features
//!
//! - `block` (default): AES-128/192/256 in ECB and CBC mode
//! - `stream` (default): AES-128/192/256 in CTR mode
//! - `aead` (default): AES-128/256-GCM with TLS record mode
//! - `full`: All features enabled
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`dprov-api`]: The provider contract: traits, parameters, errors
//! - [`dprov-core`]: Engine side: context handle, registry, block buffering
//! - [`dprov-algorithms`]: Reference providers
//!
//! ```
//! use dprov::prelude::*;
//!
//! let registry = dprov::default_registry()?;
//! let mut ctx = registry.new_ctx("AES-128-CTR", &ProviderContext::default())?;
//! ctx.encrypt_init(Some(&[0u8; 16]), Some(&[0u8; 16]), &[])?;
//!
//! let mut out = [0u8; 5];
//! let n = ctx.update(InOut::split(b"hello", &mut out))?;
//! assert_eq!(n, 5);
//! # Ok::<(), dprov::api::Error>(())
//! ```

#![forbid(unsafe_code)]

use once_cell::sync::Lazy;

// Core re-exports (always available)
pub use dprov_algorithms as algorithms;
pub use dprov_api as api;
pub use dprov_core as engine;
pub use dprov_internal as internal;
pub use dprov_params as params;

use dprov_api::Result;
use dprov_core::Registry;

static DEFAULT_REGISTRY: Lazy<Result<Registry>> = Lazy::new(|| {
    let registry = dprov_algorithms::registry();
    match &registry {
        Ok(registry) => tracing::debug!(algorithms = registry.len(), "default registry ready"),
        Err(err) => tracing::error!(error = %err, "default registry could not be built"),
    }
    registry
});

/// Process-wide registry of every reference provider enabled at compile time.
///
/// Built on first use. Engines that bring their own providers should build
/// a [`Registry`] instead.
pub fn default_registry() -> Result<&'static Registry> {
    DEFAULT_REGISTRY.as_ref().map_err(Clone::clone)
}

/// Common imports for dprov users
pub mod prelude {
    // Re-export error types
    pub use crate::api::{Error, Result};

    // Re-export the provider contract
    pub use crate::api::{
        CipherProvider, Direction, InOut, Param, ParamRequest, ProviderCipherContext,
        UnknownParamPolicy,
    };

    // Re-export the engine side
    pub use crate::engine::{CipherContext, ProviderContext, Registry, StreamState};

    // Parameter names
    pub use crate::params::names;
}
