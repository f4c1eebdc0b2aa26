// File: crates/api/src/traits/context.rs

//! Per-operation cipher context as seen by the engine

use crate::error::{Error, Result};
use crate::inout::InOut;
use crate::params::{Param, ParamRequest};

/// State of one cipher operation, created by [`CipherProvider::new_ctx`].
///
/// Every method has a default body reporting [`Error::Unsupported`], so a
/// provider only implements the functions it lists in
/// [`CipherProvider::functions`]. The engine-side handle checks capabilities
/// and the streaming state machine before calling in, so implementations may
/// assume calls arrive in a valid order with validated parameter sets.
///
/// # Security Requirements
/// - Key material, IVs, pending plaintext and tags must be zeroized on drop.
/// - Tag and padding checks must run in constant time.
/// - No output byte may be written before capacity has been checked.
///
/// [`CipherProvider::new_ctx`]: super::CipherProvider::new_ctx
/// [`CipherProvider::functions`]: super::CipherProvider::functions
pub trait ProviderCipherContext: Send {
    /// Keys the context for encryption. `None` keeps the current key or IV.
    fn encrypt_init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        let _ = (key, iv);
        Err(Error::Unsupported { operation: "encrypt_init" })
    }

    /// Keys the context for decryption. `None` keeps the current key or IV.
    fn decrypt_init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        let _ = (key, iv);
        Err(Error::Unsupported { operation: "decrypt_init" })
    }

    /// Processes a chunk and returns the number of bytes written.
    ///
    /// Output may lag input by up to one block; the lag is flushed by
    /// [`finalize`](Self::finalize).
    fn update(&mut self, data: InOut<'_>) -> Result<usize> {
        let _ = data;
        Err(Error::Unsupported { operation: "update" })
    }

    /// Feeds additional authenticated data ahead of the payload
    fn update_aad(&mut self, aad: &[u8]) -> Result<()> {
        let _ = aad;
        Err(Error::Unsupported { operation: "update_aad" })
    }

    /// Completes the operation, writing any remaining output to `out`.
    ///
    /// On [`Error::BufferTooSmall`] the context must be left unchanged so the
    /// call can be retried with a larger buffer.
    fn finalize(&mut self, out: &mut [u8]) -> Result<usize> {
        let _ = out;
        Err(Error::Unsupported { operation: "final" })
    }

    /// Single-shot processing without padding or buffering
    fn cipher(&mut self, data: InOut<'_>) -> Result<usize> {
        let _ = data;
        Err(Error::Unsupported { operation: "cipher" })
    }

    fn get_ctx_params<'a>(&'a self, requests: &mut [ParamRequest<'a>]) -> Result<()> {
        let _ = requests;
        Err(Error::Unsupported { operation: "get_ctx_params" })
    }

    /// Applies entries in order. The set has already been checked against
    /// the settable schema.
    fn set_ctx_params(&mut self, params: &[Param<'_>]) -> Result<()> {
        let _ = params;
        Err(Error::Unsupported { operation: "set_ctx_params" })
    }

    /// Deep copy of every piece of mutable state
    fn duplicate(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Err(Error::Unsupported { operation: "dupctx" })
    }
}
