//! Plumbing shared by the reference providers

use dprov_api::dispatch::FunctionId::{self, *};
use dprov_api::error::{Error, Result};
use dprov_api::Param;

#[cfg(any(feature = "block", feature = "stream"))]
/// Dispatch table of a streaming cipher with raw mode and full parameter
/// negotiation
pub(crate) const CIPHER_FUNCTIONS: &[FunctionId] = &[
    NewCtx,
    FreeCtx,
    DupCtx,
    EncryptInit,
    DecryptInit,
    Update,
    Final,
    Cipher,
    GetParams,
    GettableParams,
    GetCtxParams,
    GettableCtxParams,
    SetCtxParams,
    SettableCtxParams,
];

#[cfg(feature = "aead")]
/// Streaming cipher functions plus AAD streaming
pub(crate) const AEAD_FUNCTIONS: &[FunctionId] = &[
    NewCtx,
    FreeCtx,
    DupCtx,
    EncryptInit,
    DecryptInit,
    Update,
    UpdateAad,
    Final,
    Cipher,
    GetParams,
    GettableParams,
    GetCtxParams,
    GettableCtxParams,
    SetCtxParams,
    SettableCtxParams,
];

/// `keylen` for algorithms with a single key size: only that size is accepted
pub(crate) fn check_key_len(param: &Param<'_>, key_len: usize) -> Result<()> {
    let requested = param.as_usize()?;
    if requested != key_len {
        return Err(Error::InvalidKeyLength {
            expected: key_len,
            actual: requested,
        });
    }
    Ok(())
}

#[cfg(any(feature = "block", feature = "stream"))]
/// `ivlen` for algorithms with a single IV size
pub(crate) fn check_iv_len(param: &Param<'_>, iv_len: usize) -> Result<()> {
    let requested = param.as_usize()?;
    if requested != iv_len {
        return Err(Error::InvalidIvLength {
            expected: iv_len,
            actual: requested,
        });
    }
    Ok(())
}
