//! Random key generation for the `randkey` parameter

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use dprov_api::error::{Error, Result};
use dprov_api::ParamRequest;

/// Fills `buf` from the operating system CSPRNG
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(buf).map_err(|_| Error::RandomGeneration {
        context: "operating system random source",
    })
}

/// Answers a `randkey` request with `key_len` fresh bytes.
///
/// Key material is only ever copied into caller storage, never lent.
pub fn answer_random_key(request: &mut ParamRequest<'_>, key_len: usize) -> Result<()> {
    let mut key = Zeroizing::new(vec![0u8; key_len]);
    fill_random(&mut key)?;
    request.set_octets(&key)
}
