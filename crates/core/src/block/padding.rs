//! PKCS#7 padding

use dprov_api::error::{validate, Error, Result};
use dprov_internal::constant_time::ct_pkcs7_unpad;

/// Fills `block[filled..]` with PKCS#7 padding.
///
/// `filled` must be smaller than the block, so block-aligned input gets a
/// full block of padding.
pub fn pad(block: &mut [u8], filled: usize) -> Result<()> {
    let block_size = block.len();
    validate::parameter(
        filled < block_size && block_size <= u8::MAX as usize,
        "padding",
        "no room for padding in final block",
    )?;
    let value = (block_size - filled) as u8;
    block[filled..].fill(value);
    Ok(())
}

/// Validates PKCS#7 padding in constant time and returns the unpadded length
pub fn unpad(block: &[u8]) -> Result<usize> {
    let (valid, len) = ct_pkcs7_unpad(block);
    if !bool::from(valid) {
        return Err(Error::InvalidPadding);
    }
    Ok(len)
}
