//! AES block function
//!
//! The FIPS 197 block function itself comes from the `aes` crate; this module
//! selects the key size at runtime, which is what providers need since their
//! key length is a parameter rather than a type.

use ::aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use ::aes::{Aes128, Aes192, Aes256, Block};

use dprov_api::error::{validate, Error, Result};
use dprov_params::symmetric::{AES128_KEY_SIZE, AES192_KEY_SIZE, AES256_KEY_SIZE, AES_BLOCK_SIZE};

/// Expanded AES key of any standard size.
///
/// The `aes` key schedules zeroize themselves on drop.
#[derive(Clone)]
pub enum AesKey {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesKey {
    /// Expands `key`, which must be exactly `expected` bytes
    pub fn new(key: &[u8], expected: usize) -> Result<Self> {
        validate::key_length(key.len(), expected)?;
        let invalid = || Error::InvalidKeyLength {
            expected,
            actual: key.len(),
        };
        let expanded = match expected {
            AES128_KEY_SIZE => AesKey::Aes128(Aes128::new_from_slice(key).map_err(|_| invalid())?),
            AES192_KEY_SIZE => AesKey::Aes192(Aes192::new_from_slice(key).map_err(|_| invalid())?),
            AES256_KEY_SIZE => AesKey::Aes256(Aes256::new_from_slice(key).map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };
        Ok(expanded)
    }

    /// Encrypts one 16-byte block in place
    #[inline]
    pub fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), AES_BLOCK_SIZE);
        let block = Block::from_mut_slice(block);
        match self {
            AesKey::Aes128(k) => k.encrypt_block(block),
            AesKey::Aes192(k) => k.encrypt_block(block),
            AesKey::Aes256(k) => k.encrypt_block(block),
        }
    }

    /// Decrypts one 16-byte block in place
    #[inline]
    pub fn decrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), AES_BLOCK_SIZE);
        let block = Block::from_mut_slice(block);
        match self {
            AesKey::Aes128(k) => k.decrypt_block(block),
            AesKey::Aes192(k) => k.decrypt_block(block),
            AesKey::Aes256(k) => k.decrypt_block(block),
        }
    }
}
