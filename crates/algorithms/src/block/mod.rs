//! AES and its block-oriented modes

pub mod aes;

#[cfg(any(feature = "block", feature = "stream"))]
pub mod modes;

pub use self::aes::AesKey;
