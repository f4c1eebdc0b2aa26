//! Block cipher modes of operation
//!
//! ECB and CBC run whole blocks through [`BlockBuffer`] and support PKCS#7
//! padding. CTR turns the block function into a keystream and behaves like a
//! stream cipher with a logical block size of one.
//!
//! [`BlockBuffer`]: dprov_core::block::BlockBuffer

#[cfg(feature = "block")]
pub mod cbc;
#[cfg(feature = "stream")]
pub mod ctr;

#[cfg(feature = "block")]
pub use cbc::{AesBlockMode, Chaining};
#[cfg(feature = "stream")]
pub use ctr::AesCtr;
