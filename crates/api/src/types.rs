//! Core value types of the provider contract

use core::fmt;

/// Direction a context was initialized for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    /// True for [`Direction::Encrypt`]
    pub fn is_encrypt(self) -> bool {
        matches!(self, Direction::Encrypt)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Cipher mode identifiers reported through the `mode` parameter
///
/// The numeric values are part of the wire contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CipherMode {
    Stream = 0x0,
    Ecb = 0x1,
    Cbc = 0x2,
    Cfb = 0x3,
    Ofb = 0x4,
    Ctr = 0x5,
    Gcm = 0x6,
    Ccm = 0x7,
}

impl CipherMode {
    /// Numeric identifier used on the wire
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Looks a mode up by its numeric identifier
    pub fn from_id(id: u64) -> Option<Self> {
        let mode = match id {
            0x0 => CipherMode::Stream,
            0x1 => CipherMode::Ecb,
            0x2 => CipherMode::Cbc,
            0x3 => CipherMode::Cfb,
            0x4 => CipherMode::Ofb,
            0x5 => CipherMode::Ctr,
            0x6 => CipherMode::Gcm,
            0x7 => CipherMode::Ccm,
            _ => return None,
        };
        Some(mode)
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CipherMode::Stream => "STREAM",
            CipherMode::Ecb => "ECB",
            CipherMode::Cbc => "CBC",
            CipherMode::Cfb => "CFB",
            CipherMode::Ofb => "OFB",
            CipherMode::Ctr => "CTR",
            CipherMode::Gcm => "GCM",
            CipherMode::Ccm => "CCM",
        };
        f.write_str(name)
    }
}

bitflags::bitflags! {
    /// Algorithm behavior bits reported through the `flags` parameter
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AlgorithmFlags: u64 {
        /// Authenticated encryption with an integrity tag
        const AEAD = 1 << 0;
        /// IV length may be changed through `ivlen`
        const CUSTOM_IV = 1 << 1;
        /// Key length may be changed through `keylen`
        const VARIABLE_KEY_LENGTH = 1 << 2;
        /// `randkey` produces fresh key material
        const RAND_KEY = 1 << 3;
        /// `tlsivfixed` / `tlsaad` switch the context to TLS record mode
        const TLS_RECORD = 1 << 4;
    }
}

/// Static shape of an algorithm, reported through `get_params`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherShape {
    pub mode: CipherMode,
    pub key_len: usize,
    pub iv_len: usize,
    pub block_size: usize,
    pub flags: AlgorithmFlags,
}
