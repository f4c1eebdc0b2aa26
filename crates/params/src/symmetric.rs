//! Constants for the reference symmetric algorithms

/// AES-128 key size in bytes
pub const AES128_KEY_SIZE: usize = 16;

/// AES-192 key size in bytes
pub const AES192_KEY_SIZE: usize = 24;

/// AES-256 key size in bytes
pub const AES256_KEY_SIZE: usize = 32;

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// CBC and CTR IV size in bytes
pub const AES_IV_SIZE: usize = 16;

/// Default GCM nonce size in bytes
pub const GCM_DEFAULT_IV_SIZE: usize = 12;

/// Largest GCM nonce accepted through the `ivlen` parameter
pub const GCM_MAX_IV_SIZE: usize = 128;

/// Full GCM tag size in bytes
pub const GCM_TAG_SIZE: usize = 16;

/// Shortest GCM tag accepted on decrypt
pub const GCM_MIN_TAG_SIZE: usize = 4;

/// Widest unsigned integer parameter, in bytes
pub const MAX_UINT_SIZE: usize = 8;

/// Largest block size the generic block buffer accepts
pub const MAX_BLOCK_SIZE: usize = 32;
