//! Canonical parameter names
//!
//! Names are matched byte-for-byte. They are the only identifiers an engine
//! needs to know to discover and exercise algorithm-specific knobs.

/// Block padding switch (1 = enabled, 0 = disabled)
pub const PADDING: &str = "padding";

/// Cipher mode identifier
pub const MODE: &str = "mode";

/// Logical block size; 1 for stream-like modes
pub const BLOCK_SIZE: &str = "blocksize";

/// Capability/behavior bitmask
pub const FLAGS: &str = "flags";

/// Key length in bytes
pub const KEYLEN: &str = "keylen";

/// IV length in bytes
pub const IVLEN: &str = "ivlen";

/// Current IV or nonce state
pub const IV: &str = "iv";

/// Block-position counter for stream-like modes
pub const NUM: &str = "num";

/// AEAD authentication tag
pub const TAG: &str = "tag";

/// Configured or default AEAD tag length
pub const TAGLEN: &str = "taglen";

/// TLS additional authenticated data
pub const TLS_AAD: &str = "tlsaad";

/// Bytes appended to a TLS record for the tag
pub const TLS_AAD_PAD: &str = "tlsaadpad";

/// Fixed portion of a TLS explicit IV
pub const TLS_IV_FIXED: &str = "tlsivfixed";

/// MAC key for composite AEAD constructions
pub const MAC_KEY: &str = "mackey";

/// Implementation-generated key material
pub const RANDOM_KEY: &str = "randkey";

/// Encoded algorithm-identifier parameter blob
pub const ALG_ID_PARAM: &str = "alg_id_param";

/// Round count for tunable-round ciphers
pub const ROUNDS: &str = "rounds";

/// Effective key strength in bits
pub const KEYBITS: &str = "keybits";

/// Every canonical name, in table order
pub const ALL: [&str; 18] = [
    PADDING,
    MODE,
    BLOCK_SIZE,
    FLAGS,
    KEYLEN,
    IVLEN,
    IV,
    NUM,
    TAG,
    TAGLEN,
    TLS_AAD,
    TLS_AAD_PAD,
    TLS_IV_FIXED,
    MAC_KEY,
    RANDOM_KEY,
    ALG_ID_PARAM,
    ROUNDS,
    KEYBITS,
];
