//! TLS record layout constants (RFC 5288 AES-GCM cipher suites)

/// Length of the TLS additional authenticated data
pub const TLS_AAD_LEN: usize = 13;

/// Fixed (implicit) part of the nonce, taken from the key block
pub const TLS_FIXED_IV_LEN: usize = 4;

/// Explicit part of the nonce, carried at the front of every record
pub const TLS_EXPLICIT_IV_LEN: usize = 8;

/// Tag carried at the end of every record
pub const TLS_TAG_LEN: usize = 16;

/// Offset of the big-endian record length inside the AAD
pub const TLS_AAD_LENGTH_OFFSET: usize = TLS_AAD_LEN - 2;
