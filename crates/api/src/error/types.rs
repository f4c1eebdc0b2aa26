//! Error type definitions for the provider contract

use thiserror::Error as ThisError;

/// Errors returned by every provider, context and registry operation
///
/// All errors are reported synchronously to the immediate caller. Any failure
/// from `finalize` or `cipher` means the whole operation's output must be
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Context or duplicate creation could not reserve memory
    #[error("allocation failed: {context}")]
    AllocationError {
        context: &'static str,
    },

    /// Key length does not match the algorithm
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        expected: usize,
        actual: usize,
    },

    /// IV length does not match the algorithm or the configured `ivlen`
    #[error("invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength {
        expected: usize,
        actual: usize,
    },

    /// Destination capacity is insufficient; nothing was written
    #[error("output buffer too small: {required} bytes required, {available} available")]
    BufferTooSmall {
        required: usize,
        available: usize,
    },

    /// Decrypt-side padding validation failed
    #[error("bad decrypt: invalid padding")]
    InvalidPadding,

    /// Parameter name unknown to the schema it was checked against
    #[error("unsupported parameter: {name}")]
    UnsupportedParameter {
        name: String,
    },

    /// Output and input regions overlap without sharing a start offset
    #[error("input and output buffers partially overlap")]
    PartialOverlap,

    /// AEAD authentication failed
    #[error("AEAD tag mismatch")]
    AeadTagMismatch,

    /// Known parameter with a wrong type tag, size or value
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: &'static str,
    },

    /// Length error outside key/IV/capacity checks
    #[error("{context}: invalid length (expected {expected}, got {actual})")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Operation not valid in the context's current state
    #[error("{operation} not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Capability not implemented by the algorithm
    #[error("{operation} is not supported by this algorithm")]
    Unsupported {
        operation: &'static str,
    },

    /// Caller contract violation other than buffer aliasing
    #[error("{context}: {reason}")]
    Protocol {
        context: &'static str,
        reason: &'static str,
    },

    /// Algorithm descriptor rejected by the registry
    #[error("cannot register '{name}': {reason}")]
    Registration {
        name: String,
        reason: &'static str,
    },

    /// No algorithm registered under that name
    #[error("algorithm not found: {name}")]
    AlgorithmNotFound {
        name: String,
    },

    /// The system random source failed
    #[error("random generation failed: {context}")]
    RandomGeneration {
        context: &'static str,
    },
}

/// Result type for provider contract operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Shorthand to create an `UnsupportedParameter` error
    pub fn unsupported_param(name: impl Into<String>) -> Self {
        Error::UnsupportedParameter { name: name.into() }
    }

    /// Shorthand to create an `InvalidParameter` error
    pub fn invalid_param(name: impl Into<String>, reason: &'static str) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason,
        }
    }

    /// Shorthand to create a `Protocol` error
    pub fn protocol(context: &'static str, reason: &'static str) -> Self {
        Error::Protocol { context, reason }
    }

    /// True for the errors that signal a failed integrity check
    ///
    /// Engines use this to decide that output must be discarded and that the
    /// failure must not be reported with more detail to a remote peer.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Error::InvalidPadding | Error::AeadTagMismatch)
    }
}
