//! Validation utilities shared by providers and the engine-side handle

use super::{Error, Result};

/// Validate a parameter condition
#[inline(always)]
pub fn parameter(condition: bool, name: &str, reason: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::invalid_param(name, reason));
    }
    Ok(())
}

/// Validate that a length is a whole number of blocks
#[inline(always)]
pub fn block_multiple(context: &'static str, actual: usize, block_size: usize) -> Result<()> {
    if block_size > 1 && actual % block_size != 0 {
        return Err(Error::InvalidLength {
            context,
            expected: actual - actual % block_size,
            actual,
        });
    }
    Ok(())
}

/// Validate a key length
#[inline(always)]
pub fn key_length(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::InvalidKeyLength { expected, actual });
    }
    Ok(())
}

/// Validate an IV length
#[inline(always)]
pub fn iv_length(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::InvalidIvLength { expected, actual });
    }
    Ok(())
}

/// Validate that a destination can hold `required` bytes
#[inline(always)]
pub fn capacity(required: usize, available: usize) -> Result<()> {
    if available < required {
        return Err(Error::BufferTooSmall {
            required,
            available,
        });
    }
    Ok(())
}
