//! Block buffering shared by block-mode providers
//!
//! Providers plug their block function into [`BlockBuffer`] through the
//! [`BlockTransform`] trait and get chunk-size independent streaming, in-place
//! processing, PKCS#7 padding and a retryable final for free.

mod buffer;
pub mod padding;

pub use buffer::BlockBuffer;

/// A block function with its chaining state
pub trait BlockTransform {
    /// Processes `blocks` in place, in order. `blocks.len()` is always a
    /// multiple of the block size.
    fn process_blocks(&mut self, blocks: &mut [u8]);
}
