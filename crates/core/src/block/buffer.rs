//! Partial-block buffering

use zeroize::{Zeroize, Zeroizing};

use super::{padding, BlockTransform};
use dprov_api::error::{validate, Error, Result};
use dprov_api::InOut;
use dprov_params::symmetric::MAX_BLOCK_SIZE;

/// Buffer for the bytes of an incomplete block between `update` calls.
///
/// At most one block is held. A decrypting buffer with padding enabled keeps
/// back the last full block until [`finalize`](Self::finalize), since only
/// then is it known to carry the padding.
pub struct BlockBuffer {
    block_size: usize,
    pending: Zeroizing<Vec<u8>>,
    padding: bool,
    decrypting: bool,
    /// `pending` holds the decrypted final block of a final that ran out of
    /// output space
    final_plain: bool,
}

impl BlockBuffer {
    /// Creates a buffer for `block_size`-byte blocks, padding enabled.
    ///
    /// The pending storage is reserved up front so later updates never
    /// allocate.
    pub fn new(block_size: usize) -> Result<Self> {
        validate::parameter(
            (1..=MAX_BLOCK_SIZE).contains(&block_size),
            "blocksize",
            "unsupported block size",
        )?;
        Ok(Self {
            block_size,
            pending: reserve(block_size)?,
            padding: true,
            decrypting: false,
            final_plain: false,
        })
    }

    /// Deep copy with fallible allocation
    pub fn try_clone(&self) -> Result<Self> {
        let mut pending = reserve(self.block_size)?;
        pending.extend_from_slice(&self.pending);
        Ok(Self {
            block_size: self.block_size,
            pending,
            padding: self.padding,
            decrypting: self.decrypting,
            final_plain: self.final_plain,
        })
    }

    /// Drops pending bytes and sets the direction for the next operation
    pub fn reset(&mut self, decrypting: bool) {
        self.pending.zeroize();
        self.decrypting = decrypting;
        self.final_plain = false;
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn padding(&self) -> bool {
        self.padding
    }

    pub fn set_padding(&mut self, enabled: bool) {
        self.padding = enabled;
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn hold_back(&self) -> bool {
        self.decrypting && self.padding
    }

    /// Number of bytes an `update` with `input_len` bytes of input writes
    pub fn output_len(&self, input_len: usize) -> usize {
        let total = self.pending.len() + input_len;
        let tail = total % self.block_size;
        if self.hold_back() && tail == 0 {
            total.saturating_sub(self.block_size)
        } else {
            total - tail
        }
    }

    /// Feeds a chunk, transforming every block that is complete and not held
    /// back. Capacity is checked before anything is written.
    pub fn update<T>(&mut self, transform: &mut T, data: InOut<'_>) -> Result<usize>
    where
        T: BlockTransform + ?Sized,
    {
        if self.final_plain {
            return Err(Error::protocol("update", "final already consumed the last block"));
        }

        let held = self.pending.len();
        let written = self.output_len(data.input_len());
        validate::capacity(written, data.output_capacity())?;

        match data {
            InOut::Split { input, output } => {
                if written == 0 {
                    self.pending.extend_from_slice(input);
                    return Ok(0);
                }
                // written >= held: a full block is always larger than what is pending
                let (head, tail) = input.split_at(written - held);
                output[..held].copy_from_slice(&self.pending);
                output[held..written].copy_from_slice(head);
                self.pending.zeroize();
                self.pending.extend_from_slice(tail);
                transform.process_blocks(&mut output[..written]);
            }
            InOut::InPlace { buf, len } => {
                if written == 0 {
                    self.pending.extend_from_slice(&buf[..len]);
                    return Ok(0);
                }
                let mut head = Zeroizing::new([0u8; MAX_BLOCK_SIZE]);
                head[..held].copy_from_slice(&self.pending);
                self.pending.zeroize();
                self.pending.extend_from_slice(&buf[written - held..len]);
                // shift the consumed input right to make room for the pending bytes
                buf.copy_within(0..written - held, held);
                buf[..held].copy_from_slice(&head[..held]);
                transform.process_blocks(&mut buf[..written]);
            }
        }

        Ok(written)
    }

    /// Flushes the pending block into `out`.
    ///
    /// On [`Error::BufferTooSmall`] nothing is written and the call may be
    /// repeated with a larger buffer.
    pub fn finalize<T>(&mut self, transform: &mut T, out: &mut [u8]) -> Result<usize>
    where
        T: BlockTransform + ?Sized,
    {
        let bs = self.block_size;
        let held = self.pending.len();

        if !self.padding {
            if held != 0 {
                return Err(Error::InvalidLength {
                    context: "final block",
                    expected: bs,
                    actual: held,
                });
            }
            return Ok(0);
        }

        if !self.decrypting {
            validate::capacity(bs, out.len())?;
            let block = &mut out[..bs];
            block[..held].copy_from_slice(&self.pending);
            padding::pad(block, held)?;
            transform.process_blocks(block);
            self.pending.zeroize();
            return Ok(bs);
        }

        if !self.final_plain {
            if held != bs {
                return Err(Error::InvalidLength {
                    context: "final block",
                    expected: bs,
                    actual: held,
                });
            }
            transform.process_blocks(&mut self.pending[..]);
            self.final_plain = true;
        }

        let len = match padding::unpad(&self.pending) {
            Ok(len) => len,
            Err(err) => {
                self.pending.zeroize();
                self.final_plain = false;
                return Err(err);
            }
        };
        validate::capacity(len, out.len())?;
        out[..len].copy_from_slice(&self.pending[..len]);
        self.pending.zeroize();
        self.final_plain = false;
        Ok(len)
    }
}

fn reserve(block_size: usize) -> Result<Zeroizing<Vec<u8>>> {
    let mut pending = Vec::new();
    pending
        .try_reserve_exact(block_size)
        .map_err(|_| Error::AllocationError {
            context: "pending block buffer",
        })?;
    Ok(Zeroizing::new(pending))
}
