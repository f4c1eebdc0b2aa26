//! Input/output buffer arrangements accepted by streaming and raw calls
//!
//! Output may be a separate buffer or the input buffer itself (full overlap).
//! A partial overlap is a caller contract violation; [`InOut::within`] is the
//! place where it is detected when both regions live in one buffer.

use core::ops::Range;

use crate::error::{Error, Result};
use dprov_internal::overlap::is_partially_overlapping;

/// Input and output regions of one call
pub enum InOut<'a> {
    /// Disjoint buffers; `output.len()` is the capacity
    Split { input: &'a [u8], output: &'a mut [u8] },
    /// Input is `buf[..len]`, output is written from `buf[0]`;
    /// `buf.len()` is the capacity
    InPlace { buf: &'a mut [u8], len: usize },
}

impl<'a> InOut<'a> {
    /// Separate input and output buffers
    pub fn split(input: &'a [u8], output: &'a mut [u8]) -> Self {
        InOut::Split { input, output }
    }

    /// Input `buf[..len]` is transformed in place
    pub fn in_place(buf: &'a mut [u8], len: usize) -> Result<Self> {
        if len > buf.len() {
            return Err(Error::InvalidLength {
                context: "in-place input",
                expected: buf.len(),
                actual: len,
            });
        }
        Ok(InOut::InPlace { buf, len })
    }

    /// Input and output given as ranges of a single buffer.
    ///
    /// Equal starts select in-place processing over `output`, which must cover
    /// `input`. Disjoint ranges are split. Any other intersection fails with
    /// [`Error::PartialOverlap`].
    pub fn within(buf: &'a mut [u8], input: Range<usize>, output: Range<usize>) -> Result<Self> {
        check_range(&input, buf.len(), "input range")?;
        check_range(&output, buf.len(), "output range")?;

        if is_partially_overlapping(&input, &output) {
            return Err(Error::PartialOverlap);
        }

        if input.start == output.start {
            if input.end > output.end {
                return Err(Error::InvalidLength {
                    context: "in-place output range",
                    expected: input.end,
                    actual: output.end,
                });
            }
            let len = input.len();
            return Ok(InOut::InPlace {
                buf: &mut buf[output],
                len,
            });
        }

        if input.end <= output.start {
            let (head, tail) = buf.split_at_mut(output.start);
            Ok(InOut::Split {
                input: &head[input],
                output: &mut tail[..output.len()],
            })
        } else if output.end <= input.start {
            let (head, tail) = buf.split_at_mut(input.start);
            Ok(InOut::Split {
                input: &tail[..input.len()],
                output: &mut head[output],
            })
        } else if input.is_empty() {
            Ok(InOut::Split {
                input: &[],
                output: &mut buf[output],
            })
        } else {
            // Only an empty output can sit inside the input without overlapping it
            Ok(InOut::Split {
                input: &buf[input],
                output: &mut [],
            })
        }
    }

    /// Number of input bytes
    pub fn input_len(&self) -> usize {
        match self {
            InOut::Split { input, .. } => input.len(),
            InOut::InPlace { len, .. } => *len,
        }
    }

    /// Bytes that may be written
    pub fn output_capacity(&self) -> usize {
        match self {
            InOut::Split { output, .. } => output.len(),
            InOut::InPlace { buf, .. } => buf.len(),
        }
    }

    pub fn is_in_place(&self) -> bool {
        matches!(self, InOut::InPlace { .. })
    }

    /// Copies the first `len` input bytes to the front of the output, so that
    /// `output_mut()[..len]` can then be transformed in place.
    pub fn stage(&mut self, len: usize) -> Result<&mut [u8]> {
        crate::error::validate::capacity(len, self.output_capacity())?;
        match self {
            InOut::Split { input, output } => {
                output[..len].copy_from_slice(&input[..len]);
                Ok(&mut output[..len])
            }
            InOut::InPlace { buf, .. } => Ok(&mut buf[..len]),
        }
    }
}

fn check_range(range: &Range<usize>, len: usize, context: &'static str) -> Result<()> {
    if range.start > range.end || range.end > len {
        return Err(Error::InvalidLength {
            context,
            expected: len,
            actual: range.end,
        });
    }
    Ok(())
}
