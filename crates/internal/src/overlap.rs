//! Buffer overlap predicates
//!
//! Used where a caller describes input and output as ranges of one buffer.

use core::ops::Range;

/// Returns true when two byte ranges share at least one position.
pub fn ranges_intersect(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end && !a.is_empty() && !b.is_empty()
}

/// Returns true when two ranges overlap without starting at the same offset.
///
/// Full overlap (same start) is the in-place case and is accepted by every
/// operation; anything else that intersects is a caller contract violation.
pub fn is_partially_overlapping(input: &Range<usize>, output: &Range<usize>) -> bool {
    input.start != output.start && ranges_intersect(input, output)
}
