//! Big-endian counter arithmetic for counter-based modes

/// Increments a big-endian counter of any width, wrapping on overflow.
///
/// Returns `true` when the counter wrapped back to zero.
pub fn increment_be(counter: &mut [u8]) -> bool {
    for byte in counter.iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            return false;
        }
    }
    true
}

/// Increments the low 32 bits of a 16-byte counter block (GCM `inc32`).
pub fn increment_be32(block: &mut [u8; 16]) {
    let mut low = [0u8; 4];
    low.copy_from_slice(&block[12..]);
    let value = u32::from_be_bytes(low).wrapping_add(1);
    block[12..].copy_from_slice(&value.to_be_bytes());
}
