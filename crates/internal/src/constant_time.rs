//! Constant-time operations to prevent timing attacks

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater};

/// Constant-time comparison of two byte slices
///
/// Returns true if the slices are equal, false otherwise. Only the lengths are
/// compared in variable time.
pub fn ct_eq<A, B>(a: A, b: B) -> bool
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    ct_eq_choice(a, b).into()
}

/// Constant-time equality check that returns a Choice (0 or 1)
pub fn ct_eq_choice<A, B>(a: A, b: B) -> Choice
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    let a = a.as_ref();
    let b = b.as_ref();

    if a.len() != b.len() {
        return Choice::from(0);
    }

    a.ct_eq(b)
}

/// Checks PKCS#7 padding on a decrypted final block.
///
/// Every byte of the block is inspected whatever the padding value, so the
/// running time does not depend on the position of the first bad byte.
/// Returns the validity and the unpadded length; the length is only
/// meaningful when the choice is set.
pub fn ct_pkcs7_unpad(block: &[u8]) -> (Choice, usize) {
    let len = block.len();
    if len == 0 || len > u8::MAX as usize {
        return (Choice::from(0), 0);
    }

    let pad = block[len - 1];
    let mut valid = pad.ct_gt(&0) & !pad.ct_gt(&(len as u8));

    for (i, byte) in block.iter().enumerate() {
        // Distance from the end of the block, 1 for the last byte
        let distance = (len - i) as u8;
        let in_padding = !distance.ct_gt(&pad);
        let matches = byte.ct_eq(&pad);
        valid &= !in_padding | matches;
    }

    let unpadded = len as u8 - u8::conditional_select(&0, &pad, valid);
    (valid, unpadded as usize)
}

/// Zeroes `buf` when `condition` is set, in constant time.
pub fn ct_clear_if(buf: &mut [u8], condition: Choice) {
    for byte in buf.iter_mut() {
        byte.conditional_assign(&0, condition);
    }
}
