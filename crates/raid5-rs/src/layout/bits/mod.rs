//! Byte-wise XOR helpers for block-sized buffers.

#[cfg(test)]
mod bits_tests;

#[inline]
/// `xor_in_place` XORs `rhs` into `dst`, byte by byte.
///
/// # Arguments
/// * `dst` - The buffer accumulating the result.
/// * `rhs` - The buffer to fold in. Must be the same length as `dst`.
///
/// # Panics
/// Panics if the two buffers differ in length.
pub fn xor_in_place(dst: &mut [u8], rhs: &[u8]) {
    assert_eq!(
        dst.len(),
        rhs.len(),
        "XOR operands must be {} bytes.",
        dst.len()
    );
    for (a, b) in dst.iter_mut().zip(rhs) {
        *a ^= *b;
    }
}

/// `xor_fold` overwrites `out` with the XOR of every buffer in `sources`.
///
/// An empty `sources` leaves `out` zeroed.
pub fn xor_fold<'a, I>(out: &mut [u8], sources: I)
where
    I: IntoIterator<Item = &'a [u8]>,
{
    out.fill(0);
    for src in sources {
        xor_in_place(out, src);
    }
}

#[inline]
#[must_use]
/// `is_zero` reports whether every byte of `buf` is zero.
pub fn is_zero(buf: &[u8]) -> bool {
    buf.iter().all(|&b| b == 0)
}
