//! Helpers for mapping logical byte offsets onto logical blocks.

/// `locate_byte` splits a logical byte offset into its block and in-block offset.
///
/// # Arguments
/// * `byte_offset` - Logical byte offset.
/// * `block_size` - Array block size in bytes.
///
/// # Returns
/// A tuple of `(logical_block, intra_offset)`.
#[must_use]
pub fn locate_byte(byte_offset: u64, block_size: usize) -> (u64, usize) {
    let bs = block_size as u64;
    // The remainder is below `block_size`.
    (byte_offset / bs, (byte_offset % bs) as usize)
}

/// `window_fits` reports whether `len` bytes starting at `intra_offset` fit
/// inside a two-block read window.
#[must_use]
pub fn window_fits(intra_offset: usize, len: usize, block_size: usize) -> bool {
    intra_offset
        .checked_add(len)
        .is_some_and(|end| end <= block_size.saturating_mul(2))
}
