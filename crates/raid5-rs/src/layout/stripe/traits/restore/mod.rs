//! Restoration helpers for rebuilding an absent stripe member.

/// Restore rebuilds one member of a stripe from the others.
pub trait Restore {
    /// restore overwrites `members[missing]` with content derived from every other member.
    ///
    /// # Arguments
    /// * `members` - One block-sized buffer per disk, already filled for every present member.
    /// * `missing` - The disk index to rebuild.
    fn restore(&self, members: &mut [Vec<u8>], missing: usize);
}
