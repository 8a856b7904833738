//! RAID-5 with parity rotating one member per stripe.
//!
//! Stripe `s` keeps parity on disk `s mod N`. Data fills the remaining
//! members in ascending disk order, skipping the parity slot:
//!
//! ```text
//!            disk0  disk1  disk2  disk3
//! stripe 0:    P      0      1      2
//! stripe 1:    3      P      4      5
//! stripe 2:    6      7      P      8
//! stripe 3:    9     10     11      P
//! stripe 4:    P     12     13     14
//! ```
//!
//! This is the layout of the arrays being recovered, not the left/right
//! symmetric variants used by Linux md. Data already on disk depends on it,
//! so it must not change.

mod locate_impl;
mod restore_impl;

#[cfg(test)]
mod raid5_tests;

/// RAID5 describes an `N`-member array with one rotating parity block per stripe.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RAID5 {
    disks: usize,
}

impl RAID5 {
    /// MIN_DISKS is the smallest array with one data and one parity member.
    pub const MIN_DISKS: usize = 2;

    /// `new` builds the layout for `disks` members.
    ///
    /// # Panics
    /// Panics if `disks` is below [`Self::MIN_DISKS`].
    #[must_use]
    pub fn new(disks: usize) -> Self {
        assert!(
            disks >= Self::MIN_DISKS,
            "RAID5 needs at least {} disks.",
            Self::MIN_DISKS
        );
        Self { disks }
    }

    /// `parity_disk` returns the member holding parity for `stripe_index`.
    #[must_use]
    pub fn parity_disk(&self, stripe_index: u64) -> usize {
        // Always below `disks`, which came from a usize.
        (stripe_index % self.disks as u64) as usize
    }
}
