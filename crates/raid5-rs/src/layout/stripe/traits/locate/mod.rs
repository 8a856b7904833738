//! Address translation from the logical data space onto member disks.


/// Location is where a logical block lives inside the array.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    /// Physical block offset shared by every member of the stripe.
    pub stripe_index: u64,
    /// Member holding parity for this stripe.
    pub parity_disk: usize,
    /// Member holding the requested data block.
    pub target_disk: usize,
}

/// Locate maps logical data blocks onto (stripe, member) pairs.
pub trait Locate {
    /// DISKS returns the number of members in the layout, parity included.
    fn disks(&self) -> usize;

    /// data_disks returns how many members carry data in each stripe.
    fn data_disks(&self) -> usize {
        self.disks() - 1
    }

    /// locate resolves a logical block number.
    ///
    /// # Arguments
    /// * `logical_block` - 0-based index over the data address space.
    fn locate(&self, logical_block: u64) -> Location;
}
