use crate::layout::stripe::raid5::RAID5;
use crate::layout::stripe::traits::locate::{Locate, Location};

impl Locate for RAID5 {
    fn disks(&self) -> usize {
        self.disks
    }

    fn locate(&self, logical_block: u64) -> Location {
        let data = self.data_disks() as u64;
        let stripe_index = logical_block / data;
        let parity_disk = self.parity_disk(stripe_index);
        let slot = (logical_block % data) as usize;
        let target_disk = if slot < parity_disk { slot } else { slot + 1 };

        Location {
            stripe_index,
            parity_disk,
            target_disk,
        }
    }
}
