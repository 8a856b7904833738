use crate::layout::bits::xor_fold;
use crate::layout::stripe::raid5::RAID5;
use crate::layout::stripe::traits::restore::Restore;

impl Restore for RAID5 {
    fn restore(&self, members: &mut [Vec<u8>], missing: usize) {
        assert_eq!(
            members.len(),
            self.disks,
            "RAID5 expects {} member buffers.",
            self.disks
        );

        let mut out = std::mem::take(&mut members[missing]);
        xor_fold(
            &mut out,
            members
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != missing)
                .map(|(_, m)| m.as_slice()),
        );
        members[missing] = out;
    }
}
