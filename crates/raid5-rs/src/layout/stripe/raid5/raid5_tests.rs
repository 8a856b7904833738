use crate::layout::stripe::raid5::RAID5;
use crate::layout::stripe::traits::locate::Locate;

#[test]
fn data_disks_is_n_minus_one() {
    assert_eq!(RAID5::new(4).data_disks(), 3);
    assert_eq!(RAID5::new(2).data_disks(), 1);
}

#[test]
fn parity_rotates_in_ascending_order() {
    let r = RAID5::new(3);
    let parity: Vec<usize> = (0..7).map(|s| r.parity_disk(s)).collect();
    assert_eq!(parity, [0, 1, 2, 0, 1, 2, 0]);
}

#[test]
#[should_panic(expected = "RAID5 needs at least 2 disks.")]
fn new_panics_below_two_disks() {
    let _ = RAID5::new(1);
}
