use super::*;
use rand::RngCore;

#[test]
fn xor_in_place_flips_only_set_bits() {
    let mut a = [0b1010_1010u8, 0x00, 0xFF];
    xor_in_place(&mut a, &[0b1111_0000, 0x0F, 0xFF]);
    assert_eq!(a, [0b0101_1010, 0x0F, 0x00]);
}

#[test]
fn xor_with_self_is_zero() {
    let mut data = vec![0u8; 257];
    rand::rng().fill_bytes(&mut data);
    let copy = data.clone();

    xor_in_place(&mut data, &copy);
    assert!(is_zero(&data));
}

#[test]
fn xor_fold_of_nothing_is_zero() {
    let mut out = [0xAAu8; 8];
    xor_fold(&mut out, std::iter::empty());
    assert!(is_zero(&out));
}

#[test]
fn xor_fold_ignores_previous_output_contents() {
    let a = [1u8, 2, 3, 4];
    let b = [5u8, 6, 7, 8];
    let mut out = [0xFFu8; 4];

    xor_fold(&mut out, [&a[..], &b[..]]);
    assert_eq!(out, [1 ^ 5, 2 ^ 6, 3 ^ 7, 4 ^ 8]);
}

#[test]
fn fold_is_order_independent() {
    let mut rng = rand::rng();
    let mut blocks = vec![vec![0u8; 64]; 5];
    for b in &mut blocks {
        rng.fill_bytes(b);
    }

    let mut forward = vec![0u8; 64];
    xor_fold(&mut forward, blocks.iter().map(Vec::as_slice));
    let mut backward = vec![0u8; 64];
    xor_fold(&mut backward, blocks.iter().rev().map(Vec::as_slice));

    assert_eq!(forward, backward);
}

#[test]
#[should_panic(expected = "XOR operands must be 2 bytes.")]
fn xor_in_place_panics_on_length_mismatch() {
    let mut a = [0u8; 2];
    xor_in_place(&mut a, &[0u8; 3]);
}
