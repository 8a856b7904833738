//! Retention layer primitives for disks, arrays, caches, and the logical volume.

pub mod array;
pub mod cache;
pub mod disk;
pub mod volume;

#[cfg(test)]
pub(crate) mod test_utils {
    use std::num::NonZeroUsize;
    use std::path::Path;

    use rand::RngCore;

    use crate::layout::bits::xor_in_place;
    use crate::layout::stripe::raid5::RAID5;
    use crate::layout::stripe::traits::locate::Locate;

    use super::array::Array;
    use super::disk::DiskSpec;

    /// `striped_images` lays random logical data out over `disks` member images.
    ///
    /// # Returns
    /// `(images, logical)`: per-disk contents with parity filled in, and the
    /// logical data they encode.
    pub fn striped_images(disks: usize, block_size: usize, stripes: u64) -> (Vec<Vec<u8>>, Vec<u8>) {
        let layout = RAID5::new(disks);
        let stripe_len = usize::try_from(stripes).expect("stripes fit in usize");
        let mut logical = vec![0u8; stripe_len * layout.data_disks() * block_size];
        rand::rng().fill_bytes(&mut logical);

        let mut images = vec![vec![0u8; stripe_len * block_size]; disks];
        for (b, chunk) in logical.chunks(block_size).enumerate() {
            let loc = layout.locate(b as u64);
            let off = usize::try_from(loc.stripe_index).expect("stripe fits") * block_size;
            images[loc.target_disk][off..off + block_size].copy_from_slice(chunk);
        }

        for s in 0..stripe_len {
            let parity = layout.parity_disk(s as u64);
            let range = s * block_size..(s + 1) * block_size;
            let mut p = vec![0u8; block_size];
            for (i, img) in images.iter().enumerate() {
                if i != parity {
                    xor_in_place(&mut p, &img[range.clone()]);
                }
            }
            images[parity][range].copy_from_slice(&p);
        }

        (images, logical)
    }

    /// `write_array` stores `images` under `dir` and opens them, marking `missing` absent.
    pub fn write_array(dir: &Path, images: &[Vec<u8>], missing: Option<usize>, block_size: usize) -> Array {
        let specs: Vec<DiskSpec> = images
            .iter()
            .enumerate()
            .map(|(i, img)| {
                if Some(i) == missing {
                    return DiskSpec::Missing;
                }
                let path = dir.join(format!("disk-{i}.img"));
                std::fs::write(&path, img).expect("write disk image");
                DiskSpec::Path(path)
            })
            .collect();

        Array::open(&specs, NonZeroUsize::new(block_size).expect("non-zero block size"))
            .expect("open array")
    }
}
