
use std::fmt::Write;
use std::io::{self, ErrorKind};
use std::num::NonZeroUsize;
use std::time::Instant;

use crate::error::RaidError;
use crate::layout::stripe::raid5::RAID5;
use crate::layout::stripe::traits::locate::{Locate, Location};
use crate::layout::stripe::traits::restore::Restore;
use crate::metrics::{self, BlockOp, BlockSource, DiskOp};
use crate::retention::disk::{Disk, DiskSpec, Member};

/// Array is an immutable RAID-5 member set with at most one absent disk.
///
/// It holds no per-read state; scratch buffers belong to the caller, so one
/// `Array` can be shared by every connection.
#[derive(Debug)]
pub struct Array {
    members: Vec<Member>,
    block_size: usize,
    missing: Option<usize>,
    layout: RAID5,
}

impl Array {
    /// Builds an array from already opened members.
    ///
    /// # Errors
    /// Fails if there are fewer than two members or more than one is absent.
    pub fn new(members: Vec<Member>, block_size: NonZeroUsize) -> Result<Self, RaidError> {
        if members.len() < RAID5::MIN_DISKS {
            return Err(RaidError::TooFewDisks(members.len()));
        }

        let mut missing = None;
        for (i, m) in members.iter().enumerate() {
            if !m.is_absent() {
                continue;
            }
            if let Some(first) = missing {
                return Err(RaidError::MultipleMissing { first, second: i });
            }
            missing = Some(i);
        }

        Ok(Self {
            layout: RAID5::new(members.len()),
            members,
            block_size: block_size.get(),
            missing,
        })
    }

    /// Opens every named backing store, in order, and builds the array.
    ///
    /// # Errors
    /// Fails on the first store that cannot be opened, or if the member set is invalid.
    pub fn open(specs: &[DiskSpec], block_size: NonZeroUsize) -> Result<Self, RaidError> {
        let members = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| match spec {
                DiskSpec::Missing => Ok(Member::Absent),
                DiskSpec::Path(path) => Disk::open(path)
                    .map(Member::Present)
                    .map_err(|source| RaidError::Open {
                        index,
                        path: path.clone(),
                        source,
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(members, block_size)
    }

    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    #[must_use]
    pub fn disks(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub const fn missing(&self) -> Option<usize> {
        self.missing
    }

    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    #[must_use]
    pub const fn layout(&self) -> &RAID5 {
        &self.layout
    }

    #[must_use]
    pub fn locate(&self, logical_block: u64) -> Location {
        self.layout.locate(logical_block)
    }

    /// Number of whole stripes every present member can hold.
    #[must_use]
    pub fn stripes(&self) -> u64 {
        let bs = self.block_size as u64;
        self.members
            .iter()
            .filter_map(Member::disk)
            .map(|d| d.len() / bs)
            .min()
            .unwrap_or(0)
    }

    /// Size of the logical data space in bytes.
    #[must_use]
    pub fn capacity_bytes(&self) -> u64 {
        self.stripes()
            .saturating_mul(self.layout.data_disks() as u64)
            .saturating_mul(self.block_size as u64)
    }

    /// Size announced to clients when none is configured.
    ///
    /// One block short of [`Self::capacity_bytes`]: range reads always fetch
    /// the block after the one addressed, which must exist.
    #[must_use]
    pub fn default_export_size(&self) -> u64 {
        self.capacity_bytes()
            .saturating_sub(self.block_size as u64)
    }

    /// Allocates one block-sized scratch buffer per member.
    #[must_use]
    pub fn scratch_buffers(&self) -> Vec<Vec<u8>> {
        vec![vec![0u8; self.block_size]; self.members.len()]
    }

    #[must_use]
    pub fn status_string(&self) -> String {
        let mut out = String::new();
        for (i, m) in self.members.iter().enumerate() {
            let _ = match m {
                Member::Present(d) => writeln!(
                    out,
                    "disk {i}: OK (len={}, path={})",
                    d.len(),
                    d.path().display()
                ),
                Member::Absent => writeln!(out, "disk {i}: MISSING (rebuilt from parity)"),
            };
        }
        out
    }

    /// Reads the block at `stripe_index` from member `disk` into `out`.
    ///
    /// # Errors
    /// Fails if the member is absent, the read fails, or the store is too short.
    pub fn read_physical(&self, disk: usize, stripe_index: u64, out: &mut [u8]) -> Result<(), RaidError> {
        let Some(d) = self.members.get(disk).and_then(Member::disk) else {
            return Err(RaidError::Absent(disk));
        };

        let started = Instant::now();
        let res = stripe_index
            .checked_mul(self.block_size as u64)
            .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "stripe offset overflow"))
            .and_then(|off| d.read_at(off, &mut out[..self.block_size]));

        metrics::record_disk_op(DiskOp {
            disk_index: disk,
            bytes: self.block_size as u64,
            latency_seconds: started.elapsed().as_secs_f64(),
            error: res.is_err(),
        });

        res.map_err(|source| {
            if source.kind() == ErrorKind::UnexpectedEof {
                RaidError::ShortRead {
                    disk,
                    stripe: stripe_index,
                }
            } else {
                RaidError::Io {
                    disk,
                    stripe: stripe_index,
                    source,
                }
            }
        })
    }

    /// Rebuilds the absent member's block at `stripe_index` into its scratch buffer.
    ///
    /// Every present member is read into its own scratch buffer first; nothing
    /// is rebuilt unless all of them succeed.
    ///
    /// # Returns
    /// The index of the rebuilt member.
    ///
    /// # Errors
    /// Fails if the array has no absent member or any present read fails.
    pub fn reconstruct(&self, stripe_index: u64, scratch: &mut [Vec<u8>]) -> Result<usize, RaidError> {
        let missing = self.missing.ok_or(RaidError::NotDegraded)?;

        for (i, buf) in scratch.iter_mut().enumerate() {
            if i != missing {
                self.read_physical(i, stripe_index, buf)?;
            }
        }
        self.layout.restore(scratch, missing);
        Ok(missing)
    }

    /// Loads logical block `logical_block` into `scratch` and returns it.
    ///
    /// Blocks on a present member are read directly; blocks on the absent
    /// member are rebuilt from the rest of their stripe.
    ///
    /// # Errors
    /// Propagates the first failing member read.
    pub fn load_block<'s>(&self, logical_block: u64, scratch: &'s mut [Vec<u8>]) -> Result<&'s [u8], RaidError> {
        let loc = self.locate(logical_block);
        let started = Instant::now();

        let (source, res) = if Some(loc.target_disk) == self.missing {
            (
                BlockSource::Parity,
                self.reconstruct(loc.stripe_index, scratch).map(|_| ()),
            )
        } else {
            (
                BlockSource::Direct,
                self.read_physical(loc.target_disk, loc.stripe_index, &mut scratch[loc.target_disk]),
            )
        };

        metrics::record_block_op(BlockOp {
            source,
            bytes: self.block_size as u64,
            latency_seconds: started.elapsed().as_secs_f64(),
            error: res.is_err(),
        });

        res?;
        Ok(&scratch[loc.target_disk])
    }
}
