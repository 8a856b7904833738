//! Error types shared by the retention and protocol layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// RaidError is returned by disk, array and volume operations.
#[derive(Debug, Error)]
pub enum RaidError {
    #[error("failed to open disk {index} ({}): {source}", path.display())]
    Open {
        index: usize,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("an array needs at least 2 disks, got {0}")]
    TooFewDisks(usize),

    #[error("disks {first} and {second} are both MISSING; only one absent member can be rebuilt")]
    MultipleMissing { first: usize, second: usize },

    #[error("disk {0} is absent")]
    Absent(usize),

    #[error("array has no absent member to reconstruct")]
    NotDegraded,

    #[error("disk {disk}: reading stripe {stripe} failed: {source}")]
    Io {
        disk: usize,
        stripe: u64,
        #[source]
        source: io::Error,
    },

    #[error("disk {disk}: short read at stripe {stripe}")]
    ShortRead { disk: usize, stripe: u64 },

    #[error("{len} bytes at offset {offset} do not fit the {window}-byte read window")]
    InvalidRange { offset: u64, len: usize, window: usize },
}

/// NbdError terminates a protocol session.
#[derive(Debug, Error)]
pub enum NbdError {
    #[error("invalid request magic {0:#010x}")]
    BadMagic(u32),

    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}
