#[cfg(test)]
mod disk_tests;

use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Token marking an absent member on the command line.
pub const MISSING: &str = "MISSING";

/// DiskSpec is one member as named by the operator: a backing store, or absent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DiskSpec {
    Path(PathBuf),
    Missing,
}

impl FromStr for DiskSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == MISSING {
            Self::Missing
        } else {
            Self::Path(PathBuf::from(s))
        })
    }
}

impl fmt::Display for DiskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Missing => f.write_str(MISSING),
        }
    }
}

/// Disk is a read-only backing store for one array member.
///
/// Reads are positional, so one handle can serve several connections at once.
#[derive(Debug)]
pub struct Disk {
    path: PathBuf,
    file: File,
    len: u64,
}

impl Disk {
    /// Opens `path` read-only and records its length.
    ///
    /// The length is taken by seeking to the end, which also works for
    /// block devices whose metadata reports zero.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened or its size cannot be read.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let len = file.seek(SeekFrom::End(0))?;
        Ok(Self { path, file, len })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fills `buf` from byte offset `off`.
    ///
    /// # Errors
    /// Fails with `UnexpectedEof` when fewer than `buf.len()` bytes exist at `off`,
    /// or with the underlying error if the read itself fails.
    pub fn read_at(&self, off: u64, buf: &mut [u8]) -> io::Result<()> {
        self.file.read_exact_at(buf, off)
    }
}

/// Member is one slot of the array.
#[derive(Debug)]
pub enum Member {
    Present(Disk),
    Absent,
}

impl Member {
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub const fn disk(&self) -> Option<&Disk> {
        match self {
            Self::Present(d) => Some(d),
            Self::Absent => None,
        }
    }
}
