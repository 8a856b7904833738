//! Degraded RAID-5 reconstruction and the read-only NBD export built on top of it.
#![allow(clippy::cargo_common_metadata)]

pub mod error;
pub mod layout;
pub mod metrics;
pub mod nbd;
pub mod retention;

pub use error::{NbdError, RaidError};
