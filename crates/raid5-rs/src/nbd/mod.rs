//! Read-only export over the old-style NBD protocol.

pub mod session;
pub mod wire;

pub use session::{Session, SessionStats, State};
pub use wire::{Command, Reply, Request};
