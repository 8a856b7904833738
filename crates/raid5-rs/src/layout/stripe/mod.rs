//! Stripe layout implementations for supported RAID modes.

pub mod raid5;
pub mod traits;
