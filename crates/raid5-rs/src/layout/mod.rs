//! Stripe geometry and parity arithmetic.

pub mod bits;
pub mod stripe;
