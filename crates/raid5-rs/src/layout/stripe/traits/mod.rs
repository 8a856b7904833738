//! Layout traits shared by stripe implementations.

pub mod locate;
pub mod restore;
