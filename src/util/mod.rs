//! Various useful things.

pub mod der;
pub mod hex;
