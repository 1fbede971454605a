//! Combat systems (fire control)

pub mod weapon;


pub use weapon::*;
