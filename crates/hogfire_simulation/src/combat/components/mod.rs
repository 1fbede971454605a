//! Combat components

pub mod weapon;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod weapon_tests;

// Re-export all components
pub use weapon::*;
