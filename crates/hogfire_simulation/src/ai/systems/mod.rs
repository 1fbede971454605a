//! AI systems (behavior FSM + movement)

pub mod fsm;
pub mod movement;

#[cfg(test)]
mod movement_tests;

// Re-export all systems
pub use fsm::*;
pub use movement::*;
