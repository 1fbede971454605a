//! Error taxonomy
//!
//! Per-entity problems never leave the sweep: они логируются и entity
//! пропускается на этот тик. `Result` возвращают только загрузка конфига
//! и построение cue tables.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Required service or collaborator is absent (player, owner, command buffer).
    #[error("missing dependency: {what}")]
    MissingDependency { what: &'static str },

    /// Path index outside `[0, len)`; recovered locally by clamping.
    #[error("index {index} out of range for length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// Event queue had to grow past its planned per-tick capacity.
    #[error("{category} queue grew from {from} to {to} events")]
    QueueGrowth {
        category: &'static str,
        from: usize,
        to: usize,
    },

    /// The same (kind, event) pair is linked to two cues.
    #[error("{table} cue pair {pair} mapped to both cue {first} and cue {second}")]
    DuplicateCue {
        table: &'static str,
        pair: String,
        first: usize,
        second: usize,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// Parsed fine, but the value cannot drive the simulation.
    #[error("invalid config value `{field}`: {reason}")]
    ConfigValue { field: &'static str, reason: &'static str },

    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimulationError::InvalidIndex { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range for length 3");

        let err = SimulationError::MissingDependency { what: "player" };
        assert_eq!(err.to_string(), "missing dependency: player");

        let err = SimulationError::ConfigValue {
            field: "tick_hz",
            reason: "must be positive",
        };
        assert_eq!(err.to_string(), "invalid config value `tick_hz`: must be positive");
    }
}
