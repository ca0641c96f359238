// Error types for startup, configuration and motor dispatch

use crate::motor::MotorError;

/// Invalid drive limits or timing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("min turn speed {min_turn_speed} exceeds max speed {max_speed}")]
    TurnSpeedAboveMax { min_turn_speed: f64, max_speed: f64 },

    #[error("max steer {max_steer} must exceed the turn threshold {threshold}")]
    SteerBelowTurnThreshold { max_steer: f64, threshold: f64 },

    #[error("{name} is too small, a full ramp would take {ticks} ticks")]
    RampTooSlow { name: &'static str, ticks: f64 },

    #[error("tick rate must be at least 1 Hz")]
    ZeroTickRate,

    #[error("tick rate {hz} Hz exceeds the {max} Hz limit")]
    TickRateTooHigh { hz: u64, max: u64 },

    #[error("key timeout must be non-zero")]
    ZeroKeyTimeout,
}

/// Top-level errors. Anything here ends the process with a non-zero status.
#[derive(Debug, thiserror::Error)]
pub enum TeleopError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Motor base unavailable: {0}")]
    Motor(#[from] MotorError),

    #[error("Terminal setup failed: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Input thread failed to start: {0}")]
    InputSpawn(#[source] std::io::Error),

    #[error("Input thread panicked")]
    InputPanicked,
}
