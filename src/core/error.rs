// Error Types for the Reward Hook
// Core taxonomy plus the environment read failures trackers absorb

use thiserror::Error;

/// Errors surfaced by the telemetry core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelemetryError {
    /// Rejected at construction time; fatal, never retried
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Query against a history holding no records yet
    #[error("History is empty")]
    EmptyHistory,
}

/// Transient failure reading the live environment.
///
/// Trackers swallow these and report their neutral value for the tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("Environment unavailable: {0}")]
    Unavailable(String),
}
