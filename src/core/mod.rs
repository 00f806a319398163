// Core Module - Foundational types, event vocabulary, errors, clock, config, logging

pub mod types;
pub mod events;
pub mod error;
pub mod clock;
pub mod config;
pub mod logger;

// Re-export commonly used items for convenience
pub use types::{Vec3, VehicleState, TimeSinceSignal};
pub use events::DrivingEvent;
pub use error::{TelemetryError, EnvError};
pub use clock::{Clock, SystemClock, ManualClock};
pub use config::{
    EpisodeConfig, TrackerThresholds, TickConfig, ServerConfig, MonitoringConfig,
    ConfigManager, ConfigSummary, ConfigError,
};
pub use logger::setup_logging;
