// Configuration Management for the Reward Hook
// JSON file + environment overrides, validated once at startup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::error::TelemetryError;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Configuration Structures
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Episode window length in milliseconds
    pub window_duration_ms: i64,
    /// Number of closed episodes retained in memory
    pub history_capacity: usize,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            window_duration_ms: 10_000,
            history_capacity: 1024,
        }
    }
}

impl EpisodeConfig {
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.window_duration_ms <= 0 {
            return Err(TelemetryError::InvalidConfiguration(format!(
                "window_duration_ms must be > 0 (got {})",
                self.window_duration_ms
            )));
        }
        if self.history_capacity == 0 {
            return Err(TelemetryError::InvalidConfiguration(
                "history_capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerThresholds {
    pub collision_radius_m: f32,     // Search radius for player-damaged entities
    pub alignment_lookahead_m: f32,  // Distance of the second street sample
    pub alignment_velocity_weight: f32, // Velocity vs. body weight in the heading blend
}

impl Default for TrackerThresholds {
    fn default() -> Self {
        Self {
            collision_radius_m: 10.0,
            alignment_lookahead_m: 14.0,
            alignment_velocity_weight: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub tick_interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { tick_interval_ms: 50 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub request_timeout_secs: u64,
    /// Upper bound for `count` on the latest-episodes query
    pub max_latest: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:31730".to_string(),
            request_timeout_secs: 10,
            max_latest: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub json_format: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            json_format: false,
        }
    }
}

// ============================================================================
// Configuration Summary
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub window_duration_ms: i64,
    pub history_capacity: usize,
    pub tick_interval_ms: u64,
    pub bind_addr: String,
    pub log_level: String,
}

// ============================================================================
// Configuration Manager
// ============================================================================

pub struct ConfigManager {
    episode: Arc<RwLock<EpisodeConfig>>,
    thresholds: Arc<RwLock<TrackerThresholds>>,
    tick: Arc<RwLock<TickConfig>>,
    server: Arc<RwLock<ServerConfig>>,
    monitoring: Arc<RwLock<MonitoringConfig>>,
}

impl ConfigManager {
    pub fn new(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut manager = Self {
            episode: Arc::new(RwLock::new(EpisodeConfig::default())),
            thresholds: Arc::new(RwLock::new(TrackerThresholds::default())),
            tick: Arc::new(RwLock::new(TickConfig::default())),
            server: Arc::new(RwLock::new(ServerConfig::default())),
            monitoring: Arc::new(RwLock::new(MonitoringConfig::default())),
        };

        if let Some(path) = config_path {
            manager.load_from_file(path)?;
        }

        manager.load_from_env();

        info!("Configuration initialized");
        Ok(manager)
    }

    /// Load configuration from JSON file. Sections are optional.
    pub fn load_from_file(&mut self, config_path: &str) -> Result<(), ConfigError> {
        let path = Path::new(config_path);
        if !path.exists() {
            warn!(path = config_path, "Config file not found");
            return Ok(());
        }

        let content = fs::read_to_string(path)?;
        let config_data: HashMap<String, serde_json::Value> = serde_json::from_str(&content)?;

        if let Some(data) = config_data.get("episode") {
            *self.episode.write() = serde_json::from_value(data.clone())?;
        }
        if let Some(data) = config_data.get("thresholds") {
            *self.thresholds.write() = serde_json::from_value(data.clone())?;
        }
        if let Some(data) = config_data.get("tick") {
            *self.tick.write() = serde_json::from_value(data.clone())?;
        }
        if let Some(data) = config_data.get("server") {
            *self.server.write() = serde_json::from_value(data.clone())?;
        }
        if let Some(data) = config_data.get("monitoring") {
            *self.monitoring.write() = serde_json::from_value(data.clone())?;
        }

        info!(path = config_path, "Configuration loaded");
        Ok(())
    }

    /// Apply `REWARD_HOOK_*` environment overrides
    pub fn load_from_env(&mut self) {
        if let Some(window) = env_parse::<i64>("REWARD_HOOK_WINDOW_MS") {
            self.episode.write().window_duration_ms = window;
        }
        if let Some(capacity) = env_parse::<usize>("REWARD_HOOK_HISTORY_CAPACITY") {
            self.episode.write().history_capacity = capacity;
        }
        if let Some(tick) = env_parse::<u64>("REWARD_HOOK_TICK_MS") {
            self.tick.write().tick_interval_ms = tick;
        }
        if let Ok(addr) = std::env::var("REWARD_HOOK_BIND_ADDR") {
            self.server.write().bind_addr = addr;
        }
        if let Ok(level) = std::env::var("REWARD_HOOK_LOG_LEVEL") {
            self.monitoring.write().log_level = level;
        }
    }

    /// Save configuration to JSON file
    pub fn save_to_file(&self, config_path: &str) -> Result<(), ConfigError> {
        let mut config_map = HashMap::new();
        config_map.insert("episode", serde_json::to_value(&*self.episode.read())?);
        config_map.insert("thresholds", serde_json::to_value(&*self.thresholds.read())?);
        config_map.insert("tick", serde_json::to_value(&*self.tick.read())?);
        config_map.insert("server", serde_json::to_value(&*self.server.read())?);
        config_map.insert("monitoring", serde_json::to_value(&*self.monitoring.read())?);

        if let Some(parent) = Path::new(config_path).parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&config_map)?;
        fs::write(config_path, json)?;

        info!(path = config_path, "Configuration saved");
        Ok(())
    }

    /// Validate every section; all problems are reported in one error
    pub fn validate(&self) -> Result<(), TelemetryError> {
        let mut errors = Vec::new();

        if let Err(TelemetryError::InvalidConfiguration(msg)) = self.episode.read().validate() {
            errors.push(msg);
        }

        let thresholds = self.thresholds.read();
        if thresholds.collision_radius_m < 0.0 {
            errors.push("collision_radius_m must be >= 0".to_string());
        }
        if thresholds.alignment_lookahead_m <= 0.0 {
            errors.push("alignment_lookahead_m must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&thresholds.alignment_velocity_weight) {
            errors.push("alignment_velocity_weight must be between 0 and 1".to_string());
        }

        if self.tick.read().tick_interval_ms == 0 {
            errors.push("tick_interval_ms must be > 0".to_string());
        }

        let server = self.server.read();
        if server.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be > 0".to_string());
        }
        if server.max_latest == 0 {
            errors.push("max_latest must be > 0".to_string());
        }

        if !errors.is_empty() {
            for error in &errors {
                warn!(error = %error, "Config validation error");
            }
            return Err(TelemetryError::InvalidConfiguration(errors.join("; ")));
        }

        info!("Configuration validated successfully");
        Ok(())
    }

    pub fn get_summary(&self) -> ConfigSummary {
        let episode = self.episode.read();
        let server = self.server.read();

        ConfigSummary {
            window_duration_ms: episode.window_duration_ms,
            history_capacity: episode.history_capacity,
            tick_interval_ms: self.tick.read().tick_interval_ms,
            bind_addr: server.bind_addr.clone(),
            log_level: self.monitoring.read().log_level.clone(),
        }
    }

    pub fn set_log_level(&self, level: &str) {
        self.monitoring.write().log_level = level.to_string();
    }

    pub fn set_json_format(&self, json_format: bool) {
        self.monitoring.write().json_format = json_format;
    }

    // Getters for each config section
    pub fn episode(&self) -> EpisodeConfig {
        self.episode.read().clone()
    }

    pub fn thresholds(&self) -> TrackerThresholds {
        self.thresholds.read().clone()
    }

    pub fn tick(&self) -> TickConfig {
        self.tick.read().clone()
    }

    pub fn server(&self) -> ServerConfig {
        self.server.read().clone()
    }

    pub fn monitoring(&self) -> MonitoringConfig {
        self.monitoring.read().clone()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let episode = EpisodeConfig::default();
        assert_eq!(episode.window_duration_ms, 10_000);
        assert_eq!(episode.history_capacity, 1024);

        let server = ServerConfig::default();
        assert_eq!(server.bind_addr, "127.0.0.1:31730");

        let thresholds = TrackerThresholds::default();
        assert_eq!(thresholds.collision_radius_m, 10.0);
        assert_eq!(thresholds.alignment_lookahead_m, 14.0);
    }

    #[test]
    fn test_episode_config_validation() {
        assert!(EpisodeConfig::default().validate().is_ok());

        let zero_window = EpisodeConfig { window_duration_ms: 0, ..EpisodeConfig::default() };
        assert!(matches!(
            zero_window.validate(),
            Err(TelemetryError::InvalidConfiguration(_))
        ));

        let zero_capacity = EpisodeConfig { history_capacity: 0, ..EpisodeConfig::default() };
        assert!(matches!(
            zero_capacity.validate(),
            Err(TelemetryError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_config_manager_defaults_validate() {
        let manager = ConfigManager::new(None).unwrap();
        assert!(manager.validate().is_ok());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reward_hook.json");
        let path = path.to_str().unwrap();

        let manager = ConfigManager::new(None).unwrap();
        manager.set_log_level("DEBUG");
        manager.save_to_file(path).unwrap();

        let reloaded = ConfigManager::new(Some(path)).unwrap();
        assert_eq!(reloaded.monitoring().log_level, "DEBUG");
        assert_eq!(reloaded.episode().history_capacity, 1024);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"episode": {"window_duration_ms": 5000}}"#).unwrap();

        let manager = ConfigManager::new(Some(path.to_str().unwrap())).unwrap();
        let episode = manager.episode();
        assert_eq!(episode.window_duration_ms, 5000);
        assert_eq!(episode.history_capacity, 1024);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result = ConfigManager::new(Some(path.to_str().unwrap()));
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_validation_collects_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"episode": {"history_capacity": 0}, "server": {"max_latest": 0}}"#,
        )
        .unwrap();

        let manager = ConfigManager::new(Some(path.to_str().unwrap())).unwrap();
        match manager.validate() {
            Err(TelemetryError::InvalidConfiguration(msg)) => {
                assert!(msg.contains("history_capacity"));
                assert!(msg.contains("max_latest"));
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_config_summary() {
        let manager = ConfigManager::new(None).unwrap();
        let summary = manager.get_summary();
        assert_eq!(summary.history_capacity, manager.episode().history_capacity);
        assert_eq!(summary.bind_addr, manager.server().bind_addr);
    }
}
