// Episode Driver - Owns the open episode and the registered trackers
// Called once per simulation step; closes windows into the episode history

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::clock::Clock;
use crate::core::config::{EpisodeConfig, TrackerThresholds};
use crate::core::error::TelemetryError;
use crate::core::types::TimeSinceSignal;
use crate::layer1::environment::Environment;
use crate::layer2::episode::OpenEpisode;
use crate::layer2::episode_store::EpisodeStore;
use crate::layer3::common::tracker::{BoxedEventTracker, BoxedMetricTracker};

use super::collision_tracker::CollisionTracker;
use super::road_alignment_tracker::RoadAlignmentTracker;
use super::speed_tracker::SpeedTracker;
use super::time_since_tracker::TimeSinceEventTracker;

/// Statistics snapshot from the driver
#[derive(Debug, Clone)]
pub struct DriverStats {
    pub session_id: Uuid,
    pub ticks_processed: u64,
    pub episodes_closed: u64,
    pub current_episode_id: u64,
    pub event_trackers: usize,
    pub metric_trackers: usize,
    pub history_len: usize,
}

impl fmt::Display for DriverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EpisodeDriver(ticks={}, closed={}, current={}, trackers={}+{}, history={})",
            self.ticks_processed,
            self.episodes_closed,
            self.current_episode_id,
            self.event_trackers,
            self.metric_trackers,
            self.history_len
        )
    }
}

/// Single-threaded tick path.
///
/// Each `tick` polls every tracker in registration order, unions event
/// values into the open episode, and then closes the episode if its window
/// has elapsed. The closing tick's events and samples belong to the episode
/// it closes; the next `tick` observes the new one.
pub struct EpisodeDriver {
    env: Arc<dyn Environment>,
    clock: Arc<dyn Clock>,
    window_duration_ms: i64,

    event_trackers: Vec<BoxedEventTracker>,
    metric_trackers: Vec<BoxedMetricTracker>,

    current: OpenEpisode,
    store: EpisodeStore,

    // Statistics
    ticks_processed: u64,
    episodes_closed: u64,
}

impl EpisodeDriver {
    /// Driver with no trackers; episode 0 opens now
    pub fn new(
        config: &EpisodeConfig,
        env: Arc<dyn Environment>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TelemetryError> {
        config.validate()?;
        let store = EpisodeStore::new(config.history_capacity, clock.clone())?;
        let current = OpenEpisode::new(0, clock.now_ms(), config.window_duration_ms);

        debug!(
            session_id = %store.session_id(),
            window_ms = config.window_duration_ms,
            capacity = config.history_capacity,
            "Initializing EpisodeDriver"
        );

        Ok(Self {
            env,
            clock,
            window_duration_ms: config.window_duration_ms,
            event_trackers: Vec::new(),
            metric_trackers: Vec::new(),
            current,
            store,
            ticks_processed: 0,
            episodes_closed: 0,
        })
    }

    /// Driver with the driving tracker set: one time-since tracker per
    /// signal, collision, then `avg_speed` and `avg_road_alignment`
    pub fn with_default_trackers(
        config: &EpisodeConfig,
        thresholds: &TrackerThresholds,
        env: Arc<dyn Environment>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TelemetryError> {
        let mut driver = Self::new(config, env, clock)?;

        for signal in TimeSinceSignal::ALL {
            driver.register_event_tracker(Box::new(TimeSinceEventTracker::for_signal(signal)));
        }
        driver.register_event_tracker(Box::new(CollisionTracker::new(thresholds.collision_radius_m)));

        driver.register_metric_tracker(Box::new(SpeedTracker::new()))?;
        driver.register_metric_tracker(Box::new(RoadAlignmentTracker::new(
            thresholds.alignment_lookahead_m,
            thresholds.alignment_velocity_weight,
        )))?;

        Ok(driver)
    }

    pub fn register_event_tracker(&mut self, tracker: BoxedEventTracker) {
        debug!(tracker = tracker.name(), "Registered event tracker");
        self.event_trackers.push(tracker);
    }

    /// Metric names key the closed episode's metrics and must be unique
    pub fn register_metric_tracker(&mut self, tracker: BoxedMetricTracker) -> Result<(), TelemetryError> {
        if self.metric_trackers.iter().any(|t| t.name() == tracker.name()) {
            return Err(TelemetryError::InvalidConfiguration(format!(
                "duplicate metric tracker '{}'",
                tracker.name()
            )));
        }
        debug!(tracker = tracker.name(), "Registered metric tracker");
        self.metric_trackers.push(tracker);
        Ok(())
    }

    /// Advance one simulation step
    pub fn tick(&mut self) {
        let now_ms = self.clock.now_ms();

        let env = self.env.as_ref();
        for tracker in self.event_trackers.iter_mut() {
            tracker.tick(env);
        }
        for tracker in self.metric_trackers.iter_mut() {
            tracker.tick(env);
        }
        for tracker in &self.event_trackers {
            self.current.record(tracker.value());
        }

        if self.current.is_expired(now_ms) {
            self.close_episode(now_ms);
        }

        self.ticks_processed += 1;
    }

    // Metrics are read before any tracker is reset, and every tracker is
    // reset before the next tick polls it.
    fn close_episode(&mut self, now_ms: i64) {
        let metrics: BTreeMap<String, f64> = self
            .metric_trackers
            .iter()
            .map(|t| (t.name().to_string(), t.value()))
            .collect();

        let next = OpenEpisode::new(self.current.id() + 1, now_ms, self.window_duration_ms);
        let closed = std::mem::replace(&mut self.current, next).finalize(metrics);

        info!(
            episode_id = closed.id(),
            window_start_ms = closed.window_start_ms(),
            events = ?closed.events(),
            metrics = ?closed.metrics(),
            "Episode closed"
        );
        self.store.push(closed);
        self.episodes_closed += 1;

        let env = self.env.as_ref();
        for tracker in self.event_trackers.iter_mut() {
            tracker.reset_episode(env);
        }
        for tracker in self.metric_trackers.iter_mut() {
            tracker.reset_episode(env);
        }
    }

    /// Read handle on closed episodes, shareable with other threads
    pub fn episode_history(&self) -> EpisodeStore {
        self.store.clone()
    }

    pub fn current_episode(&self) -> &OpenEpisode {
        &self.current
    }

    pub fn session_id(&self) -> Uuid {
        self.store.session_id()
    }

    pub fn get_stats(&self) -> DriverStats {
        DriverStats {
            session_id: self.store.session_id(),
            ticks_processed: self.ticks_processed,
            episodes_closed: self.episodes_closed,
            current_episode_id: self.current.id(),
            event_trackers: self.event_trackers.len(),
            metric_trackers: self.metric_trackers.len(),
            history_len: self.store.len(),
        }
    }
}
