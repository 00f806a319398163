// Episode Records - One fixed-duration window of accumulated driving behavior
//
// An episode is Open while the driver accumulates into it and Closed once its
// window has elapsed. The two states are separate types: `OpenEpisode` is the
// only one with mutators, and `finalize` consumes it to produce the immutable
// `Episode` that goes into history.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::events::DrivingEvent;

// ============================================================================
// Open Episode
// ============================================================================

/// In-progress episode owned by the tick path
#[derive(Debug, Clone, PartialEq)]
pub struct OpenEpisode {
    id: u64,
    window_start_ms: i64,
    window_duration_ms: i64,
    events: BTreeSet<DrivingEvent>,
}

impl OpenEpisode {
    pub fn new(id: u64, window_start_ms: i64, window_duration_ms: i64) -> Self {
        Self {
            id,
            window_start_ms,
            window_duration_ms,
            events: BTreeSet::new(),
        }
    }

    /// Union one tracker value into the episode. `None` is ignored.
    /// Returns true when the event was not yet present.
    pub fn record(&mut self, event: DrivingEvent) -> bool {
        if event.is_none() {
            return false;
        }
        self.events.insert(event)
    }

    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.window_start_ms
    }

    /// The window is over once elapsed time strictly exceeds its duration
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.elapsed_ms(now_ms) > self.window_duration_ms
    }

    /// Freeze into a closed episode carrying the final metric values
    pub fn finalize(self, metrics: BTreeMap<String, f64>) -> Episode {
        Episode {
            id: self.id,
            window_start_ms: self.window_start_ms,
            window_duration_ms: self.window_duration_ms,
            events: self.events,
            metrics,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn window_start_ms(&self) -> i64 {
        self.window_start_ms
    }

    pub fn window_duration_ms(&self) -> i64 {
        self.window_duration_ms
    }

    pub fn events(&self) -> &BTreeSet<DrivingEvent> {
        &self.events
    }
}

// ============================================================================
// Closed Episode
// ============================================================================

/// Immutable record of a finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    id: u64,
    window_start_ms: i64,
    window_duration_ms: i64,
    events: BTreeSet<DrivingEvent>,
    metrics: BTreeMap<String, f64>,
}

impl Episode {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn window_start_ms(&self) -> i64 {
        self.window_start_ms
    }

    pub fn window_duration_ms(&self) -> i64 {
        self.window_duration_ms
    }

    pub fn events(&self) -> &BTreeSet<DrivingEvent> {
        &self.events
    }

    pub fn has_event(&self, event: DrivingEvent) -> bool {
        self.events.contains(&event)
    }

    pub fn metrics(&self) -> &BTreeMap<String, f64> {
        &self.metrics
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events: Vec<&str> = self.events.iter().map(|e| e.as_str()).collect();
        write!(
            f,
            "Episode(id={}, start={}, duration={}ms, events=[{}], metrics={:?})",
            self.id,
            self.window_start_ms,
            self.window_duration_ms,
            events.join(", "),
            self.metrics
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ignores_none_and_duplicates() {
        let mut episode = OpenEpisode::new(0, 0, 10_000);

        assert!(!episode.record(DrivingEvent::None));
        assert!(episode.record(DrivingEvent::HitVehicle));
        for _ in 0..50 {
            assert!(!episode.record(DrivingEvent::HitVehicle));
        }

        assert_eq!(episode.events().len(), 1);
    }

    #[test]
    fn test_expiry_is_strict() {
        let episode = OpenEpisode::new(3, 1_000, 10_000);
        assert!(!episode.is_expired(1_000));
        assert!(!episode.is_expired(11_000));
        assert!(episode.is_expired(11_001));
        assert_eq!(episode.elapsed_ms(6_000), 5_000);
    }

    #[test]
    fn test_finalize_keeps_fields() {
        let mut open = OpenEpisode::new(7, 500, 10_000);
        open.record(DrivingEvent::DrivingOnPavement);

        let mut metrics = BTreeMap::new();
        metrics.insert("avg_speed".to_string(), 12.5);
        let closed = open.finalize(metrics);

        assert_eq!(closed.id(), 7);
        assert_eq!(closed.window_start_ms(), 500);
        assert_eq!(closed.window_duration_ms(), 10_000);
        assert!(closed.has_event(DrivingEvent::DrivingOnPavement));
        assert_eq!(closed.metric("avg_speed"), Some(12.5));
        assert_eq!(closed.metric("avg_road_alignment"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let mut open = OpenEpisode::new(1, 2_000, 10_000);
        open.record(DrivingEvent::HitOther);
        let closed = open.finalize(BTreeMap::from([("avg_speed".to_string(), 3.0)]));

        let json = serde_json::to_value(&closed).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["window_start_ms"], 2_000);
        assert_eq!(json["window_duration_ms"], 10_000);
        assert_eq!(json["events"], serde_json::json!(["hit_other"]));
        assert_eq!(json["metrics"]["avg_speed"], 3.0);

        let back: Episode = serde_json::from_value(json).unwrap();
        assert_eq!(back, closed);
    }
}
