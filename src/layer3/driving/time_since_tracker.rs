// Time-Since Event Tracker - Fires while an environment signal holds
// One instance per signal: against traffic, pavement, pedestrian, vehicle

use tracing::debug;

use crate::core::events::DrivingEvent;
use crate::core::types::TimeSinceSignal;
use crate::layer1::environment::Environment;
use crate::layer3::common::tracker::StatTracker;

/// Reports `event` on every tick where `time_since(signal) == 0`
pub struct TimeSinceEventTracker {
    name: String,
    signal: TimeSinceSignal,
    event: DrivingEvent,
    occurred: bool,

    // Statistics
    ticks_processed: u64,
    events_fired: u64,
}

impl TimeSinceEventTracker {
    pub fn new(signal: TimeSinceSignal, event: DrivingEvent) -> Self {
        Self {
            name: format!("time_since_{}", signal),
            signal,
            event,
            occurred: false,
            ticks_processed: 0,
            events_fired: 0,
        }
    }

    /// Tracker for `signal` reporting its matching event
    pub fn for_signal(signal: TimeSinceSignal) -> Self {
        Self::new(signal, DrivingEvent::from(signal))
    }

    pub fn ticks_processed(&self) -> u64 {
        self.ticks_processed
    }

    pub fn events_fired(&self) -> u64 {
        self.events_fired
    }
}

impl StatTracker<DrivingEvent> for TimeSinceEventTracker {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, env: &dyn Environment) {
        self.ticks_processed += 1;
        self.occurred = match env.time_since(self.signal) {
            Ok(ms) => ms == 0,
            Err(e) => {
                debug!(tracker = %self.name, error = %e, "Environment read failed");
                false
            }
        };
        if self.occurred {
            self.events_fired += 1;
        }
    }

    fn value(&self) -> DrivingEvent {
        if self.occurred {
            self.event
        } else {
            DrivingEvent::None
        }
    }

    fn reset_episode(&mut self, _env: &dyn Environment) {}
}
