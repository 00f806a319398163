// Driving Event Vocabulary
// Closed set of discrete conditions an event tracker can report for a tick

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::types::TimeSinceSignal;

/// One discrete driving condition.
///
/// `None` is the sentinel a tracker reports when it observed nothing this
/// tick. It is never stored in an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivingEvent {
    None,
    DrivingAgainstTraffic,
    DrivingOnPavement,
    HitVehicle,
    HitPedestrian,
    HitOther,
}

impl DrivingEvent {
    pub fn is_none(self) -> bool {
        self == DrivingEvent::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DrivingEvent::None => "none",
            DrivingEvent::DrivingAgainstTraffic => "driving_against_traffic",
            DrivingEvent::DrivingOnPavement => "driving_on_pavement",
            DrivingEvent::HitVehicle => "hit_vehicle",
            DrivingEvent::HitPedestrian => "hit_pedestrian",
            DrivingEvent::HitOther => "hit_other",
        }
    }
}

impl From<TimeSinceSignal> for DrivingEvent {
    fn from(signal: TimeSinceSignal) -> Self {
        match signal {
            TimeSinceSignal::DroveAgainstTraffic => DrivingEvent::DrivingAgainstTraffic,
            TimeSinceSignal::DroveOnPavement => DrivingEvent::DrivingOnPavement,
            TimeSinceSignal::HitPedestrian => DrivingEvent::HitPedestrian,
            TimeSinceSignal::HitVehicle => DrivingEvent::HitVehicle,
        }
    }
}

impl fmt::Display for DrivingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrivingEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(DrivingEvent::None),
            "driving_against_traffic" => Ok(DrivingEvent::DrivingAgainstTraffic),
            "driving_on_pavement" => Ok(DrivingEvent::DrivingOnPavement),
            "hit_vehicle" => Ok(DrivingEvent::HitVehicle),
            "hit_pedestrian" => Ok(DrivingEvent::HitPedestrian),
            "hit_other" => Ok(DrivingEvent::HitOther),
            _ => Err(format!("Invalid DrivingEvent: '{}'", s)),
        }
    }
}
