// Rolling Window History - Fixed-capacity circular buffer of timestamped records
// Time lookup stays correct across wraparound by searching the two sorted runs

use std::fmt;
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::TelemetryError;

/// Circular buffer holding the most recent `capacity` `(timestamp_ms, value)`
/// records.
///
/// Slots fill in order until the buffer is full; after that the write cursor
/// overwrites the oldest slot. Physically the buffer is two sorted runs,
/// `slots[cursor..]` (older) followed by `slots[..cursor]` (newer), so a time
/// lookup binary-searches each run and keeps the closer hit.
#[derive(Clone)]
pub struct RollingWindowHistory<T> {
    capacity: usize,
    slots: Vec<(i64, T)>,
    cursor: usize,
    clock: Arc<dyn Clock>,
}

impl<T> RollingWindowHistory<T> {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Result<Self, TelemetryError> {
        if capacity == 0 {
            return Err(TelemetryError::InvalidConfiguration(
                "history capacity must be > 0".to_string(),
            ));
        }

        Ok(Self {
            capacity,
            slots: Vec::with_capacity(capacity.min(4096)),
            cursor: 0,
            clock,
        })
    }

    /// Store `value` stamped with the clock's current time.
    ///
    /// Returns the timestamp used. It is clamped to the newest stored
    /// timestamp so both runs stay sorted even if the clock misbehaves.
    pub fn add(&mut self, value: T) -> i64 {
        let timestamp = match self.newest_timestamp() {
            Some(newest) => self.clock.now_ms().max(newest),
            None => self.clock.now_ms(),
        };

        if self.slots.len() < self.capacity {
            self.slots.push((timestamp, value));
        } else {
            self.slots[self.cursor] = (timestamp, value);
        }
        self.cursor = (self.cursor + 1) % self.capacity;

        timestamp
    }

    /// Record whose timestamp is closest to `timestamp`; ties go to the
    /// earlier record.
    pub fn nearest(&self, timestamp: i64) -> Result<&T, TelemetryError> {
        self.nearest_entry(timestamp).map(|(_, value)| value)
    }

    pub fn nearest_entry(&self, timestamp: i64) -> Result<(i64, &T), TelemetryError> {
        let (older, newer) = self.runs();

        let best = match (closest_in(older, timestamp), closest_in(newer, timestamp)) {
            (Some(i), Some(j)) => {
                let (old_ts, _) = &older[i];
                let (new_ts, _) = &newer[j];
                if new_ts.abs_diff(timestamp) < old_ts.abs_diff(timestamp) {
                    &newer[j]
                } else {
                    &older[i]
                }
            }
            (Some(i), None) => &older[i],
            (None, Some(j)) => &newer[j],
            (None, None) => return Err(TelemetryError::EmptyHistory),
        };

        Ok((best.0, &best.1))
    }

    /// Most recently added record
    pub fn latest(&self) -> Option<&T> {
        self.iter().next_back().map(|(_, value)| value)
    }

    /// Up to `n` records, newest first
    pub fn latest_n(&self, n: usize) -> Vec<&T> {
        self.iter().rev().take(n).map(|(_, value)| value).collect()
    }

    /// Records in insertion order, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (i64, &T)> + '_ {
        let (older, newer) = self.runs();
        older.iter().chain(newer.iter()).map(|(ts, value)| (*ts, value))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn newest_timestamp(&self) -> Option<i64> {
        if self.slots.is_empty() {
            return None;
        }
        let newest = (self.cursor + self.capacity - 1) % self.capacity;
        Some(self.slots[newest].0)
    }

    /// (older run, newer run); the newer run is empty until the first wrap
    fn runs(&self) -> (&[(i64, T)], &[(i64, T)]) {
        if self.slots.len() < self.capacity {
            (&self.slots[..], &self.slots[..0])
        } else {
            (&self.slots[self.cursor..], &self.slots[..self.cursor])
        }
    }
}

/// Index of the closest entry in a sorted run, preferring the earliest on ties
fn closest_in<T>(run: &[(i64, T)], timestamp: i64) -> Option<usize> {
    if run.is_empty() {
        return None;
    }

    // First entry at or after the query; already the earliest of its equal run
    let after = run.partition_point(|(ts, _)| *ts < timestamp);
    if after == 0 {
        return Some(0);
    }

    let before = after - 1;
    let pick = if after == run.len()
        || run[before].0.abs_diff(timestamp) <= run[after].0.abs_diff(timestamp)
    {
        before
    } else {
        return Some(after);
    };

    // Rewind to the first of any records sharing that timestamp
    let pick_ts = run[pick].0;
    Some(run.partition_point(|(ts, _)| *ts < pick_ts))
}

impl<T> fmt::Debug for RollingWindowHistory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingWindowHistory")
            .field("capacity", &self.capacity)
            .field("len", &self.slots.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
