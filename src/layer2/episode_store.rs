// Episode Store - Thread-safe handle on the closed-episode history
// Written by the tick path, read by the exposition boundary

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::clock::Clock;
use crate::core::error::TelemetryError;
use crate::layer2::episode::Episode;
use crate::layer2::rolling_history::RollingWindowHistory;

/// Statistics snapshot from the episode store
#[derive(Debug, Clone)]
pub struct EpisodeStoreStats {
    pub session_id: Uuid,
    pub stored: usize,
    pub capacity: usize,
    pub total_added: u64,
    pub latest_episode_id: Option<u64>,
}

impl fmt::Display for EpisodeStoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EpisodeStore(session={}, stored={}/{}, total={}, latest={:?})",
            self.session_id, self.stored, self.capacity, self.total_added, self.latest_episode_id
        )
    }
}

/// Cloneable handle; every clone sees the same history.
///
/// The lock is held only for a single slot write or a read copy, so a reader
/// never observes a half-written slot or a cursor mid-advance. Reads hand out
/// owned clones; nothing outside the store aliases a stored episode.
#[derive(Clone)]
pub struct EpisodeStore {
    session_id: Uuid,
    history: Arc<RwLock<RollingWindowHistory<Episode>>>,
    total_added: Arc<AtomicU64>,
}

impl EpisodeStore {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Result<Self, TelemetryError> {
        Ok(Self {
            session_id: Uuid::new_v4(),
            history: Arc::new(RwLock::new(RollingWindowHistory::new(capacity, clock)?)),
            total_added: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Append a closed episode; returns its history timestamp
    pub(crate) fn push(&self, episode: Episode) -> i64 {
        let timestamp = self.history.write().add(episode);
        self.total_added.fetch_add(1, Ordering::Relaxed);
        timestamp
    }

    /// Up to `count` episodes, newest first
    pub fn latest(&self, count: usize) -> Vec<Episode> {
        self.history.read().latest_n(count).into_iter().cloned().collect()
    }

    pub fn latest_one(&self) -> Result<Episode, TelemetryError> {
        self.history.read().latest().cloned().ok_or(TelemetryError::EmptyHistory)
    }

    /// Episode stored closest to `timestamp_ms`
    pub fn nearest(&self, timestamp_ms: i64) -> Result<Episode, TelemetryError> {
        self.history.read().nearest(timestamp_ms).cloned()
    }

    /// Point-in-time copy of the whole history
    pub fn snapshot(&self) -> RollingWindowHistory<Episode> {
        self.history.read().clone()
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.history.read().capacity()
    }

    pub fn get_stats(&self) -> EpisodeStoreStats {
        let total_added = self.total_added.load(Ordering::Relaxed);
        let history = self.history.read();
        EpisodeStoreStats {
            session_id: self.session_id,
            stored: history.len(),
            capacity: history.capacity(),
            total_added,
            latest_episode_id: history.latest().map(|e| e.id()),
        }
    }
}

impl fmt::Debug for EpisodeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::layer2::episode::OpenEpisode;
    use std::collections::BTreeMap;

    fn closed(id: u64, start: i64) -> Episode {
        OpenEpisode::new(id, start, 10_000).finalize(BTreeMap::new())
    }

    fn store(capacity: usize) -> (Arc<ManualClock>, EpisodeStore) {
        let clock = Arc::new(ManualClock::new(0));
        let store = EpisodeStore::new(capacity, clock.clone()).unwrap();
        (clock, store)
    }

    #[test]
    fn test_store_creation() {
        let (_, store) = store(16);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 16);
        assert_eq!(store.latest_one(), Err(TelemetryError::EmptyHistory));
        assert_eq!(store.nearest(0), Err(TelemetryError::EmptyHistory));
        assert!(store.latest(5).is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let clock = Arc::new(ManualClock::new(0));
        assert!(matches!(
            EpisodeStore::new(0, clock),
            Err(TelemetryError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_latest_and_nearest() {
        let (clock, store) = store(16);
        for id in 0..4 {
            clock.set(10_000 * (id as i64 + 1));
            store.push(closed(id, 10_000 * id as i64));
        }

        let latest: Vec<u64> = store.latest(2).iter().map(|e| e.id()).collect();
        assert_eq!(latest, vec![3, 2]);
        assert_eq!(store.latest_one().unwrap().id(), 3);
        assert_eq!(store.nearest(21_000).unwrap().id(), 1);
    }

    #[test]
    fn test_clones_share_history() {
        let (_, store) = store(4);
        let reader = store.clone();
        store.push(closed(0, 0));

        assert_eq!(reader.len(), 1);
        assert_eq!(reader.session_id(), store.session_id());
    }

    #[test]
    fn test_stats_track_evictions() {
        let (clock, store) = store(2);
        for id in 0..5 {
            clock.advance(100);
            store.push(closed(id, 0));
        }

        let stats = store.get_stats();
        assert_eq!(stats.stored, 2);
        assert_eq!(stats.total_added, 5);
        assert_eq!(stats.latest_episode_id, Some(4));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let (clock, store) = store(4);
        store.push(closed(0, 0));
        let snapshot = store.snapshot();

        clock.advance(100);
        store.push(closed(1, 0));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_concurrent_reader() {
        let (clock, store) = store(8);
        let reader = store.clone();

        let handle = std::thread::spawn(move || {
            let mut seen = 0;
            for _ in 0..1_000 {
                // Whatever is visible must be internally consistent
                let latest = reader.latest(8);
                for pair in latest.windows(2) {
                    assert!(pair[0].id() > pair[1].id());
                }
                seen = seen.max(latest.len());
            }
            seen
        });

        for id in 0..100 {
            clock.advance(10);
            store.push(closed(id, 0));
        }

        let seen = handle.join().unwrap();
        assert!(seen <= 8);
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn test_total_added_shared_across_clones() {
        let (_, store) = store(4);

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.push(closed(w * 25 + i, 0));
                        let stats = store.get_stats();
                        assert!(stats.total_added >= 1 && stats.total_added <= 100);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let stats = store.clone().get_stats();
        assert_eq!(stats.total_added, 100);
        assert_eq!(stats.stored, 4);
    }
}
