// Episode Routes - Read-only views over the closed-episode history
//
// GET /health
// GET /episodes/latest?count=N     newest first, count defaults to 1
// GET /episodes/nearest?timestamp=T

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::TelemetryError;
use crate::layer2::episode::Episode;
use crate::server::error::{AppError, AppResult};
use crate::server::state::ServerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub session_id: Uuid,
    pub episodes_stored: usize,
    pub episodes_closed: u64,
    pub uptime_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct EpisodesResponse {
    pub session_id: Uuid,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Serialize)]
pub struct EpisodeResponse {
    pub session_id: Uuid,
    pub episode: Episode,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let stats = state.store.get_stats();

    Json(HealthResponse {
        status: "healthy",
        session_id: stats.session_id,
        episodes_stored: stats.stored,
        episodes_closed: stats.total_added,
        uptime_secs: state.uptime_secs(),
    })
}

pub async fn latest(
    State(state): State<ServerState>,
    Query(query): Query<LatestQuery>,
) -> AppResult<Json<EpisodesResponse>> {
    let count = query.count.unwrap_or(1);
    if count == 0 {
        return Err(AppError::BadRequest("count must be > 0".to_string()));
    }

    let episodes = state.store.latest(count.min(state.max_latest));
    if episodes.is_empty() {
        return Err(TelemetryError::EmptyHistory.into());
    }

    Ok(Json(EpisodesResponse {
        session_id: state.store.session_id(),
        episodes,
    }))
}

pub async fn nearest(
    State(state): State<ServerState>,
    Query(query): Query<NearestQuery>,
) -> AppResult<Json<EpisodeResponse>> {
    let episode = state.store.nearest(query.timestamp)?;

    Ok(Json(EpisodeResponse {
        session_id: state.store.session_id(),
        episode,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::layer2::episode::OpenEpisode;
    use crate::layer2::episode_store::EpisodeStore;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn state_with(episodes: u64, max_latest: usize) -> ServerState {
        let clock = Arc::new(ManualClock::new(0));
        let store = EpisodeStore::new(16, clock.clone()).unwrap();
        for id in 0..episodes {
            clock.set(10_000 * (id as i64 + 1));
            let mut metrics = BTreeMap::new();
            metrics.insert("avg_speed".to_string(), id as f64);
            store.push(OpenEpisode::new(id, 10_000 * id as i64, 10_000).finalize(metrics));
        }
        ServerState::new(store, max_latest)
    }

    #[tokio::test]
    async fn test_health() {
        let state = state_with(3, 10);
        let Json(body) = health(State(state.clone())).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.episodes_stored, 3);
        assert_eq!(body.session_id, state.store.session_id());
    }

    #[tokio::test]
    async fn test_latest_defaults_to_one() {
        let state = state_with(3, 10);
        let Json(body) = latest(State(state), Query(LatestQuery::default())).await.unwrap();
        assert_eq!(body.episodes.len(), 1);
        assert_eq!(body.episodes[0].id(), 2);
    }

    #[tokio::test]
    async fn test_latest_clamped() {
        let state = state_with(5, 2);
        let Json(body) = latest(State(state), Query(LatestQuery { count: Some(50) }))
            .await
            .unwrap();
        let ids: Vec<u64> = body.episodes.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[tokio::test]
    async fn test_latest_errors() {
        let empty = state_with(0, 10);
        let result = latest(State(empty), Query(LatestQuery { count: Some(3) })).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let state = state_with(1, 10);
        let result = latest(State(state), Query(LatestQuery { count: Some(0) })).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_nearest() {
        let state = state_with(4, 10);
        let Json(body) = nearest(State(state), Query(NearestQuery { timestamp: 29_000 }))
            .await
            .unwrap();
        assert_eq!(body.episode.id(), 2);
        assert_eq!(body.episode.metric("avg_speed"), Some(2.0));

        let empty = state_with(0, 10);
        let result = nearest(State(empty), Query(NearestQuery { timestamp: 0 })).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
