// Server App - Router, middleware and the serve loop

use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::config::ServerConfig;
use crate::layer2::episode_store::EpisodeStore;
use crate::server::routes;
use crate::server::state::ServerState;

pub fn create_app(state: ServerState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/episodes/latest", get(routes::latest))
        .route("/episodes/nearest", get(routes::nearest))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Bind `config.bind_addr` and serve `store` until `shutdown` resolves
pub async fn serve(
    config: &ServerConfig,
    store: EpisodeStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let state = ServerState::new(store, config.max_latest);
    let app = create_app(state, Duration::from_secs(config.request_timeout_secs));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;
    info!(addr = %addr, "Episode server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use std::sync::Arc;

    #[test]
    fn test_create_app() {
        let store = EpisodeStore::new(4, Arc::new(ManualClock::new(0))).unwrap();
        let _app = create_app(ServerState::new(store, 10), Duration::from_secs(5));
    }
}
