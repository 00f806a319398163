// Server - HTTP exposition of the episode history
// Runs on tokio alongside the tick thread; only ever reads the store

pub mod app;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{create_app, serve};
pub use error::{AppError, AppResult};
pub use state::ServerState;
