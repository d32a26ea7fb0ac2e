pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn health_routes() -> Router<SharedState> {
    Router::new().route("/health", get(health::health))
}
