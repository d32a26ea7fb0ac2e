pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::email::Mailer;
use crate::state::{AppState, SharedState};

pub fn build_app(db: Database, config: Config) -> (Router, SharedState) {
    let mailer = config.smtp.as_ref().and_then(|smtp| match Mailer::new(smtp) {
        Ok(mailer) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "SMTP configured");
            Some(Arc::new(mailer))
        }
        Err(e) => {
            tracing::warn!("SMTP not available: {e}");
            None
        }
    });

    let state: SharedState = Arc::new(AppState { db, mailer });

    let app = Router::new()
        .merge(routes::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    (app, state)
}
