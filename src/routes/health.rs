use axum::extract::State;

use crate::error::AppError;
use crate::state::SharedState;

pub async fn health(State(state): State<SharedState>) -> Result<&'static str, AppError> {
    state.db.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {e}");
        AppError::Unavailable
    })?;
    Ok("ok")
}
