use std::sync::Arc;

use crate::db::Database;
use crate::email::Mailer;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub db: Database,
    pub mailer: Option<Arc<Mailer>>,
}
