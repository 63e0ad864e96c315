use sqlx::SqlitePool;

use crate::services::attendance_service::EventLocks;

/// Shared state cloned into every handler: the connection pool plus the
/// per-event lock registry the attendance service serializes on.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub event_locks: EventLocks,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        AppState {
            pool,
            event_locks: EventLocks::default(),
        }
    }
}
