// High-churn attendance rows; one row per (event, profile), removal is a
// physical delete.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct EventAttendeeRow {
    pub event_id: String,
    pub profile_id: String,
    pub status: String, // confirmed|waitlist
    pub created_at: String,
}
