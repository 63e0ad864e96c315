#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct EventRow {
    pub id: String,
    pub community_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_type: String, // online|offline|hybrid
    pub meeting_link: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub max_attendees: Option<i64>,
    pub is_private: i64,
    pub created_by: Option<String>,
    pub created_at: String,
}

// Event plus the aggregates the detail endpoint renders.
#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct EventDetailRow {
    pub id: String,
    pub community_id: String,
    pub community_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_type: String,
    pub meeting_link: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub max_attendees: Option<i64>,
    pub is_private: i64,
    pub created_by: Option<String>,
    pub creator_username: Option<String>,
    pub created_at: String,
    pub confirmed_count: i64,
    pub waitlist_count: i64,
}
