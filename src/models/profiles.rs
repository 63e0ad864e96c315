#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ProfileRow {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub occupation: Option<String>,
    pub interests: Option<String>, // JSON array of interest names
    pub country: Option<String>,
    pub city: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct RelationshipRow {
    pub follower_id: String,
    pub following_id: String,
    pub status: String, // pending|accepted|blocked
    pub created_at: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}
