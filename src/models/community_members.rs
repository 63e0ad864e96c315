#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct CommunityMemberRow {
    pub community_id: String,
    pub profile_id: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub is_admin: i64,
    pub status: String, // pending|approved|rejected|banned
    pub joined_at: String,
}
