#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ThreadRow {
    pub id: String,
    pub community_id: String,
    pub title: String,
    pub content: String,
    pub is_pinned: i64,
    pub created_by: Option<String>,
    pub creator_username: Option<String>,
    pub created_at: String,
    pub replies_count: i64,
    pub likes_count: i64,
}

#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ThreadReplyRow {
    pub id: String,
    pub thread_id: String,
    pub content: String,
    pub created_by: Option<String>,
    pub creator_username: Option<String>,
    pub created_at: String,
}
