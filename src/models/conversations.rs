// One row per conversation the caller participates in, with the other side
// and the latest message flattened in for the inbox listing.
#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ConversationListRow {
    pub id: String,
    pub updated_at: String,
    pub other_profile_id: Option<String>,
    pub other_username: Option<String>,
    pub other_avatar_url: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<String>,
    pub unread_count: i64,
}
