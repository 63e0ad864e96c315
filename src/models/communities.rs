#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct CommunityRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub members_count: i64,
}
