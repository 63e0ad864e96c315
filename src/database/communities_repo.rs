use sqlx::SqliteExecutor;
use sqlx::SqlitePool;

use crate::models::CommunityRow;

const SQL_INSERT_COMMUNITY: &str = r#"
INSERT INTO communities (id, name, description, cover_image, country, city, created_by)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

#[allow(dead_code)]
pub struct NewCommunity<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub cover_image: Option<&'a str>,
    pub country: Option<&'a str>,
    pub city: Option<&'a str>,
    pub created_by: &'a str,
}

pub async fn insert_community<'e>(
    ex: impl SqliteExecutor<'e>,
    community: NewCommunity<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_COMMUNITY)
        .bind(community.id)
        .bind(community.name)
        .bind(community.description)
        .bind(community.cover_image)
        .bind(community.country)
        .bind(community.city)
        .bind(community.created_by)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

const SQL_FIND_COMMUNITY: &str = r#"
SELECT
  c.id,
  c.name,
  c.description,
  c.cover_image,
  c.country,
  c.city,
  c.created_by,
  c.created_at,
  (SELECT COUNT(*) FROM community_members m
   WHERE m.community_id = c.id AND m.status = 'approved') AS members_count
FROM communities c
WHERE c.id = ?
"#;

pub async fn find_community_by_id(
    pool: &SqlitePool,
    community_id: &str,
) -> sqlx::Result<Option<CommunityRow>> {
    sqlx::query_as::<_, CommunityRow>(SQL_FIND_COMMUNITY)
        .bind(community_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_COMMUNITIES: &str = r#"
SELECT
  c.id,
  c.name,
  c.description,
  c.cover_image,
  c.country,
  c.city,
  c.created_by,
  c.created_at,
  (SELECT COUNT(*) FROM community_members m
   WHERE m.community_id = c.id AND m.status = 'approved') AS members_count
FROM communities c
ORDER BY c.created_at DESC
LIMIT ?
"#;

pub async fn list_communities(pool: &SqlitePool, limit: i64) -> sqlx::Result<Vec<CommunityRow>> {
    sqlx::query_as::<_, CommunityRow>(SQL_LIST_COMMUNITIES)
        .bind(limit)
        .fetch_all(pool)
        .await
}
