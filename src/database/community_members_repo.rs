use sqlx::SqliteExecutor;
use sqlx::SqlitePool;

use crate::models::CommunityMemberRow;

const SQL_INSERT_MEMBER: &str = r#"
INSERT INTO community_members (community_id, profile_id, role, is_admin, status)
VALUES (?, ?, ?, ?, ?)
"#;

pub async fn insert_member<'e>(
    ex: impl SqliteExecutor<'e>,
    community_id: &str,
    profile_id: &str,
    role: &str,
    is_admin: bool,
    status: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_MEMBER)
        .bind(community_id)
        .bind(profile_id)
        .bind(role)
        .bind(is_admin as i64)
        .bind(status)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

const SQL_FIND_MEMBER: &str = r#"
SELECT
  m.community_id,
  m.profile_id,
  p.username,
  p.avatar_url,
  m.role,
  m.is_admin,
  m.status,
  m.joined_at
FROM community_members m
LEFT JOIN profiles p ON p.id = m.profile_id
WHERE m.community_id = ? AND m.profile_id = ?
"#;

pub async fn find_member(
    pool: &SqlitePool,
    community_id: &str,
    profile_id: &str,
) -> sqlx::Result<Option<CommunityMemberRow>> {
    sqlx::query_as::<_, CommunityMemberRow>(SQL_FIND_MEMBER)
        .bind(community_id)
        .bind(profile_id)
        .fetch_optional(pool)
        .await
}

const SQL_DELETE_MEMBER: &str = r#"
DELETE FROM community_members
WHERE community_id = ? AND profile_id = ?
"#;

pub async fn delete_member(
    pool: &SqlitePool,
    community_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_MEMBER)
        .bind(community_id)
        .bind(profile_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_MEMBERS: &str = r#"
SELECT
  m.community_id,
  m.profile_id,
  p.username,
  p.avatar_url,
  m.role,
  m.is_admin,
  m.status,
  m.joined_at
FROM community_members m
LEFT JOIN profiles p ON p.id = m.profile_id
WHERE m.community_id = ?
ORDER BY m.joined_at ASC
"#;

pub async fn list_members(
    pool: &SqlitePool,
    community_id: &str,
) -> sqlx::Result<Vec<CommunityMemberRow>> {
    sqlx::query_as::<_, CommunityMemberRow>(SQL_LIST_MEMBERS)
        .bind(community_id)
        .fetch_all(pool)
        .await
}

const SQL_UPDATE_MEMBER_STATUS: &str = r#"
UPDATE community_members
SET status = ?
WHERE community_id = ? AND profile_id = ?
"#;

pub async fn update_member_status(
    pool: &SqlitePool,
    community_id: &str,
    profile_id: &str,
    status: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_MEMBER_STATUS)
        .bind(status)
        .bind(community_id)
        .bind(profile_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE_MEMBER_ADMIN: &str = r#"
UPDATE community_members
SET is_admin = ?
WHERE community_id = ? AND profile_id = ?
"#;

pub async fn update_member_admin(
    pool: &SqlitePool,
    community_id: &str,
    profile_id: &str,
    is_admin: bool,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_MEMBER_ADMIN)
        .bind(is_admin as i64)
        .bind(community_id)
        .bind(profile_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
