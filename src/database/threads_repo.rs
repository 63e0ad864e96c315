use sqlx::SqlitePool;

use crate::models::{ThreadReplyRow, ThreadRow};

const SQL_INSERT_THREAD: &str = r#"
INSERT INTO threads (id, community_id, title, content, created_by)
VALUES (?, ?, ?, ?, ?)
"#;

pub async fn insert_thread(
    pool: &SqlitePool,
    id: &str,
    community_id: &str,
    title: &str,
    content: &str,
    created_by: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_THREAD)
        .bind(id)
        .bind(community_id)
        .bind(title)
        .bind(content)
        .bind(created_by)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_THREAD_COLUMNS: &str = r#"
SELECT
  t.id,
  t.community_id,
  t.title,
  t.content,
  t.is_pinned,
  t.created_by,
  p.username AS creator_username,
  t.created_at,
  (SELECT COUNT(*) FROM thread_replies r WHERE r.thread_id = t.id) AS replies_count,
  (SELECT COUNT(*) FROM thread_likes l WHERE l.thread_id = t.id) AS likes_count
FROM threads t
LEFT JOIN profiles p ON p.id = t.created_by
"#;

pub async fn find_thread_by_id(
    pool: &SqlitePool,
    thread_id: &str,
) -> sqlx::Result<Option<ThreadRow>> {
    let sql = format!("{} WHERE t.id = ?", SQL_THREAD_COLUMNS);
    sqlx::query_as::<_, ThreadRow>(&sql)
        .bind(thread_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_threads_for_community(
    pool: &SqlitePool,
    community_id: &str,
) -> sqlx::Result<Vec<ThreadRow>> {
    let sql = format!(
        "{} WHERE t.community_id = ? ORDER BY t.is_pinned DESC, t.created_at DESC",
        SQL_THREAD_COLUMNS
    );
    sqlx::query_as::<_, ThreadRow>(&sql)
        .bind(community_id)
        .fetch_all(pool)
        .await
}

const SQL_SET_THREAD_PINNED: &str = r#"
UPDATE threads
SET is_pinned = ?
WHERE id = ?
"#;

pub async fn set_thread_pinned(
    pool: &SqlitePool,
    thread_id: &str,
    pinned: bool,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_SET_THREAD_PINNED)
        .bind(pinned as i64)
        .bind(thread_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_INSERT_REPLY: &str = r#"
INSERT INTO thread_replies (id, thread_id, content, created_by)
VALUES (?, ?, ?, ?)
"#;

pub async fn insert_reply(
    pool: &SqlitePool,
    id: &str,
    thread_id: &str,
    content: &str,
    created_by: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_REPLY)
        .bind(id)
        .bind(thread_id)
        .bind(content)
        .bind(created_by)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_REPLIES: &str = r#"
SELECT
  r.id,
  r.thread_id,
  r.content,
  r.created_by,
  p.username AS creator_username,
  r.created_at
FROM thread_replies r
LEFT JOIN profiles p ON p.id = r.created_by
WHERE r.thread_id = ?
ORDER BY r.created_at ASC, r.rowid ASC
"#;

pub async fn list_replies(pool: &SqlitePool, thread_id: &str) -> sqlx::Result<Vec<ThreadReplyRow>> {
    sqlx::query_as::<_, ThreadReplyRow>(SQL_LIST_REPLIES)
        .bind(thread_id)
        .fetch_all(pool)
        .await
}

const SQL_FIND_LIKE: &str = r#"
SELECT COUNT(*)
FROM thread_likes
WHERE thread_id = ? AND profile_id = ?
"#;

const SQL_INSERT_LIKE: &str = r#"
INSERT INTO thread_likes (thread_id, profile_id)
VALUES (?, ?)
"#;

const SQL_DELETE_LIKE: &str = r#"
DELETE FROM thread_likes
WHERE thread_id = ? AND profile_id = ?
"#;

// Returns the new liked state, mirroring the toggle the client expects.
pub async fn toggle_like(
    pool: &SqlitePool,
    thread_id: &str,
    profile_id: &str,
) -> sqlx::Result<bool> {
    let existing: i64 = sqlx::query_scalar(SQL_FIND_LIKE)
        .bind(thread_id)
        .bind(profile_id)
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        sqlx::query(SQL_DELETE_LIKE)
            .bind(thread_id)
            .bind(profile_id)
            .execute(pool)
            .await?;
        Ok(false)
    } else {
        sqlx::query(SQL_INSERT_LIKE)
            .bind(thread_id)
            .bind(profile_id)
            .execute(pool)
            .await?;
        Ok(true)
    }
}
