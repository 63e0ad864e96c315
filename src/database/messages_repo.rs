use sqlx::SqliteExecutor;
use sqlx::SqlitePool;

use crate::models::MessageRow;

const SQL_INSERT_MESSAGE: &str = r#"
INSERT INTO messages (id, conversation_id, sender_id, content)
VALUES (?, ?, ?, ?)
"#;

pub async fn insert_message<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    conversation_id: &str,
    sender_id: &str,
    content: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_MESSAGE)
        .bind(id)
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

const SQL_FIND_MESSAGE: &str = r#"
SELECT id, conversation_id, sender_id, content, is_read, created_at
FROM messages
WHERE id = ?
"#;

pub async fn find_message_by_id(
    pool: &SqlitePool,
    message_id: &str,
) -> sqlx::Result<Option<MessageRow>> {
    sqlx::query_as::<_, MessageRow>(SQL_FIND_MESSAGE)
        .bind(message_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_MESSAGES: &str = r#"
SELECT id, conversation_id, sender_id, content, is_read, created_at
FROM messages
WHERE conversation_id = ?
ORDER BY created_at ASC, rowid ASC
LIMIT ?
"#;

pub async fn list_messages(
    pool: &SqlitePool,
    conversation_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<MessageRow>> {
    sqlx::query_as::<_, MessageRow>(SQL_LIST_MESSAGES)
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}

// Marks everything the *other* side sent as read.
const SQL_MARK_READ: &str = r#"
UPDATE messages
SET is_read = 1
WHERE conversation_id = ? AND sender_id != ? AND is_read = 0
"#;

pub async fn mark_read(
    pool: &SqlitePool,
    conversation_id: &str,
    reader_profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_READ)
        .bind(conversation_id)
        .bind(reader_profile_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
