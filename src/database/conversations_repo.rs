use sqlx::SqliteExecutor;
use sqlx::SqlitePool;

use crate::models::ConversationListRow;

// Direct conversations only: find the one conversation both profiles
// participate in, if any.
const SQL_FIND_DIRECT_CONVERSATION: &str = r#"
SELECT a.conversation_id
FROM conversation_participants a
JOIN conversation_participants b
  ON b.conversation_id = a.conversation_id
WHERE a.profile_id = ? AND b.profile_id = ?
LIMIT 1
"#;

pub async fn find_direct_conversation(
    pool: &SqlitePool,
    profile_a: &str,
    profile_b: &str,
) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar::<_, String>(SQL_FIND_DIRECT_CONVERSATION)
        .bind(profile_a)
        .bind(profile_b)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_CONVERSATION: &str = r#"
INSERT INTO conversations (id) VALUES (?)
"#;

pub async fn insert_conversation<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_CONVERSATION)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

const SQL_INSERT_PARTICIPANT: &str = r#"
INSERT INTO conversation_participants (conversation_id, profile_id)
VALUES (?, ?)
"#;

pub async fn insert_participant<'e>(
    ex: impl SqliteExecutor<'e>,
    conversation_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_PARTICIPANT)
        .bind(conversation_id)
        .bind(profile_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

const SQL_IS_PARTICIPANT: &str = r#"
SELECT COUNT(*)
FROM conversation_participants
WHERE conversation_id = ? AND profile_id = ?
"#;

pub async fn is_participant(
    pool: &SqlitePool,
    conversation_id: &str,
    profile_id: &str,
) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_IS_PARTICIPANT)
        .bind(conversation_id)
        .bind(profile_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

// Inbox listing: one row per conversation with the other participant and the
// latest message flattened in, newest activity first.
const SQL_LIST_FOR_PROFILE: &str = r#"
SELECT
  c.id,
  c.updated_at,
  o.profile_id AS other_profile_id,
  p.username AS other_username,
  p.avatar_url AS other_avatar_url,
  (SELECT m.content FROM messages m
   WHERE m.conversation_id = c.id
   ORDER BY m.created_at DESC, m.rowid DESC LIMIT 1) AS last_message,
  (SELECT m.created_at FROM messages m
   WHERE m.conversation_id = c.id
   ORDER BY m.created_at DESC, m.rowid DESC LIMIT 1) AS last_message_at,
  (SELECT COUNT(*) FROM messages m
   WHERE m.conversation_id = c.id
     AND m.sender_id != ?1
     AND m.is_read = 0) AS unread_count
FROM conversations c
JOIN conversation_participants me
  ON me.conversation_id = c.id AND me.profile_id = ?1
LEFT JOIN conversation_participants o
  ON o.conversation_id = c.id AND o.profile_id != ?1
LEFT JOIN profiles p ON p.id = o.profile_id
ORDER BY c.updated_at DESC
"#;

pub async fn list_for_profile(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Vec<ConversationListRow>> {
    sqlx::query_as::<_, ConversationListRow>(SQL_LIST_FOR_PROFILE)
        .bind(profile_id)
        .fetch_all(pool)
        .await
}

const SQL_TOUCH_CONVERSATION: &str = r#"
UPDATE conversations
SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ','now')
WHERE id = ?
"#;

pub async fn touch_conversation<'e>(
    ex: impl SqliteExecutor<'e>,
    conversation_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_TOUCH_CONVERSATION)
        .bind(conversation_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}
