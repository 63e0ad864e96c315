use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{conversations_repo, messages_repo, profiles_repo};
use crate::models::{ConversationListRow, MessageRow};

/// Finds the direct conversation between the two profiles, creating it (with
/// both participant rows) when none exists yet. Returns the conversation id.
pub async fn ensure_direct_conversation(
    pool: &SqlitePool,
    profile_id: &str,
    other_profile_id: &str,
) -> sqlx::Result<Option<String>> {
    if profile_id == other_profile_id {
        return Err(sqlx::Error::Protocol(
            "cannot start a conversation with yourself".into(),
        ));
    }
    if profiles_repo::find_profile_by_id(pool, other_profile_id)
        .await?
        .is_none()
    {
        return Ok(None);
    }

    if let Some(existing) =
        conversations_repo::find_direct_conversation(pool, profile_id, other_profile_id).await?
    {
        return Ok(Some(existing));
    }

    let id = Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;
    conversations_repo::insert_conversation(&mut *tx, &id).await?;
    conversations_repo::insert_participant(&mut *tx, &id, profile_id).await?;
    conversations_repo::insert_participant(&mut *tx, &id, other_profile_id).await?;
    tx.commit().await?;

    Ok(Some(id))
}

pub async fn list_inbox(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Vec<ConversationListRow>> {
    conversations_repo::list_for_profile(pool, profile_id).await
}

/// Messages oldest-first; None when the caller is not a participant.
pub async fn list_messages(
    pool: &SqlitePool,
    conversation_id: &str,
    profile_id: &str,
    limit: i64,
) -> sqlx::Result<Option<Vec<MessageRow>>> {
    if !conversations_repo::is_participant(pool, conversation_id, profile_id).await? {
        return Ok(None);
    }
    messages_repo::list_messages(pool, conversation_id, limit.clamp(1, 500))
        .await
        .map(Some)
}

/// Stores the message and bumps the conversation's activity timestamp in one
/// transaction so the inbox ordering can never drift from the messages.
pub async fn send_message(
    pool: &SqlitePool,
    conversation_id: &str,
    sender_profile_id: &str,
    content: &str,
) -> sqlx::Result<Option<MessageRow>> {
    let content = content.trim();
    if content.is_empty() {
        return Err(sqlx::Error::Protocol("message content is required".into()));
    }
    if !conversations_repo::is_participant(pool, conversation_id, sender_profile_id).await? {
        return Ok(None);
    }

    let id = Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;
    messages_repo::insert_message(&mut *tx, &id, conversation_id, sender_profile_id, content)
        .await?;
    conversations_repo::touch_conversation(&mut *tx, conversation_id).await?;
    tx.commit().await?;

    messages_repo::find_message_by_id(pool, &id).await
}

pub async fn mark_conversation_read(
    pool: &SqlitePool,
    conversation_id: &str,
    reader_profile_id: &str,
) -> sqlx::Result<Option<u64>> {
    if !conversations_repo::is_participant(pool, conversation_id, reader_profile_id).await? {
        return Ok(None);
    }
    messages_repo::mark_read(pool, conversation_id, reader_profile_id)
        .await
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        schema::init_schema(&pool).await.expect("schema init");
        pool
    }

    async fn seed_profile(pool: &SqlitePool, id: &str) {
        crate::database::profiles_repo::upsert_profile(
            pool,
            crate::database::profiles_repo::ProfileUpsert {
                id,
                username: id,
                full_name: None,
                avatar_url: None,
                bio: None,
                location: None,
                website: None,
                occupation: None,
                interests: None,
                country: None,
                city: None,
            },
        )
        .await
        .expect("seed profile");
    }

    #[tokio::test]
    async fn direct_conversation_is_reused_between_the_same_pair() {
        let pool = test_pool().await;
        seed_profile(&pool, "alice").await;
        seed_profile(&pool, "bob").await;

        let first = ensure_direct_conversation(&pool, "alice", "bob")
            .await
            .unwrap()
            .expect("conversation created");
        let second = ensure_direct_conversation(&pool, "bob", "alice")
            .await
            .unwrap()
            .expect("conversation found");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn send_and_read_flow_updates_unread_counts() {
        let pool = test_pool().await;
        seed_profile(&pool, "alice").await;
        seed_profile(&pool, "bob").await;

        let conversation_id = ensure_direct_conversation(&pool, "alice", "bob")
            .await
            .unwrap()
            .expect("conversation");

        send_message(&pool, &conversation_id, "alice", "hey!")
            .await
            .unwrap()
            .expect("message stored");

        // Bob sees one unread message from alice in his inbox.
        let inbox = list_inbox(&pool, "bob").await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].unread_count, 1);
        assert_eq!(inbox[0].last_message.as_deref(), Some("hey!"));

        let marked = mark_conversation_read(&pool, &conversation_id, "bob")
            .await
            .unwrap()
            .expect("participant");
        assert_eq!(marked, 1);

        let inbox = list_inbox(&pool, "bob").await.unwrap();
        assert_eq!(inbox[0].unread_count, 0);
    }

    #[tokio::test]
    async fn outsiders_cannot_read_or_post() {
        let pool = test_pool().await;
        seed_profile(&pool, "alice").await;
        seed_profile(&pool, "bob").await;

        let conversation_id = ensure_direct_conversation(&pool, "alice", "bob")
            .await
            .unwrap()
            .expect("conversation");

        assert!(list_messages(&pool, &conversation_id, "mallory", 50)
            .await
            .unwrap()
            .is_none());
        assert!(send_message(&pool, &conversation_id, "mallory", "hi")
            .await
            .unwrap()
            .is_none());
    }
}
