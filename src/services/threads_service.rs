use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{communities_repo, threads_repo};
use crate::models::{ThreadReplyRow, ThreadRow};

pub struct ThreadDetailView {
    pub thread: ThreadRow,
    pub replies: Vec<ThreadReplyRow>,
}

pub async fn create_thread(
    pool: &SqlitePool,
    community_id: &str,
    creator_profile_id: &str,
    title: &str,
    content: &str,
) -> sqlx::Result<Option<ThreadRow>> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() || content.is_empty() {
        return Err(sqlx::Error::Protocol("title and content are required".into()));
    }

    if communities_repo::find_community_by_id(pool, community_id)
        .await?
        .is_none()
    {
        return Ok(None);
    }

    let id = Uuid::new_v4().to_string();
    threads_repo::insert_thread(pool, &id, community_id, title, content, creator_profile_id)
        .await?;
    threads_repo::find_thread_by_id(pool, &id).await
}

pub async fn list_community_threads(
    pool: &SqlitePool,
    community_id: &str,
) -> sqlx::Result<Vec<ThreadRow>> {
    threads_repo::list_threads_for_community(pool, community_id).await
}

pub async fn load_thread_detail(
    pool: &SqlitePool,
    thread_id: &str,
) -> sqlx::Result<Option<ThreadDetailView>> {
    let Some(thread) = threads_repo::find_thread_by_id(pool, thread_id).await? else {
        return Ok(None);
    };
    let replies = threads_repo::list_replies(pool, thread_id).await?;
    Ok(Some(ThreadDetailView { thread, replies }))
}

pub async fn create_reply(
    pool: &SqlitePool,
    thread_id: &str,
    creator_profile_id: &str,
    content: &str,
) -> sqlx::Result<Option<ThreadReplyRow>> {
    let content = content.trim();
    if content.is_empty() {
        return Err(sqlx::Error::Protocol("reply content is required".into()));
    }

    if threads_repo::find_thread_by_id(pool, thread_id).await?.is_none() {
        return Ok(None);
    }

    let id = Uuid::new_v4().to_string();
    threads_repo::insert_reply(pool, &id, thread_id, content, creator_profile_id).await?;

    let replies = threads_repo::list_replies(pool, thread_id).await?;
    Ok(replies.into_iter().find(|r| r.id == id))
}

/// Returns the new liked state (true = now liked).
pub async fn toggle_like(
    pool: &SqlitePool,
    thread_id: &str,
    profile_id: &str,
) -> sqlx::Result<Option<bool>> {
    if threads_repo::find_thread_by_id(pool, thread_id).await?.is_none() {
        return Ok(None);
    }
    threads_repo::toggle_like(pool, thread_id, profile_id)
        .await
        .map(Some)
}

pub async fn set_pinned(
    pool: &SqlitePool,
    thread_id: &str,
    pinned: bool,
) -> sqlx::Result<Option<ThreadRow>> {
    if threads_repo::set_thread_pinned(pool, thread_id, pinned).await? == 0 {
        return Ok(None);
    }
    threads_repo::find_thread_by_id(pool, thread_id).await
}
