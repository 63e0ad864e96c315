use sqlx::SqlitePool;
use sqlx::SqliteExecutor;

use crate::models::{EventDetailRow, EventRow};

const SQL_INSERT_EVENT: &str = r#"
INSERT INTO events (
  id,
  community_id,
  title,
  description,
  location,
  event_type,
  meeting_link,
  start_time,
  end_time,
  max_attendees,
  is_private,
  created_by
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

#[allow(dead_code)]
pub struct NewEvent<'a> {
    pub id: &'a str,
    pub community_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub event_type: &'a str, // online|offline|hybrid
    pub meeting_link: Option<&'a str>,
    pub start_time: &'a str,
    pub end_time: Option<&'a str>,
    pub max_attendees: Option<i64>,
    pub is_private: bool,
    pub created_by: &'a str,
}

pub async fn insert_event(pool: &SqlitePool, event: NewEvent<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_EVENT)
        .bind(event.id)
        .bind(event.community_id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.location)
        .bind(event.event_type)
        .bind(event.meeting_link)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.max_attendees)
        .bind(event.is_private as i64)
        .bind(event.created_by)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_FIND_EVENT: &str = r#"
SELECT
  id,
  community_id,
  title,
  description,
  location,
  event_type,
  meeting_link,
  start_time,
  end_time,
  max_attendees,
  is_private,
  created_by,
  created_at
FROM events
WHERE id = ?
"#;

pub async fn find_event_by_id<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
) -> sqlx::Result<Option<EventRow>> {
    sqlx::query_as::<_, EventRow>(SQL_FIND_EVENT)
        .bind(event_id)
        .fetch_optional(ex)
        .await
}

const SQL_LOAD_EVENT_DETAIL: &str = r#"
SELECT
  e.id,
  e.community_id,
  c.name AS community_name,
  e.title,
  e.description,
  e.location,
  e.event_type,
  e.meeting_link,
  e.start_time,
  e.end_time,
  e.max_attendees,
  e.is_private,
  e.created_by,
  p.username AS creator_username,
  e.created_at,
  (SELECT COUNT(*) FROM event_attendees a
   WHERE a.event_id = e.id AND a.status = 'confirmed') AS confirmed_count,
  (SELECT COUNT(*) FROM event_attendees a
   WHERE a.event_id = e.id AND a.status = 'waitlist') AS waitlist_count
FROM events e
LEFT JOIN communities c ON c.id = e.community_id
LEFT JOIN profiles p ON p.id = e.created_by
WHERE e.id = ?
"#;

pub async fn load_event_detail(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Option<EventDetailRow>> {
    sqlx::query_as::<_, EventDetailRow>(SQL_LOAD_EVENT_DETAIL)
        .bind(event_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_UPCOMING_PUBLIC: &str = r#"
SELECT
  id,
  community_id,
  title,
  description,
  location,
  event_type,
  meeting_link,
  start_time,
  end_time,
  max_attendees,
  is_private,
  created_by,
  created_at
FROM events
WHERE is_private = 0
  AND datetime(start_time) >= datetime('now')
ORDER BY start_time ASC
LIMIT ?
"#;

pub async fn list_upcoming_public(pool: &SqlitePool, limit: i64) -> sqlx::Result<Vec<EventRow>> {
    sqlx::query_as::<_, EventRow>(SQL_LIST_UPCOMING_PUBLIC)
        .bind(limit)
        .fetch_all(pool)
        .await
}

const SQL_LIST_FOR_COMMUNITY: &str = r#"
SELECT
  id,
  community_id,
  title,
  description,
  location,
  event_type,
  meeting_link,
  start_time,
  end_time,
  max_attendees,
  is_private,
  created_by,
  created_at
FROM events
WHERE community_id = ?
ORDER BY start_time ASC
"#;

pub async fn list_for_community(
    pool: &SqlitePool,
    community_id: &str,
) -> sqlx::Result<Vec<EventRow>> {
    sqlx::query_as::<_, EventRow>(SQL_LIST_FOR_COMMUNITY)
        .bind(community_id)
        .fetch_all(pool)
        .await
}
