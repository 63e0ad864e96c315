use sqlx::SqliteExecutor;

use crate::models::EventAttendeeRow;

// Admission status is computed inside the INSERT itself so the capacity
// check and the write land in one atomic statement; two racing joins can
// never both read a stale confirmed count.
const SQL_INSERT_ADMITTED: &str = r#"
INSERT INTO event_attendees (event_id, profile_id, status)
SELECT ?1, ?2,
  CASE
    WHEN (SELECT max_attendees FROM events WHERE id = ?1) IS NULL THEN 'confirmed'
    WHEN (SELECT COUNT(*) FROM event_attendees
          WHERE event_id = ?1 AND status = 'confirmed')
         < (SELECT max_attendees FROM events WHERE id = ?1) THEN 'confirmed'
    ELSE 'waitlist'
  END
"#;

const SQL_FIND_ATTENDEE: &str = r#"
SELECT event_id, profile_id, status, created_at
FROM event_attendees
WHERE event_id = ? AND profile_id = ?
"#;

const SQL_DELETE_ATTENDEE: &str = r#"
DELETE FROM event_attendees
WHERE event_id = ? AND profile_id = ?
"#;

const SQL_COUNT_CONFIRMED: &str = r#"
SELECT COUNT(*)
FROM event_attendees
WHERE event_id = ? AND status = 'confirmed'
"#;

// Promotion order: FIFO by join time, rowid as insertion-order tiebreak.
const SQL_OLDEST_WAITLISTED: &str = r#"
SELECT event_id, profile_id, status, created_at
FROM event_attendees
WHERE event_id = ? AND status = 'waitlist'
ORDER BY created_at ASC, rowid ASC
LIMIT 1
"#;

const SQL_SET_STATUS: &str = r#"
UPDATE event_attendees
SET status = ?
WHERE event_id = ? AND profile_id = ?
"#;

// Conditional confirm for explicit waitlist -> confirmed moves; affects no
// rows when the event is already at capacity.
const SQL_CONFIRM_IF_CAPACITY: &str = r#"
UPDATE event_attendees
SET status = 'confirmed'
WHERE event_id = ?1 AND profile_id = ?2
  AND (
    (SELECT max_attendees FROM events WHERE id = ?1) IS NULL
    OR (SELECT COUNT(*) FROM event_attendees
        WHERE event_id = ?1 AND status = 'confirmed')
       < (SELECT max_attendees FROM events WHERE id = ?1)
  )
"#;

const SQL_LIST_BY_STATUS: &str = r#"
SELECT event_id, profile_id, status, created_at
FROM event_attendees
WHERE event_id = ? AND status = ?
ORDER BY created_at ASC, rowid ASC
"#;

pub async fn insert_admitted<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ADMITTED)
        .bind(event_id)
        .bind(profile_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn find_attendee<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<Option<EventAttendeeRow>> {
    sqlx::query_as::<_, EventAttendeeRow>(SQL_FIND_ATTENDEE)
        .bind(event_id)
        .bind(profile_id)
        .fetch_optional(ex)
        .await
}

pub async fn delete_attendee<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_ATTENDEE)
        .bind(event_id)
        .bind(profile_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn count_confirmed<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_CONFIRMED)
        .bind(event_id)
        .fetch_one(ex)
        .await
}

pub async fn find_oldest_waitlisted<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
) -> sqlx::Result<Option<EventAttendeeRow>> {
    sqlx::query_as::<_, EventAttendeeRow>(SQL_OLDEST_WAITLISTED)
        .bind(event_id)
        .fetch_optional(ex)
        .await
}

pub async fn set_status<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
    profile_id: &str,
    status: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_SET_STATUS)
        .bind(status)
        .bind(event_id)
        .bind(profile_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn confirm_if_capacity<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_CONFIRM_IF_CAPACITY)
        .bind(event_id)
        .bind(profile_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_by_status<'e>(
    ex: impl SqliteExecutor<'e>,
    event_id: &str,
    status: &str,
) -> sqlx::Result<Vec<EventAttendeeRow>> {
    sqlx::query_as::<_, EventAttendeeRow>(SQL_LIST_BY_STATUS)
        .bind(event_id)
        .bind(status)
        .fetch_all(ex)
        .await
}
