use std::collections::HashMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::database::{event_attendees_repo, events_repo};
use crate::models::EventAttendeeRow;

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_WAITLIST: &str = "waitlist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Confirmed,
    Waitlist,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Confirmed => STATUS_CONFIRMED,
            AttendanceStatus::Waitlist => STATUS_WAITLIST,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            STATUS_CONFIRMED => Some(AttendanceStatus::Confirmed),
            STATUS_WAITLIST => Some(AttendanceStatus::Waitlist),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("event not found")]
    EventNotFound,
    #[error("already registered for this event")]
    AlreadyRegistered,
    #[error("not registered for this event")]
    NotRegistered,
    #[error("capacity was filled by a concurrent request")]
    CapacityRaceLost,
    #[error("waitlist promotion failed")]
    PromotionFailed(#[source] sqlx::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Per-event mutual exclusion for attendance mutations. Operations on
/// different events proceed in parallel; mutations on the same event
/// serialize so the cancel+promote unit never interleaves with a racing
/// join or cancellation.
#[derive(Clone, Default)]
pub struct EventLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl EventLocks {
    pub async fn acquire(&self, event_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(event_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[derive(Debug)]
pub struct WaitlistEntry {
    pub position: i64, // 1-indexed, recomputed from ordering, never stored
    pub row: EventAttendeeRow,
}

#[derive(Debug)]
pub struct AttendanceRoster {
    pub confirmed: Vec<EventAttendeeRow>,
    pub waitlisted: Vec<WaitlistEntry>,
}

#[derive(Debug)]
pub struct CancelOutcome {
    pub cancelled: EventAttendeeRow,
    pub promoted: Option<EventAttendeeRow>,
}

/// First RSVP for (event, profile). Admits into `confirmed` iff the
/// confirmed count is under capacity at the instant of insertion (unlimited
/// events always confirm), else inserts as `waitlist`. The status decision
/// and the insert are one statement; the compound primary key turns a
/// duplicate request into `AlreadyRegistered` instead of a second row, so
/// retries after ambiguous failures are safe.
pub async fn request_attendance(
    pool: &SqlitePool,
    locks: &EventLocks,
    event_id: &str,
    profile_id: &str,
) -> Result<EventAttendeeRow, AttendanceError> {
    let _guard = locks.acquire(event_id).await;

    if events_repo::find_event_by_id(pool, event_id).await?.is_none() {
        return Err(AttendanceError::EventNotFound);
    }

    if let Err(e) = event_attendees_repo::insert_admitted(pool, event_id, profile_id).await {
        if is_unique_violation(&e) {
            return Err(AttendanceError::AlreadyRegistered);
        }
        return Err(e.into());
    }

    event_attendees_repo::find_attendee(pool, event_id, profile_id)
        .await?
        .ok_or(AttendanceError::Database(sqlx::Error::RowNotFound))
}

/// Deletes the caller's row regardless of status. When the deleted row was
/// confirmed and the event has finite capacity, the oldest waitlisted row is
/// promoted in the same transaction; outside observers never see an
/// oversubscribed event or an empty slot with a pending promotion.
pub async fn cancel_attendance(
    pool: &SqlitePool,
    locks: &EventLocks,
    event_id: &str,
    profile_id: &str,
) -> Result<CancelOutcome, AttendanceError> {
    let _guard = locks.acquire(event_id).await;

    let Some(event) = events_repo::find_event_by_id(pool, event_id).await? else {
        return Err(AttendanceError::EventNotFound);
    };

    let mut tx = pool.begin().await?;

    let Some(existing) =
        event_attendees_repo::find_attendee(&mut *tx, event_id, profile_id).await?
    else {
        return Err(AttendanceError::NotRegistered);
    };

    event_attendees_repo::delete_attendee(&mut *tx, event_id, profile_id).await?;

    let mut promoted = None;
    if existing.status == STATUS_CONFIRMED && event.max_attendees.is_some() {
        match event_attendees_repo::find_oldest_waitlisted(&mut *tx, event_id).await {
            Ok(Some(next)) => {
                if let Err(e) = event_attendees_repo::set_status(
                    &mut *tx,
                    event_id,
                    &next.profile_id,
                    STATUS_CONFIRMED,
                )
                .await
                {
                    return Err(AttendanceError::PromotionFailed(e));
                }
                promoted = Some(EventAttendeeRow {
                    status: STATUS_CONFIRMED.to_string(),
                    ..next
                });
            }
            Ok(None) => {}
            Err(e) => return Err(AttendanceError::PromotionFailed(e)),
        }
    }

    if let Err(e) = tx.commit().await {
        // Rolled back as a unit; the caller should re-fetch authoritative
        // state rather than assume either half applied.
        return Err(match promoted {
            Some(_) => AttendanceError::PromotionFailed(e),
            None => AttendanceError::Database(e),
        });
    }

    Ok(CancelOutcome {
        cancelled: existing,
        promoted,
    })
}

/// Voluntary move between confirmed and waitlist. Moving to confirmed is
/// guarded by the same capacity condition as admission and loses to a
/// concurrent fill with `CapacityRaceLost`. Never promotes anyone else;
/// promotion only fires on cancellation of a confirmed row.
pub async fn change_status(
    pool: &SqlitePool,
    locks: &EventLocks,
    event_id: &str,
    profile_id: &str,
    new_status: AttendanceStatus,
) -> Result<EventAttendeeRow, AttendanceError> {
    let _guard = locks.acquire(event_id).await;

    if events_repo::find_event_by_id(pool, event_id).await?.is_none() {
        return Err(AttendanceError::EventNotFound);
    }

    let mut tx = pool.begin().await?;

    let Some(existing) =
        event_attendees_repo::find_attendee(&mut *tx, event_id, profile_id).await?
    else {
        return Err(AttendanceError::NotRegistered);
    };

    if existing.status == new_status.as_str() {
        return Ok(existing);
    }

    match new_status {
        AttendanceStatus::Confirmed => {
            let updated =
                event_attendees_repo::confirm_if_capacity(&mut *tx, event_id, profile_id).await?;
            if updated == 0 {
                return Err(AttendanceError::CapacityRaceLost);
            }
        }
        AttendanceStatus::Waitlist => {
            event_attendees_repo::set_status(&mut *tx, event_id, profile_id, STATUS_WAITLIST)
                .await?;
        }
    }

    let row = event_attendees_repo::find_attendee(&mut *tx, event_id, profile_id)
        .await?
        .ok_or(AttendanceError::Database(sqlx::Error::RowNotFound))?;

    tx.commit().await?;
    Ok(row)
}

/// Confirmed and waitlisted attendees, both join-time ascending. The
/// waitlist ordering is also the promotion order; positions are 1-indexed.
pub async fn list_attendance(
    pool: &SqlitePool,
    event_id: &str,
) -> Result<AttendanceRoster, AttendanceError> {
    if events_repo::find_event_by_id(pool, event_id).await?.is_none() {
        return Err(AttendanceError::EventNotFound);
    }

    let confirmed = event_attendees_repo::list_by_status(pool, event_id, STATUS_CONFIRMED).await?;
    let waitlisted = event_attendees_repo::list_by_status(pool, event_id, STATUS_WAITLIST)
        .await?
        .into_iter()
        .enumerate()
        .map(|(idx, row)| WaitlistEntry {
            position: idx as i64 + 1,
            row,
        })
        .collect();

    Ok(AttendanceRoster {
        confirmed,
        waitlisted,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{event_attendees_repo, events_repo, schema};
    use sqlx::sqlite::SqlitePoolOptions;
    use uuid::Uuid;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        schema::init_schema(&pool).await.expect("schema init");
        pool
    }

    async fn seed_event(pool: &SqlitePool, max_attendees: Option<i64>) -> String {
        let id = Uuid::new_v4().to_string();
        events_repo::insert_event(
            pool,
            events_repo::NewEvent {
                id: &id,
                community_id: "community-1",
                title: "Meetup",
                description: None,
                location: Some("Downtown"),
                event_type: "offline",
                meeting_link: None,
                start_time: "2031-01-01T19:00:00Z",
                end_time: None,
                max_attendees,
                is_private: false,
                created_by: "organizer",
            },
        )
        .await
        .expect("seed event");
        id
    }

    fn profiles(roster: &[EventAttendeeRow]) -> Vec<&str> {
        roster.iter().map(|r| r.profile_id.as_str()).collect()
    }

    #[tokio::test]
    async fn admission_confirms_until_capacity_then_waitlists() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(1)).await;

        let a = request_attendance(&pool, &locks, &event_id, "alice")
            .await
            .unwrap();
        assert_eq!(a.status, STATUS_CONFIRMED);

        let b = request_attendance(&pool, &locks, &event_id, "bob")
            .await
            .unwrap();
        assert_eq!(b.status, STATUS_WAITLIST);

        let count = event_attendees_repo::count_confirmed(&pool, &event_id)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn unlimited_capacity_never_waitlists() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, None).await;

        for profile in ["alice", "bob", "carol", "dave"] {
            let row = request_attendance(&pool, &locks, &event_id, profile)
                .await
                .unwrap();
            assert_eq!(row.status, STATUS_CONFIRMED);
        }

        let roster = list_attendance(&pool, &event_id).await.unwrap();
        assert_eq!(roster.confirmed.len(), 4);
        assert!(roster.waitlisted.is_empty());
    }

    #[tokio::test]
    async fn duplicate_join_is_rejected() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(5)).await;

        request_attendance(&pool, &locks, &event_id, "alice")
            .await
            .unwrap();
        let err = request_attendance(&pool, &locks, &event_id, "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::AlreadyRegistered));

        let roster = list_attendance(&pool, &event_id).await.unwrap();
        assert_eq!(roster.confirmed.len() + roster.waitlisted.len(), 1);
    }

    #[tokio::test]
    async fn join_on_unknown_event_fails() {
        let pool = test_pool().await;
        let locks = EventLocks::default();

        let err = request_attendance(&pool, &locks, "missing", "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::EventNotFound));
    }

    #[tokio::test]
    async fn cancel_without_registration_is_a_noop_error() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(2)).await;

        let err = cancel_attendance(&pool, &locks, &event_id, "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::NotRegistered));
    }

    #[tokio::test]
    async fn cancelling_confirmed_promotes_oldest_waitlisted() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(2)).await;

        for profile in ["alice", "bob", "carol", "dave"] {
            request_attendance(&pool, &locks, &event_id, profile)
                .await
                .unwrap();
        }

        let outcome = cancel_attendance(&pool, &locks, &event_id, "alice")
            .await
            .unwrap();
        assert_eq!(outcome.cancelled.profile_id, "alice");
        let promoted = outcome.promoted.expect("carol should be promoted");
        assert_eq!(promoted.profile_id, "carol");
        assert_eq!(promoted.status, STATUS_CONFIRMED);

        let roster = list_attendance(&pool, &event_id).await.unwrap();
        assert_eq!(profiles(&roster.confirmed), vec!["bob", "carol"]);
        assert_eq!(roster.waitlisted.len(), 1);
        assert_eq!(roster.waitlisted[0].row.profile_id, "dave");
        assert_eq!(roster.waitlisted[0].position, 1);

        let count = event_attendees_repo::count_confirmed(&pool, &event_id)
            .await
            .unwrap();
        assert!(count <= 2);
    }

    #[tokio::test]
    async fn leaving_the_waitlist_promotes_nobody() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(1)).await;

        for profile in ["alice", "bob", "carol"] {
            request_attendance(&pool, &locks, &event_id, profile)
                .await
                .unwrap();
        }

        let outcome = cancel_attendance(&pool, &locks, &event_id, "bob")
            .await
            .unwrap();
        assert!(outcome.promoted.is_none());

        let roster = list_attendance(&pool, &event_id).await.unwrap();
        assert_eq!(profiles(&roster.confirmed), vec!["alice"]);
        assert_eq!(roster.waitlisted.len(), 1);
        assert_eq!(roster.waitlisted[0].row.profile_id, "carol");
        assert_eq!(roster.waitlisted[0].position, 1);
    }

    #[tokio::test]
    async fn waitlist_positions_follow_join_order() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(1)).await;

        for profile in ["alice", "bob", "carol", "dave"] {
            request_attendance(&pool, &locks, &event_id, profile)
                .await
                .unwrap();
        }

        let roster = list_attendance(&pool, &event_id).await.unwrap();
        let positions: Vec<(i64, &str)> = roster
            .waitlisted
            .iter()
            .map(|e| (e.position, e.row.profile_id.as_str()))
            .collect();
        assert_eq!(positions, vec![(1, "bob"), (2, "carol"), (3, "dave")]);
    }

    #[tokio::test]
    async fn explicit_demotion_and_return_to_confirmed() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(2)).await;

        request_attendance(&pool, &locks, &event_id, "alice")
            .await
            .unwrap();

        let demoted = change_status(
            &pool,
            &locks,
            &event_id,
            "alice",
            AttendanceStatus::Waitlist,
        )
        .await
        .unwrap();
        assert_eq!(demoted.status, STATUS_WAITLIST);

        let confirmed = change_status(
            &pool,
            &locks,
            &event_id,
            "alice",
            AttendanceStatus::Confirmed,
        )
        .await
        .unwrap();
        assert_eq!(confirmed.status, STATUS_CONFIRMED);
    }

    #[tokio::test]
    async fn explicit_confirm_loses_when_event_is_full() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(1)).await;

        request_attendance(&pool, &locks, &event_id, "alice")
            .await
            .unwrap();
        request_attendance(&pool, &locks, &event_id, "bob")
            .await
            .unwrap();

        let err = change_status(&pool, &locks, &event_id, "bob", AttendanceStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::CapacityRaceLost));

        // Still exactly one confirmed row; bob keeps his waitlist spot.
        let roster = list_attendance(&pool, &event_id).await.unwrap();
        assert_eq!(profiles(&roster.confirmed), vec!["alice"]);
        assert_eq!(roster.waitlisted[0].row.profile_id, "bob");
    }

    #[tokio::test]
    async fn change_status_requires_a_registration() {
        let pool = test_pool().await;
        let locks = EventLocks::default();
        let event_id = seed_event(&pool, Some(1)).await;

        let err = change_status(
            &pool,
            &locks,
            &event_id,
            "ghost",
            AttendanceStatus::Waitlist,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AttendanceError::NotRegistered));
    }

    #[tokio::test]
    async fn listing_an_unknown_event_fails() {
        let pool = test_pool().await;
        let err = list_attendance(&pool, "missing").await.unwrap_err();
        assert!(matches!(err, AttendanceError::EventNotFound));
    }
}
