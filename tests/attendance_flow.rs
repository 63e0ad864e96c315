//! End-to-end attendance flow tests, including the race scenarios the
//! per-event lock and the atomic admission insert exist for.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::NamedTempFile;
use uuid::Uuid;

use gather::database::{event_attendees_repo, events_repo, schema};
use gather::services::attendance_service::{
    self, AttendanceStatus, EventLocks, STATUS_CONFIRMED, STATUS_WAITLIST,
};
use gather::services::{community_service, events_service, membership_service};

async fn file_backed_pool(db_file: &NamedTempFile, max_connections: u32) -> SqlitePool {
    let url = format!("sqlite://{}", db_file.path().display());
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await
        .expect("file-backed pool");
    schema::init_schema(&pool).await.expect("schema init");
    pool
}

async fn memory_pool() -> SqlitePool {
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
            title: "Board game night",
            description: None,
            location: Some("Clubhouse"),
            event_type: "offline",
            meeting_link: None,
            start_time: "2031-06-01T19:00:00Z",
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

/// Two simultaneous joins on the last open slot: exactly one lands
/// confirmed, the other is waitlisted, and the confirmed count never
/// exceeds capacity.
#[tokio::test]
async fn last_slot_race_admits_exactly_one() {
    let db_file = NamedTempFile::new().expect("temp db");
    let pool = file_backed_pool(&db_file, 5).await;
    let locks = EventLocks::default();
    let event_id = seed_event(&pool, Some(5)).await;

    for profile in ["p1", "p2", "p3", "p4"] {
        let row = attendance_service::request_attendance(&pool, &locks, &event_id, profile)
            .await
            .expect("seed join");
        assert_eq!(row.status, STATUS_CONFIRMED);
    }

    let mut handles = vec![];
    for profile in ["racer-a", "racer-b"] {
        let pool = pool.clone();
        let locks = locks.clone();
        let event_id = event_id.clone();
        handles.push(tokio::spawn(async move {
            attendance_service::request_attendance(&pool, &locks, &event_id, profile)
                .await
                .expect("racing join")
        }));
    }

    let mut confirmed = 0;
    let mut waitlisted = 0;
    for handle in handles {
        let row = handle.await.expect("task join");
        match row.status.as_str() {
            STATUS_CONFIRMED => confirmed += 1,
            STATUS_WAITLIST => waitlisted += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!(confirmed, 1);
    assert_eq!(waitlisted, 1);

    let total_confirmed = event_attendees_repo::count_confirmed(&pool, &event_id)
        .await
        .expect("count");
    assert_eq!(total_confirmed, 5);
}

/// A burst of joins well past capacity: the confirmed list fills exactly to
/// capacity and everyone else queues in arrival order.
#[tokio::test]
async fn join_burst_never_oversubscribes() {
    let db_file = NamedTempFile::new().expect("temp db");
    let pool = file_backed_pool(&db_file, 5).await;
    let locks = EventLocks::default();
    let event_id = seed_event(&pool, Some(3)).await;

    let mut handles = vec![];
    for i in 0..10 {
        let pool = pool.clone();
        let locks = locks.clone();
        let event_id = event_id.clone();
        handles.push(tokio::spawn(async move {
            attendance_service::request_attendance(&pool, &locks, &event_id, &format!("p{}", i))
                .await
                .expect("join")
        }));
    }
    for handle in handles {
        handle.await.expect("task join");
    }

    let roster = attendance_service::list_attendance(&pool, &event_id)
        .await
        .expect("roster");
    assert_eq!(roster.confirmed.len(), 3);
    assert_eq!(roster.waitlisted.len(), 7);

    let positions: Vec<i64> = roster.waitlisted.iter().map(|e| e.position).collect();
    assert_eq!(positions, (1..=7).collect::<Vec<i64>>());
}

/// Two confirmed attendees cancel at the same time while two sit on the
/// waitlist: each cancellation promotes exactly one, nobody is promoted
/// twice and no slot is left hanging.
#[tokio::test]
async fn simultaneous_cancellations_promote_exactly_once_each() {
    let db_file = NamedTempFile::new().expect("temp db");
    let pool = file_backed_pool(&db_file, 5).await;
    let locks = EventLocks::default();
    let event_id = seed_event(&pool, Some(2)).await;

    for profile in ["alice", "bob", "carol", "dave"] {
        attendance_service::request_attendance(&pool, &locks, &event_id, profile)
            .await
            .expect("seed join");
    }

    let mut handles = vec![];
    for profile in ["alice", "bob"] {
        let pool = pool.clone();
        let locks = locks.clone();
        let event_id = event_id.clone();
        handles.push(tokio::spawn(async move {
            attendance_service::cancel_attendance(&pool, &locks, &event_id, profile)
                .await
                .expect("cancel")
        }));
    }

    let mut promoted = vec![];
    for handle in handles {
        let outcome = handle.await.expect("task join");
        promoted.push(outcome.promoted.expect("each cancel promotes one").profile_id);
    }
    promoted.sort();
    assert_eq!(promoted, vec!["carol", "dave"]);

    let roster = attendance_service::list_attendance(&pool, &event_id)
        .await
        .expect("roster");
    let confirmed: Vec<&str> = roster
        .confirmed
        .iter()
        .map(|r| r.profile_id.as_str())
        .collect();
    assert_eq!(confirmed, vec!["carol", "dave"]);
    assert!(roster.waitlisted.is_empty());
}

/// The whole journey as the API drives it: community, event, joins past
/// capacity, cancellation with promotion, an explicit demotion, and the
/// recomputed queue positions along the way.
#[tokio::test]
async fn full_attendance_lifecycle() {
    let pool = memory_pool().await;
    let locks = EventLocks::default();

    let community = community_service::create_community(
        &pool,
        "organizer",
        &community_service::NewCommunityInput {
            name: "Chess club".to_string(),
            description: None,
            cover_image: None,
            country: None,
            city: None,
        },
    )
    .await
    .expect("create community")
    .expect("community row");

    // The creator is seated as an approved admin and can plan events.
    assert!(
        membership_service::is_admin(&pool, &community.id, "organizer")
            .await
            .expect("admin check")
    );

    let event = events_service::create_event(
        &pool,
        "organizer",
        &events_service::NewEventInput {
            community_id: community.id.clone(),
            title: "Blitz tournament".to_string(),
            description: Some("Five rounds".to_string()),
            location: Some("Main hall".to_string()),
            event_type: "offline".to_string(),
            meeting_link: None,
            start_time: "2031-03-03T18:00:00Z".to_string(),
            end_time: None,
            max_attendees: Some(2),
            is_private: false,
        },
    )
    .await
    .expect("create event")
    .expect("creator is a member");

    for profile in ["alice", "bob", "carol", "dave"] {
        attendance_service::request_attendance(&pool, &locks, &event.id, profile)
            .await
            .expect("join");
    }

    let roster = attendance_service::list_attendance(&pool, &event.id)
        .await
        .expect("roster");
    assert_eq!(roster.confirmed.len(), 2);
    assert_eq!(roster.waitlisted.len(), 2);
    assert_eq!(roster.waitlisted[0].row.profile_id, "carol");
    assert_eq!(roster.waitlisted[0].position, 1);

    // Alice cancels; carol moves up, dave becomes first in line.
    let outcome = attendance_service::cancel_attendance(&pool, &locks, &event.id, "alice")
        .await
        .expect("cancel");
    assert_eq!(
        outcome.promoted.expect("promotion").profile_id,
        "carol"
    );

    let roster = attendance_service::list_attendance(&pool, &event.id)
        .await
        .expect("roster");
    let confirmed: Vec<&str> = roster
        .confirmed
        .iter()
        .map(|r| r.profile_id.as_str())
        .collect();
    assert_eq!(confirmed, vec!["bob", "carol"]);
    assert_eq!(roster.waitlisted[0].row.profile_id, "dave");
    assert_eq!(roster.waitlisted[0].position, 1);

    // Bob steps back voluntarily; nobody is auto-promoted by a demotion.
    let demoted =
        attendance_service::change_status(&pool, &locks, &event.id, "bob", AttendanceStatus::Waitlist)
            .await
            .expect("demote");
    assert_eq!(demoted.status, STATUS_WAITLIST);

    let roster = attendance_service::list_attendance(&pool, &event.id)
        .await
        .expect("roster");
    assert_eq!(roster.confirmed.len(), 1);
    assert_eq!(roster.waitlisted.len(), 2);

    // Queue order is FIFO by row creation time, and bob's row predates
    // dave's, so the demotion puts bob at the front of the line.
    assert_eq!(roster.waitlisted[0].row.profile_id, "bob");
    assert_eq!(roster.waitlisted[1].row.profile_id, "dave");
}
