use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{community_members_repo, event_attendees_repo, events_repo};
use crate::models::{EventAttendeeRow, EventDetailRow, EventRow};

pub const EVENT_TYPES: [&str; 3] = ["online", "offline", "hybrid"];

#[derive(Debug, Deserialize)]
pub struct NewEventInput {
    pub community_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_type: String, // online|offline|hybrid
    pub meeting_link: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub max_attendees: Option<i64>,
    #[serde(default)]
    pub is_private: bool,
}

pub struct EventDetailView {
    pub event: EventDetailRow,
    pub my_attendance: Option<EventAttendeeRow>,
    pub is_full: bool,
}

pub async fn create_event(
    pool: &SqlitePool,
    creator_profile_id: &str,
    input: &NewEventInput,
) -> sqlx::Result<Option<EventRow>> {
    if input.title.trim().is_empty() || input.start_time.trim().is_empty() {
        return Err(sqlx::Error::Protocol("title and start_time are required".into()));
    }
    if !EVENT_TYPES.contains(&input.event_type.as_str()) {
        return Err(sqlx::Error::Protocol("invalid event type".into()));
    }
    if matches!(input.max_attendees, Some(n) if n <= 0) {
        return Err(sqlx::Error::Protocol("max_attendees must be positive".into()));
    }

    // Only approved members can put events on a community's calendar.
    let member =
        community_members_repo::find_member(pool, &input.community_id, creator_profile_id).await?;
    if !matches!(member, Some(m) if m.status == "approved") {
        return Ok(None);
    }

    // Online events carry a meeting link instead of a venue; offline events
    // the other way around. Same normalization the event form applied.
    let location = match input.event_type.as_str() {
        "online" => None,
        _ => input.location.as_deref(),
    };
    let meeting_link = match input.event_type.as_str() {
        "offline" => None,
        _ => input.meeting_link.as_deref(),
    };

    let id = Uuid::new_v4().to_string();
    events_repo::insert_event(
        pool,
        events_repo::NewEvent {
            id: &id,
            community_id: &input.community_id,
            title: input.title.trim(),
            description: input.description.as_deref(),
            location,
            event_type: &input.event_type,
            meeting_link,
            start_time: &input.start_time,
            end_time: input.end_time.as_deref(),
            max_attendees: input.max_attendees,
            is_private: input.is_private,
            created_by: creator_profile_id,
        },
    )
    .await?;

    events_repo::find_event_by_id(pool, id.as_str()).await
}

pub async fn load_event_detail_view(
    pool: &SqlitePool,
    event_id: &str,
    viewer_profile_id: &str,
) -> sqlx::Result<Option<EventDetailView>> {
    let Some(event) = events_repo::load_event_detail(pool, event_id).await? else {
        return Ok(None);
    };

    let my_attendance =
        event_attendees_repo::find_attendee(pool, event_id, viewer_profile_id).await?;
    let is_full = match event.max_attendees {
        Some(max) => event.confirmed_count >= max,
        None => false,
    };

    Ok(Some(EventDetailView {
        event,
        my_attendance,
        is_full,
    }))
}

pub async fn list_upcoming_events(pool: &SqlitePool, limit: i64) -> sqlx::Result<Vec<EventRow>> {
    events_repo::list_upcoming_public(pool, limit.clamp(1, 200)).await
}

/// A community's full calendar, private events included; members only.
pub async fn list_community_events(
    pool: &SqlitePool,
    community_id: &str,
    viewer_profile_id: &str,
) -> sqlx::Result<Option<Vec<EventRow>>> {
    let member =
        community_members_repo::find_member(pool, community_id, viewer_profile_id).await?;
    if !matches!(member, Some(m) if m.status == "approved") {
        return Ok(None);
    }
    events_repo::list_for_community(pool, community_id).await.map(Some)
}
