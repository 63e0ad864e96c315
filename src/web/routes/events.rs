use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::app_state::AppState;
use crate::services::events_service::{self, NewEventInput};
use crate::web::middleware::auth::AuthenticatedProfile;

pub async fn create_event_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    State(state): State<AppState>,
    Json(input): Json<NewEventInput>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match events_service::create_event(&state.pool, &profile.id, &input).await {
        Ok(Some(event)) => Ok((StatusCode::CREATED, Json(json!({ "event": event })))),
        Ok(None) => Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "not_a_member" })),
        )),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) => {
            warn!("Event create failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error" })),
            ))
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListEventsQuery {
    pub community_id: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_events_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Query(query): Query<ListEventsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let events = match query.community_id.as_deref() {
        // A community's calendar (private events included) is members-only.
        Some(community_id) => {
            match events_service::list_community_events(&state.pool, community_id, &profile.id)
                .await
            {
                Ok(Some(events)) => events,
                Ok(None) => {
                    return Err((
                        StatusCode::FORBIDDEN,
                        Json(json!({ "error": "not_a_member" })),
                    ))
                }
                Err(e) => {
                    warn!("Community events list failed for {}: {}", community_id, e);
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": "internal_error" })),
                    ));
                }
            }
        }
        None => events_service::list_upcoming_events(&state.pool, query.limit.unwrap_or(50))
            .await
            .map_err(|e| {
                warn!("Upcoming events list failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal_error" })),
                )
            })?,
    };

    Ok(Json(json!({ "events": events })))
}

pub async fn event_detail_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let view = events_service::load_event_detail_view(&state.pool, &event_id, &profile.id)
        .await
        .map_err(|e| {
            warn!("Event detail load failed for {}: {}", event_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error" })),
            )
        })?;

    let Some(view) = view else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "event_not_found" })),
        ));
    };

    Ok(Json(json!({
        "event": view.event,
        "my_attendance": view.my_attendance,
        "is_full": view.is_full,
    })))
}
