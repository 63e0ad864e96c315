use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::app_state::AppState;
use crate::services::attendance_service::{self, AttendanceError, AttendanceStatus};
use crate::web::middleware::auth::AuthenticatedProfile;

fn error_response(op: &str, event_id: &str, err: AttendanceError) -> (StatusCode, Json<Value>) {
    let (status, code) = match &err {
        AttendanceError::EventNotFound => (StatusCode::NOT_FOUND, "event_not_found"),
        AttendanceError::NotRegistered => (StatusCode::NOT_FOUND, "not_registered"),
        AttendanceError::AlreadyRegistered => (StatusCode::CONFLICT, "already_registered"),
        AttendanceError::CapacityRaceLost => (StatusCode::CONFLICT, "capacity_race_lost"),
        AttendanceError::PromotionFailed(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "promotion_failed")
        }
        AttendanceError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };

    if status.is_server_error() {
        warn!("Attendance {} failed for event {}: {}", op, event_id, err);
    }
    (status, Json(json!({ "error": code })))
}

pub async fn request_attendance_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let row = attendance_service::request_attendance(
        &state.pool,
        &state.event_locks,
        &event_id,
        &profile.id,
    )
    .await
    .map_err(|e| error_response("request", &event_id, e))?;

    Ok(Json(json!({ "attendance": row })))
}

pub async fn cancel_attendance_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let outcome = attendance_service::cancel_attendance(
        &state.pool,
        &state.event_locks,
        &event_id,
        &profile.id,
    )
    .await
    .map_err(|e| error_response("cancel", &event_id, e))?;

    Ok(Json(json!({
        "cancelled": outcome.cancelled,
        "promoted": outcome.promoted,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusBody {
    pub status: String, // confirmed|waitlist
}

pub async fn change_status_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<ChangeStatusBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(new_status) = AttendanceStatus::parse(&body.status) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_status" })),
        ));
    };

    let row = attendance_service::change_status(
        &state.pool,
        &state.event_locks,
        &event_id,
        &profile.id,
        new_status,
    )
    .await
    .map_err(|e| error_response("change_status", &event_id, e))?;

    Ok(Json(json!({ "attendance": row })))
}

pub async fn list_attendance_handler(
    Extension(_profile): Extension<AuthenticatedProfile>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let roster = attendance_service::list_attendance(&state.pool, &event_id)
        .await
        .map_err(|e| error_response("list", &event_id, e))?;

    let waitlist: Vec<Value> = roster
        .waitlisted
        .iter()
        .map(|entry| {
            json!({
                "position": entry.position,
                "event_id": entry.row.event_id,
                "profile_id": entry.row.profile_id,
                "status": entry.row.status,
                "created_at": entry.row.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "confirmed": roster.confirmed,
        "waitlist": waitlist,
    })))
}
