use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::app_state::AppState;
use crate::services::membership_service;
use crate::web::middleware::auth::AuthenticatedProfile;

fn internal_error(context: &str, err: sqlx::Error) -> (StatusCode, Json<Value>) {
    warn!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error" })),
    )
}

fn forbidden() -> (StatusCode, Json<Value>) {
    (StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" })))
}

pub async fn list_members_handler(
    Extension(_profile): Extension<AuthenticatedProfile>,
    Path(community_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let members = membership_service::list_members(&state.pool, &community_id)
        .await
        .map_err(|e| internal_error("Member list failed", e))?;
    Ok(Json(json!({ "members": members })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberBody {
    pub status: Option<String>, // pending|approved|rejected|banned
    pub is_admin: Option<bool>,
}

pub async fn update_member_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path((community_id, subject_profile_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(body): Json<UpdateMemberBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let caller_is_admin = membership_service::is_admin(&state.pool, &community_id, &profile.id)
        .await
        .map_err(|e| internal_error("Admin check failed", e))?;
    if !caller_is_admin {
        return Err(forbidden());
    }

    match membership_service::update_member(
        &state.pool,
        &community_id,
        &subject_profile_id,
        body.status.as_deref(),
        body.is_admin,
    )
    .await
    {
        Ok(Some(member)) => Ok(Json(json!({ "membership": member }))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "member_not_found" })),
        )),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) => Err(internal_error("Member update failed", e)),
    }
}

pub async fn remove_member_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path((community_id, subject_profile_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let caller_is_admin = membership_service::is_admin(&state.pool, &community_id, &profile.id)
        .await
        .map_err(|e| internal_error("Admin check failed", e))?;
    if !caller_is_admin {
        return Err(forbidden());
    }

    let removed =
        membership_service::remove_member(&state.pool, &community_id, &subject_profile_id)
            .await
            .map_err(|e| internal_error("Member remove failed", e))?;

    if removed == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "member_not_found" })),
        ));
    }
    Ok(Json(json!({ "removed": true })))
}
