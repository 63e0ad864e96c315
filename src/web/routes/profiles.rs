use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::app_state::AppState;
use crate::services::profile_service::{self, ProfileUpdateInput};
use crate::web::middleware::auth::AuthenticatedProfile;

fn internal_error(context: &str, err: sqlx::Error) -> (StatusCode, Json<Value>) {
    warn!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error" })),
    )
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

pub async fn profile_detail_handler(
    Extension(_profile): Extension<AuthenticatedProfile>,
    Path(profile_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let row = profile_service::load_profile(&state.pool, &profile_id)
        .await
        .map_err(|e| internal_error("Profile load failed", e))?;

    let Some(row) = row else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "profile_not_found" })),
        ));
    };
    Ok(Json(json!({ "profile": row })))
}

pub async fn update_own_profile_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    State(state): State<AppState>,
    Json(input): Json<ProfileUpdateInput>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match profile_service::update_own_profile(&state.pool, &profile.id, &input).await {
        Ok(Some(row)) => Ok(Json(json!({ "profile": row }))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "profile_not_found" })),
        )),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) if is_unique_violation(&e) => Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": "username_taken" })),
        )),
        Err(e) => Err(internal_error("Profile update failed", e)),
    }
}

pub async fn follow_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(profile_id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match profile_service::follow(&state.pool, &profile.id, &profile_id).await {
        Ok(_) => Ok((StatusCode::CREATED, Json(json!({ "following": true })))),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) if is_unique_violation(&e) => Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": "already_following" })),
        )),
        Err(e) => Err(internal_error("Follow failed", e)),
    }
}

pub async fn unfollow_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(profile_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let deleted = profile_service::unfollow(&state.pool, &profile.id, &profile_id)
        .await
        .map_err(|e| internal_error("Unfollow failed", e))?;

    if deleted == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not_following" })),
        ));
    }
    Ok(Json(json!({ "following": false })))
}

pub async fn list_followers_handler(
    Extension(_profile): Extension<AuthenticatedProfile>,
    Path(profile_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let followers = profile_service::list_followers(&state.pool, &profile_id)
        .await
        .map_err(|e| internal_error("Followers list failed", e))?;
    Ok(Json(json!({ "followers": followers })))
}

pub async fn list_following_handler(
    Extension(_profile): Extension<AuthenticatedProfile>,
    Path(profile_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let following = profile_service::list_following(&state.pool, &profile_id)
        .await
        .map_err(|e| internal_error("Following list failed", e))?;
    Ok(Json(json!({ "following": following })))
}
