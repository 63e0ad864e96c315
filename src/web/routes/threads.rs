use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::app_state::AppState;
use crate::services::{membership_service, threads_service};
use crate::web::middleware::auth::AuthenticatedProfile;

fn internal_error(context: &str, err: sqlx::Error) -> (StatusCode, Json<Value>) {
    warn!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error" })),
    )
}

#[derive(Debug, Deserialize)]
pub struct NewThreadBody {
    pub title: String,
    pub content: String,
}

pub async fn create_thread_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(community_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<NewThreadBody>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match threads_service::create_thread(
        &state.pool,
        &community_id,
        &profile.id,
        &body.title,
        &body.content,
    )
    .await
    {
        Ok(Some(thread)) => Ok((StatusCode::CREATED, Json(json!({ "thread": thread })))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "community_not_found" })),
        )),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) => Err(internal_error("Thread create failed", e)),
    }
}

pub async fn list_threads_handler(
    Extension(_profile): Extension<AuthenticatedProfile>,
    Path(community_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let threads = threads_service::list_community_threads(&state.pool, &community_id)
        .await
        .map_err(|e| internal_error("Thread list failed", e))?;
    Ok(Json(json!({ "threads": threads })))
}

pub async fn thread_detail_handler(
    Extension(_profile): Extension<AuthenticatedProfile>,
    Path(thread_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let view = threads_service::load_thread_detail(&state.pool, &thread_id)
        .await
        .map_err(|e| internal_error("Thread load failed", e))?;

    let Some(view) = view else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "thread_not_found" })),
        ));
    };

    Ok(Json(json!({
        "thread": view.thread,
        "replies": view.replies,
    })))
}

#[derive(Debug, Deserialize)]
pub struct NewReplyBody {
    pub content: String,
}

pub async fn create_reply_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(thread_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<NewReplyBody>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match threads_service::create_reply(&state.pool, &thread_id, &profile.id, &body.content).await
    {
        Ok(Some(reply)) => Ok((StatusCode::CREATED, Json(json!({ "reply": reply })))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "thread_not_found" })),
        )),
        Err(sqlx::Error::Protocol(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_input", "detail": msg })),
        )),
        Err(e) => Err(internal_error("Reply create failed", e)),
    }
}

pub async fn toggle_like_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(thread_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match threads_service::toggle_like(&state.pool, &thread_id, &profile.id).await {
        Ok(Some(liked)) => Ok(Json(json!({ "liked": liked }))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "thread_not_found" })),
        )),
        Err(e) => Err(internal_error("Thread like toggle failed", e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct PinThreadBody {
    pub is_pinned: bool,
}

pub async fn pin_thread_handler(
    Extension(profile): Extension<AuthenticatedProfile>,
    Path(thread_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<PinThreadBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    // Pinning is community moderation, so resolve the thread first and gate
    // on admin membership of its community.
    let thread = threads_service::load_thread_detail(&state.pool, &thread_id)
        .await
        .map_err(|e| internal_error("Thread load failed", e))?;
    let Some(thread) = thread else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "thread_not_found" })),
        ));
    };

    let caller_is_admin = membership_service::is_admin(
        &state.pool,
        &thread.thread.community_id,
        &profile.id,
    )
    .await
    .map_err(|e| internal_error("Admin check failed", e))?;
    if !caller_is_admin {
        return Err((StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" }))));
    }

    match threads_service::set_pinned(&state.pool, &thread_id, body.is_pinned).await {
        Ok(Some(thread)) => Ok(Json(json!({ "thread": thread }))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "thread_not_found" })),
        )),
        Err(e) => Err(internal_error("Thread pin failed", e)),
    }
}
